/// Observer for coarse progress of a long-running scan.
///
/// Engines call [`ProgressMonitor::update`] at safe points (start of a scan
/// line or plane). The monitor is purely observational and has no effect on
/// control flow or results.
pub trait ProgressMonitor {
    /// Report that `current` of `total` units of `phase` are done.
    fn update(&self, phase: &str, current: u64, total: u64);
}

/// A monitor that discards all events, used by the plain entry points.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressMonitor for NoProgress {
    fn update(&self, _phase: &str, _current: u64, _total: u64) {}
}

/// A monitor that emits progress as `log::debug!` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressMonitor for LogProgress {
    fn update(&self, phase: &str, current: u64, total: u64) {
        log::debug!("{phase}: {current}/{total}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<(String, u64, u64)>>);

    impl ProgressMonitor for Recorder {
        fn update(&self, phase: &str, current: u64, total: u64) {
            self.0.borrow_mut().push((phase.to_string(), current, total));
        }
    }

    #[test]
    fn recorder_receives_events() {
        let recorder = Recorder(RefCell::new(Vec::new()));
        recorder.update("forward scan", 1, 4);
        recorder.update("forward scan", 2, 4);
        let events = recorder.0.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ("forward scan".to_string(), 1, 4));
    }
}
