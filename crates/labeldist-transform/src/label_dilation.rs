use labeldist_grid::LabelGrid;

use crate::distance::DistanceValue;
use crate::error::TransformError;
use crate::mask::{ChamferMask, WeightedOffset};
use crate::progress::{NoProgress, ProgressMonitor};

/// Grow every labeled region into the background up to a distance cap.
///
/// Runs the same two-pass chamfer scan as
/// [`crate::chamfer::distance_transform`], but each element carries a label
/// alongside its distance. Labeled elements are never overwritten and sit at
/// distance 0; a background element takes the label of the neighbor that
/// improves its distance, as long as the improved distance stays strictly
/// below `max_distance` in normalized units.
///
/// When two regions are equidistant the surviving label depends on the scan
/// order: the first strictly-improving write wins. This is a documented
/// artifact of the two-pass scan, not a nearest-label policy.
///
/// # Arguments
///
/// * `src` - The input grid of region labels, 0 being background.
/// * `mask` - The weighted offsets driving the propagation.
/// * `max_distance` - The growth cap, in units of the normalization weight.
///
/// # Returns
///
/// A new label grid with the grown regions.
///
/// # Examples
///
/// ```
/// use labeldist_grid::LabelGrid;
/// use labeldist_transform::label_dilation::dilate_labels;
/// use labeldist_transform::mask::ChamferMask;
///
/// let labels = LabelGrid::<2>::new([5, 1].into(), vec![7, 0, 0, 0, 0]).unwrap();
/// let mask = ChamferMask::<u16, 2>::chamfer_3_4();
///
/// let grown = dilate_labels(&labels, &mask, 2.0).unwrap();
/// assert_eq!(grown.as_slice(), &[7, 7, 0, 0, 0]);
/// ```
pub fn dilate_labels<W, const D: usize>(
    src: &LabelGrid<D>,
    mask: &ChamferMask<W, D>,
    max_distance: f64,
) -> Result<LabelGrid<D>, TransformError>
where
    W: DistanceValue,
{
    dilate_labels_with_progress(src, mask, max_distance, &NoProgress)
}

/// Same as [`dilate_labels`], reporting per-line progress to `monitor`.
pub fn dilate_labels_with_progress<W, const D: usize>(
    src: &LabelGrid<D>,
    mask: &ChamferMask<W, D>,
    max_distance: f64,
    monitor: &impl ProgressMonitor,
) -> Result<LabelGrid<D>, TransformError>
where
    W: DistanceValue,
{
    let threshold = max_distance * mask.normalization_weight().as_f64();

    // working pair: labels get grown in place, distances start unknown on
    // background and arrived (0) on labeled elements
    let mut labels: Vec<u32> = src.as_slice().to_vec();
    let mut dist: Vec<W> = src
        .as_slice()
        .iter()
        .map(|&label| if label == 0 { W::SENTINEL } else { W::zero() })
        .collect();

    pass(
        src,
        &mut labels,
        &mut dist,
        mask.forward_offsets(),
        threshold,
        false,
        "dilation forward pass",
        monitor,
    );
    pass(
        src,
        &mut labels,
        &mut dist,
        mask.backward_offsets(),
        threshold,
        true,
        "dilation backward pass",
        monitor,
    );

    Ok(LabelGrid::new(src.size(), labels)?)
}

#[allow(clippy::too_many_arguments)]
fn pass<W, const D: usize>(
    src: &LabelGrid<D>,
    labels: &mut [u32],
    dist: &mut [W],
    offsets: &[WeightedOffset<W, D>],
    threshold: f64,
    reverse: bool,
    phase: &str,
    monitor: &impl ProgressMonitor,
) where
    W: DistanceValue,
{
    let width = src.extent(0);
    let lines = src.numel() / width;
    let fixed = src.as_slice();

    for step in 0..lines {
        monitor.update(phase, step as u64, lines as u64);
        let line = if reverse { lines - 1 - step } else { step };
        let base = line * width;
        let mut coords = src.coords_of(base);
        for i in 0..width {
            let x = if reverse { width - 1 - i } else { i };
            coords[0] = x;
            let index = base + x;

            // originally labeled elements are fixed
            if fixed[index] != 0 {
                continue;
            }

            // first strictly-improving candidate wins the label
            let mut best = dist[index];
            let mut best_label = labels[index];
            for offset in offsets {
                let Some(n) = src.offset_index(coords, offset.delta) else {
                    continue;
                };
                if labels[n] == 0 {
                    continue;
                }
                let candidate = dist[n].add_weight(offset.weight);
                if candidate < best && candidate.as_f64() < threshold {
                    best = candidate;
                    best_label = labels[n];
                }
            }
            dist[index] = best;
            labels[index] = best_label;
        }
    }
}
