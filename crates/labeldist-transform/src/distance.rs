use num_traits::Zero;

/// Scalar domain of a propagated distance field.
///
/// Unifies the integer "unknown" sentinel and the floating-point infinity
/// sentinel behind one marker concept, so the chamfer scans are written once
/// for `u16`, `u32` and `f32` fields.
pub trait DistanceValue: Copy + PartialOrd + Zero + Send + Sync {
    /// The "not yet reached" marker used before propagation converges.
    const SENTINEL: Self;

    /// Whether this value is the sentinel.
    fn is_sentinel(&self) -> bool;

    /// Add a mask weight to this value.
    ///
    /// The sentinel absorbs any addend, and integer sums clamp at the
    /// sentinel instead of wrapping.
    fn add_weight(self, w: Self) -> Self;

    /// Divide by the normalization weight of a mask, rounding to the
    /// nearest representable value in integer domains. The sentinel is
    /// left untouched.
    fn normalize_by(self, norm: Self) -> Self;

    /// This value as `f64`, for threshold comparisons against physical
    /// distances.
    fn as_f64(self) -> f64;
}

impl DistanceValue for u16 {
    const SENTINEL: Self = u16::MAX;

    fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    fn add_weight(self, w: Self) -> Self {
        // saturation lands exactly on the sentinel, which also makes
        // sentinel + w = sentinel
        self.saturating_add(w)
    }

    fn normalize_by(self, norm: Self) -> Self {
        if self.is_sentinel() {
            return self;
        }
        (self as f64 / norm as f64).round() as u16
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl DistanceValue for u32 {
    const SENTINEL: Self = u32::MAX;

    fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    fn add_weight(self, w: Self) -> Self {
        self.saturating_add(w)
    }

    fn normalize_by(self, norm: Self) -> Self {
        if self.is_sentinel() {
            return self;
        }
        (self as f64 / norm as f64).round() as u32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl DistanceValue for f32 {
    const SENTINEL: Self = f32::INFINITY;

    fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    fn add_weight(self, w: Self) -> Self {
        self + w
    }

    fn normalize_by(self, norm: Self) -> Self {
        if self.is_sentinel() {
            return self;
        }
        self / norm
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}
