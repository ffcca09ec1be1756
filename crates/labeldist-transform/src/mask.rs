use num_traits::Zero;

use crate::distance::DistanceValue;
use crate::error::TransformError;

/// A neighbor displacement tagged with a propagation weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedOffset<W, const D: usize> {
    /// Displacement from the current element, in grid steps per axis.
    pub delta: [isize; D],
    /// Propagation weight of the step, strictly positive.
    pub weight: W,
}

/// An immutable catalog of weighted neighbor offsets for the two-pass
/// chamfer scans.
///
/// Offsets are partitioned into a *forward* subset (pointing to elements
/// already visited when scanning in increasing row-major order) and a
/// *backward* subset (the decreasing-order pass). The partition is derived
/// once from the scan order here, so the propagation engines never
/// hard-code neighbor tables.
///
/// # Examples
///
/// ```
/// use labeldist_transform::mask::ChamferMask;
///
/// let mask = ChamferMask::<u16, 2>::chamfer_3_4();
///
/// assert_eq!(mask.forward_offsets().len(), 4);
/// assert_eq!(mask.backward_offsets().len(), 4);
/// assert_eq!(mask.normalization_weight(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct ChamferMask<W, const D: usize> {
    forward: Vec<WeightedOffset<W, D>>,
    backward: Vec<WeightedOffset<W, D>>,
    normalization: W,
}

/// Whether the offset points to an element visited earlier in the
/// increasing row-major scan, i.e. its most significant non-zero axis
/// component is negative.
fn is_forward<const D: usize>(delta: &[isize; D]) -> bool {
    for axis in (0..D).rev() {
        match delta[axis].cmp(&0) {
            std::cmp::Ordering::Less => return true,
            std::cmp::Ordering::Greater => return false,
            std::cmp::Ordering::Equal => {}
        }
    }
    false
}

impl<W, const D: usize> ChamferMask<W, D>
where
    W: DistanceValue,
{
    /// Create a mask from a full neighbor list.
    ///
    /// The offsets are split into forward and backward subsets according to
    /// the row-major scan order. Zero displacements are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or any weight is not strictly
    /// positive.
    pub fn new(offsets: Vec<WeightedOffset<W, D>>) -> Result<Self, TransformError> {
        if offsets.iter().any(|o| o.weight <= W::zero()) {
            return Err(TransformError::InvalidWeight);
        }
        let offsets: Vec<_> = offsets
            .into_iter()
            .filter(|o| o.delta.iter().any(|&d| d != 0))
            .collect();
        if offsets.is_empty() {
            return Err(TransformError::EmptyMask);
        }
        Ok(Self::assemble(offsets))
    }

    /// Build the partition from a validated, non-empty neighbor list.
    fn assemble(offsets: Vec<WeightedOffset<W, D>>) -> Self {
        let mut forward = Vec::new();
        let mut backward = Vec::new();
        for offset in offsets {
            if is_forward(&offset.delta) {
                forward.push(offset);
            } else {
                backward.push(offset);
            }
        }

        // minimal single-axis weight; falls back to the overall minimum for
        // masks without a unit orthogonal step
        let all = forward.iter().chain(backward.iter());
        let single_axis = forward
            .iter()
            .chain(backward.iter())
            .filter(|o| {
                o.delta.iter().filter(|&&d| d != 0).count() == 1
                    && o.delta.iter().all(|&d| d.abs() <= 1)
            })
            .map(|o| o.weight)
            .reduce(|a, b| if b < a { b } else { a });
        let normalization = match single_axis {
            Some(w) => w,
            None => all
                .map(|o| o.weight)
                .reduce(|a, b| if b < a { b } else { a })
                .unwrap_or_else(W::zero),
        };

        Self {
            forward,
            backward,
            normalization,
        }
    }

    /// Offsets used during the increasing-order pass.
    pub fn forward_offsets(&self) -> &[WeightedOffset<W, D>] {
        &self.forward
    }

    /// Offsets used during the decreasing-order pass.
    pub fn backward_offsets(&self) -> &[WeightedOffset<W, D>] {
        &self.backward
    }

    /// The minimal single-axis weight, used to rescale raw chamfer values
    /// toward Euclidean distance.
    pub fn normalization_weight(&self) -> W {
        self.normalization
    }
}

impl<W> ChamferMask<W, 2>
where
    W: DistanceValue,
{
    /// Create a 2D mask from per-class weights.
    ///
    /// `weights[0]` applies to orthogonal steps, `weights[1]` (optional) to
    /// diagonal steps, and `weights[2]` (optional) to chess-knight steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight count is not 1 to 3 or any weight is
    /// not strictly positive.
    pub fn from_weights(weights: &[W]) -> Result<Self, TransformError> {
        if weights.is_empty() || weights.len() > 3 {
            return Err(TransformError::InvalidWeightCount(weights.len()));
        }
        ChamferMask::new(neighbors_2d(weights))
    }
}

impl<W> ChamferMask<W, 3>
where
    W: DistanceValue,
{
    /// Create a 3D mask from per-class weights.
    ///
    /// `weights[0]` applies to orthogonal steps, `weights[1]` (optional) to
    /// square-diagonal steps, and `weights[2]` (optional) to cube-diagonal
    /// steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight count is not 1 to 3 or any weight is
    /// not strictly positive.
    pub fn from_weights(weights: &[W]) -> Result<Self, TransformError> {
        if weights.is_empty() || weights.len() > 3 {
            return Err(TransformError::InvalidWeightCount(weights.len()));
        }
        ChamferMask::new(neighbors_3d(weights))
    }
}

/// Full 2D neighbor table for the given per-class weights.
fn neighbors_2d<W: Copy>(weights: &[W]) -> Vec<WeightedOffset<W, 2>> {
    let mut offsets = Vec::new();
    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            let class = dx.unsigned_abs() + dy.unsigned_abs();
            match class {
                1 => offsets.push(WeightedOffset {
                    delta: [dx, dy],
                    weight: weights[0],
                }),
                2 => {
                    if let Some(&w) = weights.get(1) {
                        offsets.push(WeightedOffset {
                            delta: [dx, dy],
                            weight: w,
                        });
                    }
                }
                _ => {}
            }
        }
    }
    if let Some(&w) = weights.get(2) {
        for &(dx, dy) in &[
            (-1isize, -2isize),
            (1, -2),
            (-2, -1),
            (2, -1),
            (-2, 1),
            (2, 1),
            (-1, 2),
            (1, 2),
        ] {
            offsets.push(WeightedOffset {
                delta: [dx, dy],
                weight: w,
            });
        }
    }
    offsets
}

/// Full 3D neighbor table for the given per-class weights.
fn neighbors_3d<W: Copy>(weights: &[W]) -> Vec<WeightedOffset<W, 3>> {
    let mut offsets = Vec::new();
    for dz in -1isize..=1 {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                let class = dx.unsigned_abs() + dy.unsigned_abs() + dz.unsigned_abs();
                let weight = match class {
                    1 => Some(weights[0]),
                    2 => weights.get(1).copied(),
                    3 => weights.get(2).copied(),
                    _ => None,
                };
                if let Some(w) = weight {
                    offsets.push(WeightedOffset {
                        delta: [dx, dy, dz],
                        weight: w,
                    });
                }
            }
        }
    }
    offsets
}

impl ChamferMask<u16, 2> {
    /// Unit weights for orthogonal and diagonal steps (chessboard metric).
    pub fn chessboard() -> Self {
        Self::assemble(neighbors_2d(&[1, 1]))
    }

    /// Unit orthogonal steps only (city-block metric).
    pub fn city_block() -> Self {
        Self::assemble(neighbors_2d(&[1]))
    }

    /// Borgefors weights 3 (orthogonal) and 4 (diagonal).
    pub fn chamfer_3_4() -> Self {
        Self::assemble(neighbors_2d(&[3, 4]))
    }

    /// Weights 5, 7 and 11, adding chess-knight moves.
    pub fn chamfer_5_7_11() -> Self {
        Self::assemble(neighbors_2d(&[5, 7, 11]))
    }
}

impl ChamferMask<f32, 2> {
    /// Euclidean step lengths 1 and sqrt(2) as float weights.
    pub fn borgefors() -> Self {
        Self::assemble(neighbors_2d(&[1.0, std::f32::consts::SQRT_2]))
    }
}

impl ChamferMask<u16, 3> {
    /// Unit weights for all 26 neighbor steps (chessboard metric).
    pub fn chessboard() -> Self {
        Self::assemble(neighbors_3d(&[1, 1, 1]))
    }

    /// Svensson-Borgefors weights 3, 4 and 5.
    pub fn chamfer_3_4_5() -> Self {
        Self::assemble(neighbors_3d(&[3, 4, 5]))
    }
}

impl ChamferMask<f32, 3> {
    /// Euclidean step lengths 1, sqrt(2) and sqrt(3) as float weights.
    pub fn quasi_euclidean() -> Self {
        Self::assemble(neighbors_3d(&[1.0, std::f32::consts::SQRT_2, 1.732_050_8]))
    }
}
