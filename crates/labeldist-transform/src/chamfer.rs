use rayon::prelude::*;

use labeldist_grid::{Grid, LabelGrid};

use crate::distance::DistanceValue;
use crate::error::TransformError;
use crate::mask::{ChamferMask, WeightedOffset};
use crate::progress::{NoProgress, ProgressMonitor};

/// Compute the chamfer distance map of a labeled grid.
///
/// For every labeled element, the result approximates the distance to the
/// nearest element carrying a different label or background, by propagating
/// the mask weights in one increasing-order and one decreasing-order scan.
/// Background elements get distance 0.
///
/// When `normalize` is set, raw values are divided by the normalization
/// weight of the mask, rounding to nearest in integer domains.
///
/// The result is approximate by construction; see
/// [`crate::euclidean::distance_transform_euclidean`] for the exact
/// transform.
///
/// # Arguments
///
/// * `src` - The input grid of region labels, 0 being background.
/// * `dst` - The output distance field, same extents as `src`.
/// * `mask` - The weighted offsets driving the propagation.
/// * `normalize` - Whether to rescale by the normalization weight.
///
/// # Errors
///
/// Returns an error if the extents of `src` and `dst` differ.
///
/// # Examples
///
/// ```
/// use labeldist_grid::{Grid, LabelGrid};
/// use labeldist_transform::chamfer::distance_transform;
/// use labeldist_transform::mask::ChamferMask;
///
/// let labels = LabelGrid::<2>::new(
///     [3, 1].into(),
///     vec![0, 1, 1],
/// ).unwrap();
/// let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0).unwrap();
///
/// distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), false).unwrap();
/// assert_eq!(dist.as_slice(), &[0, 3, 6]);
/// ```
pub fn distance_transform<W, const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<W, D>,
    mask: &ChamferMask<W, D>,
    normalize: bool,
) -> Result<(), TransformError>
where
    W: DistanceValue,
{
    distance_transform_with_progress(src, dst, mask, normalize, &NoProgress)
}

/// Same as [`distance_transform`], reporting per-line progress to `monitor`.
pub fn distance_transform_with_progress<W, const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<W, D>,
    mask: &ChamferMask<W, D>,
    normalize: bool,
    monitor: &impl ProgressMonitor,
) -> Result<(), TransformError>
where
    W: DistanceValue,
{
    check_extents(src, dst)?;

    // background at 0, labeled elements unknown; order-free, so parallel
    src.as_slice()
        .par_iter()
        .zip(dst.as_slice_mut().par_iter_mut())
        .for_each(|(&label, d)| {
            *d = if label == 0 { W::zero() } else { W::SENTINEL };
        });

    forward_pass(src, dst, mask.forward_offsets(), monitor);
    backward_pass(src, dst, mask.backward_offsets(), monitor);

    if normalize {
        let norm = mask.normalization_weight();
        src.as_slice()
            .par_iter()
            .zip(dst.as_slice_mut().par_iter_mut())
            .for_each(|(&label, d)| {
                if label != 0 {
                    *d = d.normalize_by(norm);
                }
            });
    }

    Ok(())
}

pub(crate) fn check_extents<T, U, const D: usize>(
    src: &Grid<T, D>,
    dst: &Grid<U, D>,
) -> Result<(), TransformError> {
    if src.size() != dst.size() {
        return Err(TransformError::DimensionMismatch {
            expected: src.size().extents.to_vec(),
            found: dst.size().extents.to_vec(),
        });
    }
    Ok(())
}

/// Minimal candidate distance at `coords` over the given offsets.
///
/// A differently-labeled neighbor contributes its bare step weight; a
/// same-label neighbor contributes its current distance plus the weight,
/// with the sentinel absorbing the addition.
#[inline]
pub(crate) fn best_candidate<W, const D: usize>(
    src: &LabelGrid<D>,
    dist: &[W],
    coords: [usize; D],
    label: u32,
    offsets: &[WeightedOffset<W, D>],
) -> Option<W>
where
    W: DistanceValue,
{
    let labels = src.as_slice();
    let mut best: Option<W> = None;
    for offset in offsets {
        let Some(n) = src.offset_index(coords, offset.delta) else {
            continue;
        };
        let candidate = if labels[n] != label {
            offset.weight
        } else {
            dist[n].add_weight(offset.weight)
        };
        if best.map_or(true, |b| candidate < b) {
            best = Some(candidate);
        }
    }
    best
}

fn forward_pass<W, const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<W, D>,
    offsets: &[WeightedOffset<W, D>],
    monitor: &impl ProgressMonitor,
) where
    W: DistanceValue,
{
    let width = src.extent(0);
    let lines = src.numel() / width;
    let labels = src.as_slice();

    for line in 0..lines {
        monitor.update("chamfer forward pass", line as u64, lines as u64);
        let base = line * width;
        let mut coords = src.coords_of(base);
        for x in 0..width {
            coords[0] = x;
            let index = base + x;
            let label = labels[index];
            if label == 0 {
                continue;
            }
            let dist = dst.as_slice_mut();
            if let Some(candidate) = best_candidate(src, dist, coords, label, offsets) {
                if candidate < dist[index] {
                    dist[index] = candidate;
                }
            }
        }
    }
}

fn backward_pass<W, const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<W, D>,
    offsets: &[WeightedOffset<W, D>],
    monitor: &impl ProgressMonitor,
) where
    W: DistanceValue,
{
    let width = src.extent(0);
    let lines = src.numel() / width;
    let labels = src.as_slice();

    for line in (0..lines).rev() {
        monitor.update(
            "chamfer backward pass",
            (lines - 1 - line) as u64,
            lines as u64,
        );
        let base = line * width;
        let mut coords = src.coords_of(base);
        for x in (0..width).rev() {
            coords[0] = x;
            let index = base + x;
            let label = labels[index];
            if label == 0 {
                continue;
            }
            let dist = dst.as_slice_mut();
            if let Some(candidate) = best_candidate(src, dist, coords, label, offsets) {
                if candidate < dist[index] {
                    dist[index] = candidate;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_background_5x5() -> LabelGrid<2> {
        // label 1 everywhere except a background seed at (2, 2)
        let mut data = vec![1u32; 25];
        data[2 * 5 + 2] = 0;
        LabelGrid::<2>::new([5, 5].into(), data).unwrap()
    }

    #[test]
    fn background_distance_is_zero() -> Result<(), TransformError> {
        let labels = LabelGrid::<2>::new(
            [4, 3].into(),
            vec![0, 0, 1, 1, 0, 2, 2, 1, 0, 0, 2, 2],
        )?;
        let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), false)?;

        for (label, d) in labels.as_slice().iter().zip(dist.as_slice()) {
            if *label == 0 {
                assert_eq!(*d, 0);
            } else {
                assert!(*d > 0);
            }
        }
        Ok(())
    }

    #[test]
    fn city_block_ramp() -> Result<(), TransformError> {
        let labels = LabelGrid::<2>::new([5, 1].into(), vec![0, 1, 1, 1, 1])?;
        let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::city_block(), false)?;
        assert_eq!(dist.as_slice(), &[0, 1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn adjacent_label_counts_as_boundary() -> Result<(), TransformError> {
        // two regions split down the middle; both sides see the other as
        // a boundary at one step
        let labels = LabelGrid::<2>::new([4, 1].into(), vec![1, 1, 2, 2])?;
        let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), false)?;
        assert_eq!(dist.as_slice(), &[6, 3, 3, 6]);
        Ok(())
    }

    #[test]
    fn symmetric_mask_reciprocity() -> Result<(), TransformError> {
        // straight vertical boundary between regions 1 and 2
        let labels = LabelGrid::<2>::new(
            [6, 3].into(),
            vec![
                1, 1, 1, 2, 2, 2, //
                1, 1, 1, 2, 2, 2, //
                1, 1, 1, 2, 2, 2,
            ],
        )?;
        let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), false)?;

        let d = dist.as_slice();
        for y in 0..3 {
            for k in 0..3 {
                let a = d[y * 6 + (2 - k)];
                let b = d[y * 6 + (3 + k)];
                assert!(a.abs_diff(b) <= 3, "row {y}, column pair {k}: {a} vs {b}");
            }
        }
        Ok(())
    }

    #[test]
    fn borgefors_brackets_euclidean() -> Result<(), TransformError> {
        let labels = single_background_5x5();
        let mut dist = Grid::<f32, 2>::from_size_val(labels.size(), 0.0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::borgefors(), true)?;

        // corner (0, 0) is two diagonal steps from the seed at (2, 2):
        // the chamfer value must bracket sqrt(8) ~ 2.83
        let corner = dist.as_slice()[0];
        assert!((2.8..=4.0).contains(&corner), "got {corner}");
        Ok(())
    }

    #[test]
    fn unit_mask_normalization_is_identity() -> Result<(), TransformError> {
        let labels = single_background_5x5();

        let mut raw = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        let mut normalized = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        let mask = ChamferMask::<u16, 2>::chessboard();
        distance_transform(&labels, &mut raw, &mask, false)?;
        distance_transform(&labels, &mut normalized, &mask, true)?;

        assert_eq!(raw.as_slice(), normalized.as_slice());
        Ok(())
    }

    #[test]
    fn normalization_divides_by_minimal_weight() -> Result<(), TransformError> {
        let labels = LabelGrid::<2>::new([5, 1].into(), vec![0, 1, 1, 1, 1])?;
        let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), true)?;
        assert_eq!(dist.as_slice(), &[0, 1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn works_in_3d() -> Result<(), TransformError> {
        // background seed at the center of a 3x3x3 block of label 1
        let mut data = vec![1u32; 27];
        data[13] = 0;
        let labels = LabelGrid::<3>::new([3, 3, 3].into(), data)?;
        let mut dist = Grid::<u16, 3>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4_5(), false)?;

        let d = dist.as_slice();
        assert_eq!(d[13], 0);
        // face, edge and corner neighbors of the seed
        assert_eq!(d[labels.linear_index([0, 1, 1])], 3);
        assert_eq!(d[labels.linear_index([0, 0, 1])], 4);
        assert_eq!(d[labels.linear_index([0, 0, 0])], 5);
        Ok(())
    }

    #[test]
    fn no_background_stays_at_sentinel() -> Result<(), TransformError> {
        let labels = LabelGrid::<2>::new([3, 3].into(), vec![7; 9])?;
        let mut dist = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), false)?;
        assert!(dist.as_slice().iter().all(|d| d.is_sentinel()));
        Ok(())
    }

    #[test]
    fn deterministic_for_fixed_mask() -> Result<(), TransformError> {
        use rand::Rng;

        let mut rng = rand::rng();
        let data: Vec<u32> = (0..64).map(|_| rng.random_range(0..4)).collect();
        let labels = LabelGrid::<2>::new([8, 8].into(), data)?;
        let mask = ChamferMask::chamfer_5_7_11();

        let mut first = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        let mut second = Grid::<u16, 2>::from_size_val(labels.size(), 0)?;
        distance_transform(&labels, &mut first, &mask, false)?;
        distance_transform(&labels, &mut second, &mask, false)?;

        assert_eq!(first.as_slice(), second.as_slice());
        Ok(())
    }

    #[test]
    fn rejects_extent_mismatch() {
        let labels = LabelGrid::<2>::new([3, 3].into(), vec![0; 9]).unwrap();
        let mut dist = Grid::<u16, 2>::from_size_val([3, 4].into(), 0).unwrap();
        let res = distance_transform(&labels, &mut dist, &ChamferMask::chamfer_3_4(), false);
        assert_eq!(
            res,
            Err(TransformError::DimensionMismatch {
                expected: vec![3, 3],
                found: vec![3, 4],
            })
        );
    }
}
