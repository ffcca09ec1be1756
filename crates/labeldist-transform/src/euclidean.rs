use rayon::prelude::*;

use labeldist_grid::{Grid, LabelGrid};

use crate::chamfer::check_extents;
use crate::error::TransformError;
use crate::progress::{NoProgress, ProgressMonitor};

/// Compute the exact Euclidean distance map of a labeled grid.
///
/// For every labeled element, the result is the exact spacing-weighted
/// squared Euclidean distance to the nearest element carrying a different
/// label or background, computed with the separable per-axis algorithm of
/// Saito and Toriwaki. Background elements get distance 0.
///
/// When `normalize` is set, the square root is taken so the output holds
/// plain distances instead of squared ones.
///
/// # Arguments
///
/// * `src` - The input grid of region labels, 0 being background.
/// * `dst` - The output distance field, same extents as `src`.
/// * `spacings` - Physical size of one grid step along each axis.
/// * `normalize` - Whether to return plain instead of squared distances.
///
/// # Errors
///
/// Returns an error if the extents of `src` and `dst` differ, or any
/// spacing is not positive and finite.
///
/// # Examples
///
/// ```
/// use labeldist_grid::{Grid, LabelGrid};
/// use labeldist_transform::euclidean::distance_transform_euclidean;
///
/// let labels = LabelGrid::<2>::new([4, 1].into(), vec![0, 1, 1, 1]).unwrap();
/// let mut dist = Grid::<f64, 2>::from_size_val(labels.size(), 0.0).unwrap();
///
/// distance_transform_euclidean(&labels, &mut dist, [1.0, 1.0], false).unwrap();
/// assert_eq!(dist.as_slice(), &[0.0, 1.0, 4.0, 9.0]);
/// ```
pub fn distance_transform_euclidean<const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<f64, D>,
    spacings: [f64; D],
    normalize: bool,
) -> Result<(), TransformError> {
    distance_transform_euclidean_with_progress(src, dst, spacings, normalize, &NoProgress)
}

/// Same as [`distance_transform_euclidean`], reporting per-line progress to
/// `monitor`.
pub fn distance_transform_euclidean_with_progress<const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<f64, D>,
    spacings: [f64; D],
    normalize: bool,
    monitor: &impl ProgressMonitor,
) -> Result<(), TransformError> {
    check_extents(src, dst)?;
    for (axis, &s) in spacings.iter().enumerate() {
        if !(s > 0.0 && s.is_finite()) {
            return Err(TransformError::InvalidSpacing(axis, s));
        }
    }

    // axis 0: lines are contiguous rows, processed in parallel
    let width = src.extent(0);
    monitor.update("euclidean axis 0", 0, 1);
    src.as_slice()
        .par_chunks_exact(width)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(width))
        .for_each(|(labels, out)| first_axis_line(labels, out, spacings[0]));
    monitor.update("euclidean axis 0", 1, 1);

    for axis in 1..D {
        update_along_axis(src, dst, axis, spacings[axis], monitor);
    }

    if normalize {
        dst.as_slice_mut().par_iter_mut().for_each(|d| {
            *d = d.sqrt();
        });
    }

    Ok(())
}

/// Squared distance to the nearest background or differently-labeled
/// element within a single contiguous line.
fn first_axis_line(labels: &[u32], out: &mut [f64], spacing: f64) {
    let n = labels.len();

    let mut d = f64::INFINITY;
    for i in 0..n {
        let label = labels[i];
        if label == 0 {
            d = 0.0;
        } else if i > 0 && labels[i - 1] != label {
            d = spacing;
        } else {
            d += spacing;
        }
        out[i] = d * d;
    }

    let mut d = f64::INFINITY;
    for i in (0..n).rev() {
        let label = labels[i];
        if label == 0 {
            d = 0.0;
        } else if i + 1 < n && labels[i + 1] != label {
            d = spacing;
        } else {
            d += spacing;
        }
        let sq = d * d;
        if sq < out[i] {
            out[i] = sq;
        }
    }
}

/// Combine the stored squared distances with offsets along `axis`.
///
/// For each element the search window is bounded by the current value:
/// positions beyond `ceil(sqrt(d) / spacing) + 1` steps cannot beat it,
/// which keeps the whole pass near-linear.
fn axis_update_line(labels: &[u32], input: &[f64], out: &mut [f64], spacing: f64) {
    let n = input.len();
    for i in 0..n {
        let label = labels[i];
        let d = input[i];
        if label == 0 || d == 0.0 {
            out[i] = d;
            continue;
        }

        let mut best = d;
        let reach = if d.is_finite() {
            ((d.sqrt() / spacing).ceil() as usize).saturating_add(1)
        } else {
            n
        };
        let lo = i.saturating_sub(reach);
        let hi = (i + reach).min(n - 1);
        for j in lo..=hi {
            if j == i {
                continue;
            }
            let step = (j as f64 - i as f64) * spacing;
            let step = step * step;
            if step >= best {
                continue;
            }
            let candidate = if labels[j] != label {
                step
            } else {
                input[j] + step
            };
            if candidate < best {
                best = candidate;
            }
        }
        out[i] = best;
    }
}

fn update_along_axis<const D: usize>(
    src: &LabelGrid<D>,
    dst: &mut Grid<f64, D>,
    axis: usize,
    spacing: f64,
    monitor: &impl ProgressMonitor,
) {
    let len = src.extent(axis);
    let stride = src.strides()[axis];
    let lines = src.numel() / len;
    let phase = format!("euclidean axis {axis}");

    let labels = src.as_slice();
    let mut line_labels = vec![0u32; len];
    let mut line_input = vec![0f64; len];
    let mut line_out = vec![0f64; len];

    let extents = src.size().extents;
    let strides = src.strides();
    let mut coords = [0usize; D];
    let mut line = 0u64;
    loop {
        monitor.update(&phase, line, lines as u64);
        line += 1;

        let mut base = 0;
        for a in 0..D {
            base += coords[a] * strides[a];
        }

        let values = dst.as_slice_mut();
        for i in 0..len {
            let index = base + i * stride;
            line_labels[i] = labels[index];
            line_input[i] = values[index];
        }
        axis_update_line(&line_labels, &line_input, &mut line_out, spacing);
        for i in 0..len {
            values[base + i * stride] = line_out[i];
        }

        // advance to the next line, skipping the scanned axis
        let mut done = true;
        for a in 0..D {
            if a == axis {
                continue;
            }
            coords[a] += 1;
            if coords[a] < extents[a] {
                done = false;
                break;
            }
            coords[a] = 0;
        }
        if done {
            break;
        }
    }
}
