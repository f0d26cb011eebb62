//! Block-averaging downsampler
//!
//! Reduces a frame to the display width. The source is split into
//! `target_width` segments of `floor(len / target_width)` samples; trailing
//! `len % target_width` samples belong to no segment and are ignored.

/// Downsample `values` to exactly `target_width` block averages.
///
/// # Panics
///
/// Panics if `target_width` is zero or larger than `values.len()`. Callers
/// validate frame shape before calling.
pub fn downsample(values: &[f32], target_width: usize) -> Vec<f32> {
    let mut out = vec![0.0; target_width];
    downsample_into(values, &mut out);
    out
}

/// Same as [`downsample`], writing into `out` (its length is the target width).
///
/// # Panics
///
/// Panics if `out` is empty or longer than `values`.
pub fn downsample_into(values: &[f32], out: &mut [f32]) {
    let width = out.len();
    assert!(
        width > 0 && width <= values.len(),
        "cannot downsample {} values to width {}",
        values.len(),
        width
    );

    let step = values.len() / width;
    for (segment, slot) in values.chunks_exact(step).zip(out.iter_mut()) {
        // f64 accumulation keeps the mean inside the segment's [min, max]
        let sum: f64 = segment.iter().map(|&v| v as f64).sum();
        *slot = (sum / step as f64) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_division() {
        let values = [0.0, 1.0, 0.25, 0.125, 0.5, 0.5];
        assert_eq!(downsample(&values, 3), vec![0.5, 0.1875, 0.5]);
    }

    #[test]
    fn test_remainder_is_dropped() {
        // step = 2, the trailing 1.0 is not part of any segment
        let values = [0.0, 0.0, 0.5, 0.5, 1.0];
        assert_eq!(downsample(&values, 2), vec![0.0, 0.5]);
    }

    #[test]
    fn test_identity_width() {
        let values = [0.1, 0.2, 0.3];
        // f32 -> f64 -> f32 is lossless
        assert_eq!(downsample(&values, 3), values.to_vec());
    }

    #[test]
    fn test_uniform_segment_is_exact() {
        let values = vec![0.1f32; 8192];
        let out = downsample(&values, 800);
        assert_eq!(out.len(), 800);
        assert!(out.iter().all(|&v| v == 0.1));
    }

    #[test]
    fn test_output_within_segment_bounds() {
        // deterministic pseudo-random values in [0, 1]
        let values: Vec<f32> = (0..8192u32)
            .map(|i| ((i.wrapping_mul(2654435761) >> 8) % 1000) as f32 / 999.0)
            .collect();

        for width in [1, 7, 300, 800, 1024, 8192] {
            let out = downsample(&values, width);
            assert_eq!(out.len(), width);
            let step = values.len() / width;
            for (i, &avg) in out.iter().enumerate() {
                let seg = &values[i * step..(i + 1) * step];
                let min = seg.iter().copied().fold(f32::INFINITY, f32::min);
                let max = seg.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                assert!(
                    avg >= min && avg <= max,
                    "width {} segment {}: {} not in [{}, {}]",
                    width,
                    i,
                    avg,
                    min,
                    max
                );
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_zero_width_panics() {
        downsample(&[0.5; 4], 0);
    }

    #[test]
    #[should_panic]
    fn test_width_larger_than_input_panics() {
        downsample(&[0.5; 4], 5);
    }
}
