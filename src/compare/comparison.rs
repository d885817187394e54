use tracing::warn;

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::compare::diff_map::xor_difference_map;
use crate::compare::mean_diff::mean_absolute_difference;
use crate::compare::ssim::structural_similarity;
use crate::error::CompareError;

/// Everything one comparison produces.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// SSIM score, or 0.0 when it could not be computed.
    pub ssim: f64,
    /// Why `ssim` fell back to 0.0, if it did.
    pub ssim_error: Option<CompareError>,
    pub mean_abs_diff: f64,
    pub diff_map: PixelBuffer,
}

impl Comparison {
    pub fn is_degraded(&self) -> bool {
        self.ssim_error.is_some()
    }
}

/// Scores `edited` against `reference` and builds the XOR map.
///
/// A similarity failure is logged and scored as 0.0; the reason is kept in
/// `ssim_error` so callers can surface it.
pub fn compare_all(reference: &PixelBuffer, edited: &PixelBuffer) -> Comparison {
    let (ssim, ssim_error) = match structural_similarity(reference, edited) {
        Ok(score) => (score, None),
        Err(e) => {
            warn!(error = %e, "similarity could not be computed, scoring 0.0");
            (0.0, Some(e))
        }
    };
    Comparison {
        ssim,
        ssim_error,
        mean_abs_diff: mean_absolute_difference(reference, edited),
        diff_map: xor_difference_map(reference, edited),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_comparison_is_perfect() {
        let img = PixelBuffer::from_fn(16, 16, 3, |x, y, c| (x * 16 + y + c * 40) as u8);
        let cmp = compare_all(&img, &img);
        assert!((cmp.ssim - 1.0).abs() < 1e-9);
        assert_eq!(cmp.mean_abs_diff, 0.0);
        assert!(!cmp.is_degraded());
        assert_eq!(cmp.diff_map.dimensions(), (16, 16));
    }

    #[test]
    fn tiny_images_degrade_to_zero_score() {
        let img = PixelBuffer::from_fn(4, 4, 3, |x, _, _| x as u8);
        let cmp = compare_all(&img, &img);
        assert_eq!(cmp.ssim, 0.0);
        assert!(matches!(cmp.ssim_error, Some(CompareError::TooSmall { .. })));
        assert_eq!(cmp.mean_abs_diff, 0.0);
    }
}
