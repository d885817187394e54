//! Structural similarity (SSIM) over grayscale buffers.
//!
//! Local statistics come from a 7×7 uniform window with sample covariance
//! (normalised by N−1). The reported score is the mean of the SSIM map with
//! a 3-pixel border excluded, so only windows fully inside the image count.

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::compare::align::align_size;
use crate::error::CompareError;

pub const WINDOW: usize = 7;
/// Dynamic range of 8-bit samples.
pub const DATA_RANGE: f64 = 255.0;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// SSIM of `a` and `b` in [-1, 1], 1 meaning identical.
///
/// Both are converted to grayscale and `b` is resized to `a`'s dimensions
/// first. Images smaller than the window, or a non-finite result, are
/// reported as errors rather than scored.
pub fn structural_similarity(a: &PixelBuffer, b: &PixelBuffer) -> Result<f64, CompareError> {
    let a = a.to_grayscale();
    let b = align_size(&a, &b.to_grayscale());

    let (w, h) = a.dimensions();
    if w < WINDOW || h < WINDOW {
        return Err(CompareError::TooSmall { width: w, height: h, window: WINDOW });
    }

    let x: Vec<f64> = a.data().iter().map(|&v| v as f64).collect();
    let y: Vec<f64> = b.data().iter().map(|&v| v as f64).collect();
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p * q).collect();

    let sx = IntegralImage::new(&x, w, h);
    let sy = IntegralImage::new(&y, w, h);
    let sxx = IntegralImage::new(&xx, w, h);
    let syy = IntegralImage::new(&yy, w, h);
    let sxy = IntegralImage::new(&xy, w, h);

    let np = (WINDOW * WINDOW) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);
    let pad = (WINDOW - 1) / 2;

    let mut total = 0.0;
    let mut count = 0usize;
    for cy in pad..h - pad {
        for cx in pad..w - pad {
            let (x0, y0) = (cx - pad, cy - pad);
            let ux = sx.window_sum(x0, y0, WINDOW) / np;
            let uy = sy.window_sum(x0, y0, WINDOW) / np;
            let uxx = sxx.window_sum(x0, y0, WINDOW) / np;
            let uyy = syy.window_sum(x0, y0, WINDOW) / np;
            let uxy = sxy.window_sum(x0, y0, WINDOW) / np;

            let vx = cov_norm * (uxx - ux * ux);
            let vy = cov_norm * (uyy - uy * uy);
            let vxy = cov_norm * (uxy - ux * uy);

            let num = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let den = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += num / den;
            count += 1;
        }
    }

    let score = total / count as f64;
    if !score.is_finite() {
        return Err(CompareError::NonFinite);
    }
    Ok(score.clamp(-1.0, 1.0))
}

/// Summed-area table with a zero row/column prepended.
struct IntegralImage {
    stride: usize,
    sums: Vec<f64>,
}

impl IntegralImage {
    fn new(values: &[f64], width: usize, height: usize) -> IntegralImage {
        let stride = width + 1;
        let mut sums = vec![0.0; stride * (height + 1)];
        for y in 0..height {
            let mut row = 0.0;
            for x in 0..width {
                row += values[y * width + x];
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        IntegralImage { stride, sums }
    }

    /// Sum of the `size × size` square whose top-left corner is `(x, y)`.
    fn window_sum(&self, x: usize, y: usize, size: usize) -> f64 {
        let s = self.stride;
        let (x1, y1) = (x + size, y + size);
        self.sums[y1 * s + x1] - self.sums[y * s + x1] - self.sums[y1 * s + x] + self.sums[y * s + x]
    }
}
