//! Area-weighted resampling.
//!
//! Every output pixel covers a rectangle of the source; its value is the
//! mean of the source pixels under that rectangle, each weighted by the
//! fraction it overlaps. Shrinking therefore averages instead of skipping
//! pixels, and enlarging blends only at cell boundaries.

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::edit::brightness::saturate_u8;
use crate::error::EditError;

/// Largest output, in pixels, a percentage resize may produce.
pub const MAX_OUTPUT_PIXELS: usize = 100_000_000;

/// Scales both dimensions by `percent / 100`, truncating to whole pixels.
///
/// 100 returns the input unchanged. A result with a zero dimension
/// (including any `percent <= 0`) is an `EditError::EmptyResize`; one over
/// `MAX_OUTPUT_PIXELS` is an `EditError::TooLarge` and allocates nothing.
pub fn resize_percent(image: PixelBuffer, percent: i32) -> Result<PixelBuffer, EditError> {
    if percent == 100 {
        return Ok(image);
    }
    let (width, height) = image.dimensions();
    let factor = percent as f64 / 100.0;
    // Float-to-int casts saturate, so huge factors cannot wrap.
    let new_w = (width as f64 * factor) as i64;
    let new_h = (height as f64 * factor) as i64;
    if new_w <= 0 || new_h <= 0 {
        return Err(EditError::EmptyResize { percent, width, height });
    }
    let (new_w, new_h) = (new_w as usize, new_h as usize);
    match new_w.checked_mul(new_h) {
        Some(pixels) if pixels <= MAX_OUTPUT_PIXELS => Ok(resize_to(&image, new_w, new_h)),
        _ => Err(EditError::TooLarge { percent, width, height, max_pixels: MAX_OUTPUT_PIXELS }),
    }
}

/// Resamples `image` to exactly `width × height`.
///
/// Same-size requests and empty sources/targets return a copy or an empty
/// buffer without resampling.
pub fn resize_to(image: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    let channels = image.channels();
    if image.is_empty() || width == 0 || height == 0 {
        return PixelBuffer::zeros(width, height, channels);
    }

    let x_weights = area_weights(image.width(), width);
    let y_weights = area_weights(image.height(), height);

    // Horizontal pass into an f64 scratch of `height_src × width × channels`.
    let src_h = image.height();
    let mut horiz = vec![0.0f64; src_h * width * channels];
    for y in 0..src_h {
        for (ox, taps) in x_weights.iter().enumerate() {
            for c in 0..channels {
                let acc: f64 = taps.iter().map(|&(sx, w)| image.get(sx, y, c) as f64 * w).sum();
                horiz[(y * width + ox) * channels + c] = acc;
            }
        }
    }

    let mut out = PixelBuffer::zeros(width, height, channels);
    for (oy, taps) in y_weights.iter().enumerate() {
        for ox in 0..width {
            for c in 0..channels {
                let acc: f64 = taps
                    .iter()
                    .map(|&(sy, w)| horiz[(sy * width + ox) * channels + c] * w)
                    .sum();
                out.set(ox, oy, c, saturate_u8(acc));
            }
        }
    }
    out
}

/// For each destination index, the source indices it overlaps and the
/// normalized overlap weights (summing to 1).
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);

            let mut taps: Vec<(usize, f64)> = (first..last)
                .filter_map(|s| {
                    let lo = start.max(s as f64);
                    let hi = end.min((s + 1) as f64);
                    let overlap = hi - lo;
                    if overlap > 1e-12 { Some((s, overlap)) } else { None }
                })
                .collect();

            let total: f64 = taps.iter().map(|t| t.1).sum();
            if total > 0.0 {
                for t in &mut taps {
                    t.1 /= total;
                }
            } else {
                taps = vec![(first.min(src_len - 1), 1.0)];
            }
            taps
        })
        .collect()
}
