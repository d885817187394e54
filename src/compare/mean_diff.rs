use crate::buffer::pixel_buffer::PixelBuffer;
use crate::compare::align::{align_size, match_channels};

/// Mean of `|a - b|` over every sample of every channel, computed in f64 so
/// unsigned samples cannot wrap.
///
/// `b` is resized to `a`'s dimensions first, and a gray side is promoted to
/// 3 channels when the other is color. Empty images score 0.
pub fn mean_absolute_difference(a: &PixelBuffer, b: &PixelBuffer) -> f64 {
    let (a, b) = match_channels(a.clone(), align_size(a, b));
    let n = a.data().len();
    if n == 0 {
        return 0.0;
    }
    a.data()
        .iter()
        .zip(b.data().iter())
        .map(|(&p, &q)| (p as f64 - q as f64).abs())
        .sum::<f64>()
        / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_images_differ_by_zero() {
        let img = PixelBuffer::from_fn(9, 7, 3, |x, y, c| (x + y * 3 + c) as u8);
        assert_eq!(mean_absolute_difference(&img, &img), 0.0);
    }

    #[test]
    fn no_unsigned_wraparound() {
        let a = PixelBuffer::from_raw(2, 1, 1, vec![0, 255]).unwrap();
        let b = PixelBuffer::from_raw(2, 1, 1, vec![255, 0]).unwrap();
        assert_eq!(mean_absolute_difference(&a, &b), 255.0);
    }

    #[test]
    fn averages_over_channels() {
        let a = PixelBuffer::from_raw(1, 1, 3, vec![10, 20, 30]).unwrap();
        let b = PixelBuffer::from_raw(1, 1, 3, vec![10, 26, 0]).unwrap();
        assert_eq!(mean_absolute_difference(&a, &b), 12.0);
    }

    #[test]
    fn different_sizes_are_aligned() {
        let a = PixelBuffer::from_fn(8, 8, 3, |_, _, _| 50);
        let b = PixelBuffer::from_fn(4, 4, 3, |_, _, _| 60);
        assert_eq!(mean_absolute_difference(&a, &b), 10.0);
    }

    #[test]
    fn gray_against_color_is_promoted() {
        let a = PixelBuffer::from_fn(2, 2, 3, |_, _, _| 40);
        let b = PixelBuffer::from_fn(2, 2, 1, |_, _, _| 40);
        assert_eq!(mean_absolute_difference(&a, &b), 0.0);
    }
}
