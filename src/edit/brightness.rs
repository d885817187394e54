use crate::buffer::pixel_buffer::PixelBuffer;

/// Affine intensity transform: `out = clamp(round(in * contrast + brightness), 0, 255)`,
/// applied to every sample of every channel.
///
/// `contrast == 1.0` with `brightness == 0` hands the input back untouched.
pub fn adjust_brightness_contrast(image: PixelBuffer, brightness: i32, contrast: f64) -> PixelBuffer {
    if contrast == 1.0 && brightness == 0 {
        return image;
    }
    let beta = brightness as f64;
    image.map_samples(|v| saturate_u8(v as f64 * contrast + beta))
}

/// Rounds to nearest and saturates into the u8 range. NaN maps to 0.
pub(crate) fn saturate_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> PixelBuffer {
        PixelBuffer::from_fn(8, 5, 3, |x, y, c| (x * 30 + y * 3 + c) as u8)
    }

    #[test]
    fn neutral_parameters_are_identity() {
        let img = gradient();
        assert_eq!(adjust_brightness_contrast(img.clone(), 0, 1.0), img);
    }

    #[test]
    fn brightness_offsets_and_saturates() {
        let img = PixelBuffer::from_raw(3, 1, 1, vec![0, 100, 250]).unwrap();
        let out = adjust_brightness_contrast(img, 10, 1.0);
        assert_eq!(out.data(), &[10, 110, 255]);
    }

    #[test]
    fn negative_brightness_clamps_at_zero() {
        let img = PixelBuffer::from_raw(3, 1, 1, vec![5, 100, 250]).unwrap();
        let out = adjust_brightness_contrast(img, -50, 1.0);
        assert_eq!(out.data(), &[0, 50, 200]);
    }

    #[test]
    fn contrast_multiplies_then_rounds() {
        let img = PixelBuffer::from_raw(3, 1, 1, vec![3, 100, 200]).unwrap();
        let out = adjust_brightness_contrast(img, 0, 1.5);
        assert_eq!(out.data(), &[5, 150, 255]);
    }

    #[test]
    fn channel_count_is_preserved() {
        let gray = PixelBuffer::from_fn(4, 4, 1, |x, _, _| x as u8);
        assert_eq!(adjust_brightness_contrast(gray, 3, 2.0).channels(), 1);
        assert_eq!(adjust_brightness_contrast(gradient(), 3, 2.0).channels(), 3);
    }
}
