use crate::buffer::pixel_buffer::PixelBuffer;
use crate::compare::align::{align_size, match_channels};

/// Sample-wise XOR of `a` and `b`, for display only.
///
/// `b` is resized to `a`'s dimensions and gray sides are promoted to 3
/// channels so both operands always have the same shape. Identical inputs
/// produce a black map.
pub fn xor_difference_map(a: &PixelBuffer, b: &PixelBuffer) -> PixelBuffer {
    let (a, b) = match_channels(a.clone(), align_size(a, b));
    let data: Vec<u8> = a.data().iter().zip(b.data()).map(|(&p, &q)| p ^ q).collect();
    let (w, h, c) = (a.width(), a.height(), a.channels());
    // Both operands share one shape, so the length always matches.
    PixelBuffer::from_raw(w, h, c, data).unwrap_or_else(|_| PixelBuffer::zeros(w, h, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_give_black_map() {
        let img = PixelBuffer::from_fn(5, 4, 3, |x, y, c| (x * 9 + y + c) as u8);
        let map = xor_difference_map(&img, &img);
        assert!(map.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn xor_is_sample_wise() {
        let a = PixelBuffer::from_raw(2, 1, 1, vec![0b1010, 0xff]).unwrap();
        let b = PixelBuffer::from_raw(2, 1, 1, vec![0b0110, 0x0f]).unwrap();
        assert_eq!(xor_difference_map(&a, &b).data(), &[0b1100, 0xf0]);
    }

    #[test]
    fn mixed_channels_produce_color_map() {
        let gray = PixelBuffer::from_fn(3, 3, 1, |_, _, _| 0x0f);
        let color = PixelBuffer::from_fn(6, 6, 3, |_, _, _| 0xff);
        let map = xor_difference_map(&gray, &color);
        assert_eq!(map.dimensions(), (3, 3));
        assert_eq!(map.channels(), 3);
        assert!(map.data().iter().all(|&v| v == 0xf0));
    }
}
