use crate::buffer::pixel_buffer::PixelBuffer;
use crate::edit::resize::resize_to;

/// Resizes `other` to `reference`'s width and height with area
/// interpolation. Already-aligned buffers are cloned as-is.
pub fn align_size(reference: &PixelBuffer, other: &PixelBuffer) -> PixelBuffer {
    let (w, h) = reference.dimensions();
    resize_to(other, w, h)
}

/// Promotes whichever side is gray to 3 channels when the other is color,
/// so sample-wise operations always see matching shapes.
pub fn match_channels(a: PixelBuffer, b: PixelBuffer) -> (PixelBuffer, PixelBuffer) {
    match (a.channels(), b.channels()) {
        (1, 3) => (a.to_bgr(), b),
        (3, 1) => (a, b.to_bgr()),
        _ => (a, b),
    }
}
