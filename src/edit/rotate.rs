use crate::buffer::pixel_buffer::PixelBuffer;

/// Coordinates and sample values this close to an integer are snapped onto
/// it, so quarter turns copy samples exactly and flat regions do not
/// truncate 199.999... down to 199.
const SNAP_EPSILON: f64 = 1e-6;

/// Rotates `image` counter-clockwise by `degrees` about its center.
///
/// The output canvas grows to hold every rotated corner; area outside the
/// source is filled with zeros. Samples are bilinearly interpolated and
/// truncated back to u8. A zero (or non-finite) angle returns the input
/// unchanged.
pub fn rotate(image: PixelBuffer, degrees: f64) -> PixelBuffer {
    if degrees == 0.0 || !degrees.is_finite() || image.is_empty() {
        return image;
    }

    let (cols, rows) = (image.width() as f64, image.height() as f64);
    let center = (cols / 2.0 - 0.5, rows / 2.0 - 0.5);
    let (sin, cos) = degrees.to_radians().sin_cos();

    // Maps an output-space point (relative to the canvas origin shift) back
    // into the source image.
    let to_source = |x: f64, y: f64| -> (f64, f64) {
        let (dx, dy) = (x - center.0, y - center.1);
        (cos * dx - sin * dy + center.0, sin * dx + cos * dy + center.1)
    };
    // The inverse: where a source point lands on the rotated plane.
    let to_output = |x: f64, y: f64| -> (f64, f64) {
        let (dx, dy) = (x - center.0, y - center.1);
        (cos * dx + sin * dy + center.0, -sin * dx + cos * dy + center.1)
    };

    let corners = [
        (0.0, 0.0),
        (0.0, rows - 1.0),
        (cols - 1.0, rows - 1.0),
        (cols - 1.0, 0.0),
    ];
    let mapped: Vec<(f64, f64)> = corners.iter().map(|&(x, y)| to_output(x, y)).collect();
    let min_c = mapped.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_c = mapped.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_r = mapped.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_r = mapped.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let out_w = (max_c - min_c + 1.0).round().max(1.0) as usize;
    let out_h = (max_r - min_r + 1.0).round().max(1.0) as usize;
    let channels = image.channels();
    let mut out = PixelBuffer::zeros(out_w, out_h, channels);

    for oy in 0..out_h {
        for ox in 0..out_w {
            let (sx, sy) = to_source(ox as f64 + min_c, oy as f64 + min_r);
            let (sx, sy) = (snap(sx), snap(sy));
            for c in 0..channels {
                let v = sample_bilinear(&image, sx, sy, c);
                out.set(ox, oy, c, snap(v).clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPSILON { r } else { v }
}

/// Bilinear sample with a constant-zero border: every neighbor that falls
/// outside the image contributes 0.
fn sample_bilinear(image: &PixelBuffer, x: f64, y: f64, c: usize) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let at = |xi: i64, yi: i64| -> f64 {
        if xi < 0 || yi < 0 || xi >= image.width() as i64 || yi >= image.height() as i64 {
            0.0
        } else {
            image.get(xi as usize, yi as usize, c) as f64
        }
    };

    let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1, y0) * fx;
    let bottom = at(x0, y0 + 1) * (1.0 - fx) + at(x0 + 1, y0 + 1) * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(w: usize, h: usize) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, 1, |x, y, _| (1 + y * w + x) as u8)
    }

    #[test]
    fn zero_angle_is_identity() {
        let img = labelled(5, 3);
        assert_eq!(rotate(img.clone(), 0.0), img);
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let out = rotate(labelled(4, 2), 90.0);
        assert_eq!(out.dimensions(), (2, 4));
    }

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        // 1 2 3
        // 4 5 6
        let out = rotate(labelled(3, 2), 90.0);
        // Counter-clockwise: the right column becomes the top row.
        // 3 6
        // 2 5
        // 1 4
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.data(), &[3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn half_turn_reverses_samples() {
        let img = labelled(3, 3);
        let out = rotate(img.clone(), 180.0);
        let mut expected = img.into_raw();
        expected.reverse();
        assert_eq!(out.data(), expected.as_slice());
    }

    #[test]
    fn oblique_angle_grows_canvas_and_fills_black() {
        let img = PixelBuffer::from_fn(20, 10, 3, |_, _, _| 200);
        let out = rotate(img, 45.0);
        assert!(out.width() > 20 && out.height() > 10);
        assert_eq!(out.channels(), 3);
        // Corners of the expanded canvas lie outside the source.
        assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
        // The center is still inside.
        assert_eq!(out.pixel(out.width() / 2, out.height() / 2), &[200, 200, 200]);
    }
}
