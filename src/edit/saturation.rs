//! Saturation scaling through an 8-bit hue-saturation-value round trip.
//!
//! The HSV representation is the usual 8-bit one: hue in [0, 180) (half
//! degrees), saturation and value in [0, 255]. Only the saturation channel is
//! scaled; the result is clamped and truncated before converting back.

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::error::EditError;

/// Returns a copy of `image` with its saturation scaled by `factor`.
///
/// Fails with `EditError::NotColor` on single-channel input. Callers that
/// want the pipeline to keep going use the input unchanged in that case.
pub fn adjust_saturation(image: &PixelBuffer, factor: f64) -> Result<PixelBuffer, EditError> {
    if !image.is_color() {
        return Err(EditError::NotColor { channels: image.channels() });
    }

    let mut out = image.clone();
    for y in 0..image.height() {
        for x in 0..image.width() {
            let px = image.pixel(x, y);
            let (h, s, v) = bgr_to_hsv(px[0], px[1], px[2]);
            let s = (s as f64 * factor).clamp(0.0, 255.0) as u8;
            let (b, g, r) = hsv_to_bgr(h, s, v);
            out.set(x, y, 0, b);
            out.set(x, y, 1, g);
            out.set(x, y, 2, r);
        }
    }
    Ok(out)
}

/// BGR → 8-bit HSV (h: 0-179, s: 0-255, v: 0-255).
pub fn bgr_to_hsv(b: u8, g: u8, r: u8) -> (u8, u8, u8) {
    let (bf, gf, rf) = (b as f64, g as f64, r as f64);
    let v = bf.max(gf).max(rf);
    let min = bf.min(gf).min(rf);
    let delta = v - min;

    let s = if v > 0.0 { delta * 255.0 / v } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / delta
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let mut h8 = (h / 2.0).round() as u8;
    if h8 >= 180 {
        h8 -= 180;
    }
    (h8, s.round() as u8, v as u8)
}

/// 8-bit HSV → BGR.
pub fn hsv_to_bgr(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
    let v_f = v as f64 / 255.0;
    let s_f = s as f64 / 255.0;
    if s == 0 {
        return (v, v, v);
    }

    // Hue in sextants, [0, 6).
    let mut hh = (h as f64 * 2.0) / 60.0;
    let mut sector = hh.floor() as i64;
    hh -= sector as f64;
    sector = sector.rem_euclid(6);

    let tab = [
        v_f,
        v_f * (1.0 - s_f),
        v_f * (1.0 - s_f * hh),
        v_f * (1.0 - s_f * (1.0 - hh)),
    ];
    // Indices into `tab` for (b, g, r), per sector.
    const SECTOR_DATA: [[usize; 3]; 6] =
        [[1, 3, 0], [1, 0, 2], [3, 0, 1], [0, 2, 1], [0, 1, 3], [2, 1, 0]];
    let [bi, gi, ri] = SECTOR_DATA[sector as usize];

    let to_u8 = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(tab[bi]), to_u8(tab[gi]), to_u8(tab[ri]))
}
