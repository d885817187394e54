use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::BufferError;

/// An owned 8-bit image laid out as `(height, width, channels)`, row-major
/// and interleaved.
///
/// Color buffers hold 3 channels in blue-green-red order; grayscale buffers
/// hold 1. No other channel counts are representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A zero-filled (black) buffer.
    ///
    /// Panics if `channels` is not 1 or 3.
    pub fn zeros(width: usize, height: usize, channels: usize) -> PixelBuffer {
        if channels != 1 && channels != 3 {
            panic!("Pixel buffers have 1 or 3 channels, got {}", channels)
        }
        PixelBuffer {
            width,
            height,
            channels,
            data: vec![0; width * height * channels],
        }
    }

    /// Wraps raw interleaved samples, checking the length against the shape.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<PixelBuffer, BufferError> {
        if channels != 1 && channels != 3 {
            return Err(BufferError::UnsupportedChannels(channels));
        }
        if data.len() != width * height * channels {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                channels,
                actual: data.len(),
            });
        }
        Ok(PixelBuffer { width, height, channels, data })
    }

    /// Builds a buffer by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, f: F) -> PixelBuffer
    where
        F: Fn(usize, usize, usize) -> u8,
    {
        let mut res = PixelBuffer::zeros(width, height, channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    res.set(x, y, c, f(x, y, c));
                }
            }
        }
        res
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn channels(&self) -> usize { self.channels }
    pub fn data(&self) -> &[u8] { &self.data }
    pub fn into_raw(self) -> Vec<u8> { self.data }

    pub fn is_color(&self) -> bool {
        self.channels == 3
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `(width, height)`: the part of the shape that resizing aligns.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.width + x) * self.channels + c
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[self.index(x, y, c)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: u8) {
        let i = self.index(x, y, c);
        self.data[i] = value;
    }

    /// All channels of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = self.index(x, y, 0);
        &self.data[start..start + self.channels]
    }

    /// Applies `f` to every sample, keeping the shape.
    pub fn map_samples<F>(&self, f: F) -> PixelBuffer
    where
        F: Fn(u8) -> u8,
    {
        PixelBuffer {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Single-channel luma using the BT.601 weights, rounded to nearest.
    /// Grayscale buffers are returned as a copy.
    pub fn to_grayscale(&self) -> PixelBuffer {
        if !self.is_color() {
            return self.clone();
        }
        let data = self
            .data
            .chunks_exact(3)
            .map(|bgr| {
                let (b, g, r) = (bgr[0] as f64, bgr[1] as f64, bgr[2] as f64);
                (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
            })
            .collect();
        PixelBuffer { width: self.width, height: self.height, channels: 1, data }
    }

    /// Three-channel copy; a gray channel is replicated into B, G and R.
    pub fn to_bgr(&self) -> PixelBuffer {
        if self.is_color() {
            return self.clone();
        }
        let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
        PixelBuffer { width: self.width, height: self.height, channels: 3, data }
    }

    /// Keeps the source layout: gray stays 1 channel, anything else becomes
    /// BGR with alpha dropped.
    pub fn from_dynamic(img: &DynamicImage) -> PixelBuffer {
        match img {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => PixelBuffer::from_gray_image(&img.to_luma8()),
            _ => PixelBuffer::from_rgb_image(&img.to_rgb8()),
        }
    }

    pub fn from_rgb_image(img: &RgbImage) -> PixelBuffer {
        let data = img.pixels().flat_map(|p| [p.0[2], p.0[1], p.0[0]]).collect();
        PixelBuffer {
            width: img.width() as usize,
            height: img.height() as usize,
            channels: 3,
            data,
        }
    }

    pub fn from_gray_image(img: &GrayImage) -> PixelBuffer {
        PixelBuffer {
            width: img.width() as usize,
            height: img.height() as usize,
            channels: 1,
            data: img.as_raw().clone(),
        }
    }

    /// Converts back to an `image` crate image (RGB or Luma) for encoding.
    pub fn to_dynamic(&self) -> DynamicImage {
        let (w, h) = (self.width as u32, self.height as u32);
        if self.is_color() {
            let rgb: Vec<u8> = self
                .data
                .chunks_exact(3)
                .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
                .collect();
            // Length always matches the shape, so from_raw cannot fail here.
            RgbImage::from_raw(w, h, rgb)
                .map(DynamicImage::ImageRgb8)
                .unwrap_or_else(|| DynamicImage::new_rgb8(w, h))
        } else {
            GrayImage::from_raw(w, h, self.data.clone())
                .map(DynamicImage::ImageLuma8)
                .unwrap_or_else(|| DynamicImage::new_luma8(w, h))
        }
    }
}
