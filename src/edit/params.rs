use serde::{Deserialize, Serialize};

/// The five knobs of the edit pipeline.
///
/// No range is enforced here; each stage clamps only its own output samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditParams {
    /// Offset added to every sample after the contrast multiply.
    pub brightness: i32,
    /// Multiplier applied to every sample.
    pub contrast: f64,
    /// Multiplier applied to the HSV saturation channel.
    pub saturation: f64,
    /// Counter-clockwise rotation in degrees.
    pub rotation_degrees: f64,
    /// Output size as a percentage of the input size.
    pub resize_percent: i32,
}

impl Default for EditParams {
    fn default() -> Self {
        EditParams {
            brightness: 0,
            contrast: 1.0,
            saturation: 1.0,
            rotation_degrees: 0.0,
            resize_percent: 100,
        }
    }
}
