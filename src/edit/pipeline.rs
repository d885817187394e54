use tracing::{debug, warn};

use crate::buffer::pixel_buffer::PixelBuffer;
use crate::edit::brightness::adjust_brightness_contrast;
use crate::edit::params::EditParams;
use crate::edit::resize::resize_percent;
use crate::edit::rotate::rotate;
use crate::edit::saturation::adjust_saturation;
use crate::error::EditError;

/// Runs the fixed edit sequence: brightness/contrast → saturation →
/// rotation → resize.
///
/// A saturation failure (gray input) is logged and skipped; the image moves
/// on unchanged. A resize that would leave no pixels is returned as an error.
pub fn apply_edits(image: PixelBuffer, params: &EditParams) -> Result<PixelBuffer, EditError> {
    debug!(?params, width = image.width(), height = image.height(), "applying edits");

    let image = adjust_brightness_contrast(image, params.brightness, params.contrast);

    let image = match adjust_saturation(&image, params.saturation) {
        Ok(saturated) => saturated,
        Err(e) => {
            warn!(error = %e, "saturation skipped, continuing with unsaturated image");
            image
        }
    };

    let image = rotate(image, params.rotation_degrees);
    debug!(width = image.width(), height = image.height(), "rotated");

    let image = resize_percent(image, params.resize_percent)?;
    debug!(width = image.width(), height = image.height(), "edits applied");
    Ok(image)
}
