pub mod params;
pub mod brightness;
pub mod saturation;
pub mod rotate;
pub mod resize;
pub mod pipeline;

pub use params::EditParams;
pub use brightness::adjust_brightness_contrast;
pub use saturation::adjust_saturation;
pub use rotate::rotate;
pub use resize::{resize_percent, resize_to};
pub use pipeline::apply_edits;
