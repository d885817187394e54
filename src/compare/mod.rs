pub mod align;
pub mod ssim;
pub mod mean_diff;
pub mod diff_map;
pub mod comparison;

pub use align::{align_size, match_channels};
pub use ssim::structural_similarity;
pub use mean_diff::mean_absolute_difference;
pub use diff_map::xor_difference_map;
pub use comparison::{compare_all, Comparison};
