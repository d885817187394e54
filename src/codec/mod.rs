pub mod decode;
pub mod encode;

pub use decode::{decode_bytes, decode_file, DecodeMode};
pub use encode::encode_file;
