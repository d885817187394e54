pub mod buffer;
pub mod codec;
pub mod edit;
pub mod compare;
pub mod ledger;
pub mod error;

// Convenience re-exports
pub use buffer::pixel_buffer::PixelBuffer;
pub use codec::decode::{decode_bytes, decode_file};
pub use codec::encode::encode_file;
pub use edit::params::EditParams;
pub use edit::pipeline::apply_edits;
pub use compare::comparison::{compare_all, Comparison};
pub use ledger::ledger::ResultLedger;
pub use ledger::record::{ComparisonRecord, RankedRecord};
pub use error::{BufferError, CompareError, DecodeError, EditError, EncodeError, LedgerError};
