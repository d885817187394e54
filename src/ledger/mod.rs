pub mod record;
pub mod ledger;
pub mod csv_export;

pub use record::{ComparisonRecord, RankedRecord};
pub use ledger::ResultLedger;
pub use csv_export::to_csv;
