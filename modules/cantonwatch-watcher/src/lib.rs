pub mod cycle;
pub mod detector;
pub mod keywords;
pub mod report;
pub mod sources;
pub mod stats;
pub mod traits;

pub use cycle::{run_cycle, CycleOutcome, ReportKind};
pub use sources::SourceTable;
