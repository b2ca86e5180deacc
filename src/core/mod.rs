pub mod classifier;
pub mod filter;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod router;

pub use crate::domain::model::{BranchMap, LoanRow, PendingRow, RawTable, RecordKind};
pub use crate::domain::ports::{ReportSink, TableSource};
pub use crate::utils::error::Result;
