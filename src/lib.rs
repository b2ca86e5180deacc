pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::excel::{ExcelSink, ExcelSource};
pub use crate::config::{CliConfig, Settings};
pub use crate::core::pipeline::ReportPipeline;
pub use crate::core::router::IntakeRouter;
pub use crate::utils::error::{ReportError, Result};
