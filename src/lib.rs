pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HeuristicTokenizer, TiktokenTokenizer, TokenCounter, ToonCodec};
pub use crate::app::{render_summary, ApiRequest, ApiResponse, ApiService};
pub use crate::config::catalog::{ModelCatalog, ModelSelection};
pub use crate::config::cli::LocalStorage;
pub use crate::core::{
    comparator::FormatComparator,
    engine::{AnalysisEngine, RunOutput},
    pipeline::ReportPipeline,
    projector::project,
};
pub use crate::domain::model::{
    AnalysisReport, CompactEncoding, ComparisonResult, EncodingResult, ModelCategory, ModelProfile,
    ProjectionResult, StructuredRecord,
};
pub use crate::utils::error::{Result, SavingsError};
