pub mod comparator;
pub mod engine;
pub mod pipeline;
pub mod projector;

pub use crate::domain::model::{AnalysisReport, ComparisonResult, ProjectionResult, StructuredRecord};
pub use crate::domain::ports::{CompactCodec, ConfigProvider, Pipeline, Storage, Tokenizer};
pub use crate::utils::error::Result;
