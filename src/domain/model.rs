use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arbitrary JSON-shaped input: object, array, string, number, bool or null.
pub type StructuredRecord = serde_json::Value;

pub const HIERARCHICAL_FORMAT: &str = "json";
pub const COMPACT_FORMAT: &str = "toon";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingResult {
    pub format_name: String,
    pub encoded_text: String,
    pub token_count: usize,
}

/// Outcome of the compact side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompactEncoding {
    Available(EncodingResult),
    Unavailable { reason: String },
}

impl CompactEncoding {
    pub fn result(&self) -> Option<&EncodingResult> {
        match self {
            CompactEncoding::Available(result) => Some(result),
            CompactEncoding::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            CompactEncoding::Available(_) => None,
            CompactEncoding::Unavailable { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub hierarchical: EncodingResult,
    pub compact: CompactEncoding,
    /// `None` when the compact side is unavailable. May be negative.
    pub savings_percent: Option<f64>,
}

impl ComparisonResult {
    pub fn is_compact_available(&self) -> bool {
        self.compact.result().is_some()
    }

    pub fn compact_tokens(&self) -> Option<usize> {
        self.compact.result().map(|r| r.token_count)
    }

    pub fn tokens_saved(&self) -> Option<i64> {
        self.compact_tokens()
            .map(|compact| self.hierarchical.token_count as i64 - compact as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelCategory {
    OpenSource,
    Proprietary,
}

impl std::fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelCategory::OpenSource => write!(f, "open-source"),
            ModelCategory::Proprietary => write!(f, "proprietary"),
        }
    }
}

/// Catalog entry. Only constructed through `ModelCatalog`, which validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub name: String,
    pub category: ModelCategory,
    pub context_window_tokens: u64,
    pub input_price_per_1k_tokens: f64,
    pub output_price_per_1k_tokens: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub model_name: String,
    pub context_window_tokens: u64,
    pub hierarchical_usage_fraction: f64,
    pub compact_usage_fraction: Option<f64>,
    pub cost_per_request_hierarchical: f64,
    pub cost_per_request_compact: Option<f64>,
    pub cost_savings_per_1000_requests: Option<f64>,
    /// How many compact payloads fit in the space of one hierarchical payload.
    pub capacity_multiplier: Option<f64>,
}

/// Everything one analysis run produced, as written to `report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: String,
    pub encoding_name: String,
    pub generated_at: DateTime<Utc>,
    pub comparison: ComparisonResult,
    pub projections: Vec<ProjectionResult>,
}
