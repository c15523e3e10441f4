use crate::config::catalog::{ModelCatalog, ModelSelection};
use crate::core::comparator::FormatComparator;
use crate::core::projector::project;
use crate::domain::model::{ComparisonResult, ProjectionResult, StructuredRecord};
use crate::domain::ports::{CompactCodec, Tokenizer};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Request payload, tagged by `action`:
///
/// ```json
/// {"action": "encode", "data": {"id": 1}}
/// {"action": "decode", "toon": "id: 1"}
/// {"action": "compare", "data": [1, 2], "models": "proprietary"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApiRequest {
    Encode {
        data: StructuredRecord,
    },
    Decode {
        toon: String,
    },
    Compare {
        data: StructuredRecord,
        #[serde(default)]
        models: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Encoded {
        toon: String,
    },
    Decoded {
        data: StructuredRecord,
    },
    Compared {
        comparison: ComparisonResult,
        projections: Vec<ProjectionResult>,
        compact_error: Option<String>,
    },
}

pub struct ApiService<C: CompactCodec, T: Tokenizer> {
    comparator: FormatComparator<C, T>,
    catalog: ModelCatalog,
}

impl<C: CompactCodec, T: Tokenizer> ApiService<C, T> {
    pub fn new(comparator: FormatComparator<C, T>, catalog: ModelCatalog) -> Self {
        Self {
            comparator,
            catalog,
        }
    }

    pub fn handle(&self, request: ApiRequest) -> Result<ApiResponse> {
        match request {
            ApiRequest::Encode { data } => Ok(ApiResponse::Encoded {
                toon: self.comparator.codec().encode(&data)?,
            }),
            ApiRequest::Decode { toon } => Ok(ApiResponse::Decoded {
                data: self.comparator.codec().decode(&toon)?,
            }),
            ApiRequest::Compare { data, models } => {
                let comparison = self.comparator.compare(&data)?;
                let projections = match models {
                    Some(models) => {
                        let selection: ModelSelection = models.parse()?;
                        project(&comparison, self.catalog.select(&selection).profiles())
                    }
                    None => project(&comparison, self.catalog.profiles()),
                };
                let compact_error = comparison.compact.unavailable_reason().map(String::from);

                Ok(ApiResponse::Compared {
                    comparison,
                    projections,
                    compact_error,
                })
            }
        }
    }
}
