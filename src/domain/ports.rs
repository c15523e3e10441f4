use crate::domain::model::{AnalysisReport, StructuredRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Encode/decode capability for the compact tabular format.
///
/// Implementations must satisfy `decode(encode(r)) == r` for every record
/// they accept; records they cannot represent fail with `EncodingError`.
pub trait CompactCodec: Send + Sync {
    fn format_name(&self) -> &str;
    fn encode(&self, record: &StructuredRecord) -> Result<String>;
    fn decode(&self, text: &str) -> Result<StructuredRecord>;
}

/// Maps text to a model-specific token count. Same input, same count.
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str, encoding_name: &str) -> Result<usize>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn write_report(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<StructuredRecord>;
    async fn transform(&self, record: StructuredRecord) -> Result<AnalysisReport>;
    async fn load(&self, report: &AnalysisReport) -> Result<Option<String>>;
}
