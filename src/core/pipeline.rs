use crate::config::catalog::ModelCatalog;
use crate::core::comparator::FormatComparator;
use crate::core::projector::project;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AnalysisReport, CompactEncoding, StructuredRecord};
use crate::domain::ports::{CompactCodec, Tokenizer};
use crate::utils::error::{Result, SavingsError};
use crate::utils::validation::is_remote_source;
use chrono::Utc;
use reqwest::Client;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_ARCHIVE: &str = "toon_savings_report.zip";

/// Loads one dataset, compares both encodings, projects the result onto the
/// catalog and bundles everything into a zip report.
pub struct ReportPipeline<S: Storage, C: ConfigProvider, E: CompactCodec, T: Tokenizer> {
    storage: S,
    config: C,
    comparator: FormatComparator<E, T>,
    catalog: ModelCatalog,
    client: Client,
}

impl<S: Storage, C: ConfigProvider, E: CompactCodec, T: Tokenizer> ReportPipeline<S, C, E, T> {
    pub fn new(storage: S, config: C, comparator: FormatComparator<E, T>, catalog: ModelCatalog) -> Self {
        Self {
            storage,
            config,
            comparator,
            catalog,
            client: Client::new(),
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }
}

#[async_trait::async_trait]
impl<S, C, E, T> Pipeline for ReportPipeline<S, C, E, T>
where
    S: Storage,
    C: ConfigProvider,
    E: CompactCodec,
    T: Tokenizer,
{
    async fn extract(&self) -> Result<StructuredRecord> {
        let source = self.config.data_source();

        if is_remote_source(source) {
            tracing::debug!("Making API request to: {}", source);
            let response = self.client.get(source).send().await?;
            let status = response.status();
            tracing::debug!("API response status: {}", status);

            if !status.is_success() {
                return Err(SavingsError::ProcessingError {
                    message: format!("Dataset request to {} returned {}", source, status),
                });
            }
            return Ok(response.json().await?);
        }

        tracing::debug!("Reading dataset from: {}", source);
        let bytes = tokio::fs::read(source).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn transform(&self, record: StructuredRecord) -> Result<AnalysisReport> {
        let comparison = self.comparator.compare(&record)?;

        match &comparison.compact {
            CompactEncoding::Available(compact) => tracing::info!(
                "🧮 JSON: {} tokens, TOON: {} tokens ({:.2}% saved)",
                comparison.hierarchical.token_count,
                compact.token_count,
                comparison.savings_percent.unwrap_or_default()
            ),
            CompactEncoding::Unavailable { reason } => tracing::warn!(
                "⚠️ TOON encoding unavailable ({}), reporting JSON only",
                reason
            ),
        }

        let projections = project(&comparison, self.catalog.profiles());
        tracing::debug!("Projected usage for {} models", projections.len());

        Ok(AnalysisReport {
            source: self.config.data_source().to_string(),
            encoding_name: self.comparator.encoding_name().to_string(),
            generated_at: Utc::now(),
            comparison,
            projections,
        })
    }

    async fn load(&self, report: &AnalysisReport) -> Result<Option<String>> {
        if !self.config.write_report() {
            tracing::debug!("Report bundle disabled, nothing written");
            return Ok(None);
        }

        let archive = build_archive(report)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", archive.len());
        self.storage.write_file(REPORT_ARCHIVE, &archive).await?;

        Ok(Some(format!("{}/{}", self.config.output_path(), REPORT_ARCHIVE)))
    }
}

/// `report.json`, `data.json`, `data.toon` (when available) and
/// `projections.csv`.
pub fn build_archive(report: &AnalysisReport) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("report.json", FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    zip.start_file::<_, ()>("data.json", FileOptions::default())?;
    zip.write_all(report.comparison.hierarchical.encoded_text.as_bytes())?;

    if let Some(compact) = report.comparison.compact.result() {
        zip.start_file::<_, ()>("data.toon", FileOptions::default())?;
        zip.write_all(compact.encoded_text.as_bytes())?;
    }

    zip.start_file::<_, ()>("projections.csv", FileOptions::default())?;
    zip.write_all(&projections_csv(report)?)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn projections_csv(report: &AnalysisReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for projection in &report.projections {
        writer.serialize(projection)?;
    }
    writer.into_inner().map_err(|e| SavingsError::ProcessingError {
        message: format!("Failed to flush CSV: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{HeuristicTokenizer, ToonCodec};
    use crate::domain::model::{ModelCategory, ModelProfile};
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SavingsError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        data_source: String,
        output_path: String,
        write_report: bool,
    }

    impl MockConfig {
        fn new(data_source: String) -> Self {
            Self {
                data_source,
                output_path: "test_output".to_string(),
                write_report: true,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn data_source(&self) -> &str {
            &self.data_source
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn write_report(&self) -> bool {
            self.write_report
        }
    }

    fn test_catalog() -> ModelCatalog {
        ModelCatalog::new(vec![ModelProfile {
            name: "Test 8K".to_string(),
            category: ModelCategory::OpenSource,
            context_window_tokens: 8192,
            input_price_per_1k_tokens: 0.01,
            output_price_per_1k_tokens: 0.02,
            parameters: None,
            strengths: None,
        }])
        .unwrap()
    }

    fn pipeline(
        storage: MockStorage,
        config: MockConfig,
    ) -> ReportPipeline<MockStorage, MockConfig, ToonCodec, HeuristicTokenizer> {
        let comparator = FormatComparator::new(ToonCodec::new(), HeuristicTokenizer, "heuristic");
        ReportPipeline::new(storage, config, comparator, test_catalog())
    }

    fn users() -> serde_json::Value {
        serde_json::json!({
            "users": [
                {"id": 1, "name": "Alice", "role": "admin"},
                {"id": 2, "name": "Bob", "role": "user"},
                {"id": 3, "name": "Carol", "role": "user"}
            ]
        })
    }

    fn read_entry(archive: &[u8], name: &str) -> Option<String> {
        let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
        let mut file = zip.by_name(name).ok()?;
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        Some(content)
    }

    #[tokio::test]
    async fn test_extract_from_api() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(users());
        });

        let pipeline = pipeline(MockStorage::new(), MockConfig::new(server.url("/users.json")));
        let record = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(record, users());
    }

    #[tokio::test]
    async fn test_extract_api_failure_is_an_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        });

        let pipeline = pipeline(MockStorage::new(), MockConfig::new(server.url("/")));
        let result = pipeline.extract().await;

        api_mock.assert();
        assert!(matches!(result, Err(SavingsError::ProcessingError { .. })));
    }

    #[tokio::test]
    async fn test_extract_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, users().to_string()).unwrap();

        let config = MockConfig::new(path.to_string_lossy().into_owned());
        let record = pipeline(MockStorage::new(), config).extract().await.unwrap();

        assert_eq!(record, users());
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = MockConfig::new(path.to_string_lossy().into_owned());
        let result = pipeline(MockStorage::new(), config).extract().await;

        assert!(matches!(result, Err(SavingsError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_transform_builds_report() {
        let pipeline = pipeline(MockStorage::new(), MockConfig::new("users.json".to_string()));
        let report = pipeline.transform(users()).await.unwrap();

        assert_eq!(report.source, "users.json");
        assert_eq!(report.encoding_name, "heuristic");
        assert!(report.comparison.is_compact_available());
        assert!(report.comparison.savings_percent.unwrap() > 0.0);
        assert_eq!(report.projections.len(), 1);
        assert_eq!(report.projections[0].model_name, "Test 8K");
    }

    #[tokio::test]
    async fn test_load_writes_archive() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), MockConfig::new("users.json".to_string()));
        let report = pipeline.transform(users()).await.unwrap();

        let output = pipeline.load(&report).await.unwrap();
        assert_eq!(output.as_deref(), Some("test_output/toon_savings_report.zip"));

        let archive = storage.get_file(REPORT_ARCHIVE).await.unwrap();
        let toon = read_entry(&archive, "data.toon").unwrap();
        assert!(toon.starts_with("users[3]"));
        assert_eq!(ToonCodec::new().decode(&toon).unwrap(), users());
        assert_eq!(
            read_entry(&archive, "data.json").unwrap(),
            report.comparison.hierarchical.encoded_text
        );

        let csv = read_entry(&archive, "projections.csv").unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("model_name,context_window_tokens"));
        assert!(lines.next().unwrap().starts_with("Test 8K,8192,"));

        let parsed: AnalysisReport =
            serde_json::from_str(&read_entry(&archive, "report.json").unwrap()).unwrap();
        assert_eq!(parsed.comparison, report.comparison);
    }

    #[tokio::test]
    async fn test_load_skips_archive_when_disabled() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new("users.json".to_string());
        config.write_report = false;

        let pipeline = pipeline(storage.clone(), config);
        let report = pipeline.transform(users()).await.unwrap();

        assert_eq!(pipeline.load(&report).await.unwrap(), None);
        assert!(storage.get_file(REPORT_ARCHIVE).await.is_none());
    }

    #[tokio::test]
    async fn test_archive_omits_toon_when_unavailable() {
        let comparator = FormatComparator::new(ToonCodec::with_max_depth(1), HeuristicTokenizer, "heuristic");
        let storage = MockStorage::new();
        let pipeline = ReportPipeline::new(
            storage.clone(),
            MockConfig::new("users.json".to_string()),
            comparator,
            test_catalog(),
        );

        let report = pipeline.transform(users()).await.unwrap();
        assert!(!report.comparison.is_compact_available());

        pipeline.load(&report).await.unwrap();
        let archive = storage.get_file(REPORT_ARCHIVE).await.unwrap();
        assert!(read_entry(&archive, "data.toon").is_none());
        assert!(read_entry(&archive, "data.json").is_some());
    }
}
