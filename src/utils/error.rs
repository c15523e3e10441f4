use thiserror::Error;

#[derive(Error, Debug)]
pub enum SavingsError {
    #[error("Compact encoding failed: {message}")]
    EncodingError { message: String },

    #[error("Compact decoding failed at line {line}: {message}")]
    DecodingError { line: usize, message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigurationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Tokenizer error ({encoding}): {message}")]
    TokenizerError { encoding: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Codec,
    Configuration,
    Network,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SavingsError {
    pub fn encoding(message: impl Into<String>) -> Self {
        SavingsError::EncodingError {
            message: message.into(),
        }
    }

    pub fn decoding(line: usize, message: impl Into<String>) -> Self {
        SavingsError::DecodingError {
            line,
            message: message.into(),
        }
    }

    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        SavingsError::ConfigurationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SavingsError::EncodingError { .. } | SavingsError::DecodingError { .. } => {
                ErrorCategory::Codec
            }
            SavingsError::ConfigurationError { .. }
            | SavingsError::InvalidConfigValueError { .. }
            | SavingsError::MissingConfigError { .. }
            | SavingsError::TokenizerError { .. } => ErrorCategory::Configuration,
            SavingsError::ApiError(_) => ErrorCategory::Network,
            SavingsError::ZipError(_) | SavingsError::IoError(_) => ErrorCategory::Storage,
            SavingsError::CsvError(_)
            | SavingsError::SerializationError(_)
            | SavingsError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 壓縮格式無法表示的輸入屬於正常結果
            SavingsError::EncodingError { .. } => ErrorSeverity::Low,
            SavingsError::DecodingError { .. } | SavingsError::ApiError(_) => {
                ErrorSeverity::Medium
            }
            SavingsError::ConfigurationError { .. }
            | SavingsError::InvalidConfigValueError { .. }
            | SavingsError::MissingConfigError { .. }
            | SavingsError::TokenizerError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SavingsError::EncodingError { .. } => {
                "Reduce nesting depth or avoid very large integral floats in the input"
            }
            SavingsError::DecodingError { .. } => {
                "Check indentation (2 spaces) and that array lengths match their [N] headers"
            }
            SavingsError::ConfigurationError { .. } => {
                "Fix the model catalog: every model needs a positive context window and both prices"
            }
            SavingsError::InvalidConfigValueError { .. } => {
                "Check the command line arguments with --help"
            }
            SavingsError::MissingConfigError { .. } => "Provide the missing setting",
            SavingsError::TokenizerError { .. } => {
                "Use one of cl100k_base, o200k_base, p50k_base, r50k_base or a known model name"
            }
            SavingsError::ApiError(_) => "Check the dataset URL and your network connection",
            SavingsError::ZipError(_) | SavingsError::IoError(_) => {
                "Check that the paths exist and are writable"
            }
            SavingsError::CsvError(_) | SavingsError::SerializationError(_) => {
                "Make sure the dataset is valid JSON"
            }
            SavingsError::ProcessingError { .. } => "Re-run with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SavingsError::EncodingError { message } => {
                format!("The data cannot be represented in TOON: {}", message)
            }
            SavingsError::DecodingError { line, message } => {
                format!("The TOON document is invalid (line {}): {}", line, message)
            }
            SavingsError::ConfigurationError { field, message } => {
                format!("The model catalog is misconfigured ({}): {}", field, message)
            }
            SavingsError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", e)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SavingsError>;
