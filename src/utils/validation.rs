use crate::utils::error::{Result, SavingsError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SavingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SavingsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SavingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SavingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SavingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 資料來源可以是本地 JSON 檔案或 http(s) URL
pub fn validate_data_source(field_name: &str, source: &str) -> Result<()> {
    if is_remote_source(source) {
        return validate_url(field_name, source);
    }

    validate_path(field_name, source)?;

    match std::path::Path::new(source)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        _ => Err(SavingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: source.to_string(),
            reason: "Only JSON files are supported".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| SavingsError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SavingsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("data", "https://example.com/data.json").is_ok());
        assert!(validate_url("data", "http://example.com").is_ok());
        assert!(validate_url("data", "").is_err());
        assert!(validate_url("data", "invalid-url").is_err());
        assert!(validate_url("data", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_data_source() {
        assert!(validate_data_source("data", "datasets/users.json").is_ok());
        assert!(validate_data_source("data", "datasets/USERS.JSON").is_ok());
        assert!(validate_data_source("data", "https://example.com/users").is_ok());
        assert!(validate_data_source("data", "datasets/users.csv").is_err());
        assert!(validate_data_source("data", "").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(0.01);
        let missing: Option<f64> = None;
        assert_eq!(*validate_required_field("price", &present).unwrap(), 0.01);
        assert!(matches!(
            validate_required_field("price", &missing),
            Err(SavingsError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("encoding", "cl100k_base").is_ok());
        assert!(validate_non_empty_string("encoding", "   ").is_err());
    }
}
