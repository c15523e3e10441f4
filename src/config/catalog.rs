use crate::domain::model::{ModelCategory, ModelProfile};
use crate::utils::error::{Result, SavingsError};
use crate::utils::validation::{validate_non_empty_string, validate_required_field};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

/// On-disk catalog layout:
///
/// ```toml
/// [[models]]
/// name = "GPT-4 Turbo"
/// category = "proprietary"
/// context_window_tokens = 128000
/// input_price_per_1k_tokens = 0.01
/// output_price_per_1k_tokens = 0.03
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub models: Vec<RawModelProfile>,
}

/// Unvalidated catalog entry; every field is optional so that missing values
/// surface as configuration errors naming the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawModelProfile {
    pub name: Option<String>,
    pub category: Option<ModelCategory>,
    pub context_window_tokens: Option<i64>,
    pub input_price_per_1k_tokens: Option<f64>,
    pub output_price_per_1k_tokens: Option<f64>,
    pub parameters: Option<String>,
    pub strengths: Option<String>,
}

/// Ordered, validated set of model profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCatalog {
    profiles: Vec<ModelProfile>,
}

impl ModelCatalog {
    /// Validates every profile. Repeated names keep the first occurrence.
    pub fn new(profiles: Vec<ModelProfile>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(profiles.len());

        for (index, profile) in profiles.into_iter().enumerate() {
            validate_profile(index, &profile)?;
            if seen.insert(profile.name.clone()) {
                unique.push(profile);
            } else {
                tracing::debug!("Ignoring duplicate catalog entry '{}'", profile.name);
            }
        }

        Ok(Self { profiles: unique })
    }

    /// 從 TOML 檔案載入模型清單；讀不到檔案也視為設定錯誤
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SavingsError::configuration(
                "catalog",
                format!("cannot read {}: {}", path.as_ref().display(), e),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析，支援 ${VAR} 環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);

        let file: CatalogFile = toml::from_str(&processed).map_err(|e| {
            SavingsError::configuration("toml_parsing", format!("TOML parsing error: {}", e))
        })?;

        if file.models.is_empty() {
            return Err(SavingsError::configuration("models", "catalog defines no models"));
        }

        let profiles = file
            .models
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_profile(index))
            .collect::<Result<Vec<_>>>()?;

        Self::new(profiles)
    }

    pub fn builtin() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }

    /// Keeps the profiles whose category is selected, preserving order.
    pub fn select(&self, selection: &ModelSelection) -> Self {
        Self {
            profiles: self
                .profiles
                .iter()
                .filter(|profile| selection.includes(profile.category))
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    pub fn profiles(&self) -> &[ModelProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModelCatalog {
    type Item = &'a ModelProfile;
    type IntoIter = std::slice::Iter<'a, ModelProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl RawModelProfile {
    fn into_profile(self, index: usize) -> Result<ModelProfile> {
        let field = |name: &str| format!("models[{}].{}", index, name);

        let name = required(&field("name"), &self.name)?.clone();
        let category = *required(&field("category"), &self.category)?;
        let window = *required(&field("context_window_tokens"), &self.context_window_tokens)?;
        let input_price = *required(&field("input_price_per_1k_tokens"), &self.input_price_per_1k_tokens)?;
        let output_price =
            *required(&field("output_price_per_1k_tokens"), &self.output_price_per_1k_tokens)?;

        let context_window_tokens = u64::try_from(window).map_err(|_| {
            SavingsError::configuration(
                field("context_window_tokens"),
                format!("must be a positive number of tokens, got {}", window),
            )
        })?;

        Ok(ModelProfile {
            name,
            category,
            context_window_tokens,
            input_price_per_1k_tokens: input_price,
            output_price_per_1k_tokens: output_price,
            parameters: self.parameters,
            strengths: self.strengths,
        })
    }
}

fn required<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    validate_required_field(field, value)
        .map_err(|_| SavingsError::configuration(field, "is required"))
}

fn validate_profile(index: usize, profile: &ModelProfile) -> Result<()> {
    let field = |name: &str| format!("models[{}].{}", index, name);

    validate_non_empty_string(&field("name"), &profile.name)
        .map_err(|_| SavingsError::configuration(field("name"), "must not be empty"))?;

    if profile.context_window_tokens == 0 {
        return Err(SavingsError::configuration(
            field("context_window_tokens"),
            "must be a positive number of tokens",
        ));
    }

    for (name, price) in [
        ("input_price_per_1k_tokens", profile.input_price_per_1k_tokens),
        ("output_price_per_1k_tokens", profile.output_price_per_1k_tokens),
    ] {
        if !price.is_finite() || price < 0.0 {
            return Err(SavingsError::configuration(
                field(name),
                format!("must be a non-negative price, got {}", price),
            ));
        }
    }

    Ok(())
}

fn substitute_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

/// Which model categories to include, parsed from e.g. `open-source,proprietary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSelection {
    pub open_source: bool,
    pub proprietary: bool,
}

impl ModelSelection {
    pub fn all() -> Self {
        Self {
            open_source: true,
            proprietary: true,
        }
    }

    pub fn includes(&self, category: ModelCategory) -> bool {
        match category {
            ModelCategory::OpenSource => self.open_source,
            ModelCategory::Proprietary => self.proprietary,
        }
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for ModelSelection {
    type Err = SavingsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut selection = Self {
            open_source: false,
            proprietary: false,
        };

        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "open-source" | "open_source" | "opensource" | "open" => selection.open_source = true,
                "proprietary" | "closed" => selection.proprietary = true,
                "all" => selection = Self::all(),
                _ => {
                    return Err(SavingsError::InvalidConfigValueError {
                        field: "models".to_string(),
                        value: part.to_string(),
                        reason: "Expected 'open-source', 'proprietary' or 'all'".to_string(),
                    })
                }
            }
        }

        if !selection.open_source && !selection.proprietary {
            return Err(SavingsError::InvalidConfigValueError {
                field: "models".to_string(),
                value: s.to_string(),
                reason: "At least one model category must be selected".to_string(),
            });
        }

        Ok(selection)
    }
}

fn builtin_profiles() -> Vec<ModelProfile> {
    let profile = |name: &str,
                   category: ModelCategory,
                   window: u64,
                   input: f64,
                   output: f64,
                   parameters: &str,
                   strengths: &str| ModelProfile {
        name: name.to_string(),
        category,
        context_window_tokens: window,
        input_price_per_1k_tokens: input,
        output_price_per_1k_tokens: output,
        parameters: Some(parameters.to_string()),
        strengths: Some(strengths.to_string()),
    };

    use ModelCategory::{OpenSource, Proprietary};

    // 價格為每 1K tokens 的美元牌價；開源模型以常見託管價格估算
    vec![
        profile("Mistral 7B Instruct", OpenSource, 8_000, 0.00025, 0.00025, "7B", "Strong reasoning and code generation"),
        profile("XGen 7B 8K", OpenSource, 8_192, 0.0002, 0.0002, "7B", "Efficient long-sequence modelling"),
        profile("Llama 2 7B", OpenSource, 4_096, 0.0002, 0.0002, "7B", "Balanced general-purpose performance"),
        profile("GPT-4 Turbo", Proprietary, 128_000, 0.01, 0.03, "-", "General-purpose, high performance"),
        profile("GPT-4.1", Proprietary, 1_000_000, 0.002, 0.008, "-", "Improved coding and instruction following"),
        profile("Claude 3 Sonnet", Proprietary, 200_000, 0.003, 0.015, "-", "Extended thinking with tool use"),
        profile("Claude 4.5 (beta)", Proprietary, 1_000_000, 0.003, 0.015, "-", "1M context in beta"),
        profile("Gemini 2.5 Pro", Proprietary, 1_000_000, 0.00125, 0.01, "-", "Native multimodality, improved reasoning"),
        profile("DeepSeek V3.2", Proprietary, 128_000, 0.00028, 0.00042, "-", "JSON output mode, low pricing"),
        profile("Phi-3 Medium", Proprietary, 128_000, 0.00017, 0.00068, "-", "Small but capable, 4K and 128K variants"),
        profile("Grok 4 Fast", Proprietary, 2_000_000, 0.0002, 0.0005, "-", "Function calling and structured outputs"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CATALOG: &str = r#"
[[models]]
name = "Local 8K"
category = "open-source"
context_window_tokens = 8192
input_price_per_1k_tokens = 0.0
output_price_per_1k_tokens = 0.0

[[models]]
name = "Hosted"
category = "proprietary"
context_window_tokens = 128000
input_price_per_1k_tokens = 0.01
output_price_per_1k_tokens = 0.03
strengths = "General"
"#;

    fn expect_configuration_error(content: &str, expected_field: &str) {
        match ModelCatalog::from_toml_str(content) {
            Err(SavingsError::ConfigurationError { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected configuration error for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_valid_catalog() {
        let catalog = ModelCatalog::from_toml_str(VALID_CATALOG).unwrap();

        assert_eq!(catalog.len(), 2);
        let hosted = catalog.get("Hosted").unwrap();
        assert_eq!(hosted.category, ModelCategory::Proprietary);
        assert_eq!(hosted.context_window_tokens, 128_000);
        assert_eq!(hosted.strengths.as_deref(), Some("General"));
        assert_eq!(catalog.profiles()[0].name, "Local 8K");
    }

    #[test]
    fn test_missing_price_is_configuration_error() {
        let content = r#"
[[models]]
name = "No price"
category = "proprietary"
context_window_tokens = 1000
output_price_per_1k_tokens = 0.01
"#;
        expect_configuration_error(content, "models[0].input_price_per_1k_tokens");
    }

    #[test]
    fn test_non_positive_window_is_configuration_error() {
        let zero = VALID_CATALOG.replace("8192", "0");
        expect_configuration_error(&zero, "models[0].context_window_tokens");

        let negative = VALID_CATALOG.replace("128000", "-5");
        expect_configuration_error(&negative, "models[1].context_window_tokens");
    }

    #[test]
    fn test_negative_price_is_configuration_error() {
        let content = VALID_CATALOG.replace("input_price_per_1k_tokens = 0.01", "input_price_per_1k_tokens = -0.01");
        expect_configuration_error(&content, "models[1].input_price_per_1k_tokens");
    }

    #[test]
    fn test_empty_and_malformed_catalogs() {
        expect_configuration_error("", "models");
        expect_configuration_error("[[models]\nname = ", "toml_parsing");
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let content = format!(
            "{}\n[[models]]\nname = \"Hosted\"\ncategory = \"open-source\"\ncontext_window_tokens = 10\ninput_price_per_1k_tokens = 1.0\noutput_price_per_1k_tokens = 1.0\n",
            VALID_CATALOG
        );
        let catalog = ModelCatalog::from_toml_str(&content).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Hosted").unwrap().context_window_tokens, 128_000);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TOON_SAVINGS_TEST_PRICE", "0.005");
        let content = VALID_CATALOG.replace(
            "input_price_per_1k_tokens = 0.01",
            "input_price_per_1k_tokens = ${TOON_SAVINGS_TEST_PRICE}",
        );

        let catalog = ModelCatalog::from_toml_str(&content).unwrap();
        assert_eq!(catalog.get("Hosted").unwrap().input_price_per_1k_tokens, 0.005);
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = ModelCatalog::builtin();
        let revalidated = ModelCatalog::new(builtin.profiles().to_vec()).unwrap();

        assert_eq!(revalidated, builtin);
        assert!(builtin.iter().any(|p| p.category == ModelCategory::OpenSource));
        assert!(builtin.iter().any(|p| p.category == ModelCategory::Proprietary));
    }

    #[test]
    fn test_selection_filters_by_category() {
        let catalog = ModelCatalog::builtin();

        let open: ModelSelection = "open-source".parse().unwrap();
        let selected = catalog.select(&open);
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|p| p.category == ModelCategory::OpenSource));

        let both: ModelSelection = "open-source, proprietary".parse().unwrap();
        assert_eq!(catalog.select(&both), catalog);
    }

    #[test]
    fn test_selection_rejects_unknown_category() {
        assert!("closed-ish".parse::<ModelSelection>().is_err());
        assert!("".parse::<ModelSelection>().is_err());
        assert_eq!("all".parse::<ModelSelection>().unwrap(), ModelSelection::all());
    }
}
