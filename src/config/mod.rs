pub mod catalog;
pub mod cli;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::adapters::DEFAULT_ENCODING;
    use crate::config::catalog::{ModelCatalog, ModelSelection};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_data_source, validate_non_empty_string, validate_path, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "toon-savings")]
    #[command(about = "Compare JSON and TOON token usage and project context-window and cost savings")]
    pub struct CliConfig {
        #[arg(long, help = "Dataset to analyse: a local .json file or an http(s) URL")]
        pub data: String,

        #[arg(long = "output", default_value = "./reports")]
        pub output_path: String,

        #[arg(long, default_value = "open-source,proprietary")]
        pub models: String,

        #[arg(long, help = "TOML file replacing the built-in model catalog")]
        pub catalog: Option<String>,

        #[arg(long, default_value = DEFAULT_ENCODING)]
        pub encoding: String,

        #[arg(long, help = "Print the summary without writing the report bundle")]
        pub no_report: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn model_selection(&self) -> Result<ModelSelection> {
            self.models.parse()
        }

        /// Built-in or file catalog, filtered by `--models`.
        pub fn load_catalog(&self) -> Result<ModelCatalog> {
            let catalog = match &self.catalog {
                Some(path) => ModelCatalog::from_file(path)?,
                None => ModelCatalog::builtin(),
            };
            Ok(catalog.select(&self.model_selection()?))
        }
    }

    impl ConfigProvider for CliConfig {
        fn data_source(&self) -> &str {
            &self.data
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn write_report(&self) -> bool {
            !self.no_report
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_data_source("data", &self.data)?;
            validate_path("output", &self.output_path)?;
            validate_non_empty_string("encoding", &self.encoding)?;
            self.model_selection()?;
            if let Some(catalog) = &self.catalog {
                validate_path("catalog", catalog)?;
            }
            Ok(())
        }
    }

}
