use crate::config::toml_config::{EngineConfig, LoggingConfig};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cart-match")]
#[command(about = "Map an ingredient list onto catalog products and build a cart")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Catalog service URL (overrides the config file)")]
    pub catalog_endpoint: Option<String>,

    #[arg(long, help = "Catalog JSON file (overrides the config file)")]
    pub catalog_file: Option<String>,

    #[arg(long, help = "Ingredient list, .csv (name,quantity,unit) or .json")]
    pub ingredients: String,

    #[arg(long, default_value = "cart_local")]
    pub cart_id: String,

    #[arg(long, help = "Keep refreshing the catalog and re-plan on every new version")]
    pub watch: bool,

    #[arg(long, help = "Emit JSON logs")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Config file (if any) with command-line catalog flags layered on top.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(endpoint) = &self.catalog_endpoint {
            config.catalog.endpoint = Some(endpoint.clone());
            config.catalog.file = None;
        }
        if let Some(file) = &self.catalog_file {
            config.catalog.file = Some(file.clone());
            config.catalog.endpoint = None;
        }

        config.validate()?;
        Ok(config)
    }

    /// `[logging]` from the config file with `--json-logs` layered on top.
    pub fn logging(&self, configured: &LoggingConfig) -> LoggingConfig {
        LoggingConfig {
            level: configured.level.clone(),
            json: configured.json || self.json_logs,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_file_path("ingredients", &self.ingredients)?;
        validation::validate_not_blank("cart_id", &self.cart_id)?;
        if let Some(endpoint) = &self.catalog_endpoint {
            validation::validate_endpoint_url("catalog_endpoint", endpoint)?;
        }
        Ok(())
    }
}
