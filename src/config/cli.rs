use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Home,
    Health,
    All,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "jarvis-web")]
#[command(about = "Fetch backend resources the way the Jarvis frontend does")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Backend base URL, overrides the file and NEXT_PUBLIC_API_URL")]
    pub base_url: Option<String>,

    #[arg(long, value_enum, default_value = "home")]
    pub resource: Resource,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Print the resolved site configuration and exit")]
    pub print_config: bool,
}

impl CliConfig {
    /// Resolution order for the base URL: `--base-url`, the file, then
    /// `NEXT_PUBLIC_API_URL`.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };

        let mut config = config.with_env_fallback();
        if let Some(base_url) = &self.base_url {
            config.api.base_url = Some(base_url.clone());
        }
        Ok(config)
    }
}
