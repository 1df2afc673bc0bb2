pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::site::{ClientEnv, ImageConfig, RemotePattern, SiteConfig};
pub use crate::config::toml_config::AppConfig;
pub use crate::core::api::{get_health, get_home, get_home_message};
pub use crate::core::{ApiClient, BaseUrl, RequestScope};
pub use crate::utils::error::{ApiError, Result};
