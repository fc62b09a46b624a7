// Configuration module

mod models;

pub use models::*;

use crate::cli::Args;
use crate::error::{RelayError, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Values taken from the well-known environment variables and CLI flags.
///
/// These sit above the prefixed `VISION_RELAY_*` variables so that a plain
/// `OPENAI_API_KEY=... PORT=... vision-relay` works without a config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub app_token: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Overrides {
    /// Collect overrides from `OPENAI_API_KEY`, `APP_TOKEN`, `PORT` and the
    /// CLI flags. Flags win over the environment.
    pub fn from_env(args: &Args) -> Result<Self> {
        let env_port = match non_empty_var("PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|e| {
                RelayError::Config(format!("PORT must be a valid port number, got {:?}: {}", raw, e))
            })?),
            None => None,
        };

        Ok(Self {
            api_key: non_empty_var("OPENAI_API_KEY"),
            app_token: non_empty_var("APP_TOKEN"),
            host: args.host.clone(),
            port: args.port.or(env_port),
        })
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest)
    /// 2. `OPENAI_API_KEY`, `APP_TOKEN`, `PORT`
    /// 3. `VISION_RELAY_*` environment variables
    /// 4. Config file
    /// 5. Defaults (lowest)
    pub fn load(args: &Args) -> Result<Self> {
        let overrides = Overrides::from_env(args)?;
        Self::load_from(args.config.as_deref(), overrides)
    }

    /// Build the layered configuration from an optional explicit file path.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load_from(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                File::from(file)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            // e.g. VISION_RELAY_SECURITY__RATE_LIMIT_PER_MINUTE=10
            .add_source(
                Environment::with_prefix("VISION_RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("provider.api_key", overrides.api_key)?
            .set_override_option("security.app_token", overrides.app_token)?
            .set_override_option("server.host", overrides.host)?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| RelayError::Config(e.to_string()))
    }

    /// Check settings the server cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(RelayError::Config(
                "no provider API key configured (set OPENAI_API_KEY)".to_string(),
            ));
        }
        if self.server.body_limit_bytes == 0 {
            return Err(RelayError::Config(
                "server.body_limit_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vision-relay")
            .join("config.toml")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
