use std::env;
use std::io::{self, ErrorKind};
use std::path::Path;

use fixture_core::EntrantKind;
use fixture_optimizer::OptimizerConfig;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    pub optimizer: OptimizerConfig,
    pub layout: Layout,
}

impl Config {
    pub async fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let mut file = File::open(path).await?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).await?;

        Ok(toml::from_slice(&buf)?)
    }

    /// Reads the [`Config`] at `path` and overlays it with the environment.
    ///
    /// A missing file is not an error, the defaults are used instead.
    pub async fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err),
        };

        Ok(config.with_environment())
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(self, "FX_LOGLEVEL", loglevel);

        from_environment!(self.optimizer, "FX_OPTIMIZER_MODE", mode);
        from_environment!(self.optimizer.openai, "FX_OPENAI_MODEL", model);
        from_environment!(self.optimizer.anthropic, "FX_ANTHROPIC_MODEL", model);

        if let Ok(key) = env::var("OPENAI_API_KEY") {
            self.optimizer.openai.api_key = Some(key);
        }

        if let Ok(key) = env::var("ANTHROPIC_API_KEY") {
            self.optimizer.anthropic.api_key = Some(key);
        }

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            optimizer: OptimizerConfig::default(),
            layout: Layout::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub entrant_kind: EntrantKind,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
