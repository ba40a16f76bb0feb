//! Loads the TOML configuration document: the shared `ChannelConfig`
//! fields plus a `[cli]` table the core crate has no reason to know
//! about.

use std::path::Path;

use radlink_core::ChannelConfig;
use serde::{Deserialize, Serialize};

use crate::logging::OutputFormat;

fn default_log_format() -> OutputFormat {
    OutputFormat::Pretty
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_log_format")]
    pub log_format: OutputFormat,
    #[serde(default)]
    pub wav_path: Option<String>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            wav_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub cli: CliSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub fn load(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}
