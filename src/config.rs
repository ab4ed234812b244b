use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::EXPORT_FILE_NAME;
use crate::error::{Result, SpmigError};
use crate::preview::Theme;
use crate::settings::{SettingValues, Variant};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "spmig.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variant: Variant,
    pub theme: Theme,
    pub output: Option<PathBuf>,
    pub show_preview: bool,
    pub defaults: SettingValues,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            theme: Theme::default(),
            output: None,
            show_preview: true,
            defaults: SettingValues::default(),
        }
    }
}

impl Config {
    /// Load `explicit` if given, else `spmig.yaml` under `cwd` if it exists,
    /// else defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let source = path.display().to_string();
        let raw = fs::read_to_string(&path)
            .map_err(|err| SpmigError::Config(source.clone(), err.to_string()))?;
        let config = Self::from_yaml(&source, &raw)?;
        tracing::debug!(path = %source, ?config, "config loaded");
        Ok(config)
    }

    pub fn from_yaml(source: &str, raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|err| SpmigError::Config(source.to_string(), err.to_string()))?;
        config
            .defaults
            .validate()
            .map_err(|err| SpmigError::Config(source.to_string(), err.to_string()))?;
        Ok(config)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME))
    }
}
