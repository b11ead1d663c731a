use serde::Deserialize;
use std::{env, path::PathBuf};
use thiserror::Error;

use crate::gesture::GestureConfig;
use crate::session::DEFAULT_SESSION_SECS;

#[derive(Debug, Default, Deserialize)]
pub struct HiveConfig {
    pub session: Option<SessionConfig>,
    pub gesture: Option<GestureSection>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    /// Length of a timed test in seconds.
    pub duration_secs: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GestureSection {
    pub viewport_width: Option<f32>,
    pub commit_ratio: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Leaderboard data directory. `${VAR}` references are expanded.
    pub dir: Option<String>,
}

/// Replace `${VAR}` references with the variable's value (empty if unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if var.is_empty() {
            out.push_str("${}");
        } else {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl HiveConfig {
    /// Load `~/.hivecheck/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Option<Self>, ConfigError> {
        let path = path.into();
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn session_secs(&self) -> u32 {
        self.session
            .as_ref()
            .and_then(|s| s.duration_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SESSION_SECS)
    }

    /// Gesture tuning with out-of-range values replaced by defaults.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        let mut config = GestureConfig::default();
        let Some(section) = &self.gesture else {
            return config;
        };

        match section.viewport_width {
            Some(width) if width.is_finite() && width > 0.0 => config.viewport_width = width,
            Some(width) => tracing::warn!(width, "Ignoring invalid gesture.viewport_width"),
            None => {}
        }
        match section.commit_ratio {
            Some(ratio) if ratio > 0.0 && ratio < 1.0 => config.commit_ratio = ratio,
            Some(ratio) => tracing::warn!(ratio, "Ignoring invalid gesture.commit_ratio"),
            None => {}
        }
        config
    }

    /// Leaderboard data directory: `[storage] dir` if set, else the default.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage
            .as_ref()
            .and_then(|s| s.dir.as_deref())
            .map(expand_env_vars)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_data_dir)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hivecheck").join("config.toml"))
}

pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hivecheck").join("data"))
}
