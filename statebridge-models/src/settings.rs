use crate::constants::DEFAULT_MODULE_SOURCE;
use config::{Config, File};
use serde::Deserialize;
use statebridge_error::BridgeResult;
use std::{ops::Deref, sync::Arc};

/// Gateway settings, cheaply cloneable.
#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    /// Load settings from an optional TOML file with `SB__` environment
    /// overrides (e.g. `SB__GENERAL__MODULE_SOURCE=custom-module`).
    pub fn new(config_path: &str) -> BridgeResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SB")
                    .separator("__")
                    .try_parsing(true),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self(Arc::new(Inner::default()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Module source identifier stamped on outbound snapshot events.
    #[serde(default = "General::module_source_default")]
    pub module_source: String,
}

impl General {
    fn module_source_default() -> String {
        DEFAULT_MODULE_SOURCE.to_string()
    }
}

impl Default for General {
    fn default() -> Self {
        Self {
            module_source: Self::module_source_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    /// Log level filter (`trace` .. `error`).
    #[serde(default = "Log::level_default")]
    pub level: String,
    /// Optional directory for rolling file output; console-only when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Log {
    fn level_default() -> String {
        "info".to_string()
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Self::level_default(),
            dir: None,
        }
    }
}
