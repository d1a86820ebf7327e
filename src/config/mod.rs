// src/config/mod.rs
mod models;

pub use models::*;

use ::config::{Config, Environment, File, Map, Source, Value, ValueKind};
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("ApiSettings:ApiHealthEndpoint is required")]
    MissingEndpoint,

    #[error("ApiSettings:ApiHealthEndpoint '{value}' is not an absolute URL")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("ApiSettings:ApiHealthEndpoint uses unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("WorkerSettings:SecondsDelay is required")]
    MissingInterval,

    #[error("WorkerSettings:SecondsDelay '{0}' is not a positive integer")]
    InvalidInterval(String),

    #[error("WorkerSettings:RequestTimeoutSeconds '{0}' is not a positive integer")]
    InvalidTimeout(String),
}

/// Load configuration from an optional file plus environment overrides.
///
/// Without an explicit path an `appsettings.*` file in the working directory
/// is used when present. Environment variables use `__` between section and
/// key, e.g. `WORKERSETTINGS__SECONDSDELAY=30`, and win over the file.
pub fn load_config(path: Option<&Path>) -> Result<WorkerConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name("appsettings").required(false),
    };

    let file_layer = Config::builder().add_source(file).build()?;
    let env_layer = Config::builder()
        .add_source(Environment::default().separator("__"))
        .build()?;

    let mut merged = normalize(file_layer)?;
    merge_into(&mut merged, normalize(env_layer)?);

    settings_from(merged)?.validate()
}

/// Deserialize and validate an already assembled configuration source.
pub fn from_source(source: Config) -> Result<WorkerConfig, ConfigError> {
    settings_from(normalize(source)?)?.validate()
}

fn settings_from(table: Map<String, Value>) -> Result<Settings, ConfigError> {
    let settings: Settings = Value::new(None, ValueKind::Table(table)).try_deserialize()?;
    debug!(?settings, "Raw settings loaded");
    Ok(settings)
}

// Files keep keys as written while the environment source lowercases them,
// so every layer is folded to lowercase before the layers are merged.
fn normalize(source: Config) -> Result<Map<String, Value>, ::config::ConfigError> {
    Ok(lowercase_keys(source.collect()?))
}

fn lowercase_keys(table: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in table {
        let value = match value.kind {
            ValueKind::Table(inner) => Value::new(None, ValueKind::Table(lowercase_keys(inner))),
            _ => value,
        };
        let mut single = Map::new();
        single.insert(key.to_lowercase(), value);
        merge_into(&mut out, single);
    }
    out
}

/// Deep-merge `overlay` into `base`; tables merge key by key, anything else
/// in `overlay` replaces what `base` had.
fn merge_into(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        if let ValueKind::Table(incoming) = value.kind {
            if let Some(Value {
                kind: ValueKind::Table(existing),
                ..
            }) = base.get_mut(&key)
            {
                merge_into(existing, incoming);
                continue;
            }
            base.insert(key, Value::new(None, ValueKind::Table(incoming)));
        } else {
            base.insert(key, value);
        }
    }
}
