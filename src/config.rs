//! Configuration Module
//!
//! Handles loading the cache configuration from environment variables or JSON.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};

// == Engine Kind ==
/// Which engine `Cache::from_config` builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EngineKind {
    /// Insertion-ordered list of entries
    #[default]
    List,
    /// Pass-through engine that never stores anything
    Null,
}

impl EngineKind {
    /// Name of the concrete engine type this kind builds.
    pub fn engine_name(&self) -> &'static str {
        match self {
            EngineKind::List => "ListCache",
            EngineKind::Null => "NullCache",
        }
    }
}

impl FromStr for EngineKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" | "default" => Ok(EngineKind::List),
            "null" | "none" | "disabled" => Ok(EngineKind::Null),
            "base" | "abstract" => Err(CacheError::InstantiationOfAbstract(
                "CacheEngine".to_string(),
            )),
            _ => Err(CacheError::NotImplemented {
                operation: "new",
                engine: s.trim().to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EngineKind {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::List => f.write_str("list"),
            EngineKind::Null => f.write_str("null"),
        }
    }
}

// == Cache Config ==
/// Read-only cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL in milliseconds for operations without an explicit one; 0 = never expires
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration: u64,
    /// Engine built by the factory
    #[serde(default)]
    pub engine: EngineKind,
}

impl CacheConfig {
    /// Creates a list-engine config with the given default TTL in milliseconds.
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            engine: EngineKind::List,
        }
    }

    /// Returns the same config targeting another engine.
    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Loads the config from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DURATION` - Default TTL in milliseconds (default: 0, invalid values become 0)
    /// - `CACHE_ENGINE` - `list` or `null` (default: list)
    pub fn from_env() -> Result<Self> {
        let duration = env::var("CACHE_DURATION")
            .map(|v| normalize_duration(&Value::String(v)))
            .unwrap_or(0);

        let engine = match env::var("CACHE_ENGINE") {
            Ok(name) => name.parse()?,
            Err(_) => EngineKind::default(),
        };

        Ok(Self { duration, engine })
    }

    /// Parses the config from a JSON object such as `{"duration": 5000}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CacheError::InvalidConfig(e.to_string()))
    }
}

// == Duration Normalization ==
/// Turns a loosely typed duration into milliseconds.
///
/// Non-negative integers and numeric strings are kept (fractions truncate);
/// anything else, negatives included, becomes 0.
pub fn normalize_duration(raw: &Value) -> u64 {
    match raw {
        Value::Number(n) => n
            .as_u64()
            .unwrap_or_else(|| n.as_f64().map(truncate_non_negative).unwrap_or(0)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(truncate_non_negative))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn truncate_non_negative(v: f64) -> u64 {
    if v.is_finite() && v >= 0.0 {
        v.trunc() as u64
    } else {
        0
    }
}

fn lenient_duration<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize_duration(&raw))
}
