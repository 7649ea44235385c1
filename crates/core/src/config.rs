use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_OUTPUT: &str = "text";
pub const ENV_CAPACITY: &str = "CIRCBUF_CAPACITY";
pub const ENV_OUTPUT: &str = "CIRCBUF_OUTPUT";

/// Capacity of the demo buffers. Always non-zero.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capacity(usize);

impl Capacity {
    pub fn new(value: usize) -> Result<Self, ConfigError> {
        if value == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(DEFAULT_CAPACITY)
    }
}

impl FromStr for Capacity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidCapacity {
                value: s.to_owned(),
            })?;
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownOutputFormat {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoConfig {
    pub capacity: Capacity,
    pub output: OutputFormat,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("capacity must be > 0")]
    ZeroCapacity,
    #[error("invalid capacity: {value:?}")]
    InvalidCapacity { value: String },
    #[error("unknown output format {value:?} (expected \"text\" or \"json\")")]
    UnknownOutputFormat { value: String },
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// CLI value first, then `CIRCBUF_CAPACITY`, then [`DEFAULT_CAPACITY`].
pub fn resolve_capacity(cli_value: Option<usize>, env: &impl Env) -> Result<Capacity, ConfigError> {
    match cli_value {
        Some(v) => Capacity::new(v),
        None => match env.var(ENV_CAPACITY) {
            Some(v) => v.parse(),
            None => Ok(Capacity::default()),
        },
    }
}

pub fn resolve_output(
    cli_value: Option<String>,
    env: &impl Env,
) -> Result<OutputFormat, ConfigError> {
    resolve_string_with_default(cli_value, ENV_OUTPUT, env, DEFAULT_OUTPUT).parse()
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_CAPACITY, "8");
        let cap = resolve_capacity(Some(3), &env).expect("valid capacity");
        assert_eq!(cap.get(), 3);
    }

    #[test]
    fn capacity_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_CAPACITY, " 8 ");
        let cap = resolve_capacity(None, &env).expect("valid capacity");
        assert_eq!(cap.get(), 8);
    }

    #[test]
    fn capacity_default_used_when_both_missing() {
        let cap = resolve_capacity(None, &MapEnv::default()).expect("valid capacity");
        assert_eq!(cap.get(), DEFAULT_CAPACITY);
    }

    #[test]
    fn capacity_rejects_zero_and_garbage() {
        assert_eq!(
            resolve_capacity(Some(0), &MapEnv::default()),
            Err(ConfigError::ZeroCapacity)
        );
        let env = MapEnv::default().with_var(ENV_CAPACITY, "lots");
        assert_eq!(
            resolve_capacity(None, &env),
            Err(ConfigError::InvalidCapacity {
                value: "lots".to_owned()
            })
        );
        let env = MapEnv::default().with_var(ENV_CAPACITY, "0");
        assert_eq!(resolve_capacity(None, &env), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(ConfigError::UnknownOutputFormat { .. })
        ));
    }

    #[test]
    fn output_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_OUTPUT, "json");
        assert_eq!(resolve_output(None, &env), Ok(OutputFormat::Json));
        assert_eq!(
            resolve_output(Some("text".to_owned()), &env),
            Ok(OutputFormat::Text)
        );
        assert_eq!(resolve_output(None, &MapEnv::default()), Ok(OutputFormat::Text));
    }

    #[test]
    fn demo_config_serializes_lowercase_output() {
        let cfg = DemoConfig {
            capacity: Capacity::new(4).expect("nonzero"),
            output: OutputFormat::Json,
        };
        let json = serde_json::to_string(&cfg).expect("serializable");
        assert_eq!(json, r#"{"capacity":4,"output":"json"}"#);
    }
}
