//! Effective configuration with provenance
//!
//! Records the merged settings plus the files that contributed to them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::merge::{MergeOptions, PassThroughPlacement};

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "reqfuse.toml";

/// User config file, relative to `$HOME`.
pub const USER_CONFIG_FILE: &str = ".config/reqfuse/config.toml";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    User,
    Project,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// `[merge]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSection {
    pub keep_order: bool,
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub pass_through: PassThroughPlacement,
    pub trailing_newline: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            pass_through: PassThroughPlacement::Bottom,
            trailing_newline: true,
        }
    }
}

/// Typed settings after all layers are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuseConfig {
    pub merge: MergeSection,
    pub output: OutputSection,
}

impl FuseConfig {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            order_preserving: self.merge.keep_order,
            pass_through: self.output.pass_through,
        }
    }
}

/// Settings given on the command line. Unset flags leave lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub keep_order: bool,
    pub pass_through: Option<PassThroughPlacement>,
    pub no_trailing_newline: bool,
}

impl CliOverrides {
    /// Convert to a config layer; unset values become `null`.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "merge": {
                "keep_order": self.keep_order.then_some(true)
            },
            "output": {
                "pass_through": self.pass_through.map(|p| p.as_str()),
                "trailing_newline": self.no_trailing_newline.then_some(false)
            }
        })
    }
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub config: FuseConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build from layers. Missing files are skipped.
    pub fn build(
        user_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (ConfigOrigin::User, user_config_path),
            (ConfigOrigin::Project, project_config_path),
        ] {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }
            let (value, digest) = load_toml_file(path)?;
            debug!(path = %path.display(), ?origin, "Loaded config layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let config: FuseConfig =
            serde_json::from_value(merged).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self { config, sources })
    }

    /// Locate config files and build.
    ///
    /// An explicit path replaces `./reqfuse.toml` and must exist.
    pub fn discover(explicit: Option<&Path>, cli_overrides: Option<Value>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let user = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(USER_CONFIG_FILE));
        let project = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

        Self::build(user.as_deref(), Some(&project), cli_overrides)
    }
}

/// Load and parse a TOML file, returning the value and SHA-256 digest
fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let digest = hex::encode(Sha256::digest(&bytes));

    let contents = String::from_utf8(bytes).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("invalid UTF-8: {}", e),
    })?;

    let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok((toml_to_json(toml_value), digest))
}

fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read config file '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("cannot parse config file '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
