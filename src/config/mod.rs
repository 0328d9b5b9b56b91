//! Configuration merge system
//!
//! Settings are merged from four layers, later layers winning:
//! 1. Built-in defaults
//! 2. User config (~/.config/reqfuse/config.toml)
//! 3. Project config (./reqfuse.toml, or the file given with --config)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    CliOverrides, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, FuseConfig,
    MergeSection, OutputSection, PROJECT_CONFIG_FILE, USER_CONFIG_FILE,
};
pub use merge::{deep_merge, merge_layers};
