//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

use crate::merge::PassThroughPlacement;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Keep first-seen entry order instead of sorting (default: false)
    pub keep_order: bool,

    /// Pass-through placement (default: bottom)
    pub pass_through: PassThroughPlacement,

    /// End written output with a newline (default: true)
    pub trailing_newline: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            keep_order: false,
            pass_through: PassThroughPlacement::Bottom,
            trailing_newline: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "merge": {
                "keep_order": self.keep_order
            },
            "output": {
                "pass_through": self.pass_through.as_str(),
                "trailing_newline": self.trailing_newline
            }
        })
    }
}
