use errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Options controlling how templates compile
///
/// ```toml
/// strict_delimiters = true
/// indent_width = 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Reject an opening delimiter with no matching close instead of
    /// treating it as text
    pub strict_delimiters: bool,
    /// Columns per level in the program listing
    pub indent_width: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict_delimiters: false,
            indent_width: 4,
        }
    }
}

impl CompileOptions {
    /// Parse options from a TOML document; missing keys keep their defaults
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::InvalidOptions {
            message: e.message().to_string(),
        })
    }
}
