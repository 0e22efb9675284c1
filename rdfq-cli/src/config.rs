//! Optional TOML defaults
//!
//! ```toml
//! shape = "select"
//! union_form = true
//! system_id = "http://example.org/app/"
//!
//! [prefixes]
//! foaf = "http://xmlns.com/foaf/0.1/"
//! ```
//!
//! Command-line flags override the file.

use crate::error::{CliError, CliResult};
use rdfq_template::{CompilerConfig, QueryShape};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub shape: Option<QueryShape>,
    pub union_form: Option<bool>,
    pub system_id: Option<String>,
    /// Namespaces declared for every template; the template's own
    /// declarations take precedence
    pub prefixes: BTreeMap<String, String>,
}

impl FileConfig {
    /// Compiler settings with command-line overrides applied
    pub fn compiler(&self, shape: Option<QueryShape>, no_union: bool) -> CompilerConfig {
        let defaults = CompilerConfig::default();
        CompilerConfig {
            shape: shape.or(self.shape).unwrap_or(defaults.shape),
            union_form: !no_union && self.union_form.unwrap_or(defaults.union_form),
        }
    }
}

/// Load the config file, or defaults when none was given.
pub fn load(path: Option<&Path>) -> CliResult<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("failed to read {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_file() {
        let config: FileConfig = toml::from_str(
            "shape = \"ask\"\nunion_form = true\n[prefixes]\nfoaf = \"http://xmlns.com/foaf/0.1/\"\n",
        )
        .unwrap();
        assert_eq!(config.prefixes.len(), 1);
        assert_eq!(config.compiler(None, false).shape, QueryShape::Ask);

        let overridden = config.compiler(Some(QueryShape::Construct), true);
        assert_eq!(overridden.shape, QueryShape::Construct);
        assert!(!overridden.union_form);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<FileConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn test_missing_file_defaults() {
        assert_eq!(load(None).unwrap(), FileConfig::default());
    }
}
