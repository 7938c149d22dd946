//! Configuration file support for md2dom CLI
//!
//! Loads settings from `_md2dom.toml` configuration file.

use anyhow::{Context, Result};
use md2dom_core::ParserOptions;
use md2dom_core::options::{COMMONMARK, FRONTMATTER, GFM, MATH};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_md2dom.toml";

/// Default extension for output files
pub const DEFAULT_EXTENSION: &str = "json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Markdown parser configuration
    #[serde(skip_serializing_if = "ParserConfig::is_empty")]
    pub parser: ParserConfig,
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
}

/// Markdown parser configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ParserConfig {
    /// Enable CommonMark-compliant parsing (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commonmark: Option<bool>,
    /// Enable GitHub Flavored Markdown: tables, strikethrough, autolinks, task lists, footnotes (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gfm: Option<bool>,
    /// Enable $inline$ and $$block$$ math (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math: Option<bool>,
    /// Enable YAML/TOML frontmatter (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<bool>,
    /// Additional options passed to the parser unchanged
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ParserConfig {
    fn is_empty(&self) -> bool {
        self.commonmark.is_none()
            && self.gfm.is_none()
            && self.math.is_none()
            && self.frontmatter.is_none()
            && self.extra.is_empty()
    }

    /// Options set in this section, without defaults applied
    pub fn to_options(&self) -> ParserOptions {
        let mut options: ParserOptions = self
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let flags = [
            (COMMONMARK, self.commonmark),
            (GFM, self.gfm),
            (MATH, self.math),
            (FRONTMATTER, self.frontmatter),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                options = options.with(key, value);
            }
        }
        options
    }
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print the JSON output (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
    /// Extension for files written in directory mode (default: "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.pretty.is_none() && self.extension.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_md2dom.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Create a sample configuration with common defaults for `--init`
    pub fn sample() -> Self {
        Config {
            parser: ParserConfig {
                commonmark: Some(true),
                gfm: Some(false),
                math: Some(false),
                frontmatter: Some(false),
                extra: BTreeMap::new(),
            },
            output: OutputConfig {
                pretty: Some(true),
                extension: Some(DEFAULT_EXTENSION.to_string()),
            },
        }
    }

    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(true)
    }

    pub fn extension(&self) -> &str {
        self.output.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.parser.gfm.is_none());
        assert!(config.output.pretty.is_none());
        assert!(config.pretty());
        assert_eq!(config.extension(), "json");
    }

    #[test]
    fn test_parse_parser_section() {
        let config: Config = toml::from_str(
            r#"
            [parser]
            commonmark = false
            gfm = true
            math = true
            frontmatter = true
            "#,
        )
        .unwrap();

        assert_eq!(config.parser.commonmark, Some(false));
        assert_eq!(config.parser.gfm, Some(true));
        assert_eq!(config.parser.math, Some(true));
        assert_eq!(config.parser.frontmatter, Some(true));
        assert!(config.parser.extra.is_empty());
    }

    #[test]
    fn test_parser_extra_keys() {
        let config: Config = toml::from_str(
            r#"
            [parser]
            gfm = true
            footnote_prefix = "fn-"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.parser.extra.get("footnote_prefix"),
            Some(&serde_json::json!("fn-"))
        );

        let options = config.parser.to_options();
        assert_eq!(options.flag(GFM), Some(true));
        assert_eq!(options.get("footnote_prefix"), Some(&serde_json::json!("fn-")));
        assert!(options.get(COMMONMARK).is_none());
    }

    #[test]
    fn test_parse_output_section() {
        let config: Config = toml::from_str(
            r#"
            [output]
            pretty = false
            extension = "dom.json"
            "#,
        )
        .unwrap();

        assert!(!config.pretty());
        assert_eq!(config.extension(), "dom.json");
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [output]
            pretty = false
            "#,
        )
        .unwrap();

        assert_eq!(config.output.pretty, Some(false));
        // Other sections should be default
        assert!(config.parser.commonmark.is_none());
        assert!(config.parser.to_options().is_empty());
    }

    #[test]
    fn test_serialize_empty_config() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        // Empty config should have minimal content
        assert!(!toml.contains("[parser]"));
        assert!(!toml.contains("[output]"));
    }

    #[test]
    fn test_serialize_sample_config() {
        let toml = Config::sample().to_toml().unwrap();
        assert!(toml.contains("[parser]"));
        assert!(toml.contains("commonmark = true"));
        assert!(toml.contains("extension = \"json\""));
    }

    #[test]
    fn test_json_schema_generation() {
        let schema = Config::json_schema_string().unwrap();
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("ParserConfig"));
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::sample();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.parser.gfm, parsed.parser.gfm);
        assert_eq!(config.output.extension, parsed.output.extension);
    }
}
