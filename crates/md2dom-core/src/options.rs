//! Parser options
//!
//! An open, string-keyed option map. Defaults are an explicit value and
//! caller options are merged over them without mutating either side.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Enables CommonMark-compliant parsing
pub const COMMONMARK: &str = "commonmark";
/// Enables GitHub Flavored Markdown constructs
pub const GFM: &str = "gfm";
/// Enables `$`/`$$` math constructs
pub const MATH: &str = "math";
/// Enables YAML and TOML frontmatter
pub const FRONTMATTER: &str = "frontmatter";

/// Options passed to the Markdown parser
///
/// Keys other than the recognized ones are kept and passed through to the
/// parser untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParserOptions(Map<String, Value>);

impl Default for ParserOptions {
    /// `{ "commonmark": true }`
    fn default() -> Self {
        Self::empty().with(COMMONMARK, true)
    }
}

impl ParserOptions {
    /// Options with no keys set
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Set a key, returning the updated options
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Boolean value of a key; `None` if unset or not a boolean
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: every key of `overrides` replaces the key in `self`
    pub fn merged(&self, overrides: &ParserOptions) -> ParserOptions {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        ParserOptions(merged)
    }

    /// Translate into options for the `markdown` crate.
    ///
    /// markdown-rs parses CommonMark by default and has no looser mode, so
    /// `commonmark` only documents intent here. Unrecognized keys are
    /// ignored.
    pub fn to_markdown_options(&self) -> markdown::ParseOptions {
        let mut options = if self.flag(GFM) == Some(true) {
            markdown::ParseOptions::gfm()
        } else {
            markdown::ParseOptions::default()
        };
        if self.flag(MATH) == Some(true) {
            options.constructs.math_flow = true;
            options.constructs.math_text = true;
        }
        if self.flag(FRONTMATTER) == Some(true) {
            options.constructs.frontmatter = true;
        }
        options
    }
}

impl From<Map<String, Value>> for ParserOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParserOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.flag(COMMONMARK), Some(true));
        assert_eq!(options.iter().count(), 1);
    }

    #[test]
    fn test_merge_overrides_key_by_key() {
        let defaults = ParserOptions::default();
        let caller = ParserOptions::empty()
            .with(COMMONMARK, false)
            .with(GFM, true);

        let merged = defaults.merged(&caller);
        assert_eq!(merged.flag(COMMONMARK), Some(false));
        assert_eq!(merged.flag(GFM), Some(true));

        // Neither input is touched
        assert_eq!(defaults.flag(COMMONMARK), Some(true));
        assert_eq!(caller.get(COMMONMARK), Some(&json!(false)));
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = ParserOptions::empty().with("nested", json!({"a": 1, "b": 2}));
        let overrides = ParserOptions::empty().with("nested", json!({"a": 3}));

        let merged = base.merged(&overrides);
        assert_eq!(merged.get("nested"), Some(&json!({"a": 3})));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let merged = ParserOptions::default().merged(&ParserOptions::empty().with("pedantic", true));
        assert_eq!(merged.flag("pedantic"), Some(true));
        assert_eq!(merged.flag(COMMONMARK), Some(true));
    }

    #[test]
    fn test_flag_ignores_non_booleans() {
        let options = ParserOptions::empty().with(GFM, "yes");
        assert_eq!(options.flag(GFM), None);
        assert!(options.get(GFM).is_some());
    }

    #[test]
    fn test_markdown_options() {
        let plain = ParserOptions::default().to_markdown_options();
        assert!(!plain.constructs.gfm_table);
        assert!(!plain.constructs.math_flow);

        let gfm = ParserOptions::empty().with(GFM, true).to_markdown_options();
        assert!(gfm.constructs.gfm_table);
        assert!(gfm.constructs.gfm_strikethrough);

        let extras: ParserOptions = [(MATH, true), (FRONTMATTER, true)].into_iter().collect();
        let extras = extras.to_markdown_options();
        assert!(extras.constructs.math_flow);
        assert!(extras.constructs.math_text);
        assert!(extras.constructs.frontmatter);
    }

    #[test]
    fn test_serde_transparent() {
        let options: ParserOptions = serde_json::from_str(r#"{"gfm": true}"#).unwrap();
        assert_eq!(options.flag(GFM), Some(true));
        assert_eq!(serde_json::to_value(&options).unwrap(), json!({"gfm": true}));
    }
}
