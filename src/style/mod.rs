// src/style/mod.rs
//! Style model: a base preset plus key/value overrides.
//!
//! Styles are immutable once built. Every search step derives a new style
//! from the accepted one, so a `Style` can be shared freely between the
//! tracker, the score cache and the reporter.

pub mod catalog;

use crate::error::{Result, StyleFitError};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The clang-format key naming the base preset.
pub const BASE_KEY: &str = "BasedOnStyle";

/// Named preset bundles that clang-format ships with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
pub enum BaseStyle {
    #[value(name = "LLVM")]
    #[serde(rename = "LLVM")]
    Llvm,
    #[value(name = "Google")]
    Google,
    #[value(name = "Chromium")]
    Chromium,
    #[value(name = "Mozilla")]
    Mozilla,
    #[value(name = "WebKit")]
    WebKit,
}

impl BaseStyle {
    pub const ALL: [BaseStyle; 5] = [
        BaseStyle::Llvm,
        BaseStyle::Google,
        BaseStyle::Chromium,
        BaseStyle::Mozilla,
        BaseStyle::WebKit,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Llvm => "LLVM",
            Self::Google => "Google",
            Self::Chromium => "Chromium",
            Self::Mozilla => "Mozilla",
            Self::WebKit => "WebKit",
        }
    }
}

impl fmt::Display for BaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseStyle {
    type Err = StyleFitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StyleFitError::Config(format!("unknown base style {s:?}")))
    }
}

/// A small set of option-key to value assignments.
///
/// Used both as a search candidate (usually one key, sometimes two coupled
/// keys) and as the full option mapping of a [`Style`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(BTreeMap<String, Value>);

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Overrides::insert`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The base preset named by this set, if any.
    #[must_use]
    pub fn base(&self) -> Option<BaseStyle> {
        self.get(BASE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Returns `self` with `other` superimposed key-by-key.
    #[must_use]
    pub fn merge(&self, other: &Overrides) -> Overrides {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Overrides(merged)
    }

    /// Parses a user-supplied YAML mapping such as `{IndentWidth: 4}`.
    ///
    /// # Errors
    /// Returns `Config` if the text is not a mapping of string keys or names
    /// an unknown base style.
    pub fn parse_yaml(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        let Value::Mapping(map) = value else {
            return Err(StyleFitError::Config(format!(
                "expected a YAML mapping of style options, got {text:?}"
            )));
        };

        let mut out = Overrides::new();
        for (k, v) in map {
            let Value::String(key) = k else {
                return Err(StyleFitError::Config(format!(
                    "style option keys must be strings, got {k:?}"
                )));
            };
            out.insert(&key, v);
        }

        if let Some(raw) = out.get(BASE_KEY) {
            let base: BaseStyle = raw.as_str().unwrap_or_default().parse()?;
            out.insert(BASE_KEY, base.as_str());
        }
        Ok(out)
    }

    /// Short human-readable form, e.g. `UseTab: Always, TabWidth: 8`.
    ///
    /// `BasedOnStyle` comes first and coupled keys keep their catalog
    /// order otherwise alphabetical.
    #[must_use]
    pub fn label(&self) -> String {
        ordered_entries(self)
            .map(|(k, v)| format!("{k}: {}", value_label(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(String, Value)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Overrides(iter.into_iter().collect())
    }
}

fn ordered_entries(o: &Overrides) -> impl Iterator<Item = (&str, &Value)> {
    let base = o.get(BASE_KEY).map(|v| (BASE_KEY, v));
    base.into_iter()
        .chain(o.iter().filter(|(k, _)| *k != BASE_KEY))
}

fn value_label(v: &Value) -> String {
    match v {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn to_mapping(o: &Overrides) -> Mapping {
    let mut map = Mapping::new();
    for (k, v) in ordered_entries(o) {
        map.insert(Value::String(k.to_string()), v.clone());
    }
    map
}

/// A clang-format style: an optional base preset plus option overrides.
///
/// A style with no base yet ("fresh") lets clang-format fall back to its
/// built-in default, which is LLVM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    base: Option<BaseStyle>,
    options: Overrides,
}

impl Style {
    /// A style with no base and no overrides.
    #[must_use]
    pub fn fresh() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn based_on(base: BaseStyle) -> Self {
        Self {
            base: Some(base),
            options: Overrides::new().with(BASE_KEY, base.as_str()),
        }
    }

    /// Builds a style from a complete option mapping, e.g. the output of
    /// `clang-format -dump-config`.
    #[must_use]
    pub fn from_options(options: Overrides) -> Self {
        Self::fresh().derive(&options)
    }

    /// Returns a new style with `overrides` applied on top of this one.
    #[must_use]
    pub fn derive(&self, overrides: &Overrides) -> Style {
        Style {
            base: overrides.base().or(self.base),
            options: self.options.merge(overrides),
        }
    }

    #[must_use]
    pub fn base(&self) -> Option<BaseStyle> {
        self.base
    }

    /// The base clang-format will actually use.
    #[must_use]
    pub fn effective_base(&self) -> BaseStyle {
        self.base.unwrap_or(BaseStyle::Llvm)
    }

    #[must_use]
    pub fn options(&self) -> &Overrides {
        &self.options
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Canonical YAML document: `BasedOnStyle` first, other keys sorted.
    ///
    /// # Errors
    /// Returns an error if a value cannot be represented as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&to_mapping(&self.options))?)
    }

    /// Single-line form accepted by `clang-format -style=...`.
    ///
    /// # Errors
    /// Returns `Config` if a value has no JSON representation.
    pub fn to_inline(&self) -> Result<String> {
        serde_json::to_string(&to_mapping(&self.options))
            .map_err(|e| StyleFitError::Config(format!("cannot encode style: {e}")))
    }

    /// Pairs this style with the full defaults of its base so the written
    /// file also documents the options left unset.
    #[must_use]
    pub fn with_defaults(&self, defaults: &Style) -> DocumentedStyle {
        DocumentedStyle {
            style: self.clone(),
            defaults: defaults.clone(),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.base.map_or("default", BaseStyle::as_str);
        let rest: Overrides = self
            .options
            .iter()
            .filter(|(k, _)| *k != BASE_KEY)
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        if rest.is_empty() {
            write!(f, "{base}")
        } else {
            write!(f, "{base} {{{}}}", rest.label())
        }
    }
}

/// A style plus the defaults of its base, rendered as a `.clang-format`
/// file with the unset options listed as comments.
#[derive(Debug, Clone)]
pub struct DocumentedStyle {
    style: Style,
    defaults: Style,
}

impl DocumentedStyle {
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// # Errors
    /// Returns an error if either style cannot be rendered as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let mut out = self.style.to_yaml()?;

        let hidden: Overrides = self
            .defaults
            .options()
            .iter()
            .filter(|(k, _)| !self.style.options().contains_key(k) && *k != BASE_KEY)
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        if hidden.is_empty() {
            return Ok(out);
        }

        out.push_str("## Other available options and their default values:\n");
        for line in serde_yaml::to_string(&to_mapping(&hidden))?.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}
