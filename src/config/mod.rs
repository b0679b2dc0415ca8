// src/config/mod.rs
pub mod types;

pub use self::types::{Config, StyleFitToml, DEFAULT_EXTENSIONS};

use crate::error::{Result, StyleFitError};
use crate::style::{Overrides, Style, BASE_KEY};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional project settings file at the repository root.
pub const CONFIG_FILE: &str = "stylefit.toml";

impl Config {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Creates a config for `root` and layers `stylefit.toml` on top if the
    /// file exists.
    ///
    /// # Errors
    /// Returns `Io` if the file exists but cannot be read, or `Config` if it
    /// does not parse.
    pub fn load(root: PathBuf) -> Result<Self> {
        let mut config = Self::new(root);
        config.load_local_config()?;
        Ok(config)
    }

    /// # Errors
    /// See [`Config::load`].
    pub fn load_local_config(&mut self) -> Result<()> {
        let path = self.root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(());
        }
        let content = fs::read_to_string(&path).map_err(|source| StyleFitError::Io {
            source,
            path: path.clone(),
        })?;
        tracing::debug!(path = %path.display(), "loading settings");
        self.apply_toml(parse_toml(&content, &path)?);
        Ok(())
    }

    pub fn apply_toml(&mut self, file: StyleFitToml) {
        if let Some(exts) = file.extensions {
            self.extensions = exts;
        }
        self.include.extend(file.include);
        self.exclude.extend(file.exclude);
        self.skip_options.extend(file.skip_options);
        if let Some(strategy) = file.diff_score {
            self.strategy = strategy;
        }
        if file.clang_format.is_some() {
            self.clang_format = file.clang_format;
        }
        if let Some(ignore) = file.ignore_whitespace {
            self.ignore_whitespace = ignore;
        }
        if file.randomly_limit.is_some() {
            self.randomly_limit = file.randomly_limit;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
    }

    /// Checks values that cannot be expressed in the types alone.
    ///
    /// # Errors
    /// Returns `Config` for an empty extension list or a zero random limit.
    pub fn validate(&self) -> Result<()> {
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(StyleFitError::Config(
                "at least one file extension is required".to_string(),
            ));
        }
        if self.randomly_limit == Some(0) {
            return Err(StyleFitError::Config(
                "--randomly-limit should be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    /// The style the search starts from, built from `--force-style` and
    /// `--style-base`. `None` means start fresh.
    #[must_use]
    pub fn initial_style(&self) -> Option<Style> {
        let overrides = self.initial_overrides();
        (!overrides.is_empty()).then(|| Style::from_options(overrides))
    }

    /// Keys the search must not touch: everything pinned by the initial
    /// style plus the explicit skip list.
    #[must_use]
    pub fn skipped_keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self
            .initial_overrides()
            .keys()
            .map(ToString::to_string)
            .collect();
        keys.extend(self.skip_options.iter().cloned());
        keys
    }

    fn initial_overrides(&self) -> Overrides {
        let mut overrides = self.force_style.clone().unwrap_or_default();
        if let Some(base) = self.style_base {
            overrides.insert(BASE_KEY, base.as_str());
        }
        overrides
    }
}

/// Parses the contents of a `stylefit.toml`.
///
/// # Errors
/// Returns `Config` naming the file if the TOML is invalid.
pub fn parse_toml(content: &str, path: &Path) -> Result<StyleFitToml> {
    toml::from_str(content)
        .map_err(|e| StyleFitError::Config(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffStrategy;
    use crate::style::BaseStyle;

    #[test]
    fn test_defaults() {
        let c = Config::new(PathBuf::from("/repo"));
        assert_eq!(c.extensions, DEFAULT_EXTENSIONS);
        assert_eq!(c.strategy, DiffStrategy::WordsLog);
        assert!(c.ignore_whitespace);
        assert!(c.initial_style().is_none());
        assert!(c.skipped_keys().is_empty());
    }

    #[test]
    fn test_toml_overrides_defaults() -> Result<()> {
        let file = parse_toml(
            r#"
extensions = ["c", "h"]
exclude = ["third_party/"]
diff_score = "hybrid-log"
ignore_whitespace = false
randomly_limit = 20
"#,
            Path::new(CONFIG_FILE),
        )?;
        let mut c = Config::default();
        c.apply_toml(file);

        assert_eq!(c.extensions, ["c", "h"]);
        assert_eq!(c.exclude, ["third_party/"]);
        assert_eq!(c.strategy, DiffStrategy::HybridLog);
        assert!(!c.ignore_whitespace);
        assert_eq!(c.randomly_limit, Some(20));
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse_toml("colour = true", Path::new(CONFIG_FILE));
        assert!(matches!(err, Err(StyleFitError::Config(_))));
    }

    #[test]
    fn test_pinned_keys_are_skipped() -> Result<()> {
        let mut c = Config::default();
        c.force_style = Some(Overrides::parse_yaml("{IndentWidth: 3}")?);
        c.style_base = Some(BaseStyle::Mozilla);
        c.skip_options.insert("ColumnLimit".to_string());

        let style = c.initial_style();
        assert_eq!(style.as_ref().and_then(Style::base), Some(BaseStyle::Mozilla));

        let skipped: Vec<_> = c.skipped_keys().into_iter().collect();
        assert_eq!(skipped, [BASE_KEY, "ColumnLimit", "IndentWidth"]);
        Ok(())
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let c = Config {
            randomly_limit: Some(0),
            ..Config::default()
        };
        assert!(c.validate().is_err());
    }
}
