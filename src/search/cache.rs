// src/search/cache.rs
//! Score memoization keyed by a style's canonical form.

use crate::diff::Score;
use crate::error::Result;
use crate::formatter::Formatter;
use crate::style::{BaseStyle, Overrides, Style, BASE_KEY};
use crate::utils::compute_sha256;
use serde::Serialize;
use std::collections::HashMap;

/// Reduces a style to a string that is equal for equal effective styles.
#[derive(Debug, Default)]
pub struct StyleCanonicalizer {
    expand: bool,
    defaults: HashMap<BaseStyle, Overrides>,
}

impl StyleCanonicalizer {
    /// Canonical form is the style's own YAML.
    #[must_use]
    pub fn literal() -> Self {
        Self::default()
    }

    /// Canonical form drops every option equal to its base's default, so
    /// spelling out a default is the same style as leaving it unset.
    #[must_use]
    pub fn expanded() -> Self {
        Self {
            expand: true,
            defaults: HashMap::new(),
        }
    }

    /// Full defaults for `base`, fetched once per run.
    ///
    /// # Errors
    /// Returns the formatter's error.
    pub fn defaults_for<F: Formatter + ?Sized>(
        &mut self,
        base: BaseStyle,
        formatter: &F,
    ) -> Result<&Overrides> {
        if !self.defaults.contains_key(&base) {
            let dumped = formatter.dump_config(base)?;
            tracing::debug!(%base, keys = dumped.len(), "loaded base defaults");
            self.defaults.insert(base, dumped);
        }
        Ok(&self.defaults[&base])
    }

    /// # Errors
    /// Returns the formatter's error when defaults must be loaded, or a YAML
    /// error.
    pub fn canonical_form<F: Formatter + ?Sized>(
        &mut self,
        style: &Style,
        formatter: &F,
    ) -> Result<String> {
        if !self.expand {
            return style.to_yaml();
        }

        let base = style.effective_base();
        let defaults = self.defaults_for(base, formatter)?;
        let differing: Overrides = style
            .options()
            .iter()
            .filter(|(k, v)| *k != BASE_KEY && defaults.get(k) != Some(*v))
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        Style::based_on(base).derive(&differing).to_yaml()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Scores seen during one search run.
#[derive(Debug, Default)]
pub struct ScoreCache {
    canonicalizer: StyleCanonicalizer,
    scores: HashMap<String, Score>,
    hits: usize,
    misses: usize,
}

impl ScoreCache {
    #[must_use]
    pub fn new(canonicalizer: StyleCanonicalizer) -> Self {
        Self {
            canonicalizer,
            ..Self::default()
        }
    }

    /// Cache key for `style`: a digest of its canonical form.
    ///
    /// # Errors
    /// Returns the canonicalizer's error.
    pub fn key_for<F: Formatter + ?Sized>(&mut self, style: &Style, formatter: &F) -> Result<String> {
        let canonical = self.canonicalizer.canonical_form(style, formatter)?;
        Ok(compute_sha256(&canonical))
    }

    pub fn get(&mut self, key: &str) -> Option<Score> {
        let found = self.scores.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn insert(&mut self, key: String, score: Score) {
        self.scores.insert(key, score);
    }

    #[must_use]
    pub fn canonicalizer(&mut self) -> &mut StyleCanonicalizer {
        &mut self.canonicalizer
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.scores.len(),
        }
    }
}
