// src/workspace.rs
//! The shared working tree and the scoped trial discipline around it.
//!
//! Every candidate is measured inside a [`Trial`]: the tree must be clean
//! before the style is applied, and it is reverted when the trial ends,
//! whether the measurement succeeded or not.

use crate::diff::{DiffStrategy, Score};
use crate::error::{Result, StyleFitError};
use crate::formatter::Formatter;
use crate::style::{DocumentedStyle, Style};
use crate::vcs::Repository;
use std::fs;
use std::path::PathBuf;

/// Name of the style file clang-format looks for.
pub const STYLE_FILE: &str = ".clang-format";

pub struct Workspace<R, F> {
    repo: R,
    formatter: F,
    files: Vec<PathBuf>,
}

impl<R: Repository, F: Formatter> Workspace<R, F> {
    #[must_use]
    pub fn new(repo: R, formatter: F, files: Vec<PathBuf>) -> Self {
        Self {
            repo,
            formatter,
            files,
        }
    }

    #[must_use]
    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Fails unless the tree has no changes to tracked files.
    ///
    /// # Errors
    /// Returns `Precondition` if the tree is dirty.
    pub fn ensure_clean(&self) -> Result<()> {
        if self.repo.is_clean()? {
            return Ok(());
        }
        Err(StyleFitError::Precondition(
            "git repo is not clean; please make sure you have checked in your changes, \
             or create a temporary copy to play in."
                .to_string(),
        ))
    }

    /// Applies `style` to the tree. The returned guard reverts on release
    /// or drop.
    ///
    /// # Errors
    /// Returns `Precondition` if the tree is dirty beforehand, or the
    /// formatter's error (after reverting) if reformatting fails.
    pub fn trial(&self, style: &Style) -> Result<Trial<'_, R, F>> {
        self.ensure_clean()?;
        let inline = style.to_inline()?;
        let trial = Trial {
            workspace: self,
            released: false,
        };
        self.formatter
            .reformat(self.repo.root(), &inline, &self.files)?;
        Ok(trial)
    }

    /// Writes the style file at the repository root and reformats the
    /// files with it, leaving the result uncommitted for review.
    ///
    /// # Errors
    /// Returns `Precondition` if the tree is dirty, `Io` if the file cannot
    /// be written, or the formatter's error.
    pub fn apply_final(&self, style: &DocumentedStyle) -> Result<PathBuf> {
        self.ensure_clean()?;
        let path = self.repo.root().join(STYLE_FILE);
        fs::write(&path, style.to_yaml()?).map_err(|source| StyleFitError::Io {
            source,
            path: path.clone(),
        })?;
        self.formatter
            .reformat(self.repo.root(), &style.style().to_inline()?, &self.files)?;
        Ok(path)
    }
}

/// A style applied to the working tree for one measurement.
pub struct Trial<'a, R: Repository, F: Formatter> {
    workspace: &'a Workspace<R, F>,
    released: bool,
}

impl<R: Repository, F: Formatter> Trial<'_, R, F> {
    /// Scores the current diff.
    ///
    /// # Errors
    /// Returns the repository's diff or parse error.
    pub fn measure(&self, strategy: DiffStrategy, ignore_whitespace: bool) -> Result<Score> {
        let report = self
            .workspace
            .repo
            .diff(strategy.kind(), ignore_whitespace)?;
        Ok(strategy.score(&report))
    }

    /// Reverts the tree, reporting failure to the caller.
    ///
    /// # Errors
    /// Returns the repository's revert error.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.workspace.repo.revert()
    }
}

impl<R: Repository, F: Formatter> Drop for Trial<'_, R, F> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.workspace.repo.revert() {
            tracing::warn!(error = %e, "failed to revert working tree after trial");
        }
    }
}
