// src/search/driver.rs
//! Orchestrates the fixed sequence of search rounds over one tracker.

use super::cache::{CacheStats, ScoreCache};
use super::tracker::{CandidateTracker, Rank};
use crate::diff::{DiffStrategy, Score};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::style::catalog::{self, StyleOption, INDENT_WIDTH_KEY, USE_TAB_KEY};
use crate::style::{BaseStyle, DocumentedStyle, Overrides, Style, BASE_KEY};
use crate::vcs::Repository;
use crate::workspace::Workspace;
use serde::Serialize;
use std::collections::BTreeSet;

/// What to search and how to score it.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub bases: Vec<BaseStyle>,
    pub options: Vec<StyleOption>,
    pub skip: BTreeSet<String>,
    pub strategy: DiffStrategy,
    pub ignore_whitespace: bool,
}

impl SearchPlan {
    /// All base presets and the full catalog, nothing skipped.
    #[must_use]
    pub fn new(strategy: DiffStrategy) -> Self {
        Self {
            bases: BaseStyle::ALL.to_vec(),
            options: catalog::catalog(),
            skip: BTreeSet::new(),
            strategy,
            ignore_whitespace: true,
        }
    }

    #[must_use]
    pub fn skips(&self, key: &str) -> bool {
        self.skip.contains(key)
    }

    fn option(&self, key: &str) -> Option<&StyleOption> {
        self.options.iter().find(|o| o.name == key)
    }
}

/// Which phase a round belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    BaseStyle,
    IndentWidth,
    Tabs,
    BaseRetest,
    Sweep,
}

/// Announced when a round opens.
#[derive(Debug, Clone)]
pub struct RoundInfo {
    pub phase: Phase,
    pub title: String,
    /// 1-based position in the sweep and its length.
    pub position: Option<(usize, usize)>,
}

/// One scored candidate.
#[derive(Debug)]
pub struct CandidateEvent<'a> {
    pub label: &'a str,
    pub style: &'a Style,
    pub score: Score,
    pub rank: Rank,
    pub cached: bool,
}

/// Summary of a finished round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub phase: Phase,
    pub title: String,
    pub strict: bool,
    pub candidates: usize,
    pub changed: bool,
}

/// Receives progress as the search runs.
pub trait SearchObserver {
    fn round_started(&mut self, _round: &RoundInfo) {}
    fn round_skipped(&mut self, _round: &RoundInfo) {}
    fn candidate_scored(&mut self, _event: &CandidateEvent<'_>) {}
    fn round_finished(&mut self, _record: &RoundRecord, _tracker: &CandidateTracker) {}
}

/// Discards all progress.
pub struct NullObserver;

impl SearchObserver for NullObserver {}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    #[serde(skip)]
    pub style: Style,
    pub score: Option<Score>,
    pub rounds: Vec<RoundRecord>,
    pub cache: CacheStats,
}

/// Owns everything one search run mutates: the tracker, the score cache and
/// the working tree.
pub struct SearchDriver<R, F> {
    workspace: Workspace<R, F>,
    plan: SearchPlan,
    tracker: CandidateTracker,
    cache: ScoreCache,
}

impl<R: Repository, F: Formatter> SearchDriver<R, F> {
    #[must_use]
    pub fn new(
        workspace: Workspace<R, F>,
        plan: SearchPlan,
        tracker: CandidateTracker,
        cache: ScoreCache,
    ) -> Self {
        Self {
            workspace,
            plan,
            tracker,
            cache,
        }
    }

    #[must_use]
    pub fn workspace(&self) -> &Workspace<R, F> {
        &self.workspace
    }

    #[must_use]
    pub fn tracker(&self) -> &CandidateTracker {
        &self.tracker
    }

    /// Runs every round and returns the accepted style.
    ///
    /// # Errors
    /// Returns `Precondition` if the tree is dirty, or the first tool,
    /// parse or state error met during the search.
    pub fn run(&mut self, observer: &mut dyn SearchObserver) -> Result<SearchOutcome> {
        self.workspace.ensure_clean()?;
        tracing::info!(
            files = self.workspace.files().len(),
            strategy = %self.plan.strategy,
            "starting search"
        );

        let mut rounds = Vec::new();
        let bases = catalog::base_candidates(&self.plan.bases);

        let info = RoundInfo {
            phase: Phase::BaseStyle,
            title: "Testing base styles to see which seems to fit best.".to_string(),
            position: None,
        };
        rounds.extend(self.guarded_round(BASE_KEY, &info, &bases, false, observer)?);

        for (key, phase, title) in [
            (INDENT_WIDTH_KEY, Phase::IndentWidth, "Testing for indent width"),
            (USE_TAB_KEY, Phase::Tabs, "Testing for tabs vs spaces"),
        ] {
            let info = RoundInfo {
                phase,
                title: title.to_string(),
                position: None,
            };
            let candidates = self
                .plan
                .option(key)
                .map(|o| o.candidates.clone())
                .unwrap_or_default();
            rounds.extend(self.guarded_round(key, &info, &candidates, false, observer)?);
        }

        let info = RoundInfo {
            phase: Phase::BaseRetest,
            title: "Retesting the bases using indent and tabs".to_string(),
            position: None,
        };
        rounds.extend(self.guarded_round(BASE_KEY, &info, &bases, true, observer)?);

        let options = self.plan.options.clone();
        let total = options.len();
        for (index, option) in options.iter().enumerate() {
            let info = RoundInfo {
                phase: Phase::Sweep,
                title: option.name.clone(),
                position: Some((index + 1, total)),
            };
            rounds.extend(self.guarded_round(&option.name, &info, &option.candidates, true, observer)?);
        }

        let style = self
            .tracker
            .accepted_style()
            .cloned()
            .unwrap_or_else(Style::fresh);
        Ok(SearchOutcome {
            style,
            score: self.tracker.accepted_score(),
            rounds,
            cache: self.cache.stats(),
        })
    }

    /// Pairs `style` with the defaults of its base for the final file.
    ///
    /// # Errors
    /// Returns the formatter's error.
    pub fn documented(&mut self, style: &Style) -> Result<DocumentedStyle> {
        let base = style.effective_base();
        let defaults = self
            .cache
            .canonicalizer()
            .defaults_for(base, self.workspace.formatter())?
            .clone();
        Ok(style.with_defaults(&Style::based_on(base).derive(&defaults)))
    }

    fn guarded_round(
        &mut self,
        key: &str,
        info: &RoundInfo,
        candidates: &[Overrides],
        strict: bool,
        observer: &mut dyn SearchObserver,
    ) -> Result<Option<RoundRecord>> {
        if self.plan.skips(key) || candidates.is_empty() {
            tracing::debug!(key, "skipping round");
            observer.round_skipped(info);
            return Ok(None);
        }
        self.round(info, candidates, strict, observer).map(Some)
    }

    /// One start/push.../finish cycle.
    fn round(
        &mut self,
        info: &RoundInfo,
        candidates: &[Overrides],
        strict: bool,
        observer: &mut dyn SearchObserver,
    ) -> Result<RoundRecord> {
        observer.round_started(info);
        self.tracker.start()?;

        for overrides in candidates {
            let style = self.tracker.candidate_style(overrides);
            let (score, cached) = self.score(&style)?;
            let label = overrides.label();
            let rank = self.tracker.push_candidate(&label, style.clone(), score)?;
            observer.candidate_scored(&CandidateEvent {
                label: &label,
                style: &style,
                score,
                rank,
                cached,
            });
        }

        let changed = self.tracker.finish(strict)?;
        let record = RoundRecord {
            phase: info.phase,
            title: info.title.clone(),
            strict,
            candidates: candidates.len(),
            changed,
        };
        observer.round_finished(&record, &self.tracker);
        Ok(record)
    }

    /// Cached score for `style`, or a fresh measurement.
    fn score(&mut self, style: &Style) -> Result<(Score, bool)> {
        let key = self.cache.key_for(style, self.workspace.formatter())?;
        if let Some(score) = self.cache.get(&key) {
            tracing::trace!(%style, "cache hit");
            return Ok((score, true));
        }

        let trial = self.workspace.trial(style)?;
        let score = trial.measure(self.plan.strategy, self.plan.ignore_whitespace)?;
        trial.release()?;

        self.cache.insert(key, score);
        Ok((score, false))
    }
}
