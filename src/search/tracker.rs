// src/search/tracker.rs
//! The candidate tracker: accepted style/score plus the best candidate of
//! the round in progress.

use crate::diff::Score;
use crate::error::TrackerError;
use crate::style::{Overrides, Style};
use serde::Serialize;
use std::fmt;

/// How a pushed candidate compares, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    /// Nothing accepted yet; the candidate leads the round.
    Base,
    /// Leads the round and beats the accepted score.
    Better,
    /// Leads the round and ties the accepted score.
    Same,
    /// Either discarded for not beating the round's leader, or leading the
    /// round with a score worse than the accepted one.
    Worse,
}

#[derive(Debug, Clone)]
struct Candidate {
    label: String,
    style: Style,
    score: Score,
}

#[derive(Debug, Default)]
struct Round {
    best: Option<Candidate>,
}

#[derive(Debug, Default)]
pub struct CandidateTracker {
    accepted_style: Option<Style>,
    accepted_score: Option<Score>,
    round: Option<Round>,
}

impl CandidateTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a fixed style with no score yet. The first round will
    /// adopt its winner unconditionally.
    #[must_use]
    pub fn seeded(style: Style) -> Self {
        Self {
            accepted_style: Some(style),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn accepted_style(&self) -> Option<&Style> {
        self.accepted_style.as_ref()
    }

    #[must_use]
    pub fn accepted_score(&self) -> Option<Score> {
        self.accepted_score
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.round.is_some()
    }

    /// Label of the round's current leader, if any.
    #[must_use]
    pub fn leading_label(&self) -> Option<&str> {
        self.round
            .as_ref()
            .and_then(|r| r.best.as_ref())
            .map(|c| c.label.as_str())
    }

    /// The style `overrides` would produce on top of the accepted one.
    #[must_use]
    pub fn candidate_style(&self, overrides: &Overrides) -> Style {
        self.accepted_style
            .as_ref()
            .map_or_else(|| Style::fresh().derive(overrides), |s| s.derive(overrides))
    }

    /// Opens a round.
    ///
    /// # Errors
    /// Returns `AlreadySearching` if a round is already open.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.round.is_some() {
            return Err(TrackerError::AlreadySearching);
        }
        self.round = Some(Round::default());
        Ok(())
    }

    /// Offers a candidate to the open round.
    ///
    /// Only a strictly better score than the round's leader replaces it.
    ///
    /// # Errors
    /// Returns `NotSearching` if no round is open.
    pub fn push_candidate(
        &mut self,
        label: &str,
        style: Style,
        score: Score,
    ) -> Result<Rank, TrackerError> {
        let round = self.round.as_mut().ok_or(TrackerError::NotSearching)?;

        if round.best.as_ref().is_some_and(|best| score >= best.score) {
            return Ok(Rank::Worse);
        }

        round.best = Some(Candidate {
            label: label.to_string(),
            style,
            score,
        });

        Ok(match self.accepted_score {
            None => Rank::Base,
            Some(accepted) if score < accepted => Rank::Better,
            Some(accepted) if score == accepted => Rank::Same,
            Some(_) => Rank::Worse,
        })
    }

    /// Closes the round, adopting its leader if it qualifies.
    ///
    /// With `strictly_better` the leader must beat the accepted score;
    /// otherwise a tie is enough. Returns whether the accepted style changed.
    ///
    /// # Errors
    /// Returns `NotSearching` if no round is open.
    pub fn finish(&mut self, strictly_better: bool) -> Result<bool, TrackerError> {
        let round = self.round.take().ok_or(TrackerError::NotSearching)?;
        let Some(candidate) = round.best else {
            return Ok(false);
        };

        if let Some(accepted) = self.accepted_score {
            let adopt = if strictly_better {
                candidate.score < accepted
            } else {
                candidate.score <= accepted
            };
            if !adopt {
                return Ok(false);
            }
        }

        tracing::debug!(label = %candidate.label, score = %candidate.score, "adopted candidate");
        self.accepted_style = Some(candidate.style);
        self.accepted_score = Some(candidate.score);
        Ok(true)
    }
}

impl fmt::Display for CandidateTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = self
            .accepted_score
            .map_or_else(|| "none".to_string(), |s| s.to_string());
        match &self.accepted_style {
            Some(style) => write!(f, "score {score} with {style}"),
            None => write!(f, "score {score} with no style"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::BaseStyle;

    fn s(n: f64) -> Score {
        Score::new(n, 1.0, 0.0)
    }

    fn style(width: i64) -> Style {
        Style::based_on(BaseStyle::Llvm).derive(&Overrides::new().with("IndentWidth", width))
    }

    #[test]
    fn test_push_when_idle_is_usage_error() {
        let mut t = CandidateTracker::new();
        assert_eq!(
            t.push_candidate("x", style(2), s(1.0)),
            Err(TrackerError::NotSearching)
        );
    }

    #[test]
    fn test_finish_when_idle_is_usage_error() {
        let mut t = CandidateTracker::new();
        assert_eq!(t.finish(true), Err(TrackerError::NotSearching));
    }

    #[test]
    fn test_double_start_is_usage_error() {
        let mut t = CandidateTracker::new();
        t.start().unwrap();
        assert_eq!(t.start(), Err(TrackerError::AlreadySearching));
        assert!(t.is_searching());
    }

    #[test]
    fn test_equal_push_is_rejected() {
        let mut t = CandidateTracker::new();
        t.start().unwrap();
        assert_eq!(t.push_candidate("first", style(2), Score::new(5.0, 1.0, 0.0)), Ok(Rank::Base));
        assert_eq!(t.push_candidate("second", style(4), Score::new(5.0, 1.0, 0.0)), Ok(Rank::Worse));
        assert_eq!(t.leading_label(), Some("first"));

        assert_eq!(t.finish(true), Ok(true));
        assert_eq!(t.accepted_style(), Some(&style(2)));
    }

    #[test]
    fn test_empty_round_changes_nothing() {
        let mut t = CandidateTracker::new();
        t.start().unwrap();
        assert_eq!(t.finish(false), Ok(false));
        assert!(t.accepted_style().is_none());
        assert!(!t.is_searching());
    }

    #[test]
    fn test_tie_adopted_only_when_not_strict() {
        let mut t = CandidateTracker::new();
        t.start().unwrap();
        t.push_candidate("a", style(2), s(3.0)).unwrap();
        t.finish(false).unwrap();

        t.start().unwrap();
        assert_eq!(t.push_candidate("b", style(4), s(3.0)), Ok(Rank::Same));
        assert_eq!(t.finish(true), Ok(false));
        assert_eq!(t.accepted_style(), Some(&style(2)));

        t.start().unwrap();
        t.push_candidate("b", style(4), s(3.0)).unwrap();
        assert_eq!(t.finish(false), Ok(true));
        assert_eq!(t.accepted_style(), Some(&style(4)));
        assert_eq!(t.accepted_score(), Some(s(3.0)));
    }

    #[test]
    fn test_worse_leader_is_not_adopted() {
        let mut t = CandidateTracker::new();
        t.start().unwrap();
        t.push_candidate("a", style(2), s(3.0)).unwrap();
        t.finish(true).unwrap();

        t.start().unwrap();
        assert_eq!(t.push_candidate("b", style(8), s(9.0)), Ok(Rank::Worse));
        assert_eq!(t.leading_label(), Some("b"));
        assert_eq!(t.push_candidate("c", style(3), s(1.0)), Ok(Rank::Better));
        assert_eq!(t.finish(false), Ok(true));
        assert_eq!(t.accepted_style(), Some(&style(3)));
    }

    #[test]
    fn test_candidate_style_derives_from_accepted() {
        let t = CandidateTracker::seeded(Style::based_on(BaseStyle::WebKit));
        let c = t.candidate_style(&Overrides::new().with("ColumnLimit", 0));
        assert_eq!(c.base(), Some(BaseStyle::WebKit));

        let fresh = CandidateTracker::new().candidate_style(&Overrides::new().with("ColumnLimit", 0));
        assert_eq!(fresh.base(), None);
    }

    #[test]
    fn test_seeded_tracker_adopts_first_round() {
        let mut t = CandidateTracker::seeded(style(8));
        t.start().unwrap();
        t.push_candidate("a", style(2), s(50.0)).unwrap();
        assert_eq!(t.finish(true), Ok(true));
    }
}
