// src/diff.rs
//! Diff scoring: turn `git diff` output into a comparable [`Score`].
//!
//! Every strategy ranks by the same three criteria, in an order that depends
//! on the strategy:
//!  1. the amount of change (lines or tokens added or deleted),
//!  2. the number of files touched,
//!  3. the insertion/deletion imbalance, preferring styles that delete.

use crate::error::{Result, StyleFitError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// An ordered summary of diff magnitude. Smaller is better.
///
/// Compared lexicographically with a total order over `f64`, so scores can
/// be sorted and used as map keys without NaN surprises.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Score([f64; 3]);

impl Score {
    #[must_use]
    pub const fn new(first: f64, second: f64, third: f64) -> Self {
        Self([first, second, third])
    }

    /// The score of an empty diff.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0.0; 3])
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "({a:.2}, {b:.2}, {c:.2})")
    }
}

/// Which flavour of `git diff` a strategy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// `git diff --shortstat`
    ShortStat,
    /// `git diff --numstat`
    NumStat,
    /// `git diff --word-diff=porcelain -U0 --word-diff-regex=.`
    WordPorcelain,
}

impl DiffKind {
    /// Arguments after `git diff`.
    #[must_use]
    pub fn git_args(self) -> &'static [&'static str] {
        match self {
            Self::ShortStat => &["--shortstat"],
            Self::NumStat => &["--numstat"],
            Self::WordPorcelain => &["--word-diff=porcelain", "-U0", "--word-diff-regex=."],
        }
    }

    /// Short name used in parse errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ShortStat => "shortstat",
            Self::NumStat => "numstat",
            Self::WordPorcelain => "word-diff",
        }
    }

    /// Parses raw `git diff` output of this kind.
    ///
    /// # Errors
    /// Returns `DiffParse` if the output does not have the expected shape.
    pub fn parse(self, output: &str) -> Result<DiffReport> {
        match self {
            Self::ShortStat => parse_shortstat(output).map(DiffReport::Summary),
            Self::NumStat => parse_numstat(output).map(DiffReport::PerFile),
            Self::WordPorcelain => parse_word_porcelain(output).map(DiffReport::PerFile),
        }
    }
}

/// Whole-diff totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub files: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// Per-file insertion/deletion counts, in lines or tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDelta {
    pub path: String,
    pub insertions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffReport {
    Summary(DiffSummary),
    PerFile(Vec<FileDelta>),
}

impl DiffReport {
    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        match self {
            Self::Summary(s) => *s,
            Self::PerFile(files) => DiffSummary {
                files: files.len(),
                insertions: files.iter().map(|f| f.insertions).sum(),
                deletions: files.iter().map(|f| f.deletions).sum(),
            },
        }
    }

    fn file_counts(&self) -> Vec<(usize, usize)> {
        match self {
            Self::Summary(s) if s.files == 0 => Vec::new(),
            Self::Summary(s) => vec![(s.insertions, s.deletions)],
            Self::PerFile(files) => files.iter().map(|f| (f.insertions, f.deletions)).collect(),
        }
    }
}

/// The closed set of scoring strategies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStrategy {
    /// Whole-diff line counts: (lines, files, imbalance).
    Lines,
    /// Whole-diff line counts with files first: (files, lines, imbalance).
    Files,
    /// Per-file line counts summed linearly.
    Hybrid,
    /// Per-file line counts damped with ln(1+x).
    HybridLog,
    /// Per-file character-token counts summed linearly.
    Words,
    /// Per-file character-token counts damped with ln(1+x).
    #[default]
    WordsLog,
}

impl DiffStrategy {
    #[must_use]
    pub fn kind(self) -> DiffKind {
        match self {
            Self::Lines | Self::Files => DiffKind::ShortStat,
            Self::Hybrid | Self::HybridLog => DiffKind::NumStat,
            Self::Words | Self::WordsLog => DiffKind::WordPorcelain,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Files => "files",
            Self::Hybrid => "hybrid",
            Self::HybridLog => "hybrid-log",
            Self::Words => "words",
            Self::WordsLog => "words-log",
        }
    }

    /// Reduces a diff to a score under this strategy.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(self, report: &DiffReport) -> Score {
        match self {
            Self::Lines | Self::Files => {
                let s = report.summary();
                let changed = s.insertions.max(s.deletions) as f64;
                let imbalance = s.insertions.abs_diff(s.deletions) as f64;
                let files = s.files as f64;
                if self == Self::Lines {
                    Score::new(changed, files, imbalance)
                } else {
                    Score::new(files, changed, imbalance)
                }
            }
            Self::Hybrid | Self::Words => per_file_score(report, linear),
            Self::HybridLog | Self::WordsLog => per_file_score(report, damped),
        }
    }
}

impl fmt::Display for DiffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[allow(clippy::cast_precision_loss)]
fn linear(x: usize) -> f64 {
    x as f64
}

#[allow(clippy::cast_precision_loss)]
fn damped(x: usize) -> f64 {
    (x as f64).ln_1p()
}

#[allow(clippy::cast_precision_loss)]
fn per_file_score(report: &DiffReport, scale: fn(usize) -> f64) -> Score {
    let counts = report.file_counts();
    let mut changed = 0.0;
    let mut imbalance = 0.0;
    for (ins, del) in &counts {
        let (i, d) = (scale(*ins), scale(*del));
        changed += i.max(d);
        imbalance += (i - d).abs();
    }
    Score::new(changed, counts.len() as f64, imbalance)
}

static SHORTSTAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?$",
    )
    .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Parses `git diff --shortstat`, e.g.
/// `3 files changed, 148 insertions(+), 15 deletions(-)`.
///
/// # Errors
/// Returns `DiffParse` for anything but empty output or a shortstat line.
pub fn parse_shortstat(output: &str) -> Result<DiffSummary> {
    let line = output.trim();
    if line.is_empty() {
        return Ok(DiffSummary::default());
    }

    let caps = SHORTSTAT_RE
        .captures(line)
        .ok_or_else(|| StyleFitError::diff_parse(DiffKind::ShortStat.name(), line))?;
    let count = |i: usize| -> Result<usize> {
        caps.get(i).map_or(Ok(0), |m| {
            m.as_str()
                .parse()
                .map_err(|_| StyleFitError::diff_parse(DiffKind::ShortStat.name(), line))
        })
    };

    Ok(DiffSummary {
        files: count(1)?,
        insertions: count(2)?,
        deletions: count(3)?,
    })
}

/// Parses `git diff --numstat`: one `insertions<TAB>deletions<TAB>path` line
/// per file. Binary files report `-` for both counts and count as touched.
///
/// # Errors
/// Returns `DiffParse` on a line that does not have three fields.
pub fn parse_numstat(output: &str) -> Result<Vec<FileDelta>> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(3, '\t');
            let (Some(ins), Some(del), Some(path)) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(StyleFitError::diff_parse(DiffKind::NumStat.name(), line));
            };
            Ok(FileDelta {
                path: path.to_string(),
                insertions: numstat_count(ins, line)?,
                deletions: numstat_count(del, line)?,
            })
        })
        .collect()
}

fn numstat_count(field: &str, line: &str) -> Result<usize> {
    if field == "-" {
        return Ok(0);
    }
    field
        .parse()
        .map_err(|_| StyleFitError::diff_parse(DiffKind::NumStat.name(), line))
}

/// Parses porcelain word-diff output and counts added/removed tokens per
/// file. With `--word-diff-regex=.` every character is a token.
///
/// # Errors
/// Returns `DiffParse` if content appears before the first file header.
pub fn parse_word_porcelain(output: &str) -> Result<Vec<FileDelta>> {
    let mut files: Vec<FileDelta> = Vec::new();
    let mut in_hunk = false;

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("diff ") {
            let path = rest.rsplit_once(" b/").map_or(rest, |(_, p)| p);
            files.push(FileDelta {
                path: path.to_string(),
                insertions: 0,
                deletions: 0,
            });
            in_hunk = false;
            continue;
        }

        let Some(current) = files.last_mut() else {
            if line.trim().is_empty() {
                continue;
            }
            return Err(StyleFitError::diff_parse(DiffKind::WordPorcelain.name(), line));
        };

        if line.starts_with("@@") {
            in_hunk = true;
        } else if !in_hunk {
            // index, mode and ---/+++ header lines
        } else if let Some(added) = line.strip_prefix('+') {
            current.insertions += added.chars().count();
        } else if let Some(removed) = line.strip_prefix('-') {
            current.deletions += removed.chars().count();
        }
    }

    Ok(files)
}
