// src/reporting.rs
//! Console output for a search run.

use crate::search::{
    CacheStats, CandidateEvent, CandidateTracker, Phase, Rank, RoundInfo, RoundRecord,
    SearchObserver, SearchOutcome,
};
use crate::diff::Score;
use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::path::Path;

/// Enables or disables colors for everything printed afterwards.
/// `None` leaves terminal detection to `colored`.
pub fn set_color(ansi: Option<bool>) {
    if let Some(enabled) = ansi {
        colored::control::set_override(enabled);
    }
}

fn rank_symbol(rank: Rank) -> ColoredString {
    match rank {
        Rank::Base => "∅".normal(),
        Rank::Better => "+".green().bold(),
        Rank::Same => "-".normal(),
        Rank::Worse => "-".red().bold(),
    }
}

fn header(text: &str) {
    println!();
    println!("{}{}", "=>".blue().bold(), format!(" {text}").white().bold());
}

/// One progress line: `  + (10.00, 3.00, 6.00): IndentWidth: 4`.
#[must_use]
pub fn candidate_line(event: &CandidateEvent<'_>, verbosity: u8) -> String {
    let mut line = format!(
        "  {} {}: {}",
        rank_symbol(event.rank),
        event.score,
        event.label.yellow()
    );
    if verbosity > 1 {
        line.push_str(&format!(" {}", event.style));
    }
    if verbosity > 0 && event.cached {
        line.push_str(&format!(" {}", "(cached)".dimmed()));
    }
    line
}

/// Prints search progress the way a person watches it.
pub struct ConsoleObserver {
    verbosity: u8,
}

impl ConsoleObserver {
    #[must_use]
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    fn sweep_header(round: &RoundInfo) {
        if let Some((index, total)) = round.position {
            if index == 1 {
                header("Final stage: tweak each key");
            }
            println!(
                "{}",
                format!(" == Round {index} of {total}: {:?}", round.title).white().bold()
            );
        }
    }
}

impl SearchObserver for ConsoleObserver {
    fn round_started(&mut self, round: &RoundInfo) {
        if round.phase == Phase::Sweep {
            Self::sweep_header(round);
        } else {
            header(&round.title);
        }
    }

    fn round_skipped(&mut self, round: &RoundInfo) {
        if round.phase == Phase::Sweep {
            Self::sweep_header(round);
            println!("{}", "   (skipped)".dimmed());
        } else if self.verbosity > 0 {
            println!("{}", format!("[V] Skipping: {}", round.title).dimmed());
        }
    }

    fn candidate_scored(&mut self, event: &CandidateEvent<'_>) {
        println!("{}", candidate_line(event, self.verbosity));
    }

    fn round_finished(&mut self, record: &RoundRecord, tracker: &CandidateTracker) {
        if record.phase != Phase::Sweep {
            println!(" :: best option so far: {tracker}");
        } else if record.changed {
            println!(" :: UPDATED! Added a new option that improved the score.");
        } else {
            println!("{}", " :: Skipped. No option improved the fit.".dimmed());
        }
    }
}

pub fn print_final_style(yaml: &str) {
    header("DONE!");
    println!();
    println!("Final style:");
    println!("============");
    print!("{yaml}");
    println!("============");
    println!();
}

pub fn print_applied(path: &Path) {
    println!(
        "{} {}",
        "Wrote".green().bold(),
        path.display().to_string().bold()
    );
    println!(
        "
The .clang-format file is now in your project and the style has been applied but not committed.

Next steps:
 - review the diff and see if you like the changes.
    - look for outlier files (eg, code you never want formatted, like external OSS projects).
      Outlier files could have a different code style that is influencing the search.
    - review the style and see if there are any changes you prefer.
 - if you don't like the result (eg, maybe your code has many different styles):
    - pick a subdirectory or set of files that does have the style you like and re-run
      using the '-I' option.
    - start from a known style base (--style-base).
    - start from a manually-selected style (--force-style).
 - to re-run, reset your repo and start over.
 - if you're happy with the style, add it to your repo and check it in.
   The clang-format docs describe many ways to integrate it into your workflow:
   https://clang.llvm.org/docs/ClangFormat.html
"
    );
}

pub fn print_dry_run() {
    println!(
        "{}",
        "Dry run: .clang-format was not written and the tree is unchanged.".dimmed()
    );
}

/// Machine-readable run summary.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub style: &'a str,
    pub score: Option<Score>,
    pub files: usize,
    pub strategy: &'a str,
    pub rounds: &'a [RoundRecord],
    pub cache: CacheStats,
    pub written: Option<&'a Path>,
}

impl<'a> RunSummary<'a> {
    #[must_use]
    pub fn new(outcome: &'a SearchOutcome, style: &'a str, files: usize, strategy: &'a str) -> Self {
        Self {
            style,
            score: outcome.score,
            files,
            strategy,
            rounds: &outcome.rounds,
            cache: outcome.cache,
            written: None,
        }
    }
}

/// Prints the summary as pretty JSON on stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json(summary: &RunSummary<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
