use crate::diff::DiffStrategy;
use crate::style::BaseStyle;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(
    name = "stylefit",
    version,
    about = "Find the clang-format style that best fits an existing codebase"
)]
pub struct Cli {
    /// The git repository to match; file paths are relative to it
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub git: PathBuf,

    /// Add all files with these extensions, comma-delimited
    #[arg(long, value_name = "EXTENSIONS", value_delimiter = ',')]
    pub include_extensions: Vec<String>,

    /// Only use files under this path prefix ('.' means everything)
    #[arg(short = 'I', long = "include-path", value_name = "PATH")]
    pub include_path: Vec<String>,

    /// Ignore files under this path prefix
    #[arg(short = 'E', long = "exclude-path", value_name = "PATH")]
    pub exclude_path: Vec<String>,

    /// Randomly select NUM files, weighted by extension frequency (min 1 per extension)
    #[arg(long, value_name = "NUM")]
    pub randomly_limit: Option<usize>,

    /// Seed for --randomly-limit, for repeatable selections
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// The scoring algorithm to use
    #[arg(long, value_enum)]
    pub diff_score: Option<DiffStrategy>,

    /// Count blank-line and end-of-line whitespace changes when scoring
    #[arg(long)]
    pub strict_whitespace: bool,

    /// Start from this base style and do not search other bases
    #[arg(long, value_enum, ignore_case = true)]
    pub style_base: Option<BaseStyle>,

    /// Start from this style (YAML mapping) and do not search its keys
    #[arg(long, value_name = "YAML")]
    pub force_style: Option<String>,

    /// Never search this style option (repeatable)
    #[arg(long = "skip-option", value_name = "KEY")]
    pub skip_option: Vec<String>,

    /// Path to the clang-format binary or the directory containing it
    #[arg(long, value_name = "PATH")]
    pub clang_format_path: Option<PathBuf>,

    /// More output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Force colored output
    #[arg(long, overrides_with = "no_ansi")]
    pub ansi: bool,

    /// Disable colored output
    #[arg(long, overrides_with = "ansi")]
    pub no_ansi: bool,

    /// Print a JSON summary instead of progress
    #[arg(long)]
    pub json: bool,

    /// Search and print the style, but do not write .clang-format
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Explicit color choice, if any.
    #[must_use]
    pub fn color(&self) -> Option<bool> {
        if self.no_ansi {
            Some(false)
        } else if self.ansi {
            Some(true)
        } else {
            None
        }
    }
}
