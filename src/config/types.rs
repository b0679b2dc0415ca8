use crate::diff::DiffStrategy;
use crate::style::{BaseStyle, Overrides};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Extensions searched when neither the file nor the command line names any.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hpp", "c", "cc", "cpp", "m", "mm"];

/// Contents of `stylefit.toml`. Every field is optional; command-line flags
/// win over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleFitToml {
    pub extensions: Option<Vec<String>>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub skip_options: Vec<String>,
    pub diff_score: Option<DiffStrategy>,
    pub clang_format: Option<PathBuf>,
    pub ignore_whitespace: Option<bool>,
    pub randomly_limit: Option<usize>,
    pub seed: Option<u64>,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct Config {
    /// Working tree to search; relative file paths are relative to this.
    pub root: PathBuf,
    pub extensions: Vec<String>,
    /// Path prefixes to keep. `.` keeps everything.
    pub include: Vec<String>,
    /// Path prefixes to drop.
    pub exclude: Vec<String>,
    pub skip_options: BTreeSet<String>,
    pub strategy: DiffStrategy,
    pub clang_format: Option<PathBuf>,
    pub ignore_whitespace: bool,
    pub randomly_limit: Option<usize>,
    pub seed: Option<u64>,
    pub style_base: Option<BaseStyle>,
    pub force_style: Option<Overrides>,
    pub verbose: u8,
    pub json: bool,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            include: Vec::new(),
            exclude: Vec::new(),
            skip_options: BTreeSet::new(),
            strategy: DiffStrategy::default(),
            clang_format: None,
            ignore_whitespace: true,
            randomly_limit: None,
            seed: None,
            style_base: None,
            force_style: None,
            verbose: 0,
            json: false,
            dry_run: false,
        }
    }
}
