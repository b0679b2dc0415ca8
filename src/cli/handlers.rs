// src/cli/handlers.rs
use crate::cli::args::Cli;
use crate::config::Config;
use crate::discovery;
use crate::exit::StyleFitExit;
use crate::formatter::ClangFormat;
use crate::logging;
use crate::reporting::{self, ConsoleObserver, RunSummary};
use crate::search::{
    CandidateTracker, NullObserver, ScoreCache, SearchDriver, SearchPlan, StyleCanonicalizer,
};
use crate::style::Overrides;
use crate::vcs::{GitRepo, Repository};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::io::IsTerminal;

/// Merges `stylefit.toml` with the command line. Flags win.
///
/// # Errors
/// Returns error if the settings file or `--force-style` is invalid.
pub fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.git.clone())?;

    if !cli.include_extensions.is_empty() {
        config.extensions = cli
            .include_extensions
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
    }
    config.include.extend(cli.include_path.iter().cloned());
    config.exclude.extend(cli.exclude_path.iter().cloned());
    config.skip_options.extend(cli.skip_option.iter().cloned());
    if cli.randomly_limit.is_some() {
        config.randomly_limit = cli.randomly_limit;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(strategy) = cli.diff_score {
        config.strategy = strategy;
    }
    if cli.strict_whitespace {
        config.ignore_whitespace = false;
    }
    if cli.clang_format_path.is_some() {
        config.clang_format.clone_from(&cli.clang_format_path);
    }
    config.style_base = cli.style_base;
    config.force_style = cli
        .force_style
        .as_deref()
        .map(Overrides::parse_yaml)
        .transpose()
        .context("invalid --force-style")?;
    config.verbose = cli.verbose;
    config.json = cli.json;
    config.dry_run = cli.dry_run;

    config.validate()?;
    Ok(config)
}

/// Runs a full search and applies the result.
///
/// # Errors
/// Returns error if any step fails: configuration, tool discovery, the
/// search itself, or writing the style file.
pub fn handle_fit(cli: &Cli) -> Result<StyleFitExit> {
    reporting::set_color(cli.color());
    logging::init(
        cli.verbose,
        cli.color().unwrap_or_else(|| std::io::stderr().is_terminal()),
    );

    let mut config = build_config(cli)?;
    let repo = GitRepo::open(&config.root)?;
    tracing::info!(root = %repo.root().display(), "using git repo");
    config.root = repo.root().to_path_buf();

    let formatter = ClangFormat::locate(config.clang_format.as_deref())?;
    let files = discovery::discover(&config, &repo)?;

    let plan = SearchPlan {
        skip: config.skipped_keys(),
        ignore_whitespace: config.ignore_whitespace,
        ..SearchPlan::new(config.strategy)
    };
    if !plan.skip.is_empty() {
        tracing::info!(count = plan.skip.len(), "skipping style option keys");
    }
    let tracker = config
        .initial_style()
        .map_or_else(CandidateTracker::new, CandidateTracker::seeded);

    let file_count = files.len();
    let mut driver = SearchDriver::new(
        Workspace::new(repo, formatter, files),
        plan,
        tracker,
        ScoreCache::new(StyleCanonicalizer::expanded()),
    );

    let outcome = if config.json {
        driver.run(&mut NullObserver)?
    } else {
        driver.run(&mut ConsoleObserver::new(config.verbose))?
    };
    tracing::info!(
        hits = outcome.cache.hits,
        misses = outcome.cache.misses,
        "search finished"
    );

    let yaml = outcome.style.to_yaml()?;
    if !config.json {
        reporting::print_final_style(&yaml);
    }

    let written = if config.dry_run {
        None
    } else {
        let documented = driver.documented(&outcome.style)?;
        Some(driver.workspace().apply_final(&documented)?)
    };

    if config.json {
        let mut summary = RunSummary::new(&outcome, &yaml, file_count, config.strategy.name());
        summary.written = written.as_deref();
        reporting::print_json(&summary)?;
    } else if let Some(path) = &written {
        reporting::print_applied(path);
    } else {
        reporting::print_dry_run();
    }

    Ok(StyleFitExit::Success)
}
