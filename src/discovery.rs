// src/discovery.rs
//! Finds the files the search reformats.

use crate::config::Config;
use crate::error::{Result, StyleFitError};
use crate::utils::normalize_path;
use crate::vcs::Repository;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Runs the file discovery pipeline: extension walk restricted to files
/// `repo` tracks, path filters, then optional random sampling.
///
/// Untracked, ignored and submodule files are left out since a revert
/// cannot restore them.
///
/// # Errors
/// Returns `Tool` if the tracked files cannot be listed, or `Precondition`
/// if no file survives the filters.
pub fn discover<R: Repository>(config: &Config, repo: &R) -> Result<Vec<PathBuf>> {
    let mut files = list_files(&config.root, &config.extensions);
    tracing::info!(count = files.len(), "matched files by extension");

    files = retain_tracked(files, &repo.tracked_files()?);
    tracing::info!(count = files.len(), "matched files tracked by git");

    files = filter_paths(files, &config.include, &config.exclude);
    tracing::info!(count = files.len(), "matched files after path filters");

    if let Some(limit) = config.randomly_limit {
        if limit >= files.len() {
            tracing::info!(limit, "skipping random selection; limit covers every file");
        } else {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            files = sample_by_extension(files, limit, &mut rng);
        }
    }

    if files.is_empty() {
        return Err(StyleFitError::Precondition(
            "No files found to format.".to_string(),
        ));
    }
    tracing::info!(count = files.len(), "final file count");
    Ok(files)
}

/// Every file under `root` whose extension is in `extensions`, as sorted
/// paths relative to `root`. `.git` is never entered.
#[must_use]
pub fn list_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    let (mut paths, error_count) = accumulate_walker(root, walker, extensions);
    if error_count > 0 {
        tracing::warn!("encountered {error_count} errors during file walk");
    }
    paths.sort();
    paths
}

fn accumulate_walker<I>(root: &Path, walker: I, extensions: &[String]) -> (Vec<PathBuf>, usize)
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    let mut paths = Vec::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                    let p = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    paths.push(p.to_path_buf());
                }
            }
            Err(_) => errors += 1,
        }
    }
    (paths, errors)
}

/// Drops every path not listed in `tracked`.
#[must_use]
pub fn retain_tracked(mut paths: Vec<PathBuf>, tracked: &[String]) -> Vec<PathBuf> {
    let tracked: HashSet<&str> = tracked.iter().map(String::as_str).collect();
    paths.retain(|p| {
        let s = normalize_path(p);
        let keep = tracked.contains(s.as_str());
        if !keep {
            tracing::debug!(path = %s, "not tracked by git; skipping");
        }
        keep
    });
    paths
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.trim_start_matches('.') == ext))
}

/// Keeps files starting with any `include` prefix (all files if `include`
/// is empty or contains `.`), then drops files starting with any `exclude`
/// prefix.
#[must_use]
pub fn filter_paths(mut paths: Vec<PathBuf>, include: &[String], exclude: &[String]) -> Vec<PathBuf> {
    if !include.is_empty() && !include.iter().any(|p| p == ".") {
        paths.retain(|p| {
            let s = normalize_path(p);
            let keep = include.iter().any(|prefix| s.starts_with(prefix.as_str()));
            if !keep {
                tracing::trace!(path = %s, "rejected by include filter");
            }
            keep
        });
    }

    if !exclude.is_empty() {
        paths.retain(|p| {
            let s = normalize_path(p);
            let drop = exclude.iter().any(|prefix| s.starts_with(prefix.as_str()));
            if drop {
                tracing::trace!(path = %s, "rejected by exclude filter");
            }
            !drop
        });
    }

    paths
}

/// Picks roughly `limit` files, always at least one per extension, with the
/// rest shared out in proportion to how common each extension is.
#[must_use]
pub fn sample_by_extension<R: Rng + ?Sized>(
    files: Vec<PathBuf>,
    limit: usize,
    rng: &mut R,
) -> Vec<PathBuf> {
    let mut by_extension: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let ext = file
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        by_extension.entry(ext).or_default().push(file);
    }

    let mut selected = Vec::new();
    for group in by_extension.values_mut() {
        group.shuffle(rng);
        selected.extend(group.pop());
    }

    let remaining: usize = by_extension.values().map(Vec::len).sum();
    if remaining > 0 {
        #[allow(clippy::cast_precision_loss)]
        let fraction = (limit.saturating_sub(by_extension.len()) as f64) / remaining as f64;
        for (ext, group) in &by_extension {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let keep = ((fraction * group.len() as f64).round() as usize).min(group.len());
            tracing::info!(
                extension = %ext,
                kept = keep + 1,
                total = group.len() + 1,
                "random filter"
            );
            selected.extend(group.iter().take(keep).cloned());
        }
    }

    selected.sort();
    selected
}
