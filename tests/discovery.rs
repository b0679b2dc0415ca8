mod common;

use anyhow::Result;
use common::{commit_all, write_file};
use std::path::PathBuf;
use stylefit_core::config::Config;
use stylefit_core::discovery::{discover, list_files};
use stylefit_core::error::StyleFitError;
use stylefit_core::vcs::{GitRepo, Repository};
use tempfile::TempDir;

const TREE: &[&str] = &[
    "main.c",
    "lib/util.cpp",
    "lib/util.h",
    "lib/vendor/zlib.c",
    "docs/readme.md",
];

fn tree() -> Result<TempDir> {
    let dir = TempDir::new()?;
    for rel in TREE {
        write_file(dir.path(), rel, "int x;\n")?;
    }
    Ok(dir)
}

fn repo(dir: &TempDir) -> Result<(Config, GitRepo)> {
    commit_all(dir.path())?;
    let repo = GitRepo::open(dir.path())?;
    Ok((Config::new(repo.root().to_path_buf()), repo))
}

fn rel(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn test_lists_matching_extensions_sorted_and_relative() -> Result<()> {
    let dir = tree()?;
    write_file(dir.path(), ".git/hooks/pre-commit.c", "int x;\n")?;
    let files = list_files(dir.path(), &["c".into(), "h".into(), "cpp".into()]);
    assert_eq!(
        files,
        rel(&["lib/util.cpp", "lib/util.h", "lib/vendor/zlib.c", "main.c"])
    );
    Ok(())
}

#[test]
fn test_extension_may_carry_a_dot() -> Result<()> {
    let dir = tree()?;
    assert_eq!(list_files(dir.path(), &[".h".into()]), rel(&["lib/util.h"]));
    Ok(())
}

#[test]
fn test_discover_applies_prefix_filters() -> Result<()> {
    let dir = tree()?;
    let (mut config, repo) = repo(&dir)?;
    config.include = vec!["lib/".into()];
    config.exclude = vec!["lib/vendor".into()];

    assert_eq!(discover(&config, &repo)?, rel(&["lib/util.cpp", "lib/util.h"]));
    Ok(())
}

#[test]
fn test_discover_skips_untracked_and_ignored_files() -> Result<()> {
    let dir = tree()?;
    write_file(dir.path(), ".gitignore", "build/\n")?;
    let (config, repo) = repo(&dir)?;
    write_file(dir.path(), "scratch.c", "int s;\n")?;
    write_file(dir.path(), "build/gen.h", "int g;\n")?;

    let files = discover(&config, &repo)?;

    assert_eq!(
        files,
        rel(&["lib/util.cpp", "lib/util.h", "lib/vendor/zlib.c", "main.c"])
    );
    Ok(())
}

#[test]
fn test_discover_with_seed_is_repeatable() -> Result<()> {
    let dir = TempDir::new()?;
    for i in 0..30 {
        write_file(dir.path(), &format!("src/f{i:02}.c"), "int x;\n")?;
    }
    write_file(dir.path(), "src/only.h", "int x;\n")?;
    let (mut config, repo) = repo(&dir)?;
    config.randomly_limit = Some(6);
    config.seed = Some(42);

    let first = discover(&config, &repo)?;
    assert_eq!(first, discover(&config, &repo)?);
    assert!(first.contains(&PathBuf::from("src/only.h")));
    assert_eq!(first.len(), 6);
    Ok(())
}

#[test]
fn test_nothing_found_is_a_precondition_failure() -> Result<()> {
    let dir = tree()?;
    let (mut config, repo) = repo(&dir)?;
    config.extensions = vec!["mm".into()];

    assert!(matches!(
        discover(&config, &repo),
        Err(StyleFitError::Precondition(_))
    ));
    Ok(())
}

#[test]
fn test_untracked_only_is_a_precondition_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let (config, repo) = repo(&dir)?;
    write_file(dir.path(), "new.c", "int n;\n")?;

    assert_eq!(list_files(&config.root, &config.extensions).len(), 1);
    assert!(matches!(
        discover(&config, &repo),
        Err(StyleFitError::Precondition(_))
    ));
    Ok(())
}
