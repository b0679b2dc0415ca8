mod common;

use anyhow::Result;
use common::{
    base_plus_keys, commit_all, files, shared, write_file, FakeFormatter, FakeRepo, Shared,
};
use std::fs;
use std::path::{Path, PathBuf};
use stylefit_core::config::Config;
use stylefit_core::diff::{DiffStrategy, Score};
use stylefit_core::discovery::discover;
use stylefit_core::error::{self, StyleFitError};
use stylefit_core::formatter::Formatter;
use stylefit_core::style::{BaseStyle, Overrides, Style};
use stylefit_core::vcs::{GitRepo, Repository};
use stylefit_core::workspace::Workspace;
use tempfile::TempDir;

/// Appends a marker line to every file it is given.
struct MarkingFormatter;

impl Formatter for MarkingFormatter {
    fn reformat(&self, root: &Path, _style_text: &str, files: &[PathBuf]) -> error::Result<()> {
        for file in files {
            let path = root.join(file);
            let mut body = fs::read_to_string(&path)?;
            body.push_str("// reformatted\n");
            fs::write(&path, body)?;
        }
        Ok(())
    }

    fn dump_config(&self, base: BaseStyle) -> error::Result<Overrides> {
        Ok(Overrides::new().with("BasedOnStyle", base.as_str()))
    }
}

fn workspace(dir: &TempDir, state: &Shared) -> Workspace<FakeRepo, FakeFormatter> {
    let repo = FakeRepo::new(dir.path(), state.clone(), base_plus_keys(|_| 4));
    Workspace::new(repo, FakeFormatter::new(state.clone()), files())
}

#[test]
fn test_trial_applies_then_release_reverts() -> Result<()> {
    let dir = TempDir::new()?;
    let state = shared();
    let ws = workspace(&dir, &state);
    let style = Style::based_on(BaseStyle::WebKit).derive(&Overrides::new().with("ColumnLimit", 0));

    let trial = ws.trial(&style)?;
    assert!(state.borrow().dirty);
    let score = trial.measure(DiffStrategy::Lines, true)?;
    trial.release()?;

    assert_eq!(score, Score::new(7.0, 1.0, 0.0));
    let s = state.borrow();
    assert!(!s.dirty);
    assert_eq!(s.reverts, 1);
    Ok(())
}

#[test]
fn test_trial_reverts_on_drop_when_measurement_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let state = shared();
    state.borrow_mut().fail_diff = true;
    let ws = workspace(&dir, &state);

    let measured = ws
        .trial(&Style::based_on(BaseStyle::Llvm))
        .and_then(|t| t.measure(DiffStrategy::WordsLog, true));

    assert!(matches!(measured, Err(StyleFitError::Tool { .. })));
    let s = state.borrow();
    assert!(!s.dirty);
    assert_eq!(s.reverts, 1);
    assert!(s.applied.is_none());
    Ok(())
}

#[test]
fn test_trial_requires_clean_tree() -> Result<()> {
    let dir = TempDir::new()?;
    let state = shared();
    state.borrow_mut().dirty = true;
    let ws = workspace(&dir, &state);

    let err = ws.trial(&Style::fresh()).err();

    assert!(matches!(err, Some(StyleFitError::Precondition(_))));
    assert_eq!(state.borrow().reformats, 0);
    // a refused trial must not touch someone else's changes
    assert_eq!(state.borrow().reverts, 0);
    Ok(())
}

#[test]
fn test_trials_on_a_git_tree_leave_untracked_files_alone() -> Result<()> {
    let dir = TempDir::new()?;
    write_file(dir.path(), "a.c", "int a;\n")?;
    commit_all(dir.path())?;
    write_file(dir.path(), "scratch.c", "int s;\n")?;

    let repo = GitRepo::open(dir.path())?;
    let files = discover(&Config::new(repo.root().to_path_buf()), &repo)?;
    assert_eq!(files, [PathBuf::from("a.c")]);

    let ws = Workspace::new(repo, MarkingFormatter, files);
    for base in [BaseStyle::Llvm, BaseStyle::Google] {
        let trial = ws.trial(&Style::based_on(base))?;
        let score = trial.measure(DiffStrategy::Lines, true)?;
        assert_eq!(score, Score::new(1.0, 1.0, 1.0));
        trial.release()?;
    }

    assert_eq!(fs::read_to_string(dir.path().join("a.c"))?, "int a;\n");
    assert_eq!(fs::read_to_string(dir.path().join("scratch.c"))?, "int s;\n");
    Ok(())
}
