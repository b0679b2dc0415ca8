//! In-memory stand-ins for git and clang-format.
//!
//! The fake formatter records the style it was asked to apply; the fake
//! repository scores the diff from that style with a caller-supplied cost.
#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;
use stylefit_core::diff::{DiffKind, DiffReport, DiffSummary};
use stylefit_core::error::{Result, StyleFitError};
use stylefit_core::formatter::Formatter;
use stylefit_core::style::{BaseStyle, Overrides};
use stylefit_core::utils::normalize_path;
use stylefit_core::vcs::Repository;

#[derive(Debug, Default)]
pub struct TreeState {
    /// Style currently applied to the tree, if any.
    pub applied: Option<Overrides>,
    /// Every style ever applied, in order.
    pub history: Vec<Overrides>,
    pub dirty: bool,
    pub reformats: usize,
    pub reverts: usize,
    pub dumps: usize,
    pub fail_diff: bool,
}

pub type Shared = Rc<RefCell<TreeState>>;

pub type CostFn = Box<dyn Fn(&Overrides) -> usize>;

pub struct FakeRepo {
    root: PathBuf,
    state: Shared,
    cost: CostFn,
}

impl FakeRepo {
    pub fn new(root: &Path, state: Shared, cost: impl Fn(&Overrides) -> usize + 'static) -> Self {
        Self {
            root: root.to_path_buf(),
            state,
            cost: Box::new(cost),
        }
    }
}

impl Repository for FakeRepo {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(!self.state.borrow().dirty)
    }

    fn tracked_files(&self) -> Result<Vec<String>> {
        Ok(files().iter().map(|p| normalize_path(p)).collect())
    }

    fn revert(&self) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.applied = None;
        s.dirty = false;
        s.reverts += 1;
        Ok(())
    }

    fn diff(&self, _kind: DiffKind, _ignore_whitespace: bool) -> Result<DiffReport> {
        let s = self.state.borrow();
        if s.fail_diff {
            return Err(StyleFitError::Tool {
                command: "git diff".to_string(),
                code: 128,
                stderr: "fatal: simulated".to_string(),
            });
        }
        let lines = s.applied.as_ref().map_or(0, |o| (self.cost)(o));
        Ok(DiffReport::Summary(DiffSummary {
            files: 1,
            insertions: lines,
            deletions: lines,
        }))
    }
}

pub struct FakeFormatter {
    state: Shared,
}

impl FakeFormatter {
    pub fn new(state: Shared) -> Self {
        Self { state }
    }
}

impl Formatter for FakeFormatter {
    fn reformat(&self, _root: &Path, style_text: &str, _files: &[PathBuf]) -> Result<()> {
        let overrides: Overrides = serde_json::from_str(style_text)
            .map_err(|e| StyleFitError::Config(format!("fake formatter got {style_text}: {e}")))?;
        let mut s = self.state.borrow_mut();
        s.history.push(overrides.clone());
        s.applied = Some(overrides);
        s.dirty = true;
        s.reformats += 1;
        Ok(())
    }

    fn dump_config(&self, base: BaseStyle) -> Result<Overrides> {
        self.state.borrow_mut().dumps += 1;
        let indent = match base {
            BaseStyle::Llvm | BaseStyle::Google | BaseStyle::Chromium => 2,
            BaseStyle::Mozilla | BaseStyle::WebKit => 4,
        };
        Ok(Overrides::new()
            .with("BasedOnStyle", base.as_str())
            .with("IndentWidth", indent)
            .with("TabWidth", 8)
            .with("UseTab", "Never"))
    }
}

pub fn shared() -> Shared {
    Rc::new(RefCell::new(TreeState::default()))
}

pub fn files() -> Vec<PathBuf> {
    vec![PathBuf::from("src/a.c"), PathBuf::from("src/a.h")]
}

/// Cost of a style: a per-base constant plus 3 for every other key set.
pub fn base_plus_keys(base_cost: impl Fn(Option<BaseStyle>) -> usize + 'static) -> impl Fn(&Overrides) -> usize {
    move |o: &Overrides| {
        let extra = o.keys().filter(|k| *k != "BasedOnStyle").count();
        base_cost(o.base()) + 3 * extra
    }
}

/// Runs git in `root` with a throwaway identity.
pub fn git(root: &Path, args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["-c", "user.name=stylefit", "-c", "user.email=stylefit@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "core.autocrlf=false"])
        .args(args)
        .status()?;
    anyhow::ensure!(status.success(), "git {args:?} failed");
    Ok(())
}

pub fn write_file(root: &Path, rel: &str, body: &str) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;
    Ok(())
}

/// Initializes a repository in `root` and commits everything in it.
pub fn commit_all(root: &Path) -> anyhow::Result<()> {
    git(root, &["init", "-q"])?;
    git(root, &["add", "-A"])?;
    git(root, &["commit", "-q", "--allow-empty", "-m", "init"])
}
