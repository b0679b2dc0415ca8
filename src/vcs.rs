// src/vcs.rs
//! Version-control service: the working tree the search mutates and measures.

use crate::diff::{DiffKind, DiffReport};
use crate::error::{Result, StyleFitError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const IGNORE_WHITESPACE_ARGS: &[&str] = &["--ignore-blank-lines", "--ignore-space-at-eol"];

/// The operations the search needs from a checked-out repository.
pub trait Repository {
    /// Absolute path of the working tree root.
    fn root(&self) -> &Path;

    /// True if there are neither staged nor unstaged changes to tracked files.
    ///
    /// # Errors
    /// Returns `Tool` if the underlying command fails.
    fn is_clean(&self) -> Result<bool>;

    /// Paths git tracks under the root, relative to it with `/` separators.
    /// Submodules appear as a single entry for their directory.
    ///
    /// # Errors
    /// Returns `Tool` if the underlying command fails.
    fn tracked_files(&self) -> Result<Vec<String>>;

    /// Discards all changes to tracked files.
    ///
    /// # Errors
    /// Returns `Tool` if the underlying command fails.
    fn revert(&self) -> Result<()>;

    /// Diffs the working tree against the index in the given form.
    ///
    /// # Errors
    /// Returns `Tool` if the command fails or `DiffParse` if its output
    /// cannot be read.
    fn diff(&self, kind: DiffKind, ignore_whitespace: bool) -> Result<DiffReport>;
}

/// A git working tree driven through the `git` binary.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Opens the working tree at `path`.
    ///
    /// # Errors
    /// Returns `Precondition` if the path does not exist or is not inside a
    /// git working tree.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(StyleFitError::Precondition(format!(
                "The path {} does not exist.",
                path.display()
            )));
        }
        let root = path.canonicalize().map_err(|source| StyleFitError::Io {
            source,
            path: path.to_path_buf(),
        })?;

        let repo = Self { root };
        let inside = repo
            .output(&["rev-parse", "--is-inside-work-tree"])
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !inside {
            return Err(StyleFitError::Precondition(format!(
                "The directory {} does not seem to be a git repository.",
                repo.root.display()
            )));
        }
        Ok(repo)
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::trace!(root = %self.root.display(), "git {}", args.join(" "));
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|e| StyleFitError::ToolNotFound {
                tool: "git".to_string(),
                detail: e.to_string(),
            })
    }

    /// Runs a git command and returns stdout. Fails on non-zero exit.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(tool_failure(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs a `--quiet` style query where exit 1 means "differences found".
    fn quiet_query(&self, args: &[&str]) -> Result<bool> {
        let output = self.output(args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(tool_failure(args, &output)),
        }
    }
}

fn tool_failure(args: &[&str], output: &Output) -> StyleFitError {
    StyleFitError::Tool {
        command: format!("git {}", args.join(" ")),
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

impl Repository for GitRepo {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_clean(&self) -> Result<bool> {
        // staged, then unstaged
        Ok(self.quiet_query(&["diff-index", "--quiet", "--cached", "HEAD"])?
            && self.quiet_query(&["diff-files", "--quiet"])?)
    }

    fn tracked_files(&self) -> Result<Vec<String>> {
        // relative to the working directory, which is the root
        let out = self.run(&["ls-files", "-z"])?;
        Ok(out
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn revert(&self) -> Result<()> {
        self.run(&["reset", "--hard", "--quiet"]).map(|_| ())
    }

    fn diff(&self, kind: DiffKind, ignore_whitespace: bool) -> Result<DiffReport> {
        let mut args = vec!["diff", "--no-color", "--no-ext-diff"];
        args.extend_from_slice(kind.git_args());
        if ignore_whitespace {
            args.extend_from_slice(IGNORE_WHITESPACE_ARGS);
        }
        let out = self.run(&args)?;
        kind.parse(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffSummary;
    use std::fs;
    use tempfile::TempDir;

    fn git(root: &Path, args: &[&str]) -> anyhow::Result<()> {
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

    fn committed(files: &[(&str, &str)]) -> anyhow::Result<(TempDir, GitRepo)> {
        let dir = tempfile::tempdir()?;
        git(dir.path(), &["init", "-q"])?;
        for (rel, body) in files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, body)?;
        }
        git(dir.path(), &["add", "-A"])?;
        git(dir.path(), &["commit", "-q", "-m", "init"])?;
        let repo = GitRepo::open(dir.path())?;
        Ok((dir, repo))
    }

    fn summary(report: DiffReport) -> DiffSummary {
        match report {
            DiffReport::Summary(s) => s,
            DiffReport::PerFile(_) => panic!("shortstat gave per-file output"),
        }
    }

    #[test]
    fn test_open_missing_path_is_precondition() {
        let err = GitRepo::open(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, StyleFitError::Precondition(_)));
    }

    #[test]
    fn test_open_plain_dir_is_precondition() -> anyhow::Result<()> {
        let d = tempfile::tempdir()?;
        let err = GitRepo::open(d.path()).unwrap_err();
        assert!(matches!(err, StyleFitError::Precondition(_)));
        Ok(())
    }

    #[test]
    fn test_clean_detects_unstaged_and_staged_changes() -> anyhow::Result<()> {
        let (dir, repo) = committed(&[("a.c", "int a;\n")])?;
        assert!(repo.is_clean()?);

        fs::write(dir.path().join("a.c"), "int  a;\n")?;
        assert!(!repo.is_clean()?);

        git(dir.path(), &["add", "a.c"])?;
        assert!(!repo.is_clean()?);
        Ok(())
    }

    #[test]
    fn test_revert_restores_tracked_file() -> anyhow::Result<()> {
        let (dir, repo) = committed(&[("src/a.c", "int a;\n")])?;
        fs::write(dir.path().join("src/a.c"), "int a ;\n")?;

        repo.revert()?;

        assert_eq!(fs::read_to_string(dir.path().join("src/a.c"))?, "int a;\n");
        assert!(repo.is_clean()?);
        Ok(())
    }

    #[test]
    fn test_shortstat_honors_ignore_whitespace() -> anyhow::Result<()> {
        let (dir, repo) = committed(&[("a.c", "int a;\nint b;\n")])?;
        fs::write(dir.path().join("a.c"), "int a;   \nint b;\n")?;

        let strict = summary(repo.diff(DiffKind::ShortStat, false)?);
        assert_eq!((strict.files, strict.insertions, strict.deletions), (1, 1, 1));

        let relaxed = summary(repo.diff(DiffKind::ShortStat, true)?);
        assert_eq!(relaxed.insertions + relaxed.deletions, 0);
        Ok(())
    }

    #[test]
    fn test_tracked_files_skip_untracked_and_are_root_relative() -> anyhow::Result<()> {
        let (dir, repo) = committed(&[("a.c", "int a;\n"), ("lib/b.h", "int b;\n")])?;
        fs::write(dir.path().join("scratch.c"), "int s;\n")?;

        let mut tracked = repo.tracked_files()?;
        tracked.sort();
        assert_eq!(tracked, ["a.c", "lib/b.h"]);

        let sub = GitRepo::open(&dir.path().join("lib"))?;
        assert_eq!(sub.tracked_files()?, ["b.h"]);
        Ok(())
    }
}
