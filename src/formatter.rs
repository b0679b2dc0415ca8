// src/formatter.rs
//! Formatter service: rewrites files in place for a given style.

use crate::error::{Result, StyleFitError};
use crate::style::{BaseStyle, Overrides, Style};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Files passed per `clang-format` invocation, to stay under argv limits.
const FILES_PER_CALL: usize = 256;

const DEFAULT_BINARY: &str = "clang-format";

pub trait Formatter {
    /// Reformats `files` (relative to `root`) in place using `style_text`,
    /// a style description in clang-format's `-style=` syntax.
    ///
    /// # Errors
    /// Returns `Tool` if the formatter exits non-zero.
    fn reformat(&self, root: &Path, style_text: &str, files: &[PathBuf]) -> Result<()>;

    /// Every option of `base` with its default value.
    ///
    /// # Errors
    /// Returns `Tool` if the formatter fails or `Yaml` if its dump cannot be
    /// parsed.
    fn dump_config(&self, base: BaseStyle) -> Result<Overrides>;
}

/// The `clang-format` binary.
#[derive(Debug, Clone)]
pub struct ClangFormat {
    binary: PathBuf,
}

impl ClangFormat {
    /// Finds a working `clang-format`.
    ///
    /// With no explicit path, looks in `PATH`. An explicit path may name the
    /// binary itself or the directory containing it.
    ///
    /// # Errors
    /// Returns `ToolNotFound` if no candidate answers `-version`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        let candidates: Vec<PathBuf> = match explicit {
            None => vec![PathBuf::from(DEFAULT_BINARY)],
            Some(p) => vec![p.to_path_buf(), p.join(DEFAULT_BINARY)],
        };

        for binary in candidates {
            if let Some(version) = probe_version(&binary) {
                tracing::info!(binary = %binary.display(), %version, "using clang-format");
                return Ok(Self { binary });
            }
        }

        let detail = match explicit {
            None => "not found in PATH; maybe specify --clang-format-path".to_string(),
            Some(p) => format!("no working binary at {}", p.display()),
        };
        Err(StyleFitError::ToolNotFound {
            tool: DEFAULT_BINARY.to_string(),
            detail,
        })
    }

    fn run(&self, cwd: Option<&Path>, args: &[String]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let output = cmd.output().map_err(|e| StyleFitError::ToolNotFound {
            tool: self.binary.display().to_string(),
            detail: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(StyleFitError::Tool {
                command: format!("{} {}", self.binary.display(), summarize_args(args)),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn probe_version(binary: &Path) -> Option<String> {
    let output = Command::new(binary).arg("-version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    Some(text.lines().next().unwrap_or_default().trim().to_string())
}

fn summarize_args(args: &[String]) -> String {
    const SHOWN: usize = 4;
    if args.len() <= SHOWN {
        return args.join(" ");
    }
    format!("{} ... ({} more)", args[..SHOWN].join(" "), args.len() - SHOWN)
}

impl Formatter for ClangFormat {
    fn reformat(&self, root: &Path, style_text: &str, files: &[PathBuf]) -> Result<()> {
        for chunk in files.chunks(FILES_PER_CALL) {
            let mut args = vec![format!("-style={style_text}"), "-i".to_string()];
            args.extend(chunk.iter().map(|f| f.to_string_lossy().into_owned()));
            self.run(Some(root), &args)?;
        }
        Ok(())
    }

    fn dump_config(&self, base: BaseStyle) -> Result<Overrides> {
        let style = Style::based_on(base).to_inline()?;
        let dumped = self.run(None, &["-dump-config".to_string(), format!("-style={style}")])?;
        Overrides::parse_yaml(&dumped)
    }
}
