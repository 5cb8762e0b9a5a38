//! LaTeX → Markdown conversion
//!
//! The pipeline talks to pandoc through the [`LatexConverter`] trait so
//! tests can swap in a converter that needs no external binary.
//! [`PandocConverter`] runs one pandoc process per document;
//! [`FilteredPandocConverter`] first applies a Lua filter in a LaTeX →
//! LaTeX pass and converts the filtered copy.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::utils::error::{TexliaError, TexliaResult};

/// Converts one LaTeX file into one Markdown file.
pub trait LatexConverter {
    fn convert(&self, input: &Path, output: &Path) -> TexliaResult<()>;
}

/// Runs `pandoc -s -f latex -t gfm --wrap=preserve` with the input's
/// parent directory as working directory so relative includes and images
/// resolve.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
}

impl PandocConverter {
    pub fn new() -> Self {
        Self {
            program: "pandoc".to_string(),
        }
    }

    /// Use a different pandoc binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl LatexConverter for PandocConverter {
    fn convert(&self, input: &Path, output: &Path) -> TexliaResult<()> {
        run_pandoc(
            &self.program,
            &["-s", "-f", "latex", "-t", "gfm", "--wrap=preserve", "--verbose"],
            input,
            output,
        )
    }
}

/// Two-stage conversion: LaTeX → LaTeX through a Lua filter, then the
/// filtered copy → Markdown with listings and MathJax. The intermediate
/// `filtered_temp.tex` is removed on every exit path.
#[derive(Debug, Clone)]
pub struct FilteredPandocConverter {
    program: String,
    lua_filter: PathBuf,
}

impl FilteredPandocConverter {
    pub fn new(lua_filter: impl Into<PathBuf>) -> Self {
        Self {
            program: "pandoc".to_string(),
            lua_filter: lua_filter.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl LatexConverter for FilteredPandocConverter {
    fn convert(&self, input: &Path, output: &Path) -> TexliaResult<()> {
        let filtered = parent_dir(input).join("filtered_temp.tex");
        let filter_arg = format!("--lua-filter={}", self.lua_filter.display());

        let result = run_pandoc(
            &self.program,
            &["-s", "-f", "latex", "-t", "latex", &filter_arg],
            input,
            &filtered,
        )
        .and_then(|()| {
            run_pandoc(
                &self.program,
                &["-s", "-f", "latex", "-t", "markdown", "--listings", "--mathjax"],
                &filtered,
                output,
            )
        });

        if filtered.exists() {
            if let Err(err) = fs::remove_file(&filtered) {
                eprintln!("⚠ Could not remove {}: {}", filtered.display(), err);
            }
        }
        result
    }
}

/// Copies the input unchanged. Lets pipeline tests run without pandoc.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl LatexConverter for IdentityConverter {
    fn convert(&self, input: &Path, output: &Path) -> TexliaResult<()> {
        fs::copy(input, output).map_err(|e| TexliaError::io_at(output, &e))?;
        Ok(())
    }
}

fn parent_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn run_pandoc(program: &str, args: &[&str], input: &Path, output: &Path) -> TexliaResult<()> {
    let result = Command::new(program)
        .args(args)
        .arg("-o")
        .arg(output)
        .arg(input)
        .current_dir(parent_dir(input))
        .output()
        .map_err(|e| TexliaError::converter(format!("could not run {}: {}", program, e)))?;

    if !result.status.success() {
        return Err(TexliaError::converter(format!(
            "{} exited with {}: {}",
            program,
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        )));
    }
    // pandoc reports warnings (missing images, unknown macros) on stderr
    // while still exiting 0
    let stderr = String::from_utf8_lossy(&result.stderr);
    if !stderr.trim().is_empty() {
        eprintln!("⚠ {}: {}", program, stderr.trim());
    }
    Ok(())
}
