//! LaTeX source-tree preprocessing
//!
//! Walks a directory tree for `.tex` files and rewrites each one in place
//! through the [`RewriteEngine`]: the document-level macro pass, the
//! listing-include pass and the stub replacement for missing listing
//! configuration. Files are written back only when their content actually
//! changed, and an [`ExclusionPolicy`] keeps macro-definition files out of
//! the walk entirely.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::core::rewrite::RewriteEngine;
use crate::utils::error::{FileError, RewriteWarning, TexliaError, TexliaResult};

lazy_static! {
    static ref INPUT_CONFIG_LISTINGS: Regex = Regex::new(r"\\input\{config_listings\}").unwrap();
}

/// Comment left in place of `\input{config_listings}`; the listing setup
/// lives in the macro files, which never reach the converter.
const INPUT_STUB_COMMENT: &str = "% config_listings.tex not found - skipped by preprocessor";

// ============================================================================
// EXCLUSIONS
// ============================================================================

/// Which files the preprocessor must not touch.
///
/// A file is excluded when its name equals one of `file_names`, its name
/// matches one of `name_patterns`, or its full path matches one of
/// `path_patterns`. Excluded files are never read.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    pub file_names: Vec<String>,
    pub name_patterns: Vec<Regex>,
    pub path_patterns: Vec<Regex>,
}

impl Default for ExclusionPolicy {
    /// Excludes the macro-definition files; their `\newcommand` bodies look
    /// like macro uses and must not be rewritten.
    fn default() -> Self {
        Self {
            file_names: vec!["macros.tex".to_string(), "makros.tex".to_string()],
            name_patterns: Vec::new(),
            path_patterns: Vec::new(),
        }
    }
}

impl ExclusionPolicy {
    /// A policy that excludes nothing.
    pub fn none() -> Self {
        Self {
            file_names: Vec::new(),
            name_patterns: Vec::new(),
            path_patterns: Vec::new(),
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if self.file_names.iter().any(|name| name == file_name) {
            return true;
        }
        if self.name_patterns.iter().any(|p| p.is_match(file_name)) {
            return true;
        }
        let full_path = path.to_string_lossy();
        self.path_patterns.iter().any(|p| p.is_match(&full_path))
    }

    /// Splits a file list into the files to process and the files to skip.
    pub fn partition(&self, files: Vec<PathBuf>) -> ExclusionReport {
        let mut report = ExclusionReport::default();
        for file in files {
            if self.is_excluded(&file) {
                report.excluded.push(file);
            } else {
                report.included.push(file);
            }
        }
        report
    }
}

/// Outcome of matching a file list against an [`ExclusionPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ExclusionReport {
    pub included: Vec<PathBuf>,
    pub excluded: Vec<PathBuf>,
}

impl ExclusionReport {
    pub fn total(&self) -> usize {
        self.included.len() + self.excluded.len()
    }
}

// ============================================================================
// DISCOVERY
// ============================================================================

/// Recursively collects every `.tex` file below `root` (extension match is
/// case-sensitive). Unreadable directory entries are skipped.
pub fn find_tex_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().map_or(false, |ext| ext == "tex")
        })
        .map(|entry| entry.into_path())
        .collect()
}

// ============================================================================
// PREPROCESSING
// ============================================================================

/// Options for the preprocessing walk.
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    pub exclusions: ExclusionPolicy,
    /// Print per-file status lines while walking
    pub verbose: bool,
    /// Analyze only, never write files back
    pub dry_run: bool,
}

/// Totals of one preprocessing walk.
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub replacements: usize,
    pub errors: Vec<FileError>,
}

impl ProcessingStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Preprocesses every `.tex` file below `root` in place.
///
/// Per-file failures are recorded in [`ProcessingStats::errors`] and the
/// walk continues with the next file.
pub fn preprocess_directory(
    root: &Path,
    engine: &RewriteEngine,
    options: &PreprocessOptions,
) -> ProcessingStats {
    let report = options.exclusions.partition(find_tex_files(root));
    if options.verbose {
        println!(
            "Found {} .tex files, {} excluded",
            report.total(),
            report.excluded.len()
        );
        for path in &report.excluded {
            println!("  ⊘ {}", path.display());
        }
    }

    let mut stats = ProcessingStats {
        files_skipped: report.excluded.len(),
        ..Default::default()
    };
    for path in &report.included {
        match preprocess_tex_file(path, engine, options.dry_run) {
            Ok((replacements, warnings)) => {
                stats.files_processed += 1;
                stats.replacements += replacements;
                if options.verbose {
                    for warning in &warnings {
                        eprintln!("  ⚠ {}: {}", path.display(), warning);
                    }
                    println!("  ✓ {} ({} replacements)", path.display(), replacements);
                }
            }
            Err(err) => {
                if options.verbose {
                    eprintln!("  ✗ {}: {}", path.display(), err);
                }
                stats.errors.push(FileError {
                    path: path.clone(),
                    message: err.to_string(),
                });
            }
        }
    }
    stats
}

/// Preprocesses a single `.tex` file in place.
///
/// Returns `Ok(None)` when the exclusion policy skips the file, otherwise
/// the replacement count.
pub fn preprocess_file(
    path: &Path,
    engine: &RewriteEngine,
    options: &PreprocessOptions,
) -> TexliaResult<Option<usize>> {
    if options.exclusions.is_excluded(path) {
        if options.verbose {
            println!("  ⊘ {}", path.display());
        }
        return Ok(None);
    }
    let (replacements, warnings) = preprocess_tex_file(path, engine, options.dry_run)?;
    if options.verbose {
        for warning in &warnings {
            eprintln!("  ⚠ {}: {}", path.display(), warning);
        }
        println!("  ✓ {} ({} replacements)", path.display(), replacements);
    }
    Ok(Some(replacements))
}

/// The per-file pipeline: engine pass, listing includes, input stubs and
/// a write-back when anything changed.
fn preprocess_tex_file(
    path: &Path,
    engine: &RewriteEngine,
    dry_run: bool,
) -> TexliaResult<(usize, Vec<RewriteWarning>)> {
    let original = fs::read_to_string(path).map_err(|e| TexliaError::io_at(path, &e))?;

    let document = engine.rewrite(&original);
    let listings = engine.rewrite_listing_includes(&document.text);
    let mut content = listings.text;
    let mut replacements = document.replacements + listings.replacements;
    let mut warnings = document.warnings;
    warnings.extend(listings.warnings);

    let stubbed = INPUT_CONFIG_LISTINGS.find_iter(&content).count();
    if stubbed > 0 {
        replacements += stubbed;
        content = INPUT_CONFIG_LISTINGS
            .replace_all(&content, INPUT_STUB_COMMENT)
            .into_owned();
    }

    if content != original && !dry_run {
        fs::write(path, &content).map_err(|e| TexliaError::io_at(path, &e))?;
    }
    Ok((replacements, warnings))
}

// ============================================================================
// TREE COPY
// ============================================================================

/// Copies a directory tree. Existing files in `target` are overwritten.
pub fn copy_dir_recursive(source: &Path, target: &Path) -> TexliaResult<()> {
    fs::create_dir_all(target).map_err(|e| TexliaError::io_at(target, &e))?;
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| TexliaError::Io {
            path: e.path().map(Path::to_path_buf),
            message: e.to_string(),
        })?;
        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).map_err(|e| TexliaError::io_at(&destination, &e))?;
        } else {
            fs::copy(entry.path(), &destination)
                .map_err(|e| TexliaError::io_at(&destination, &e))?;
        }
    }
    Ok(())
}
