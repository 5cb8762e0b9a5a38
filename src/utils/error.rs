//! Error handling for texlia
//!
//! This module provides the unified error and result types used by the
//! rewrite engine, the file preprocessor and the pipeline, plus the
//! non-fatal warning type collected while rewriting.

use std::fmt;
use std::path::PathBuf;

/// Error type for rewrite and pipeline operations
#[derive(Debug, Clone)]
pub enum TexliaError {
    /// Brace scanning ran off the end of the input
    UnbalancedBraces { position: usize },
    /// A macro supplied fewer brace groups than its rule requires
    MissingParameters {
        macro_name: String,
        expected: usize,
        found: usize,
        position: usize,
    },
    /// IO error (for file operations)
    Io {
        path: Option<PathBuf>,
        message: String,
    },
    /// External LaTeX -> Markdown converter failed
    Converter { message: String },
    /// Course exporter failed for one target format
    Export { format: String, message: String },
    /// Invalid configuration or rule table
    Config { message: String },
    /// A pipeline stage failed
    Pipeline { step: u32, message: String },
}

impl fmt::Display for TexliaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TexliaError::UnbalancedBraces { position } => {
                write!(f, "Unbalanced braces starting at position {}", position)
            }
            TexliaError::MissingParameters {
                macro_name,
                expected,
                found,
                position,
            } => {
                write!(
                    f,
                    "Incomplete \\{} at position {} ({}/{} parameters)",
                    macro_name, position, found, expected
                )
            }
            TexliaError::Io { path, message } => {
                if let Some(p) = path {
                    write!(f, "IO error for {}: {}", p.display(), message)
                } else {
                    write!(f, "IO error: {}", message)
                }
            }
            TexliaError::Converter { message } => {
                write!(f, "Converter error: {}", message)
            }
            TexliaError::Export { format, message } => {
                write!(f, "Export error ({}): {}", format, message)
            }
            TexliaError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            TexliaError::Pipeline { step, message } => {
                write!(f, "Pipeline step {} failed: {}", step, message)
            }
        }
    }
}

impl std::error::Error for TexliaError {}

impl From<std::io::Error> for TexliaError {
    fn from(err: std::io::Error) -> Self {
        TexliaError::Io {
            path: None,
            message: err.to_string(),
        }
    }
}

/// Result type for rewrite and pipeline operations
pub type TexliaResult<T> = Result<T, TexliaError>;

// Convenience constructors
impl TexliaError {
    pub fn unbalanced(position: usize) -> Self {
        TexliaError::UnbalancedBraces { position }
    }

    pub fn missing_parameters(
        macro_name: impl Into<String>,
        expected: usize,
        found: usize,
        position: usize,
    ) -> Self {
        TexliaError::MissingParameters {
            macro_name: macro_name.into(),
            expected,
            found,
            position,
        }
    }

    pub fn io_at(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        TexliaError::Io {
            path: Some(path.into()),
            message: err.to_string(),
        }
    }

    pub fn converter(message: impl Into<String>) -> Self {
        TexliaError::Converter {
            message: message.into(),
        }
    }

    pub fn export(format: impl Into<String>, message: impl Into<String>) -> Self {
        TexliaError::Export {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        TexliaError::Config {
            message: message.into(),
        }
    }

    pub fn pipeline(step: u32, message: impl Into<String>) -> Self {
        TexliaError::Pipeline {
            step,
            message: message.into(),
        }
    }
}

/// Rewrite warnings (non-fatal issues, the document keeps processing)
#[derive(Debug, Clone)]
pub struct RewriteWarning {
    pub message: String,
    pub position: Option<usize>,
}

impl RewriteWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

impl fmt::Display for RewriteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pos) = self.position {
            write!(f, "Warning at position {}: {}", pos, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

/// Per-file failure recorded while walking a source tree
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
