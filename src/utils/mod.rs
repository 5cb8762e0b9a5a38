//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error, result and warning types
//! - File discovery, exclusion policies and the preprocessing walk

pub mod error;
pub mod files;

// Re-export commonly used items
pub use error::{FileError, RewriteWarning, TexliaError, TexliaResult};
pub use files::{
    copy_dir_recursive, find_tex_files, preprocess_directory, preprocess_file, ExclusionPolicy,
    ExclusionReport, PreprocessOptions, ProcessingStats,
};
