//! Core rewriting modules
//!
//! This module contains the macro rewrite stage that runs over LaTeX
//! sources before they are handed to pandoc:
//! - `rewrite`: brace-aware extraction and the rule-driven engine

pub mod rewrite;

// Re-export main types and functions from rewrite
pub use rewrite::{extract_braced, extract_parameters, RewriteEngine, RewriteOutcome};
