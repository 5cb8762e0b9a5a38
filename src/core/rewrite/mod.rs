//! LaTeX macro rewriting
//!
//! This module contains the rewrite machinery applied before conversion:
//! - `braces`: brace-aware content and parameter extraction
//! - `engine`: fixed-order interpreter over the rule table
//! - `boxes`: content builders for box macros and literature items

pub mod boxes;
pub mod braces;
pub mod engine;

// Re-export commonly used items
pub use boxes::{build_box_content, build_literature_item, wrap_in_environment};
pub use braces::{extract_braced, extract_parameters};
pub use engine::{RewriteEngine, RewriteOutcome};
