//! # texlia
//!
//! LaTeX → LiaScript Markdown course pipeline written in Rust.
//!
//! ## Features
//!
//! - **Macro Rewriting**: a declarative rule table drives the rewrite of
//!   book-specific LaTeX macros into plain constructs pandoc understands
//! - **Tree Preprocessing**: walks a LaTeX source tree and rewrites every
//!   `.tex` file in place, with exclusions for macro-definition files
//! - **Markdown Fix-ups**: div-block restructuring, footnote relocation,
//!   math normalization, code-runner annotation, PDF figure embedding
//! - **Course Export**: ten-stage pipeline from LaTeX sources to Markdown,
//!   IMS, SCORM 1.2 / 2004 and web packages
//!
//! ## Usage Examples
//!
//! ### Macro Rewriting
//!
//! ```rust
//! use texlia::RewriteEngine;
//!
//! let engine = RewriteEngine::new();
//! let out = engine.rewrite("Der Befehl \\ffc{go run} und \\cite{DK16}.");
//! assert_eq!(out.text, "Der Befehl \\texttt{go run} und [\\textbf{DK16}].");
//! ```
//!
//! ### Markdown Fix-ups
//!
//! ```rust
//! use texlia::features::normalize_math;
//!
//! let fixed = normalize_math("```math\nx^2\n```");
//! assert_eq!(fixed, "$$\nx^2\n$$");
//! ```

/// Core rewrite modules
pub mod core;

/// Data layer - rule tables and static mappings
pub mod data;

/// Feature modules - Markdown fix-up passes
pub mod features;

/// Pipeline - LaTeX sources to course packages
pub mod pipeline;

/// Utility modules
pub mod utils;

// Re-export core rewrite items
pub use crate::core::rewrite::{extract_braced, extract_parameters, RewriteEngine, RewriteOutcome};

// Re-export the rule registry
pub use data::rules::{FormatStyle, RuleSet};
pub use data::runners::runner_for;

// Re-export feature passes
pub use features::{
    annotate_code_blocks, embed_pdf_links, normalize_math, relocate_footnotes, restructure_divs,
    restructure_divs_with_options, DivOptions, FallbackMode,
};

// Re-export the pipeline surface
pub use pipeline::{
    run_pipeline, CourseExporter, ExportFormat, ExportMeta, ExportRequest, ExportToggles,
    LatexConverter, LiaScriptExporter, PandocConverter, PipelineConfig, PipelineHooks,
    PipelineOutcome, PipelineProgress, StepToggles,
};

// Re-export utilities
pub use utils::error::{RewriteWarning, TexliaError, TexliaResult};
pub use utils::files::{
    preprocess_directory, preprocess_file, ExclusionPolicy, PreprocessOptions, ProcessingStats,
};

/// Rewrites one LaTeX string with the builtin rule table.
///
/// # Arguments
/// * `input` - LaTeX source text
///
/// # Returns
/// The rewritten text plus replacement count and warnings
pub fn rewrite_latex(input: &str) -> RewriteOutcome {
    RewriteEngine::new().rewrite(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_latex_basic() {
        let out = rewrite_latex("\\ffc{ls -la}");
        assert_eq!(out.text, "\\texttt{ls -la}");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_rewrite_latex_warns_on_short_parameter_list() {
        let out = rewrite_latex("\\sttpKommLitItem{Autor}{2020}");
        assert!(out.has_warnings());
    }

    #[test]
    fn test_feature_passes_compose() {
        let markdown = "```math\nE = mc^2\n```\n\n```python\nprint(1)\n```\n";
        let fixed = annotate_code_blocks(&normalize_math(markdown));
        assert!(fixed.contains("$$\nE = mc^2\n$$"));
        assert!(fixed.contains("```\n@LIA.python"));
    }
}
