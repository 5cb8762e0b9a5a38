//! Feature modules - Markdown post-processing passes
//!
//! This module contains the passes applied after pandoc conversion:
//! - PDF image links to embed figures
//! - Math fences and inline math cleanup
//! - Div-block restructuring
//! - Code-runner annotation
//! - Footnote relocation

pub mod code_runners;
pub mod divs;
pub mod footnotes;
pub mod math;
pub mod pdf;

// Re-export commonly used items
pub use code_runners::annotate_code_blocks;
pub use divs::{restructure_divs, restructure_divs_with_options, DivOptions, FallbackMode};
pub use footnotes::relocate_footnotes;
pub use math::normalize_math;
pub use pdf::embed_pdf_links;
