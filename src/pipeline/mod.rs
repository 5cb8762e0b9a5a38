//! LaTeX → LiaScript course pipeline
//!
//! This module contains the end-to-end pipeline:
//! - Run configuration (stage and export toggles, course metadata)
//! - Pandoc-backed LaTeX → Markdown conversion behind a trait
//! - Course package export behind a trait
//! - The ten-stage orchestrator

pub mod config;
pub mod export;
pub mod pandoc;
pub mod runner;

// Re-export commonly used items
pub use config::{ExportMeta, ExportToggles, PipelineConfig, StepToggles};
pub use export::{
    CourseExporter, ExportFormat, ExportRequest, LiaScriptExporter, RecordingExporter,
};
pub use pandoc::{FilteredPandocConverter, IdentityConverter, LatexConverter, PandocConverter};
pub use runner::{run_pipeline, PipelineHooks, PipelineOutcome, PipelineProgress, TOTAL_STEPS};
