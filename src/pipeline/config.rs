//! Pipeline configuration
//!
//! Plain data structs describing one pipeline run: where the LaTeX
//! sources live, which Markdown fix-up stages run, which package formats
//! are exported, and the course metadata handed to the exporter.

use std::path::PathBuf;

/// Configuration of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the LaTeX sources; copied to scratch before any
    /// file is touched
    pub source_dir: PathBuf,
    /// Entry file, relative to `source_dir`; its stem names the final
    /// Markdown document
    pub main_tex_file: String,
    /// Where final artifacts (and kept stage outputs) land
    pub output_dir: PathBuf,
    /// Markdown file prepended to the final document when it exists
    pub prepend_file: Option<PathBuf>,
    /// Copy every executed stage's output file into `output_dir`
    pub keep_stage_outputs: bool,
    pub steps: StepToggles,
    pub exports: ExportToggles,
    pub meta: ExportMeta,
}

impl PipelineConfig {
    /// Configuration with all fix-up stages on and a Markdown-only export.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        main_tex_file: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            main_tex_file: main_tex_file.into(),
            output_dir: output_dir.into(),
            prepend_file: None,
            keep_stage_outputs: false,
            steps: StepToggles::all(),
            exports: ExportToggles::markdown_only(),
            meta: ExportMeta::default(),
        }
    }
}

/// Which of the Markdown fix-up stages run. A disabled stage passes its
/// input through as a byte-for-byte copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepToggles {
    pub pdf_embeds: bool,
    pub math: bool,
    pub divs: bool,
    pub code_runners: bool,
    pub footnotes: bool,
}

impl StepToggles {
    pub fn all() -> Self {
        Self {
            pdf_embeds: true,
            math: true,
            divs: true,
            code_runners: true,
            footnotes: true,
        }
    }

    pub fn none() -> Self {
        Self {
            pdf_embeds: false,
            math: false,
            divs: false,
            code_runners: false,
            footnotes: false,
        }
    }
}

impl Default for StepToggles {
    fn default() -> Self {
        Self::all()
    }
}

/// Which course packages the export stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportToggles {
    /// Plain copy of the final Markdown document
    pub markdown: bool,
    pub ims: bool,
    pub scorm12: bool,
    pub scorm2004: bool,
    pub web: bool,
}

impl ExportToggles {
    pub fn markdown_only() -> Self {
        Self {
            markdown: true,
            ims: false,
            scorm12: false,
            scorm2004: false,
            web: false,
        }
    }

    pub fn all() -> Self {
        Self {
            markdown: true,
            ims: true,
            scorm12: true,
            scorm2004: true,
            web: true,
        }
    }
}

impl Default for ExportToggles {
    fn default() -> Self {
        Self::markdown_only()
    }
}

/// Course metadata forwarded to the exporter.
#[derive(Debug, Clone, Default)]
pub struct ExportMeta {
    /// Course title
    pub title: String,
    /// Comment line injected into the course header
    pub macro_comment: String,
    /// Logo URL shown on the course page
    pub logo_url: String,
}
