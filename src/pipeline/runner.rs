//! The ten-stage pipeline
//!
//! Orchestrates one LaTeX-to-course run:
//!
//! 1. Claim a scratch workspace and copy the source tree into it
//! 2. Preprocess every `.tex` file in place
//! 3. Convert the entry file to Markdown
//! 4. Embed PDF figures
//! 5. Normalize math blocks
//! 6. Restructure div blocks
//! 7. Annotate code blocks with runner directives
//! 8. Relocate footnotes
//! 9. Prepend the header file
//! 10. Export the configured package formats
//!
//! Stages 4-8 are individually toggleable; a disabled stage copies its
//! input through unchanged and reports no progress. Every failure is
//! caught and turned into a [`PipelineOutcome`] with `success: false`;
//! the scratch workspace is removed on every exit path and artifacts
//! already written to the output directory are kept.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::rewrite::RewriteEngine;
use crate::features::{
    annotate_code_blocks, embed_pdf_links, normalize_math, relocate_footnotes, restructure_divs,
};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::export::{CourseExporter, ExportFormat, ExportRequest};
use crate::pipeline::pandoc::LatexConverter;
use crate::utils::error::{TexliaError, TexliaResult};
use crate::utils::files::{copy_dir_recursive, preprocess_directory, PreprocessOptions};

pub const TOTAL_STEPS: u32 = 10;

/// Progress report for one executed pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineProgress {
    pub step: u32,
    pub total_steps: u32,
    pub message: String,
    pub details: Option<String>,
}

/// Final result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub success: bool,
    pub message: String,
    /// Artifacts produced in the output directory
    pub outputs: Vec<PathBuf>,
}

/// Collaborators of one pipeline run: the LaTeX converter, the course
/// exporter and an optional progress callback.
pub struct PipelineHooks<'a> {
    pub converter: &'a dyn LatexConverter,
    pub exporter: &'a dyn CourseExporter,
    pub progress: Option<&'a dyn Fn(&PipelineProgress)>,
}

impl<'a> PipelineHooks<'a> {
    pub fn new(converter: &'a dyn LatexConverter, exporter: &'a dyn CourseExporter) -> Self {
        Self {
            converter,
            exporter,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn Fn(&PipelineProgress)) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Runs the whole pipeline for one configuration.
pub fn run_pipeline(config: &PipelineConfig, hooks: &PipelineHooks) -> PipelineOutcome {
    let report = |step: u32, message: &str| {
        if let Some(progress) = hooks.progress {
            progress(&PipelineProgress {
                step,
                total_steps: TOTAL_STEPS,
                message: message.to_string(),
                details: None,
            });
        }
    };

    report(1, "Claiming scratch workspace");
    let scratch = match tempfile::Builder::new()
        .prefix("texlia-pipeline-")
        .tempdir()
    {
        Ok(dir) => dir,
        Err(err) => {
            return PipelineOutcome {
                success: false,
                message: TexliaError::pipeline(1, err.to_string()).to_string(),
                outputs: Vec::new(),
            }
        }
    };

    let result = execute(config, hooks, scratch.path(), &report);

    let scratch_path = scratch.path().to_path_buf();
    if let Err(err) = scratch.close() {
        eprintln!(
            "⚠ Could not remove scratch workspace {}: {}",
            scratch_path.display(),
            err
        );
    }

    match result {
        Ok(outputs) => PipelineOutcome {
            success: true,
            message: "Pipeline completed".to_string(),
            outputs,
        },
        Err(err) => PipelineOutcome {
            success: false,
            message: err.to_string(),
            outputs: Vec::new(),
        },
    }
}

fn execute(
    config: &PipelineConfig,
    hooks: &PipelineHooks,
    scratch: &Path,
    report: &dyn Fn(u32, &str),
) -> TexliaResult<Vec<PathBuf>> {
    copy_dir_recursive(&config.source_dir, scratch)?;

    report(2, "Preprocessing LaTeX sources");
    let stats = preprocess_directory(scratch, &RewriteEngine::new(), &PreprocessOptions::default());
    if stats.has_errors() {
        eprintln!("⚠ Preprocessing errors in {} file(s)", stats.errors.len());
    }

    report(3, "Converting LaTeX to Markdown");
    let entry = scratch.join(&config.main_tex_file);
    if !entry.is_file() {
        return Err(TexliaError::pipeline(
            3,
            format!("entry file {} not found in source tree", config.main_tex_file),
        ));
    }
    let raw_md = scratch.join("dokument.md");
    hooks.converter.convert(&entry, &raw_md)?;
    keep_stage(config, &raw_md)?;

    let pdf_fixed = scratch.join("dokument_pdffixed.md");
    if config.steps.pdf_embeds {
        report(4, "Embedding PDF figures");
        transform_file(&raw_md, &pdf_fixed, embed_pdf_links)?;
        keep_stage(config, &pdf_fixed)?;
    } else {
        copy_through(&raw_md, &pdf_fixed)?;
    }

    let math_fixed = scratch.join("dokument_mth.md");
    if config.steps.math {
        report(5, "Normalizing math blocks");
        transform_file(&pdf_fixed, &math_fixed, normalize_math)?;
        keep_stage(config, &math_fixed)?;
    } else {
        copy_through(&pdf_fixed, &math_fixed)?;
    }

    let div_fixed = scratch.join("markdown_divfixed.md");
    if config.steps.divs {
        report(6, "Restructuring div blocks");
        transform_file(&math_fixed, &div_fixed, restructure_divs)?;
        keep_stage(config, &div_fixed)?;
    } else {
        copy_through(&math_fixed, &div_fixed)?;
    }

    let transformed = scratch.join("markdown_transformed.md");
    if config.steps.code_runners {
        report(7, "Annotating code blocks");
        transform_file(&div_fixed, &transformed, annotate_code_blocks)?;
        keep_stage(config, &transformed)?;
    } else {
        copy_through(&div_fixed, &transformed)?;
    }

    let final_name = format!("{}.md", entry_stem(&config.main_tex_file));
    let final_md = scratch.join(&final_name);
    if config.steps.footnotes {
        report(8, "Relocating footnotes");
        transform_file(&transformed, &final_md, relocate_footnotes)?;
        keep_stage(config, &final_md)?;
    } else {
        copy_through(&transformed, &final_md)?;
    }

    report(9, "Prepending header file");
    if let Some(header) = &config.prepend_file {
        if header.is_file() {
            let header_content =
                fs::read_to_string(header).map_err(|e| TexliaError::io_at(header, &e))?;
            let document =
                fs::read_to_string(&final_md).map_err(|e| TexliaError::io_at(&final_md, &e))?;
            fs::write(&final_md, format!("{}\n\n{}", header_content, document))
                .map_err(|e| TexliaError::io_at(&final_md, &e))?;
        }
    }

    report(10, "Exporting course packages");
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| TexliaError::io_at(&config.output_dir, &e))?;

    let request = |format: ExportFormat, readme: &str| ExportRequest {
        input: final_md.clone(),
        readme: readme.to_string(),
        format,
        base_path: scratch.to_path_buf(),
        output: config.output_dir.join(format.output_stem()),
    };

    let mut outputs = Vec::new();
    if config.exports.markdown {
        let target = config.output_dir.join(&final_name);
        fs::copy(&final_md, &target).map_err(|e| TexliaError::io_at(&target, &e))?;
        outputs.push(target);
    }
    if config.exports.ims {
        hooks
            .exporter
            .export(&request(ExportFormat::Ims, &final_name), &config.meta)?;
        outputs.push(package_path(config, ExportFormat::Ims));
    }
    // SCORM readmes carry the stage-7 file name
    if config.exports.scorm12 {
        hooks.exporter.export(
            &request(ExportFormat::Scorm12, "markdown_transformed.md"),
            &config.meta,
        )?;
        outputs.push(package_path(config, ExportFormat::Scorm12));
    }
    if config.exports.scorm2004 {
        hooks.exporter.export(
            &request(ExportFormat::Scorm2004, "markdown_transformed.md"),
            &config.meta,
        )?;
        outputs.push(package_path(config, ExportFormat::Scorm2004));
    }
    if config.exports.web {
        hooks
            .exporter
            .export(&request(ExportFormat::Web, &final_name), &config.meta)?;
        outputs.push(package_path(config, ExportFormat::Web));
    }

    Ok(outputs)
}

fn transform_file(
    input: &Path,
    output: &Path,
    transform: impl Fn(&str) -> String,
) -> TexliaResult<()> {
    let content = fs::read_to_string(input).map_err(|e| TexliaError::io_at(input, &e))?;
    fs::write(output, transform(&content)).map_err(|e| TexliaError::io_at(output, &e))?;
    Ok(())
}

fn copy_through(input: &Path, output: &Path) -> TexliaResult<()> {
    fs::copy(input, output).map_err(|e| TexliaError::io_at(output, &e))?;
    Ok(())
}

fn keep_stage(config: &PipelineConfig, stage_file: &Path) -> TexliaResult<()> {
    if !config.keep_stage_outputs {
        return Ok(());
    }
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| TexliaError::io_at(&config.output_dir, &e))?;
    let file_name = match stage_file.file_name() {
        Some(name) => name,
        None => return Ok(()),
    };
    let target = config.output_dir.join(file_name);
    fs::copy(stage_file, &target).map_err(|e| TexliaError::io_at(&target, &e))?;
    Ok(())
}

fn package_path(config: &PipelineConfig, format: ExportFormat) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.zip", format.output_stem()))
}

fn entry_stem(main_tex_file: &str) -> String {
    Path::new(main_tex_file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dokument".to_string())
}
