//! Course package export
//!
//! The final Markdown document is packaged for LMS delivery by the
//! LiaScript exporter, one external process per format. The
//! [`CourseExporter`] trait keeps the pipeline testable without the
//! exporter binary installed.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::Command;

use crate::pipeline::config::ExportMeta;
use crate::utils::error::{TexliaError, TexliaResult};

/// Course package formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Ims,
    Scorm12,
    Scorm2004,
    Web,
}

impl ExportFormat {
    /// Format name understood by the exporter CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Ims => "ims",
            ExportFormat::Scorm12 => "scorm1.2",
            ExportFormat::Scorm2004 => "scorm2004",
            ExportFormat::Web => "web",
        }
    }

    /// Package path stem below the output directory; the exporter appends
    /// `.zip`.
    pub fn output_stem(self) -> &'static str {
        match self {
            ExportFormat::Ims => "course-ims",
            ExportFormat::Scorm12 => "course-scorm12",
            ExportFormat::Scorm2004 => "course-scorm2004",
            ExportFormat::Web => "course-web",
        }
    }
}

/// One export request handed to a [`CourseExporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// The final Markdown document
    pub input: PathBuf,
    /// Course entry file name, relative to `base_path`
    pub readme: String,
    pub format: ExportFormat,
    /// Directory holding the course assets (the scratch workspace)
    pub base_path: PathBuf,
    /// Package path without the `.zip` suffix
    pub output: PathBuf,
}

/// Packages one course in one format.
pub trait CourseExporter {
    fn export(&self, request: &ExportRequest, meta: &ExportMeta) -> TexliaResult<()>;
}

/// Subprocess-backed exporter driving the LiaScript exporter CLI.
#[derive(Debug, Clone)]
pub struct LiaScriptExporter {
    program: String,
}

impl LiaScriptExporter {
    pub fn new() -> Self {
        Self {
            program: "liaex".to_string(),
        }
    }

    /// Use a different exporter binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_args(request: &ExportRequest, meta: &ExportMeta) -> Vec<String> {
        let mut args = vec![
            "--input".to_string(),
            request.input.display().to_string(),
            "--readme".to_string(),
            request.readme.clone(),
            "--format".to_string(),
            request.format.as_str().to_string(),
            "--path".to_string(),
            request.base_path.display().to_string(),
            "--output".to_string(),
            request.output.display().to_string(),
        ];
        if !meta.title.is_empty() {
            args.push("--title".to_string());
            args.push(meta.title.clone());
        }
        if !meta.macro_comment.is_empty() {
            args.push("--comment".to_string());
            args.push(meta.macro_comment.clone());
        }
        if !meta.logo_url.is_empty() {
            args.push("--logo".to_string());
            args.push(meta.logo_url.clone());
        }
        if request.format == ExportFormat::Web {
            args.push("--web-zip".to_string());
        }
        args
    }
}

impl Default for LiaScriptExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseExporter for LiaScriptExporter {
    fn export(&self, request: &ExportRequest, meta: &ExportMeta) -> TexliaResult<()> {
        let args = Self::build_args(request, meta);
        let result = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                TexliaError::export(
                    request.format.as_str(),
                    format!("could not run {}: {}", self.program, e),
                )
            })?;

        if !result.status.success() {
            return Err(TexliaError::export(
                request.format.as_str(),
                format!(
                    "{} exited with {}: {}",
                    self.program,
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
            ));
        }
        Ok(())
    }
}

/// Test exporter that records every request instead of spawning anything.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    requests: RefCell<Vec<ExportRequest>>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ExportRequest> {
        self.requests.borrow().clone()
    }
}

impl CourseExporter for RecordingExporter {
    fn export(&self, request: &ExportRequest, _meta: &ExportMeta) -> TexliaResult<()> {
        self.requests.borrow_mut().push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(format: ExportFormat) -> ExportRequest {
        ExportRequest {
            input: PathBuf::from("/arbeit/kurs.md"),
            readme: "kurs.md".to_string(),
            format,
            base_path: PathBuf::from("/arbeit"),
            output: PathBuf::from("/ziel/course-web"),
        }
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::Scorm12.as_str(), "scorm1.2");
        assert_eq!(ExportFormat::Scorm12.output_stem(), "course-scorm12");
        assert_eq!(ExportFormat::Ims.as_str(), "ims");
        assert_eq!(ExportFormat::Web.output_stem(), "course-web");
    }

    #[test]
    fn test_build_args_order() {
        let meta = ExportMeta {
            title: "Go-Kurs".to_string(),
            macro_comment: String::new(),
            logo_url: String::new(),
        };
        let args = LiaScriptExporter::build_args(&request(ExportFormat::Ims), &meta);
        assert_eq!(
            args,
            vec![
                "--input",
                "/arbeit/kurs.md",
                "--readme",
                "kurs.md",
                "--format",
                "ims",
                "--path",
                "/arbeit",
                "--output",
                "/ziel/course-web",
                "--title",
                "Go-Kurs",
            ]
        );
    }

    #[test]
    fn test_build_args_web_zip() {
        let args = LiaScriptExporter::build_args(&request(ExportFormat::Web), &ExportMeta::default());
        assert_eq!(args.last().map(String::as_str), Some("--web-zip"));
        assert!(!args.contains(&"--title".to_string()));
    }

    #[test]
    fn test_recording_exporter() {
        let exporter = RecordingExporter::new();
        exporter
            .export(&request(ExportFormat::Scorm2004), &ExportMeta::default())
            .unwrap();
        let requests = exporter.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].format, ExportFormat::Scorm2004);
    }

    #[test]
    fn test_missing_binary_is_export_error() {
        let exporter = LiaScriptExporter::with_program("texlia-test-no-such-binary");
        let err = exporter
            .export(&request(ExportFormat::Ims), &ExportMeta::default())
            .unwrap_err();
        assert!(matches!(err, TexliaError::Export { .. }));
    }
}
