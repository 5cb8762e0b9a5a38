//! Integration tests for the Texlia LaTeX → LiaScript course pipeline

use texlia::{
    annotate_code_blocks, embed_pdf_links, normalize_math, relocate_footnotes, restructure_divs,
    rewrite_latex, RewriteEngine,
};

// ============================================================================
// Macro rewriting over course sources
// ============================================================================

mod macro_rewriting {
    use super::*;

    #[test]
    fn test_chapter_paragraph() {
        let latex = "\\minisec{Slices}\n\
                     Ein Slice (\\ffc{[]T}) ist ein \\emphi{dynamischer} Ausschnitt.\n\
                     Siehe \\cite{DK16} und \\textrm{Kapitel {3}}.\n";
        let out = rewrite_latex(latex);
        assert_eq!(
            out.text,
            "\\textbf{\\emph{Slices}}\\hfill\\break\n\n\
             Ein Slice (\\texttt{[]T}) ist ein \\emph{dynamischer} Ausschnitt.\n\
             Siehe [\\textbf{DK16}] und Kapitel {3}.\n"
        );
        assert!(!out.has_warnings());
    }

    #[test]
    fn test_citation_page_ranges_drop_to_key() {
        let out = rewrite_latex("Vgl. \\cite[S.~12]{DK16} und \\cite{BA19}.");
        assert_eq!(out.text, "Vgl. [\\textbf{DK16}] und [\\textbf{BA19}].");
    }

    #[test]
    fn test_environment_title_with_inline_code() {
        let latex =
            "\\begin{sprachvgl}[Java]\nIn Java ist \\ffc{ArrayList} üblich.\n\\end{sprachvgl}\n";
        let out = rewrite_latex(latex);
        assert_eq!(
            out.text,
            "\\begin{sprachvgl}\n\\textbf{\\emph{Java}}\\\\\\\\\n\
             In Java ist \\texttt{ArrayList} üblich.\n\\end{sprachvgl}\n"
        );
    }

    #[test]
    fn test_operator_names_become_math_text() {
        let out = rewrite_latex("Bitweise: \\andOp, \\orOp und \\xorOp.");
        assert_eq!(
            out.text,
            "Bitweise: $\\text{AND}$, $\\text{OR}$ und $\\text{XOR}$."
        );
        assert_eq!(out.replacements, 3);
    }

    #[test]
    fn test_literature_items_in_sequence() {
        let latex = "\\sttpKommLitItem{Donovan \\& Kernighan}{2016}{The Go Programming Language}{DK16}{}{}{Das Standardwerk.}\n\
                     \\sttpKommLitItemMitFussnote{Balbaert}{2019}{Go Bootcamp}{BA19}{}{}{Kompakt.}{Nur online verfügbar.}";
        let out = rewrite_latex(latex);
        assert!(out.text.contains(
            "\\emph{Donovan \\& Kernighan} \\emph{2016}. \\emph{The Go Programming Language} [\\textbf{DK16}]"
        ));
        assert!(out
            .text
            .contains("[\\textbf{BA19}]\\footnote{Nur online verfügbar.}"));
        let first = out.text.find("\\begin{KommLitItem}").unwrap();
        let second = out.text.rfind("\\begin{KommLitItem}").unwrap();
        assert!(first < second, "each item should expand to its own block");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_mind_map_labels_collapse_to_code() {
        let out = rewrite_latex(
            "\\sttpMindMapText[scale=0.9]{\\textbf{\\textsf{Nebenläufigkeit}}} und \\sttpMindMapText{Kanäle}",
        );
        assert_eq!(out.text, "\\texttt{Nebenläufigkeit} und \\texttt{Kanäle}");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_incomplete_box_keeps_text_and_warns() {
        let out = rewrite_latex("Anfang \\sttpUniversalkasten{Titel} Ende");
        assert_eq!(out.text, "Anfang \\sttpUniversalkasten{Titel} Ende");
        assert_eq!(out.replacements, 0);
        assert!(out.has_warnings());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].position, Some(7));
        assert!(out.warnings[0].message.contains("sttpUniversalkasten"));
        assert!(out.warnings[0].message.contains("1/2"));
    }

    #[test]
    fn test_listing_includes_are_a_separate_pass() {
        let engine = RewriteEngine::new();
        let input = "\\codeRahmenDateiName[label=lst:srv]{code/server.go}{Ein~kleiner~HTTP-Server}";
        let first = engine.rewrite(input);
        assert_eq!(first.text, input);

        let second = engine.rewrite_listing_includes(&first.text);
        assert_eq!(
            second.text,
            "\\lstinputlisting[language=Go, caption={Ein kleiner HTTP-Server}, label=lst:srv]{code/server.go}"
        );
        assert_eq!(second.replacements, 1);
    }
}

// ============================================================================
// Box macros meeting the div pass
// ============================================================================

mod course_boxes {
    use super::*;

    // The engine emits the box environment, pandoc renders that as a div
    // with the environment name as class, the div pass quotes it.
    #[test]
    fn test_universal_box_reaches_quote_form() {
        let out = rewrite_latex("\\sttpUniversalkasten{Merke}{Slices teilen ihr Array.}");
        assert!(out.text.starts_with("\\begin{Universalkasten}"));
        assert!(out.text.contains("\\textbf{\\emph{Merke}}"));
        assert!(out.text.contains("\\end{Universalkasten}"));

        let rendered =
            "<div class=\"Universalkasten\">\n**_Merke_**\n\nSlices teilen ihr Array.\n</div>\n";
        assert_eq!(
            restructure_divs(rendered),
            "> **_Merke_**\n>\n> Slices teilen ihr Array.\n\n"
        );
    }

    #[test]
    fn test_definition_box_reaches_quote_form() {
        let out = rewrite_latex(
            "\\sttpDefinitionskasten{0.9}{Slice}{Dynamischer Ausschnitt auf ein Array}{Die Länge ist variabel.}",
        );
        assert!(out.text.starts_with("\\begin{Definitionskasten}"));
        assert!(out.text.contains("\\textbf{\\emph{Slice}}"));

        let rendered = "<div class=\"Definitionskasten\">\n**_Slice_**\n\n\
                        _Dynamischer Ausschnitt auf ein Array_\n\nDie Länge ist variabel.\n</div>\n";
        let fixed = restructure_divs(rendered);
        assert!(fixed.starts_with("> **Definition 📓**\n>\n>> **_Slice_**\n"));
        assert!(fixed.contains("\n> Die Länge ist variabel.\n"));
    }

    #[test]
    fn test_author_portrait_div_becomes_quote() {
        let rendered = "<div class=\"Autorenkasten\">\n<img src=\"pike.jpg\" />\n\n\
                        **Rob Pike** **(*1956)**\n\nMitentwickler von Go.\n</div>\n";
        assert_eq!(
            restructure_divs(rendered),
            "> <img src=\"pike.jpg\" />\n>\n> **Rob Pike** **(*1956)**\n>\n> Mitentwickler von Go.\n\n"
        );
    }

    #[test]
    fn test_div_embedded_in_chapter_text() {
        let input = "# Kapitel\n\nEinleitung.\n\n<div class=\"hinweis\">\n\
                     Slices niemals kopieren.\n</div>\n\nDanach weiter.\n";
        assert_eq!(
            restructure_divs(input),
            "# Kapitel\n\nEinleitung.\n\n> **Hinweis ⚠️**\n>\n\
             > Slices niemals kopieren.\n\n\nDanach weiter.\n"
        );
    }
}

// ============================================================================
// Source tree preprocessing
// ============================================================================

mod source_preprocessing {
    use std::fs;

    use tempfile::tempdir;
    use texlia::{preprocess_directory, PreprocessOptions, RewriteEngine};

    #[test]
    fn test_course_tree_is_rewritten_in_place() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("kapitel")).unwrap();
        fs::write(
            dir.path().join("buch.tex"),
            "\\input{config_listings}\n\\input{kapitel/k1}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("kapitel").join("k1.tex"),
            "\\ffc{go run}\n\\codeRahmenDateiName[label=lst:m]{code/main.go}{Das~Hauptprogramm}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("macros.tex"),
            "\\newcommand{\\ffc}[1]{\\texttt{#1}}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notizen.md"), "\\ffc{nicht anfassen}\n").unwrap();

        let stats = preprocess_directory(
            dir.path(),
            &RewriteEngine::new(),
            &PreprocessOptions::default(),
        );
        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.replacements, 3);
        assert!(!stats.has_errors());

        let book = fs::read_to_string(dir.path().join("buch.tex")).unwrap();
        assert_eq!(
            book,
            "% config_listings.tex not found - skipped by preprocessor\n\\input{kapitel/k1}\n"
        );
        let chapter = fs::read_to_string(dir.path().join("kapitel").join("k1.tex")).unwrap();
        assert_eq!(
            chapter,
            "\\texttt{go run}\n\\lstinputlisting[language=Go, caption={Das Hauptprogramm}, label=lst:m]{code/main.go}\n"
        );
        let macros = fs::read_to_string(dir.path().join("macros.tex")).unwrap();
        assert_eq!(macros, "\\newcommand{\\ffc}[1]{\\texttt{#1}}\n");
        let notes = fs::read_to_string(dir.path().join("notizen.md")).unwrap();
        assert_eq!(notes, "\\ffc{nicht anfassen}\n");
    }
}

// ============================================================================
// Markdown fix-up passes in sequence
// ============================================================================

mod markdown_fixups {
    use super::*;

    #[test]
    fn test_stage_chain_on_rendered_document() {
        let rendered = "# Go-Grundlagen\n\n\
                        Die Architektur ![image](schaubild_v1.pdf) zeigt den Ablauf.\n\n\
                        ``` math\nc = \\sqrt{a^2 + b^2}\n```\n\n\
                        <div class=\"hinweis\">\nFehler[^1] immer prüfen.\n</div>\n\n\
                        ```go\npackage main\n```\n\n\
                        ## Vertiefung\n\nSchluss.\n\n\
                        [^1]: Der Zweitwert des Aufrufs.\n";

        let fixed = relocate_footnotes(&annotate_code_blocks(&restructure_divs(&normalize_math(
            &embed_pdf_links(rendered),
        ))));

        assert!(fixed.contains("<embed src=\"schaubild_v1.pdf\""));
        assert!(fixed.contains("<figcaption>schaubild v1</figcaption>"));
        assert!(fixed.contains("$$\nc = \\sqrt{a^2 + b^2}\n$$"));
        assert!(fixed.contains("> **Hinweis ⚠️**\n>\n> Fehler[^1] immer prüfen."));
        assert!(fixed.contains("```go\npackage main\n```\n@LIA.go"));
        assert!(fixed.contains("[^1]: Der Zweitwert des Aufrufs.\n\n## Vertiefung"));
        assert!(!fixed.contains("``` math"));
        assert!(!fixed.contains("![image]"));
    }

    #[test]
    fn test_inline_math_spacing_sentence() {
        let fixed = normalize_math("Die Formel $`a^2`$ in `WENN `$x$` dann`.");
        assert_eq!(fixed, "Die Formel $a^2$ in `WENN` $x$ `dann`.");
    }

    #[test]
    fn test_footnotes_return_to_their_sections() {
        let input = "# Slices\n\nAbschnitt[^1] eins.\n\n# Maps\n\nAbschnitt[^2] zwei.\n\n\
                     [^1]: Erste Fußnote\n\n[^2]: Zweite Fußnote\n";
        assert_eq!(
            relocate_footnotes(input),
            "# Slices\n\nAbschnitt[^1] eins.\n\n[^1]: Erste Fußnote\n\n\
             # Maps\n\nAbschnitt[^2] zwei.\n\n[^2]: Zweite Fußnote\n"
        );
    }
}

// ============================================================================
// Full pipeline runs
// ============================================================================

mod full_pipeline {
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;
    use texlia::pipeline::{IdentityConverter, RecordingExporter};
    use texlia::{
        run_pipeline, ExportFormat, ExportToggles, PipelineConfig, PipelineHooks,
        PipelineProgress, StepToggles,
    };

    fn seed_course(dir: &Path) {
        fs::write(
            dir.join("kurs.tex"),
            "# Go-Kurs\n\n\
             Der Aufruf \\ffc{go test} prüft[^1] alles.\n\n\
             ``` math\nn \\cdot \\log n\n```\n\n\
             ```go\nfunc TestMain(t *testing.T) {}\n```\n\n\
             ## Anhang\n\nEnde.\n\n\
             [^1]: Mit Cache.\n",
        )
        .unwrap();
        fs::write(dir.join("macros.tex"), "% bleibt wie es ist\n").unwrap();
    }

    #[test]
    fn test_full_run_produces_markdown_and_packages() {
        let source = tempdir().unwrap();
        seed_course(source.path());
        let scratch = tempdir().unwrap();
        let output_dir = scratch.path().join("dist");

        let mut config = PipelineConfig::new(source.path(), "kurs.tex", &output_dir);
        config.exports = ExportToggles::all();
        config.meta.title = "Go-Kurs".to_string();

        let converter = IdentityConverter;
        let exporter = RecordingExporter::new();
        let seen = RefCell::new(Vec::new());
        let progress = |p: &PipelineProgress| seen.borrow_mut().push(p.step);
        let hooks = PipelineHooks::new(&converter, &exporter).with_progress(&progress);

        let outcome = run_pipeline(&config, &hooks);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        let final_md = fs::read_to_string(output_dir.join("kurs.md")).unwrap();
        assert!(final_md.contains("\\texttt{go test}"));
        assert!(final_md.contains("$$\nn \\cdot \\log n\n$$"));
        assert!(final_md.contains("```\n@LIA.go"));
        assert!(final_md.contains("[^1]: Mit Cache.\n\n## Anhang"));

        let requests = exporter.requests();
        let formats: Vec<ExportFormat> = requests.iter().map(|r| r.format).collect();
        assert_eq!(
            formats,
            vec![
                ExportFormat::Ims,
                ExportFormat::Scorm12,
                ExportFormat::Scorm2004,
                ExportFormat::Web,
            ]
        );
        let readmes: Vec<&str> = requests.iter().map(|r| r.readme.as_str()).collect();
        assert_eq!(
            readmes,
            vec![
                "kurs.md",
                "markdown_transformed.md",
                "markdown_transformed.md",
                "kurs.md",
            ]
        );
        assert!(requests.iter().all(|r| r.input.ends_with("kurs.md")));

        assert_eq!(
            outcome.outputs,
            vec![
                output_dir.join("kurs.md"),
                output_dir.join("course-ims.zip"),
                output_dir.join("course-scorm12.zip"),
                output_dir.join("course-scorm2004.zip"),
                output_dir.join("course-web.zip"),
            ]
        );
    }

    #[test]
    fn test_prepend_header_and_skipped_stages() {
        let source = tempdir().unwrap();
        fs::write(
            source.path().join("kurs.tex"),
            "Text[^1] hier.\n\n## Ende\n\nAus.\n\n[^1]: Fußnote\n",
        )
        .unwrap();
        let header = source.path().join("kopf.md");
        fs::write(&header, "<!--\nauthor: Kursteam\n-->").unwrap();

        let scratch = tempdir().unwrap();
        let output_dir = scratch.path().join("dist");
        let mut config = PipelineConfig::new(source.path(), "kurs.tex", &output_dir);
        config.prepend_file = Some(header);
        config.steps = StepToggles {
            footnotes: true,
            ..StepToggles::none()
        };

        let converter = IdentityConverter;
        let exporter = RecordingExporter::new();
        let seen = RefCell::new(Vec::new());
        let progress = |p: &PipelineProgress| seen.borrow_mut().push(p.step);
        let hooks = PipelineHooks::new(&converter, &exporter).with_progress(&progress);

        let outcome = run_pipeline(&config, &hooks);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 8, 9, 10]);

        let final_md = fs::read_to_string(output_dir.join("kurs.md")).unwrap();
        assert!(final_md.starts_with("<!--\nauthor: Kursteam\n-->\n\n"));
        assert!(final_md.contains("[^1]: Fußnote\n\n## Ende"));
    }

    #[test]
    fn test_missing_source_tree_fails_cleanly() {
        let scratch = tempdir().unwrap();
        let config = PipelineConfig::new(
            scratch.path().join("gibt-es-nicht"),
            "kurs.tex",
            scratch.path().join("dist"),
        );
        let converter = IdentityConverter;
        let exporter = RecordingExporter::new();
        let outcome = run_pipeline(&config, &PipelineHooks::new(&converter, &exporter));
        assert!(!outcome.success);
        assert!(!outcome.message.is_empty());
        assert!(outcome.outputs.is_empty());
    }
}

// ============================================================================
// Loaded rule tables
// ============================================================================

#[cfg(feature = "data-loading")]
mod loaded_tables {
    use texlia::{RewriteEngine, RuleSet};

    #[test]
    fn test_loaded_table_drives_the_engine() {
        let json = r#"{
            "simple": [
                { "name": "cmd", "macro_name": "cmd", "style": "code", "description": "shell command" }
            ],
            "text": [
                { "name": "bzw", "macro_name": "bzw", "replacement": "beziehungsweise", "description": "" }
            ]
        }"#;
        let rules = RuleSet::from_json_str(json).unwrap();
        let engine = RewriteEngine::with_rules(&rules).unwrap();

        let out = engine.rewrite("\\cmd{ls -la} \\bzw \\ffc{x}");
        assert_eq!(out.text, "\\texttt{ls -la} beziehungsweise \\ffc{x}");
        assert_eq!(out.replacements, 2);
    }
}
