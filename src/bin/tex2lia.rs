//! Texlia CLI - LaTeX to LiaScript Markdown course pipeline

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use texlia::{
    annotate_code_blocks,
    data::rules::SpecialAction,
    embed_pdf_links, normalize_math, preprocess_directory, relocate_footnotes, restructure_divs,
    run_pipeline, ExclusionPolicy, ExportToggles, FormatStyle, LiaScriptExporter, PandocConverter,
    PipelineConfig, PipelineHooks, PipelineProgress, PreprocessOptions, RewriteEngine,
    RewriteWarning, RuleSet,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tex2lia")]
#[command(version)]
#[command(about = "Texlia - LaTeX to LiaScript Markdown course pipeline", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// LaTeX input file (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Also rewrite listing-include macros (normally a per-file pass)
    #[arg(long)]
    listings: bool,

    /// Strict mode: exit with error if any rewrite warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Rewrite course macros in a LaTeX document (default action)
    Rewrite {
        /// LaTeX input file (reads from stdin if not provided)
        input: Option<String>,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,

        /// Also rewrite listing-include macros
        #[arg(long)]
        listings: bool,

        /// Exit with error if any rewrite warnings occur
        #[arg(long)]
        strict: bool,

        /// Suppress warning output to stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// Rewrite every .tex file below a directory in place
    Preprocess {
        /// Directory to walk for .tex files
        dir: String,

        /// File names to exclude, on top of the macro-definition files
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,

        /// Report every file while walking
        #[arg(short, long)]
        verbose: bool,

        /// Count replacements without writing anything back
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply Markdown fix-up passes to a converted document
    Fix {
        /// Markdown input file (reads from stdin if not provided)
        input: Option<String>,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,

        /// Pass to apply, in the given order (all five in pipeline order if omitted)
        #[arg(short, long = "pass", value_enum)]
        passes: Vec<FixPass>,
    },

    /// Run the full ten-stage pipeline on a LaTeX source tree
    Pipeline {
        /// Directory holding the LaTeX sources
        source: String,

        /// Entry .tex file, relative to the source directory
        main_tex: String,

        /// Directory for the final Markdown and course packages
        #[arg(short, long)]
        output_dir: String,

        /// Markdown header file prepended to the final document
        #[arg(short, long)]
        prepend: Option<String>,

        /// Fix-up stage to skip (repeatable)
        #[arg(long = "skip", value_enum)]
        skip: Vec<StageName>,

        /// Package format to export (repeatable; plain Markdown if omitted)
        #[arg(short, long = "export", value_enum)]
        exports: Vec<ExportName>,

        /// Course title handed to the exporter
        #[arg(long)]
        title: Option<String>,

        /// Comment line injected into the course header
        #[arg(long)]
        comment: Option<String>,

        /// Logo URL shown on the course page
        #[arg(long)]
        logo: Option<String>,

        /// Copy every executed stage's output file into the output directory
        #[arg(long)]
        keep_stages: bool,

        /// pandoc binary to run
        #[arg(long, default_value = "pandoc")]
        pandoc: String,

        /// LiaScript exporter binary to run
        #[arg(long, default_value = "liaex")]
        liaex: String,
    },

    /// List the builtin rewrite rule table
    Rules,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum FixPass {
    /// Embed linked PDF figures
    Pdf,
    /// Normalize math blocks
    Math,
    /// Restructure div blocks
    Divs,
    /// Annotate code blocks with runner directives
    Runners,
    /// Relocate footnotes before the next heading
    Footnotes,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum StageName {
    /// Stage 4, PDF figures
    PdfEmbeds,
    /// Stage 5, math blocks
    Math,
    /// Stage 6, div blocks
    Divs,
    /// Stage 7, runner directives
    CodeRunners,
    /// Stage 8, footnotes
    Footnotes,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum ExportName {
    /// Plain copy of the final Markdown document
    Markdown,
    /// IMS content package
    Ims,
    /// SCORM 1.2 package
    Scorm12,
    /// SCORM 2004 package
    Scorm2004,
    /// Standalone web bundle
    Web,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Handle subcommands first
    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd);
    }

    // Default action: rewrite a single document
    run_rewrite(cli.input_file, cli.output, cli.listings, cli.strict, cli.quiet)
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> io::Result<()> {
    match cmd {
        Commands::Rewrite {
            input,
            output,
            listings,
            strict,
            quiet,
        } => run_rewrite(input, output, listings, strict, quiet)?,

        Commands::Preprocess {
            dir,
            exclude,
            verbose,
            dry_run,
        } => {
            let mut exclusions = ExclusionPolicy::default();
            exclusions.file_names.extend(exclude);
            let options = PreprocessOptions {
                exclusions,
                verbose,
                dry_run,
            };

            let stats = preprocess_directory(Path::new(&dir), &RewriteEngine::new(), &options);

            println!(
                "{} file(s) processed, {} skipped, {} replacement(s)",
                stats.files_processed, stats.files_skipped, stats.replacements
            );
            if stats.has_errors() {
                eprintln!();
                for error in &stats.errors {
                    eprintln!("  ✗ {}", error);
                }
                eprintln!("✗ {} file(s) failed", stats.errors.len());
                std::process::exit(1);
            }
        }

        Commands::Fix {
            input,
            output,
            passes,
        } => {
            let content = read_input(input.as_deref())?;
            let passes = if passes.is_empty() {
                vec![
                    FixPass::Pdf,
                    FixPass::Math,
                    FixPass::Divs,
                    FixPass::Runners,
                    FixPass::Footnotes,
                ]
            } else {
                passes
            };

            let mut document = content;
            for pass in passes {
                document = match pass {
                    FixPass::Pdf => embed_pdf_links(&document),
                    FixPass::Math => normalize_math(&document),
                    FixPass::Divs => restructure_divs(&document),
                    FixPass::Runners => annotate_code_blocks(&document),
                    FixPass::Footnotes => relocate_footnotes(&document),
                };
            }
            write_output(output.as_deref(), &document, 0)?;
        }

        Commands::Pipeline {
            source,
            main_tex,
            output_dir,
            prepend,
            skip,
            exports,
            title,
            comment,
            logo,
            keep_stages,
            pandoc,
            liaex,
        } => {
            let mut config = PipelineConfig::new(source, main_tex, output_dir);
            config.prepend_file = prepend.map(PathBuf::from);
            config.keep_stage_outputs = keep_stages;
            for stage in skip {
                match stage {
                    StageName::PdfEmbeds => config.steps.pdf_embeds = false,
                    StageName::Math => config.steps.math = false,
                    StageName::Divs => config.steps.divs = false,
                    StageName::CodeRunners => config.steps.code_runners = false,
                    StageName::Footnotes => config.steps.footnotes = false,
                }
            }
            if !exports.is_empty() {
                let mut toggles = ExportToggles {
                    markdown: false,
                    ims: false,
                    scorm12: false,
                    scorm2004: false,
                    web: false,
                };
                for format in exports {
                    match format {
                        ExportName::Markdown => toggles.markdown = true,
                        ExportName::Ims => toggles.ims = true,
                        ExportName::Scorm12 => toggles.scorm12 = true,
                        ExportName::Scorm2004 => toggles.scorm2004 = true,
                        ExportName::Web => toggles.web = true,
                    }
                }
                config.exports = toggles;
            }
            if let Some(title) = title {
                config.meta.title = title;
            }
            if let Some(comment) = comment {
                config.meta.macro_comment = comment;
            }
            if let Some(logo) = logo {
                config.meta.logo_url = logo;
            }

            let converter = PandocConverter::with_program(pandoc);
            let exporter = LiaScriptExporter::with_program(liaex);
            let progress = |p: &PipelineProgress| {
                println!("[{:>2}/{}] {}", p.step, p.total_steps, p.message);
                if let Some(details) = &p.details {
                    println!("        {}", details);
                }
            };
            let hooks = PipelineHooks::new(&converter, &exporter).with_progress(&progress);

            let outcome = run_pipeline(&config, &hooks);
            if !outcome.success {
                eprintln!("✗ {}", outcome.message);
                std::process::exit(1);
            }
            eprintln!("✓ {}", outcome.message);
            for artifact in &outcome.outputs {
                println!("{}", artifact.display());
            }
        }

        Commands::Rules => print_rules(&RuleSet::builtin()),
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn run_rewrite(
    input: Option<String>,
    output: Option<String>,
    listings: bool,
    strict: bool,
    quiet: bool,
) -> io::Result<()> {
    let content = read_input(input.as_deref())?;

    let engine = RewriteEngine::new();
    let mut outcome = engine.rewrite(&content);
    if listings {
        let second = engine.rewrite_listing_includes(&outcome.text);
        outcome.text = second.text;
        outcome.replacements += second.replacements;
        outcome.warnings.extend(second.warnings);
    }

    // Print warnings to stderr (unless quiet mode)
    if !quiet && !outcome.warnings.is_empty() {
        print_warnings(&outcome.warnings);
    }

    // Check strict mode
    if strict && !outcome.warnings.is_empty() {
        eprintln!(
            "Error: {} rewrite warning(s) in strict mode",
            outcome.warnings.len()
        );
        std::process::exit(1);
    }

    write_output(output.as_deref(), &outcome.text, outcome.warnings.len())
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn write_output(path: Option<&str>, text: &str, warnings: usize) -> io::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            if warnings == 0 {
                eprintln!("✓ Output written to: {}", path);
            } else {
                eprintln!("⚠ Output written to: {} ({} warning(s))", path, warnings);
            }
        }
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_warnings(warnings: &[RewriteWarning]) {
    eprintln!();
    eprintln!("Rewrite warnings ({}):", warnings.len());
    for warning in warnings {
        eprintln!("  ⚠ {}", warning);
    }
    eprintln!();
}

#[cfg(feature = "cli")]
fn print_rules(rules: &RuleSet) {
    println!("Builtin rewrite rules ({} total)", rules.len());

    println!();
    println!("Simple macros:");
    for rule in rules.simple_rules() {
        println!(
            "  {:<24} {:<12} {}",
            format!("\\{}{{..}}", rule.macro_name),
            style_label(rule.style),
            rule.description
        );
    }

    println!();
    println!("Multi-parameter macros:");
    for rule in rules.multi_param_rules() {
        println!(
            "  {:<24} {:<12} {}",
            format!("\\{}", rule.macro_name),
            format!("{} params", rule.param_count),
            rule.description
        );
    }

    println!();
    println!("Text replacements:");
    for rule in rules.text_rules() {
        println!(
            "  {:<24} {:<12} {}",
            format!("\\{}", rule.macro_name),
            format!("{:?}", rule.replacement),
            rule.description
        );
    }

    println!();
    println!("Environments:");
    for rule in rules.environment_rules() {
        println!(
            "  {:<24} {:<12} {}",
            rule.env_name,
            rule.target(),
            rule.description
        );
    }

    println!();
    println!("Box macros:");
    for rule in rules.box_rules() {
        println!(
            "  {:<24} {:<12} {}",
            format!("\\{}", rule.macro_name),
            format!("{} params", rule.param_count),
            rule.description
        );
    }

    println!();
    println!("Brace-counted specials:");
    for rule in rules.special_rules() {
        println!(
            "  {:<24} {:<12} {}",
            format!("\\{}", rule.macro_name),
            action_label(&rule.action),
            rule.description
        );
    }
}

#[cfg(feature = "cli")]
fn style_label(style: FormatStyle) -> &'static str {
    match style {
        FormatStyle::Bold => "bold",
        FormatStyle::Italic => "italic",
        FormatStyle::BoldItalic => "bold italic",
        FormatStyle::Code => "code",
        FormatStyle::MathInline => "inline math",
        FormatStyle::Remove => "removed",
        FormatStyle::Content => "kept",
    }
}

#[cfg(feature = "cli")]
fn action_label(action: &SpecialAction) -> String {
    match action {
        SpecialAction::UnwrapKeepContent => "unwrap".to_string(),
        SpecialAction::MindMapText => "mind map".to_string(),
        SpecialAction::ListingInclude { language } => format!("listing ({})", language),
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texlia --features cli");
    eprintln!("  tex2lia [OPTIONS] [INPUT_FILE]");
}
