//! The macro rewrite engine
//!
//! Applies the rule table plus a handful of hard-coded structural rewrites
//! to a LaTeX string in a fixed order:
//!
//! 1. Brace-counted structural unwraps (content kept)
//! 2. Simple one-argument macros
//! 3. Multi-parameter macros
//! 4. Literal text macros
//! 5. Image-inclusion normalization, `\liwr` variants
//! 6. Environments with an optional bracketed title
//! 7. Mind-map text cleanup (brace-counted, fixpoint)
//! 8. Literature items (7- and 8-parameter variants)
//! 9. Box macros (content builders)
//! 10. Citations, then `\minisec`
//!
//! Malformed occurrences (unbalanced braces, short parameter lists) are
//! reported as warnings and left in place; the rest of the document is
//! still processed. Scan loops use explicit indices over the current
//! string; after a successful brace-counted rewrite the scan resumes at
//! the replacement start so occurrences revealed by the rewrite are seen.
//!
//! File-listing macros (`\codeRahmenDateiName` in the builtin table) are
//! not part of [`RewriteEngine::rewrite`]; the preprocessor runs the
//! separate [`RewriteEngine::rewrite_listing_includes`] pass after it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::rewrite::boxes::{
    build_box_content, build_literature_item, wrap_in_environment,
};
use crate::core::rewrite::braces::{extract_braced, extract_parameters};
use crate::data::rules::{
    BoxRule, FormatStyle, MultiParamRule, RuleSet, SpecialAction, SpecialRule, TitleFormat,
};
use crate::utils::error::{RewriteWarning, TexliaError, TexliaResult};

// ============================================================================
// HARD-CODED PATTERNS
// ============================================================================

lazy_static! {
    static ref ADJ_INCLUDE: Regex =
        Regex::new(r"\\adjincludegraphics(\[[^\]]*\])?\{([^}]+)\}").unwrap();
    static ref LIWR_OPTIONAL: Regex = Regex::new(r"\\liwr\[[^\]]*\]\{([^}]*)\}").unwrap();
    static ref LIWR: Regex = Regex::new(r"\\liwr\{([^}]*)\}").unwrap();
    static ref CITE_OPTIONAL: Regex = Regex::new(r"\\cite\[[^\]]+\]\{([^}]+)\}").unwrap();
    static ref CITE: Regex = Regex::new(r"\\cite\{([^}]+)\}").unwrap();
    static ref MINISEC: Regex = Regex::new(r"\\minisec\{([^}]*)\}").unwrap();
    static ref BOLD_WRAPPER: Regex = Regex::new(r"\\textbf\{(.+?)\}").unwrap();
    static ref SANS_WRAPPER: Regex = Regex::new(r"\\textsf\{(.+?)\}").unwrap();
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of one engine run over a document string.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The rewritten document
    pub text: String,
    /// Count of successful substitutions (see the category notes above)
    pub replacements: usize,
    /// Non-fatal issues encountered while rewriting
    pub warnings: Vec<RewriteWarning>,
}

impl RewriteOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ============================================================================
// COMPILED RULES
// ============================================================================

#[derive(Debug, Clone)]
struct CompiledSimple {
    regex: Regex,
    style: FormatStyle,
}

#[derive(Debug, Clone)]
struct CompiledText {
    regex: Regex,
    replacement: String,
}

#[derive(Debug, Clone)]
struct CompiledEnvironment {
    regex: Regex,
    target: String,
    title: Option<TitleFormat>,
}

/// A listing-include macro: the regex matches `\name[label=L]{file}` up to
/// and including the opening brace of the caption, which is brace-counted.
#[derive(Debug, Clone)]
struct CompiledListing {
    name: String,
    regex: Regex,
    language: String,
}

/// The rewrite engine: an immutable rule table compiled into appliers.
///
/// Engines are independent; tests can run several with different tables
/// side by side. [`RewriteEngine::new`] uses the builtin table.
#[derive(Debug, Clone)]
pub struct RewriteEngine {
    simple: Vec<CompiledSimple>,
    multi_param: Vec<MultiParamRule>,
    text: Vec<CompiledText>,
    environments: Vec<CompiledEnvironment>,
    boxes: Vec<BoxRule>,
    specials: Vec<SpecialRule>,
    listings: Vec<CompiledListing>,
}

lazy_static! {
    static ref BUILTIN_ENGINE: RewriteEngine =
        RewriteEngine::with_rules(&RuleSet::builtin()).expect("builtin rule table compiles");
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteEngine {
    /// Engine over the builtin rule table.
    pub fn new() -> Self {
        BUILTIN_ENGINE.clone()
    }

    /// Compiles an engine for the given rule table.
    pub fn with_rules(rules: &RuleSet) -> TexliaResult<Self> {
        let mut simple = Vec::new();
        for rule in rules.simple_rules() {
            simple.push(CompiledSimple {
                regex: compile(
                    &rule.name,
                    &format!(r"\\{}\{{([^}}]*)\}}", regex::escape(&rule.macro_name)),
                )?,
                style: rule.style,
            });
        }

        let mut text = Vec::new();
        for rule in rules.text_rules() {
            text.push(CompiledText {
                regex: compile(
                    &rule.name,
                    &format!(r"\\{}\b", regex::escape(&rule.macro_name)),
                )?,
                replacement: rule.replacement.clone(),
            });
        }

        let mut environments = Vec::new();
        for rule in rules.environment_rules() {
            environments.push(CompiledEnvironment {
                regex: compile(
                    &rule.name,
                    &format!(
                        r"\\begin\{{{}\}}\[([^\]]+)\]",
                        regex::escape(&rule.env_name)
                    ),
                )?,
                target: rule.target().to_string(),
                title: rule.title.clone(),
            });
        }

        let mut listings = Vec::new();
        for rule in rules.special_rules() {
            if let SpecialAction::ListingInclude { language } = &rule.action {
                listings.push(CompiledListing {
                    name: rule.macro_name.clone(),
                    regex: compile(
                        &rule.name,
                        &format!(
                            r"\\{}\[label=([^\]]+)\]\{{([^}}]+)\}}\s*\{{",
                            regex::escape(&rule.macro_name)
                        ),
                    )?,
                    language: language.clone(),
                });
            }
        }

        Ok(Self {
            simple,
            multi_param: rules.multi_param_rules().cloned().collect(),
            text,
            environments,
            boxes: rules.box_rules().cloned().collect(),
            specials: rules.special_rules().cloned().collect(),
            listings,
        })
    }

    /// Rewrites one document, returning the text, the substitution count
    /// and any warnings.
    pub fn rewrite(&self, input: &str) -> RewriteOutcome {
        let mut output = input.to_string();
        let mut replacements = 0usize;
        let mut warnings = Vec::new();

        // ---- 1: structural unwraps ----
        for rule in &self.specials {
            if rule.action == SpecialAction::UnwrapKeepContent {
                apply_unwrap(&mut output, &rule.macro_name, &mut replacements, &mut warnings);
            }
        }

        // ---- 2: simple macros ----
        for rule in &self.simple {
            let rewritten = rule
                .regex
                .replace_all(&output, |caps: &regex::Captures| rule.style.apply(&caps[1]));
            if rewritten != output {
                replacements += 1;
                output = rewritten.into_owned();
            }
        }

        // ---- 3: multi-parameter macros ----
        for rule in &self.multi_param {
            apply_multi_param(&mut output, rule, &mut replacements, &mut warnings);
        }

        // ---- 4: text macros ----
        for rule in &self.text {
            let rewritten = rule
                .regex
                .replace_all(&output, regex::NoExpand(&rule.replacement));
            if rewritten != output {
                replacements += 1;
                output = rewritten.into_owned();
            }
        }

        // ---- 5: image includes ----
        output = ADJ_INCLUDE
            .replace_all(&output, |caps: &regex::Captures| {
                let options = caps.get(1).map_or("", |m| m.as_str());
                format!("\\includegraphics{}{{{}}}", options, &caps[2])
            })
            .into_owned();

        // ---- 5b: \liwr (listing inline does not work in tables) ----
        output = LIWR_OPTIONAL
            .replace_all(&output, |caps: &regex::Captures| {
                FormatStyle::Code.apply(&caps[1])
            })
            .into_owned();
        output = LIWR
            .replace_all(&output, |caps: &regex::Captures| {
                FormatStyle::Code.apply(&caps[1])
            })
            .into_owned();

        // ---- 6: environments with optional title ----
        for rule in &self.environments {
            replacements += rule.regex.find_iter(&output).count();
            output = rule
                .regex
                .replace_all(&output, |caps: &regex::Captures| match &rule.title {
                    Some(title) => format!(
                        "\\begin{{{}}}\n{}{}",
                        rule.target,
                        title.style.apply(&caps[1]),
                        title.separator
                    ),
                    None => format!("\\begin{{{}}}", rule.target),
                })
                .into_owned();
        }

        // ---- 7: mind-map text ----
        for rule in &self.specials {
            if rule.action == SpecialAction::MindMapText {
                apply_mind_map(&mut output, &rule.macro_name, &mut replacements, &mut warnings);
            }
        }

        // ---- 8/9: literature items ----
        apply_literature(
            &mut output,
            "sttpKommLitItem",
            7,
            &mut replacements,
            &mut warnings,
        );
        apply_literature(
            &mut output,
            "sttpKommLitItemMitFussnote",
            8,
            &mut replacements,
            &mut warnings,
        );

        // ---- 10: box macros ----
        for rule in &self.boxes {
            apply_box(&mut output, rule, &mut replacements, &mut warnings);
        }

        // ---- 11: citations ----
        output = CITE_OPTIONAL
            .replace_all(&output, |caps: &regex::Captures| {
                format!("[\\textbf{{{}}}]", &caps[1])
            })
            .into_owned();
        output = CITE
            .replace_all(&output, |caps: &regex::Captures| {
                format!("[\\textbf{{{}}}]", &caps[1])
            })
            .into_owned();

        // ---- 12: minisec ----
        output = MINISEC
            .replace_all(&output, |caps: &regex::Captures| {
                format!("{}\\hfill\\break\n", FormatStyle::BoldItalic.apply(&caps[1]))
            })
            .into_owned();

        RewriteOutcome {
            text: output,
            replacements,
            warnings,
        }
    }

    /// Rewrites listing-include macros into `\lstinputlisting` commands.
    ///
    /// Captions may contain nested braces, so they are brace-counted from
    /// the end of the regex match. `~` ties in the caption become plain
    /// spaces. Runs per file in the preprocessor, after [`Self::rewrite`].
    pub fn rewrite_listing_includes(&self, input: &str) -> RewriteOutcome {
        let mut output = input.to_string();
        let mut replacements = 0usize;
        let mut warnings = Vec::new();

        for rule in &self.listings {
            apply_listing_include(&mut output, rule, &mut replacements, &mut warnings);
        }

        RewriteOutcome {
            text: output,
            replacements,
            warnings,
        }
    }
}

fn compile(name: &str, pattern: &str) -> TexliaResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| TexliaError::config(format!("rule '{}' does not compile: {}", name, e)))
}

// ============================================================================
// SCAN HELPERS
// ============================================================================

/// Finds `\name` at or after `from`, requiring the next character to not be
/// a letter so shorter macro names never fire inside longer ones.
fn find_macro(text: &str, needle: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(rel) = text[search..].find(needle) {
        let at = search + rel;
        let after = at + needle.len();
        let boundary = text[after..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_alphabetic());
        if boundary {
            return Some(at);
        }
        search = at + 1;
    }
    None
}

fn apply_unwrap(
    output: &mut String,
    macro_name: &str,
    replacements: &mut usize,
    warnings: &mut Vec<RewriteWarning>,
) {
    let needle = format!("\\{}", macro_name);
    let mut pos = 0;
    while let Some(at) = find_macro(output, &needle, pos) {
        let cursor = at + needle.len();
        if !output[cursor..].starts_with('{') {
            pos = cursor;
            continue;
        }
        match extract_braced(output, cursor + 1) {
            Some((content, end)) => {
                output.replace_range(at..end, &content);
                *replacements += 1;
                pos = at;
            }
            None => {
                warnings.push(RewriteWarning::at(format!("unclosed \\{}", macro_name), at));
                pos = cursor;
            }
        }
    }
}

fn apply_multi_param(
    output: &mut String,
    rule: &MultiParamRule,
    replacements: &mut usize,
    warnings: &mut Vec<RewriteWarning>,
) {
    let needle = format!("\\{}", rule.macro_name);
    let mut pos = 0;
    while let Some(at) = find_macro(output, &needle, pos) {
        match extract_parameters(output, at + needle.len(), rule.param_count, &rule.macro_name)
        {
            Ok((params, end)) => {
                let built = render_multi_param(rule, &params);
                output.replace_range(at..end, &built);
                *replacements += 1;
                pos = at + built.len();
            }
            Err(err) => {
                warnings.push(RewriteWarning::at(err.to_string(), at));
                pos = at + needle.len();
            }
        }
    }
}

fn render_multi_param(rule: &MultiParamRule, params: &[String]) -> String {
    let mut result = String::new();
    for (i, value) in params.iter().enumerate() {
        let style = rule
            .param_styles
            .get(i)
            .copied()
            .unwrap_or(FormatStyle::Content);
        result.push_str(&style.apply(value));
        if let Some(separator) = rule.separators.get(i) {
            result.push_str(separator);
        }
    }
    match &rule.wrapper {
        Some(wrapper) => format!("{}{}{}", wrapper.before, result, wrapper.after),
        None => result,
    }
}

fn apply_mind_map(
    output: &mut String,
    macro_name: &str,
    replacements: &mut usize,
    warnings: &mut Vec<RewriteWarning>,
) {
    let needle = format!("\\{}", macro_name);
    let mut pos = 0;
    while let Some(at) = find_macro(output, &needle, pos) {
        let mut cursor = at + needle.len();
        // Optional [options] group before the braced content
        if output[cursor..].starts_with('[') {
            match output[cursor..].find(']') {
                Some(rel) => cursor += rel + 1,
                None => {
                    pos = at + needle.len();
                    continue;
                }
            }
        }
        if !output[cursor..].starts_with('{') {
            pos = at + needle.len();
            continue;
        }
        match extract_braced(output, cursor + 1) {
            Some((content, end)) => {
                let clean = strip_wrapper_macros(&content);
                let built = FormatStyle::Code.apply(&clean);
                output.replace_range(at..end, &built);
                *replacements += 1;
                pos = at;
            }
            None => {
                warnings.push(RewriteWarning::at(format!("unclosed \\{}", macro_name), at));
                pos = at + needle.len();
            }
        }
    }
}

/// Strips `\textbf{...}` and `\textsf{...}` layers until none remain.
fn strip_wrapper_macros(content: &str) -> String {
    let mut current = content.to_string();
    loop {
        let stripped = BOLD_WRAPPER.replace_all(&current, "$1");
        let stripped = SANS_WRAPPER.replace_all(&stripped, "$1").into_owned();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

fn apply_literature(
    output: &mut String,
    macro_name: &str,
    param_count: usize,
    replacements: &mut usize,
    warnings: &mut Vec<RewriteWarning>,
) {
    let needle = format!("\\{}", macro_name);
    let mut pos = 0;
    while let Some(at) = find_macro(output, &needle, pos) {
        match extract_parameters(output, at + needle.len(), param_count, macro_name) {
            Ok((params, end)) => {
                let built = build_literature_item(&params);
                output.replace_range(at..end, &built);
                *replacements += 1;
                pos = at;
            }
            Err(err) => {
                warnings.push(RewriteWarning::at(err.to_string(), at));
                pos = at + needle.len();
            }
        }
    }
}

fn apply_listing_include(
    output: &mut String,
    rule: &CompiledListing,
    replacements: &mut usize,
    warnings: &mut Vec<RewriteWarning>,
) {
    // Collect (start, end, replacement) first; offsets refer to the
    // unmodified string, so edits are applied back to front.
    let mut edits = Vec::new();
    for caps in rule.regex.captures_iter(output) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        match extract_braced(output, whole.end()) {
            Some((caption, end)) => {
                let caption = caption.replace('~', " ");
                edits.push((
                    whole.start(),
                    end,
                    format!(
                        "\\lstinputlisting[language={}, caption={{{}}}, label={}]{{{}}}",
                        rule.language, caption, &caps[1], &caps[2]
                    ),
                ));
            }
            None => {
                warnings.push(RewriteWarning::at(
                    format!("unclosed caption for \\{}", rule.name),
                    whole.start(),
                ));
            }
        }
    }
    for (start, end, built) in edits.into_iter().rev() {
        output.replace_range(start..end, &built);
        *replacements += 1;
    }
}

fn apply_box(
    output: &mut String,
    rule: &BoxRule,
    replacements: &mut usize,
    warnings: &mut Vec<RewriteWarning>,
) {
    let needle = format!("\\{}", rule.macro_name);
    let mut pos = 0;
    while let Some(at) = find_macro(output, &needle, pos) {
        match extract_parameters(output, at + needle.len(), rule.param_count, &rule.macro_name)
        {
            Ok((params, end)) => {
                let content = build_box_content(rule.builder, &params);
                let built = wrap_in_environment(&rule.target_env, &content);
                output.replace_range(at..end, &built);
                *replacements += 1;
                pos = at + built.len();
            }
            Err(err) => {
                warnings.push(RewriteWarning::at(err.to_string(), at));
                pos = at + needle.len();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::rules::SimpleRule;

    fn rewrite(input: &str) -> RewriteOutcome {
        RewriteEngine::new().rewrite(input)
    }

    #[test]
    fn test_simple_macros() {
        let out = rewrite("Der Befehl \\ffc{go run} und \\textit{kursiv}.");
        assert_eq!(out.text, "Der Befehl \\texttt{go run} und \\emph{kursiv}.");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_simple_macro_count_is_per_rule() {
        let out = rewrite("\\ffc{a} \\ffc{b} \\ffc{c}");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_content_style_keeps_inner_text() {
        let out = rewrite("\\im{Stichwort} bleibt.");
        assert_eq!(out.text, "Stichwort bleibt.");
    }

    #[test]
    fn test_multi_param_removal() {
        let out = rewrite("Text \\ntpimde{Begriff}{term} mehr Text");
        assert_eq!(out.text, "Text  mehr Text");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_multi_param_short_list_warns_and_keeps_text() {
        let input = "\\ntpimde{nur einer} Rest";
        let out = rewrite(input);
        assert_eq!(out.text, input);
        assert!(out.has_warnings());
    }

    #[test]
    fn test_shorter_name_does_not_fire_inside_longer() {
        // \ntpimd must not consume the prefix of \ntpimde
        let out = rewrite("\\ntpimde{a}{b}");
        assert_eq!(out.text, "");
        assert!(!out.has_warnings());
    }

    #[test]
    fn test_text_macros() {
        let out = rewrite("a \\andOp b \\notOp c");
        assert_eq!(out.text, "a $\\text{AND}$ b $\\text{NOT}$ c");
    }

    #[test]
    fn test_text_macro_word_boundary() {
        let out = rewrite("\\sog \\emph{Slices}");
        assert_eq!(out.text, "sog.  \\emph{Slices}");
        let untouched = rewrite("\\sogar");
        assert_eq!(untouched.text, "\\sogar");
    }

    #[test]
    fn test_adjincludegraphics() {
        let out = rewrite("\\adjincludegraphics[width=\\textwidth]{bild.png}");
        assert_eq!(out.text, "\\includegraphics[width=\\textwidth]{bild.png}");
        let bare = rewrite("\\adjincludegraphics{bild.png}");
        assert_eq!(bare.text, "\\includegraphics{bild.png}");
    }

    #[test]
    fn test_liwr_variants() {
        let out = rewrite("\\liwr[go]{fmt.Println} und \\liwr{make}");
        assert_eq!(out.text, "\\texttt{fmt.Println} und \\texttt{make}");
    }

    #[test]
    fn test_environment_title() {
        let out = rewrite("\\begin{hinweis}[Wichtig]\nInhalt\n\\end{hinweis}");
        assert_eq!(
            out.text,
            "\\begin{hinweis}\n\\textbf{\\emph{Wichtig}}\\\\\\\\\nInhalt\n\\end{hinweis}"
        );
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_environment_without_title_untouched() {
        let input = "\\begin{hinweis}\nInhalt\n\\end{hinweis}";
        assert_eq!(rewrite(input).text, input);
    }

    #[test]
    fn test_textrm_unwrap() {
        let out = rewrite("\\textrm{plain {nested} text}");
        assert_eq!(out.text, "plain {nested} text");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_textrm_unclosed_warns() {
        let input = "\\textrm{never closed";
        let out = rewrite(input);
        assert_eq!(out.text, input);
        assert!(out.has_warnings());
    }

    #[test]
    fn test_mind_map_cleanup() {
        let out = rewrite("\\sttpMindMapText[scale=0.5]{\\textbf{\\textsf{Goroutinen}}}");
        assert_eq!(out.text, "\\texttt{Goroutinen}");
    }

    #[test]
    fn test_mind_map_without_options() {
        let out = rewrite("\\sttpMindMapText{\\textsf{Kanäle}}");
        assert_eq!(out.text, "\\texttt{Kanäle}");
    }

    #[test]
    fn test_literature_item_seven_params() {
        let input = "\\sttpKommLitItem{Autor}{2020}{Titel}{KEY}{x}{y}{Beschreibung}";
        let out = rewrite(input);
        assert_eq!(
            out.text,
            "\\begin{KommLitItem}\n\n\\emph{Autor} \\emph{2020}. \\emph{Titel} \
             [\\textbf{KEY}]\n\nBeschreibung\n\n\\end{KommLitItem}\n\n"
        );
        assert!(!out.has_warnings());
    }

    #[test]
    fn test_literature_item_with_footnote_param() {
        let input = "\\sttpKommLitItemMitFussnote{A}{2020}{T}{K}{}{}{D}{Fussnote}";
        let out = rewrite(input);
        assert!(out.text.contains("[\\textbf{K}]\\footnote{Fussnote}"));
        // The 7-parameter scan must not fire on the longer macro name
        assert!(!out.has_warnings());
    }

    #[test]
    fn test_literature_item_short_params_warns() {
        let input = "\\sttpKommLitItem{Autor}{2020}";
        let out = rewrite(input);
        assert_eq!(out.text, input);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].message.contains("2/7"));
    }

    #[test]
    fn test_universal_box() {
        let out = rewrite("\\sttpUniversalkasten{Merke}{Slices teilen ihr Array.}");
        assert_eq!(
            out.text,
            "\\begin{Universalkasten}\n\n\\textbf{\\emph{Merke}}\n\n\
             Slices teilen ihr Array.\n\\end{Universalkasten}"
        );
    }

    #[test]
    fn test_box_params_may_nest_braces() {
        let out = rewrite("\\sttpUniversalkasten{Titel \\emph{mit} Markup}{Inhalt {tief {tiefer}} Ende}");
        assert!(out.text.contains("\\textbf{\\emph{Titel \\emph{mit} Markup}}"));
        assert!(out.text.contains("Inhalt {tief {tiefer}} Ende"));
    }

    #[test]
    fn test_definition_box() {
        let out = rewrite("\\sttpDefinitionskasten{0.9}{Slice}{Dynamischer Ausschnitt}{Mehr.}");
        assert!(out.text.starts_with("\\begin{Definitionskasten}\n\n"));
        assert!(out.text.contains("\\textbf{\\emph{Slice}}\n\n"));
        assert!(out.text.contains("\\emph{Dynamischer Ausschnitt}\n\n"));
        assert!(out.text.ends_with("Mehr.\n\\end{Definitionskasten}"));
    }

    #[test]
    fn test_author_box() {
        let out = rewrite(
            "\\sttpAutorenkasten{Rob Pike}{1956}{}{Mitentwickler von Go.}{pike.jpg}{2010}{Wikimedia}",
        );
        assert!(out.text.contains("\\begin{Autorenkasten}"));
        assert!(out.text.contains("\\textbf{(*1956)}"));
        assert!(out.text.contains("\\textit{\\small Bildquelle: Wikimedia (2010)}"));
    }

    #[test]
    fn test_citations() {
        let out = rewrite("Siehe \\cite{DK16} und \\cite[S. 12]{Go20}.");
        assert_eq!(out.text, "Siehe [\\textbf{DK16}] und [\\textbf{Go20}].");
    }

    #[test]
    fn test_minisec() {
        let out = rewrite("\\minisec{Zusammenfassung}");
        assert_eq!(out.text, "\\textbf{\\emph{Zusammenfassung}}\\hfill\\break\n");
    }

    #[test]
    fn test_custom_rule_set_is_independent() {
        let mut rules = RuleSet::empty();
        rules.add_simple(SimpleRule::new("kbd", FormatStyle::Code, "keys"));
        let engine = RewriteEngine::with_rules(&rules).unwrap();
        let out = engine.rewrite("\\kbd{Ctrl} \\ffc{x}");
        // Only the custom rule applies; the builtin table is not involved
        assert_eq!(out.text, "\\texttt{Ctrl} \\ffc{x}");
    }

    #[test]
    fn test_order_boxes_before_citations() {
        // A citation inside a box body must still be rewritten afterwards
        let out = rewrite("\\sttpUniversalkasten{T}{Siehe \\cite{DK16}.}");
        assert!(out.text.contains("Siehe [\\textbf{DK16}]."));
    }

    #[test]
    fn test_plain_text_untouched() {
        let input = "Ein Absatz ohne Makros.\n\nNoch einer.";
        let out = rewrite(input);
        assert_eq!(out.text, input);
        assert_eq!(out.replacements, 0);
        assert!(!out.has_warnings());
    }

    // ---- listing includes ----

    fn rewrite_listings(input: &str) -> RewriteOutcome {
        RewriteEngine::new().rewrite_listing_includes(input)
    }

    #[test]
    fn test_listing_include() {
        let out = rewrite_listings(
            "\\codeRahmenDateiName[label=lst:hello]{code/hello.go}{Ein~Hallo-Welt Programm}",
        );
        assert_eq!(
            out.text,
            "\\lstinputlisting[language=Go, caption={Ein Hallo-Welt Programm}, \
             label=lst:hello]{code/hello.go}"
        );
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_listing_caption_may_nest_braces() {
        let out = rewrite_listings("\\codeRahmenDateiName[label=lst:x]{x.go}{Code {mit} Klammern}");
        assert!(out.text.contains("caption={Code {mit} Klammern}"));
    }

    #[test]
    fn test_listing_caption_on_next_line() {
        let out = rewrite_listings("\\codeRahmenDateiName[label=l]{f.go}\n{Listing}");
        assert_eq!(
            out.text,
            "\\lstinputlisting[language=Go, caption={Listing}, label=l]{f.go}"
        );
    }

    #[test]
    fn test_listing_multiple_occurrences() {
        let out = rewrite_listings(
            "A\n\\codeRahmenDateiName[label=a]{a.go}{Erstes}\n\
             B\n\\codeRahmenDateiName[label=b]{b.go}{Zweites}\n",
        );
        assert_eq!(
            out.text,
            "A\n\\lstinputlisting[language=Go, caption={Erstes}, label=a]{a.go}\n\
             B\n\\lstinputlisting[language=Go, caption={Zweites}, label=b]{b.go}\n"
        );
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_listing_unclosed_caption_warns() {
        let input = "\\codeRahmenDateiName[label=l]{f.go}{nie geschlossen";
        let out = rewrite_listings(input);
        assert_eq!(out.text, input);
        assert_eq!(out.replacements, 0);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_listing_untouched_by_document_pass() {
        let input = "\\codeRahmenDateiName[label=l]{f.go}{Listing}";
        assert_eq!(rewrite(input).text, input);
    }
}
