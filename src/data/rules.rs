//! Declarative rewrite rule tables
//!
//! Rules are plain data grouped into five categories (simple, multi
//! parameter, text, environment, box, plus the brace-counted specials);
//! the engine is a single interpreter dispatching on the category. The
//! builtin table covers the course-material macro set; with the
//! `data-loading` feature an external JSON table can be loaded instead.
//!
//! Within a category, insertion order is application order.

use indexmap::IndexMap;

#[cfg(feature = "data-loading")]
use crate::utils::error::{TexliaError, TexliaResult};

// ============================================================================
// FORMAT STYLES
// ============================================================================

/// Formatting applied to one extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "data-loading",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FormatStyle {
    /// `\textbf{...}`
    Bold,
    /// `\emph{...}`
    Italic,
    /// `\textbf{\emph{...}}`
    BoldItalic,
    /// `\texttt{...}`
    Code,
    /// `$...$`
    MathInline,
    /// Value is dropped entirely
    Remove,
    /// Value is kept verbatim
    Content,
}

impl FormatStyle {
    /// Renders `value` in this style.
    pub fn apply(&self, value: &str) -> String {
        match self {
            FormatStyle::Bold => format!("\\textbf{{{}}}", value),
            FormatStyle::Italic => format!("\\emph{{{}}}", value),
            FormatStyle::BoldItalic => format!("\\textbf{{\\emph{{{}}}}}", value),
            FormatStyle::Code => format!("\\texttt{{{}}}", value),
            FormatStyle::MathInline => format!("${}$", value),
            FormatStyle::Remove => String::new(),
            FormatStyle::Content => value.to_string(),
        }
    }
}

// ============================================================================
// RULE CATEGORIES
// ============================================================================

/// `\name{content}` rewritten to a single formatted value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRule {
    pub name: String,
    /// Macro name without the backslash.
    pub macro_name: String,
    pub style: FormatStyle,
    pub description: String,
}

impl SimpleRule {
    pub fn new(macro_name: &str, style: FormatStyle, description: &str) -> Self {
        Self {
            name: macro_name.to_string(),
            macro_name: macro_name.to_string(),
            style,
            description: description.to_string(),
        }
    }
}

/// `\name{p1}...{pN}` with per-parameter styles and separators.
///
/// `separators[i]` is emitted after parameter `i`; a missing entry means no
/// separator. `wrapper` optionally encloses the joined result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiParamRule {
    pub name: String,
    pub macro_name: String,
    pub param_count: usize,
    pub param_styles: Vec<FormatStyle>,
    pub separators: Vec<String>,
    pub wrapper: Option<RuleWrapper>,
    pub description: String,
}

/// Prefix/suffix pair around a multi-parameter rule's output.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleWrapper {
    pub before: String,
    pub after: String,
}

impl MultiParamRule {
    pub fn new(
        macro_name: &str,
        param_styles: Vec<FormatStyle>,
        description: &str,
    ) -> Self {
        Self {
            name: macro_name.to_string(),
            macro_name: macro_name.to_string(),
            param_count: param_styles.len(),
            param_styles,
            separators: Vec::new(),
            wrapper: None,
            description: description.to_string(),
        }
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn with_wrapper(mut self, before: &str, after: &str) -> Self {
        self.wrapper = Some(RuleWrapper {
            before: before.to_string(),
            after: after.to_string(),
        });
        self
    }
}

/// Literal word replacement for an argument-less macro (`\name` followed by
/// a non-letter).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRule {
    pub name: String,
    pub macro_name: String,
    pub replacement: String,
    pub description: String,
}

impl TextRule {
    pub fn new(macro_name: &str, replacement: &str, description: &str) -> Self {
        Self {
            name: macro_name.to_string(),
            macro_name: macro_name.to_string(),
            replacement: replacement.to_string(),
            description: description.to_string(),
        }
    }
}

/// `\begin{env}[Title]` rewritten to `\begin{target}` plus a formatted
/// title line. Without a [`TitleFormat`] the bracketed title is dropped.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentRule {
    pub name: String,
    pub env_name: String,
    /// Target environment name; the source name when absent.
    pub target_env: Option<String>,
    pub title: Option<TitleFormat>,
    pub description: String,
}

/// How an environment's optional `[Title]` is rendered.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct TitleFormat {
    pub style: FormatStyle,
    /// Emitted directly after the rendered title.
    pub separator: String,
}

impl EnvironmentRule {
    pub fn new(env_name: &str, style: FormatStyle, separator: &str, description: &str) -> Self {
        Self {
            name: env_name.to_string(),
            env_name: env_name.to_string(),
            target_env: None,
            title: Some(TitleFormat {
                style,
                separator: separator.to_string(),
            }),
            description: description.to_string(),
        }
    }

    pub fn target(&self) -> &str {
        self.target_env.as_deref().unwrap_or(&self.env_name)
    }
}

/// Multi-parameter macro rendered by a named content builder and wrapped in
/// `\begin{target_env}...\end{target_env}` for later container recognition.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxRule {
    pub name: String,
    pub macro_name: String,
    pub target_env: String,
    pub param_count: usize,
    pub builder: BoxBuilder,
    pub description: String,
}

/// Content builders for [`BoxRule`]; the builder bodies live in
/// `core::rewrite::boxes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "data-loading",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BoxBuilder {
    /// 4 params: scale (ignored), term, definition, body.
    Definition,
    /// 2 params: title, body.
    Universal,
    /// 7 params: name, birth, death, body, image, capture year, source.
    Author,
}

impl BoxRule {
    pub fn new(
        macro_name: &str,
        target_env: &str,
        param_count: usize,
        builder: BoxBuilder,
        description: &str,
    ) -> Self {
        Self {
            name: macro_name.to_string(),
            macro_name: macro_name.to_string(),
            target_env: target_env.to_string(),
            param_count,
            builder,
            description: description.to_string(),
        }
    }
}

/// Brace-counted rewrites that no flat regex can express.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "data-loading", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialRule {
    pub name: String,
    pub macro_name: String,
    pub action: SpecialAction,
    pub description: String,
}

/// What a [`SpecialRule`] does with its balanced content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "data-loading",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SpecialAction {
    /// Strip `\name{...}`, keep the content.
    UnwrapKeepContent,
    /// `\name[opts]{...}`: strip bold/sans wrappers inside the content to a
    /// fixpoint, emit `\texttt{clean}`.
    MindMapText,
    /// `\name[label=L]{file}{caption}` with a brace-counted caption, emitted
    /// as `\lstinputlisting[language=.., caption={..}, label=L]{file}`.
    /// Applied per file, after the document-level passes.
    ListingInclude { language: String },
}

impl SpecialRule {
    pub fn new(macro_name: &str, action: SpecialAction, description: &str) -> Self {
        Self {
            name: macro_name.to_string(),
            macro_name: macro_name.to_string(),
            action,
            description: description.to_string(),
        }
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Immutable, ordered collection of all rewrite rules.
///
/// Constructed once (builtin table or loaded) and passed to the engine;
/// separate instances never share state, so tests can run engines with
/// different tables side by side.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    simple: IndexMap<String, SimpleRule>,
    multi_param: IndexMap<String, MultiParamRule>,
    text: IndexMap<String, TextRule>,
    environments: IndexMap<String, EnvironmentRule>,
    boxes: IndexMap<String, BoxRule>,
    specials: IndexMap<String, SpecialRule>,
}

impl RuleSet {
    /// Empty table; combine with the `add_*` methods.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The builtin course-material rule table.
    pub fn builtin() -> Self {
        let mut rules = Self::empty();

        // ---- simple macros ----
        rules.add_simple(SimpleRule::new(
            "ffc",
            FormatStyle::Code,
            "character highlight as inline code",
        ));
        rules.add_simple(SimpleRule::new(
            "fftt",
            FormatStyle::Code,
            "character highlight as inline code",
        ));
        rules.add_simple(SimpleRule::new(
            "ausgabeInline",
            FormatStyle::Code,
            "inline program output",
        ));
        rules.add_simple(SimpleRule::new(
            "textit",
            FormatStyle::Italic,
            "italic text via \\emph",
        ));
        rules.add_simple(SimpleRule::new(
            "emphi",
            FormatStyle::Italic,
            "emphasis variant",
        ));
        rules.add_simple(SimpleRule::new(
            "emphimd",
            FormatStyle::Italic,
            "emphasis variant",
        ));
        rules.add_simple(SimpleRule::new(
            "emphim",
            FormatStyle::Italic,
            "emphasis variant",
        ));
        rules.add_simple(SimpleRule::new(
            "im",
            FormatStyle::Content,
            "index marker, content kept",
        ));
        rules.add_simple(SimpleRule::new(
            "iim",
            FormatStyle::Content,
            "index marker, content kept",
        ));

        // ---- multi-parameter macros ----
        rules.add_multi_param(MultiParamRule::new(
            "ntpimde",
            vec![FormatStyle::Remove, FormatStyle::Remove],
            "margin term pair, dropped",
        ));
        rules.add_multi_param(MultiParamRule::new(
            "ntpimd",
            vec![FormatStyle::Remove, FormatStyle::Remove],
            "margin term, dropped",
        ));

        // ---- text macros ----
        rules.add_text(TextRule::new(
            "notOp",
            "$\\text{NOT}$",
            "logical operator as inline math",
        ));
        rules.add_text(TextRule::new(
            "andOp",
            "$\\text{AND}$",
            "logical operator as inline math",
        ));
        rules.add_text(TextRule::new(
            "orOp",
            "$\\text{OR}$",
            "logical operator as inline math",
        ));
        rules.add_text(TextRule::new(
            "xorOp",
            "$\\text{XOR}$",
            "logical operator as inline math",
        ));
        rules.add_text(TextRule::new(
            "andnotOp",
            "$\\text{AND NOT}$",
            "logical operator as inline math",
        ));
        // Trailing space: usually followed by \emph{...}, keeps the words apart.
        rules.add_text(TextRule::new("sog", "sog. ", "abbreviation expansion"));

        // ---- environments with optional title ----
        for env in ["hinweis", "sprachvgl", "experten", "exkurs"] {
            rules.add_environment(EnvironmentRule::new(
                env,
                FormatStyle::BoldItalic,
                "\\\\\\\\",
                "aside box, bracketed title becomes a bold italic line",
            ));
        }

        // ---- box macros ----
        rules.add_box(BoxRule::new(
            "sttpDefinitionskasten",
            "Definitionskasten",
            4,
            BoxBuilder::Definition,
            "definition box with term, definition and body",
        ));
        rules.add_box(BoxRule::new(
            "sttpUniversalkasten",
            "Universalkasten",
            2,
            BoxBuilder::Universal,
            "generic box with title and body",
        ));
        rules.add_box(BoxRule::new(
            "sttpAutorenkasten",
            "Autorenkasten",
            7,
            BoxBuilder::Author,
            "biography box with portrait, lifespan and image source",
        ));

        // ---- brace-counted specials ----
        rules.add_special(SpecialRule::new(
            "textrm",
            SpecialAction::UnwrapKeepContent,
            "upright text wrapper, content kept",
        ));
        rules.add_special(SpecialRule::new(
            "sttpMindMapText",
            SpecialAction::MindMapText,
            "mind map node text, cleaned and set as inline code",
        ));
        rules.add_special(SpecialRule::new(
            "codeRahmenDateiName",
            SpecialAction::ListingInclude {
                language: "Go".to_string(),
            },
            "framed listing include with caption",
        ));

        rules
    }

    // Adding a rule with an existing name replaces it in place.

    pub fn add_simple(&mut self, rule: SimpleRule) {
        self.simple.insert(rule.name.clone(), rule);
    }

    pub fn add_multi_param(&mut self, rule: MultiParamRule) {
        self.multi_param.insert(rule.name.clone(), rule);
    }

    pub fn add_text(&mut self, rule: TextRule) {
        self.text.insert(rule.name.clone(), rule);
    }

    pub fn add_environment(&mut self, rule: EnvironmentRule) {
        self.environments.insert(rule.name.clone(), rule);
    }

    pub fn add_box(&mut self, rule: BoxRule) {
        self.boxes.insert(rule.name.clone(), rule);
    }

    pub fn add_special(&mut self, rule: SpecialRule) {
        self.specials.insert(rule.name.clone(), rule);
    }

    pub fn simple_rules(&self) -> impl Iterator<Item = &SimpleRule> {
        self.simple.values()
    }

    pub fn multi_param_rules(&self) -> impl Iterator<Item = &MultiParamRule> {
        self.multi_param.values()
    }

    pub fn text_rules(&self) -> impl Iterator<Item = &TextRule> {
        self.text.values()
    }

    pub fn environment_rules(&self) -> impl Iterator<Item = &EnvironmentRule> {
        self.environments.values()
    }

    pub fn box_rules(&self) -> impl Iterator<Item = &BoxRule> {
        self.boxes.values()
    }

    pub fn special_rules(&self) -> impl Iterator<Item = &SpecialRule> {
        self.specials.values()
    }

    pub fn len(&self) -> usize {
        self.simple.len()
            + self.multi_param.len()
            + self.text.len()
            + self.environments.len()
            + self.boxes.len()
            + self.specials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// EXTERNAL TABLES (data-loading)
// ============================================================================

/// Serialized form of a rule table: one list per category.
#[cfg(feature = "data-loading")]
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuleFile {
    pub simple: Vec<SimpleRule>,
    pub multi_param: Vec<MultiParamRule>,
    pub text: Vec<TextRule>,
    pub environments: Vec<EnvironmentRule>,
    pub boxes: Vec<BoxRule>,
    pub specials: Vec<SpecialRule>,
}

#[cfg(feature = "data-loading")]
impl RuleSet {
    /// Loads a rule table from its JSON form. The result is immutable for
    /// the process lifetime by convention; load once, then share.
    pub fn from_json_str(json: &str) -> TexliaResult<Self> {
        let file: RuleFile = serde_json::from_str(json)
            .map_err(|e| TexliaError::config(format!("invalid rule table: {}", e)))?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: RuleFile) -> Self {
        let mut rules = Self::empty();
        for rule in file.simple {
            rules.add_simple(rule);
        }
        for rule in file.multi_param {
            rules.add_multi_param(rule);
        }
        for rule in file.text {
            rules.add_text(rule);
        }
        for rule in file.environments {
            rules.add_environment(rule);
        }
        for rule in file.boxes {
            rules.add_box(rule);
        }
        for rule in file.specials {
            rules.add_special(rule);
        }
        rules
    }
}
