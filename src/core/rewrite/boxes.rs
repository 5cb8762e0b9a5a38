//! Content builders for box macros and literature items
//!
//! Box macros collapse several positional parameters into a structured
//! block wrapped in `\begin{Env}...\end{Env}`; the environment name is what
//! the div pass recognizes after conversion. Literature items follow the
//! same idea with a fixed citation layout.

use std::fmt::Write;

use crate::data::rules::{BoxBuilder, FormatStyle};

/// Builds the inner content for a box rule. Parameter meaning is
/// positional per [`BoxBuilder`] variant.
pub fn build_box_content(builder: BoxBuilder, params: &[String]) -> String {
    match builder {
        BoxBuilder::Definition => definition_box(params),
        BoxBuilder::Universal => universal_box(params),
        BoxBuilder::Author => author_box(params),
    }
}

/// Wraps builder output in its target environment.
pub fn wrap_in_environment(target_env: &str, content: &str) -> String {
    format!("\\begin{{{0}}}\n\n{1}\\end{{{0}}}", target_env, content)
}

fn param(params: &[String], index: usize) -> &str {
    params.get(index).map(String::as_str).unwrap_or("")
}

// Params: 0 scale (ignored), 1 term, 2 definition, 3 body.
fn definition_box(params: &[String]) -> String {
    let mut content = String::new();
    content.push_str(&FormatStyle::BoldItalic.apply(param(params, 1)));
    content.push_str("\n\n");
    let definition = param(params, 2);
    if !definition.trim().is_empty() {
        content.push_str(&FormatStyle::Italic.apply(definition));
        content.push_str("\n\n");
    }
    let _ = writeln!(content, "{}", param(params, 3));
    content
}

// Params: 0 title, 1 body.
fn universal_box(params: &[String]) -> String {
    let mut content = String::new();
    content.push_str(&FormatStyle::BoldItalic.apply(param(params, 0)));
    content.push_str("\n\n");
    let _ = writeln!(content, "{}", param(params, 1));
    content
}

// Params: 0 name, 1 birth year, 2 death year, 3 body, 4 image file,
// 5 capture year, 6 image source.
fn author_box(params: &[String]) -> String {
    let mut content = String::new();
    let _ = write!(
        content,
        "\\includegraphics[width=2.5cm]{{{}}}\n\n",
        param(params, 4)
    );
    let _ = write!(content, "\\textbf{{{}}}", param(params, 0));

    let birth = param(params, 1);
    let death = param(params, 2);
    if !birth.trim().is_empty() {
        if !death.trim().is_empty() {
            let _ = write!(content, " \\textbf{{({}--{})}}", birth, death);
        } else {
            let _ = write!(content, " \\textbf{{(*{})}}", birth);
        }
    }

    let _ = write!(content, "\n\n{}\n\n", param(params, 3));
    let _ = writeln!(
        content,
        "\\textit{{\\small Bildquelle: {} ({})}}",
        param(params, 6),
        param(params, 5)
    );
    content
}

/// Builds a literature item block.
///
/// Params: 0 author, 1 year, 2 title, 3 citation key, 4-5 unused,
/// 6 description, 7 footnote text (eight-parameter variant only, rendered
/// as `\footnote{...}` directly after the citation).
pub fn build_literature_item(params: &[String]) -> String {
    let mut result = String::from("\\begin{KommLitItem}\n\n");
    let _ = write!(
        result,
        "\\emph{{{}}} \\emph{{{}}}. \\emph{{{}}} [\\textbf{{{}}}]",
        param(params, 0),
        param(params, 1),
        param(params, 2),
        param(params, 3)
    );
    if params.len() > 7 {
        let _ = write!(result, "\\footnote{{{}}}", param(params, 7));
    }
    let _ = write!(result, "\n\n{}\n\n", param(params, 6));
    result.push_str("\\end{KommLitItem}\n\n");
    result
}
