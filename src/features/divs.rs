//! Div-block restructuring for converted Markdown
//!
//! pandoc renders the custom LaTeX environments as `<div class="...">`
//! blocks. This pass finds those blocks line-wise (arbitrary nesting),
//! converts known container types into LiaScript-friendly Markdown
//! (fenced code, blockquotes, labeled blockquotes) and leaves unknown
//! types as raw HTML. Conversion is inside out: nested known blocks are
//! converted before the enclosing block, capped at [`MAX_DIV_NESTING`]
//! levels; content below the cap is kept verbatim.

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::containers::{
    container_label, is_code_container, is_known_container, is_labeled_container,
    is_quote_container,
};

/// Recursion cap for nested known containers.
const MAX_DIV_NESTING: usize = 32;

lazy_static! {
    static ref DIV_OPEN: Regex = Regex::new(r#"(?i)<div\s+class="([^"]+)">"#).unwrap();
    static ref SPAN_BREAK: Regex = Regex::new(r"</span>\s*\n").unwrap();
}

/// How a known container without a dedicated conversion is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    /// Quote every line
    Blockquote,
    /// Keep the trimmed content
    Plain,
}

/// Options for the div pass.
#[derive(Debug, Clone, Copy)]
pub struct DivOptions {
    pub fallback: FallbackMode,
}

impl Default for DivOptions {
    fn default() -> Self {
        Self {
            fallback: FallbackMode::Plain,
        }
    }
}

/// One top-level `<div class="...">...</div>` block. `start..end` is the
/// byte range covering the open line through the close line plus its
/// newline, clamped to the text end.
#[derive(Debug, Clone)]
struct DivBlock {
    div_type: String,
    content: String,
    start: usize,
    end: usize,
}

/// Restructures div blocks with the default options.
pub fn restructure_divs(input: &str) -> String {
    restructure_divs_with_options(input, &DivOptions::default())
}

/// Restructures div blocks, back to front, inner known blocks first.
pub fn restructure_divs_with_options(input: &str, options: &DivOptions) -> String {
    restructure(input, options, 0)
}

fn restructure(input: &str, options: &DivOptions, depth: usize) -> String {
    // Literature items keep their div but get vertical spacing; the added
    // style attribute also takes them out of the open-tag pattern below.
    let text = input.replace(
        "<div class=\"KommLitItem\">",
        "<div class=\"KommLitItem\" style=\"margin: 1.5em 0;\">",
    );

    let blocks = find_top_level_blocks(&text);
    if blocks.is_empty() {
        return text;
    }

    let mut result = text;
    for block in blocks.iter().rev() {
        let type_lower = block.div_type.to_lowercase();
        if !is_known_container(&type_lower) {
            // Unknown containers stay raw HTML, nested content included
            continue;
        }
        let content = if depth + 1 < MAX_DIV_NESTING {
            restructure(&block.content, options, depth + 1)
        } else {
            block.content.clone()
        };
        let converted = convert_block(&type_lower, &content, options);
        result.replace_range(block.start..block.end, &converted);
    }
    result
}

/// Collects the outermost div blocks with their byte ranges. Lines inside
/// a block, including nested open/close tags, are accumulated verbatim; an
/// unclosed block at end of input is dropped.
fn find_top_level_blocks(text: &str) -> Vec<DivBlock> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<DivBlock> = None;
    let mut char_index = 0usize;

    for line in text.split('\n') {
        let trimmed = line.trim();

        if let Some(caps) = DIV_OPEN.captures(trimmed) {
            depth += 1;
            if depth == 1 {
                let class_name = caps[1].trim();
                current = Some(DivBlock {
                    div_type: if class_name.is_empty() {
                        "text".to_string()
                    } else {
                        class_name.to_string()
                    },
                    content: String::new(),
                    start: char_index,
                    end: 0,
                });
            } else if let Some(block) = current.as_mut() {
                block.content.push_str(line);
                block.content.push('\n');
            }
        } else if trimmed == "</div>" && depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some(mut block) = current.take() {
                    if block.content.ends_with('\n') {
                        block.content.pop();
                    }
                    block.end = (char_index + line.len() + 1).min(text.len());
                    blocks.push(block);
                }
            } else if let Some(block) = current.as_mut() {
                block.content.push_str(line);
                block.content.push('\n');
            }
        } else if let Some(block) = current.as_mut() {
            block.content.push_str(line);
            block.content.push('\n');
        }

        char_index += line.len() + 1;
    }

    blocks
}

fn convert_block(type_lower: &str, content: &str, options: &DivOptions) -> String {
    let mut trimmed = content.trim().to_string();

    // Labeled containers: a closing span must be followed by a blank line
    if is_labeled_container(type_lower) {
        trimmed = SPAN_BREAK.replace_all(&trimmed, "</span>\n\n").into_owned();
    }

    if is_code_container(type_lower) {
        return format!("```\n{}\n```\n", trimmed);
    }

    if is_quote_container(type_lower) {
        return format!("{}\n\n", quote_lines(&trimmed));
    }

    if type_lower == "definitionskasten" {
        return format!(
            "> **{}**\n>\n{}\n\n",
            container_label(type_lower),
            quote_definition_lines(&trimmed)
        );
    }

    if is_labeled_container(type_lower) {
        return format!(
            "> **{}**\n>\n{}\n\n",
            container_label(type_lower),
            quote_lines(&trimmed)
        );
    }

    match options.fallback {
        FallbackMode::Blockquote => format!("{}\n\n", quote_lines(&trimmed)),
        FallbackMode::Plain => format!("{}\n\n", trimmed),
    }
}

fn quote_lines(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote layout for definition boxes: the first content line carries the
/// term and is quoted one level deeper.
fn quote_definition_lines(content: &str) -> String {
    let mut first_found = false;
    content
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ">".to_string()
            } else if !first_found {
                first_found = true;
                format!(">> {}", line)
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_container() {
        let input = "<div class=\"codekurz\">\nfunc main() {}\n</div>\n";
        assert_eq!(restructure_divs(input), "```\nfunc main() {}\n```\n");
    }

    #[test]
    fn test_labeled_container() {
        let input = "<div class=\"hinweis\">\nKurzer Tipp.\n</div>\n";
        assert_eq!(
            restructure_divs(input),
            "> **Hinweis ⚠️**\n>\n> Kurzer Tipp.\n\n"
        );
    }

    #[test]
    fn test_quote_container_blank_lines() {
        let input = "<div class=\"universalkasten\">\nErste Zeile\n\nZweite Zeile\n</div>\n";
        assert_eq!(restructure_divs(input), "> Erste Zeile\n>\n> Zweite Zeile\n\n");
    }

    #[test]
    fn test_definition_container_first_line_quoted_deeper() {
        let input = "<div class=\"definitionskasten\">\nSlice\nEin Ausschnitt.\n</div>\n";
        assert_eq!(
            restructure_divs(input),
            "> **Definition 📓**\n>\n>> Slice\n> Ein Ausschnitt.\n\n"
        );
    }

    #[test]
    fn test_unknown_container_untouched() {
        let input = "<div class=\"sidebar\">\nBleibt HTML.\n</div>\n";
        assert_eq!(restructure_divs(input), input);
    }

    #[test]
    fn test_blank_class_is_not_converted() {
        let input = "<div class=\" \">\nInhalt\n</div>\n";
        assert_eq!(restructure_divs(input), input);
    }

    #[test]
    fn test_kommlit_item_gets_margin_style() {
        let input = "<div class=\"KommLitItem\">\nEintrag\n</div>\n";
        let out = restructure_divs(input);
        assert!(out.contains("<div class=\"KommLitItem\" style=\"margin: 1.5em 0;\">"));
        assert!(out.contains("Eintrag\n</div>"));
    }

    #[test]
    fn test_nested_known_containers_inside_out() {
        let input =
            "<div class=\"universalkasten\">\nIntro\n<div class=\"hinweis\">\nTipp\n</div>\n</div>\n";
        assert_eq!(
            restructure_divs(input),
            "> Intro\n> > **Hinweis ⚠️**\n> >\n> > Tipp\n\n"
        );
    }

    #[test]
    fn test_span_repair_in_labeled_container() {
        let input = "<div class=\"experten\">\n<span class=\"x\">T</span>\nDanach\n</div>\n";
        assert_eq!(
            restructure_divs(input),
            "> **Expertenwissen 🧠**\n>\n> <span class=\"x\">T</span>\n>\n> Danach\n\n"
        );
    }

    #[test]
    fn test_open_tag_matches_case_insensitively() {
        let input = "<DIV CLASS=\"hinweis\">\nTipp\n</div>\n";
        assert_eq!(restructure_divs(input), "> **Hinweis ⚠️**\n>\n> Tipp\n\n");
    }

    #[test]
    fn test_unclosed_block_left_alone() {
        let input = "<div class=\"hinweis\">\nnie geschlossen";
        assert_eq!(restructure_divs(input), input);
    }

    #[test]
    fn test_text_without_divs_passes_through() {
        let input = "# Kapitel\n\nAbsatz mit `code`.\n";
        assert_eq!(restructure_divs(input), input);
    }

    #[test]
    fn test_fallback_modes() {
        // Every builtin known type has a dedicated conversion; the
        // fallback arm is exercised directly.
        let plain = convert_block("other", "Zeile", &DivOptions::default());
        assert_eq!(plain, "Zeile\n\n");
        let quoted = convert_block(
            "other",
            "Zeile",
            &DivOptions {
                fallback: FallbackMode::Blockquote,
            },
        );
        assert_eq!(quoted, "> Zeile\n\n");
    }
}
