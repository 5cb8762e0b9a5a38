//! Footnote relocation
//!
//! pandoc gathers footnote definitions at the end of the document. This
//! pass extracts every `[^n]:` definition, continuation lines included,
//! and re-inserts it behind the section that references it: directly
//! before the next heading after the reference, or at the document end
//! when no heading follows. Insertions at the same position are ordered
//! by footnote id. Every reference gets its own copy of the definition.

use fxhash::FxHashSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FOOTNOTE_START: Regex = Regex::new(r"^\[\^(\d+)\]:\s*(.*)$").unwrap();
    static ref FOOTNOTE_DEF: Regex = Regex::new(r"^\[\^\d+\]:").unwrap();
    static ref CONTINUATION_INDENT: Regex = Regex::new(r"^( {2,}|\t)").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?m)^#{1,6}\s.+$").unwrap();
    static ref EXTRA_BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

#[derive(Debug, Clone)]
struct Footnote {
    id: String,
    text: String,
}

struct Insertion {
    pos: usize,
    id_num: u64,
    block: String,
}

/// Relocates footnote definitions into their referencing sections.
pub fn relocate_footnotes(markdown: &str) -> String {
    let (cleaned, footnotes) = extract_footnotes(markdown);

    let mut insertions: Vec<Insertion> = Vec::new();
    for footnote in &footnotes {
        let reference = format!("[^{}]", footnote.id);
        for (ref_index, _) in cleaned.match_indices(&reference) {
            let insert_pos = HEADING
                .find(&cleaned[ref_index..])
                .map(|m| ref_index + m.start())
                .unwrap_or(cleaned.len());
            let indented = footnote.text.replace('\n', "\n    ");
            insertions.push(Insertion {
                pos: insert_pos,
                id_num: footnote.id.parse().unwrap_or(u64::MAX),
                block: format!("\n[^{}]: {}\n\n", footnote.id, indented),
            });
        }
    }

    insertions.sort_by(|a, b| a.pos.cmp(&b.pos).then(a.id_num.cmp(&b.id_num)));

    // Back to front keeps the earlier positions valid
    let mut text = cleaned;
    for insertion in insertions.iter().rev() {
        let left = collapse_trailing_newlines(&text[..insertion.pos]);
        let right = collapse_leading_newlines(&text[insertion.pos..]);
        text = format!("{}{}{}", left, insertion.block, right);
    }

    normalize_blank_lines(&text)
}

/// Strips all footnote definitions out of the document and returns them
/// alongside the cleaned text.
///
/// A definition starts with `[^n]:` at the beginning of a line. Lines
/// indented by two spaces or a tab and whitespace-only lines continue it
/// (dedented once); a zero-length line, a new definition or any other
/// line ends it.
fn extract_footnotes(markdown: &str) -> (String, Vec<Footnote>) {
    let lines: Vec<&str> = markdown
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let mut footnotes = Vec::new();
    let mut removed: FxHashSet<usize> = FxHashSet::default();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.is_empty() {
            i += 1;
            continue;
        }

        if let Some(caps) = FOOTNOTE_START.captures(line) {
            let id = caps[1].to_string();
            let mut buffer = vec![caps[2].to_string()];
            removed.insert(i);

            let mut j = i + 1;
            while j < lines.len() {
                let next = lines[j];
                if next.is_empty() {
                    break;
                }
                if FOOTNOTE_DEF.is_match(next) {
                    break;
                }
                if CONTINUATION_INDENT.is_match(next) || next.trim().is_empty() {
                    buffer.push(CONTINUATION_INDENT.replace(next, "").into_owned());
                    removed.insert(j);
                    j += 1;
                    continue;
                }
                break;
            }

            footnotes.push(Footnote {
                id,
                text: buffer.join("\n").trim_end().to_string(),
            });

            i = j;
            continue;
        }

        i += 1;
    }

    let cleaned_lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| !removed.contains(idx))
        .map(|(_, line)| *line)
        .collect();
    (normalize_blank_lines(&cleaned_lines.join("\n")), footnotes)
}

fn normalize_blank_lines(text: &str) -> String {
    let collapsed = EXTRA_BLANK_LINES.replace_all(text, "\n\n");
    format!("{}\n", collapsed.trim_end())
}

fn collapse_trailing_newlines(text: &str) -> String {
    let stripped = text.trim_end_matches('\n');
    if stripped.len() == text.len() {
        text.to_string()
    } else {
        format!("{}\n", stripped)
    }
}

fn collapse_leading_newlines(text: &str) -> String {
    let stripped = text.trim_start_matches('\n');
    if stripped.len() == text.len() {
        text.to_string()
    } else {
        format!("\n{}", stripped)
    }
}
