//! Brace-aware scanning primitives
//!
//! Flat regexes cannot match arbitrarily nested `{...}` groups, so every
//! transform that has to look inside macro arguments goes through these
//! two functions: [`extract_braced`] finds the content of one balanced
//! group, [`extract_parameters`] pulls N consecutive groups after a macro
//! name.

use crate::utils::error::{TexliaError, TexliaResult};

/// Extracts the content of a balanced brace group.
///
/// `start` is the byte offset immediately *after* the opening `{`. Scans
/// with a depth counter; a backslash escapes the following character (both
/// are copied verbatim and do not affect the depth). Returns the content
/// without the final `}` and the byte offset just past it, or `None` when
/// the input ends before the group closes.
pub fn extract_braced(text: &str, start: usize) -> Option<(String, usize)> {
    let mut depth: usize = 1;
    let mut content = String::new();
    let mut chars = text[start..].char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            content.push(ch);
            match chars.next() {
                Some((_, escaped)) => content.push(escaped),
                // Trailing backslash, the group can no longer close.
                None => return None,
            }
            continue;
        }
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((content, start + i + 1));
                }
            }
            _ => {}
        }
        content.push(ch);
    }

    None
}

/// Extracts `count` consecutive `{...}` parameter groups.
///
/// `start` is the byte offset just after the macro name. Whitespace between
/// groups is skipped. Extraction is all-or-nothing: a missing group fails
/// with the number of parameters found so far, an unclosed group fails as
/// unbalanced; no partial list is ever returned. Each parameter is trimmed.
pub fn extract_parameters(
    text: &str,
    start: usize,
    count: usize,
    macro_name: &str,
) -> TexliaResult<(Vec<String>, usize)> {
    let mut pos = start;
    let mut params = Vec::with_capacity(count);

    for found in 0..count {
        pos = skip_whitespace(text, pos);
        if pos >= text.len() || !text[pos..].starts_with('{') {
            return Err(TexliaError::missing_parameters(
                macro_name, count, found, start,
            ));
        }
        let group_start = pos + 1;
        match extract_braced(text, group_start) {
            Some((content, end)) => {
                params.push(content.trim().to_string());
                pos = end;
            }
            None => return Err(TexliaError::unbalanced(pos)),
        }
    }

    Ok((params, pos))
}

fn skip_whitespace(text: &str, mut pos: usize) -> usize {
    while let Some(ch) = text[pos..].chars().next() {
        if !ch.is_whitespace() {
            break;
        }
        pos += ch.len_utf8();
    }
    pos
}
