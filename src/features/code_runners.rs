//! LiaScript code-runner annotation
//!
//! Appends the matching `@LIA.x` execution directive after each fenced
//! code block whose language tag is in the runner table. Unknown tags and
//! bare fences stay untouched; a block is annotated exactly once.

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::runners::runner_for;

lazy_static! {
    static ref CODE_BLOCK: Regex =
        Regex::new(r"(```\s*([a-zA-Z0-9_+-]+)\s*\n)([\s\S]*?)(```)").unwrap();
}

/// Adds runner directives to all recognized code fences.
pub fn annotate_code_blocks(markdown: &str) -> String {
    let mut replacements: Vec<(usize, usize, String)> = Vec::new();

    for caps in CODE_BLOCK.captures_iter(markdown) {
        if let (Some(whole), Some(language)) = (caps.get(0), caps.get(2)) {
            if let Some(directive) = runner_for(language.as_str()) {
                let annotated =
                    format!("{}{}{}\n{}", &caps[1], &caps[3], &caps[4], directive);
                replacements.push((whole.start(), whole.end(), annotated));
            }
        }
    }

    // Back to front keeps the earlier offsets valid
    replacements.sort_by(|a, b| b.0.cmp(&a.0));

    let mut result = markdown.to_string();
    for (start, end, replacement) in &replacements {
        result.replace_range(*start..*end, replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_gets_directive() {
        let input = "```go\nfmt.Println(1)\n```\n";
        assert_eq!(
            annotate_code_blocks(input),
            "```go\nfmt.Println(1)\n```\n@LIA.go\n"
        );
    }

    #[test]
    fn test_directive_added_exactly_once() {
        let input = "```go\nx\n```\n";
        let out = annotate_code_blocks(input);
        assert_eq!(out.matches("@LIA.go").count(), 1);
    }

    #[test]
    fn test_unknown_language_untouched() {
        let input = "```pascal\nwriteln\n```\n";
        assert_eq!(annotate_code_blocks(input), input);
    }

    #[test]
    fn test_bare_fence_untouched() {
        let input = "```\nAusgabe\n```\n";
        assert_eq!(annotate_code_blocks(input), input);
    }

    #[test]
    fn test_tag_is_case_insensitive() {
        let input = "```Go\nx\n```\n";
        assert_eq!(annotate_code_blocks(input), "```Go\nx\n```\n@LIA.go\n");
    }

    #[test]
    fn test_alias_maps_to_shared_runner() {
        let input = "```cs\nvar x = 1;\n```\n";
        assert!(annotate_code_blocks(input).contains("@LIA.dotnet"));
        let ts = "```ts\nlet x = 1;\n```\n";
        assert!(annotate_code_blocks(ts).contains("@LIA.nodejs"));
    }

    #[test]
    fn test_multiple_blocks_each_annotated() {
        let input = "```go\na\n```\n\nText\n\n```python\nb\n```\n";
        let out = annotate_code_blocks(input);
        assert!(out.contains("```\n@LIA.go\n"));
        assert!(out.contains("```\n@LIA.python\n"));
    }
}
