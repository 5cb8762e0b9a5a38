//! Math notation cleanup for converted Markdown
//!
//! gfm output renders display math as ```` ```math ```` fences and inline
//! math as `` $`x`$ ``. LiaScript wants `$$ ... $$` blocks and plain
//! `$x$`; stray spaces between inline code and a formula (from
//! `\texttt{.. $x$ ..}` sources) are moved outside the backticks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MATH_FENCE: Regex =
        Regex::new(r"(?m)^\s*``` ?math\s*\n([\s\S]*?)\s*```").unwrap();
    static ref INLINE_MATH_BACKTICKS: Regex = Regex::new(r"\$`([^`]+)`\$").unwrap();
    static ref SPACE_BEFORE_MATH: Regex = Regex::new(r"`([^`]+) `(\$[^$]+\$)").unwrap();
    static ref SPACE_AFTER_MATH: Regex = Regex::new(r"(\$[^$]+\$)` ([^`]+)`").unwrap();
}

/// Applies the three math repairs in order: fenced blocks, inline
/// backticks, space placement.
pub fn normalize_math(input: &str) -> String {
    let result = convert_math_fences(input);
    let result = strip_inline_math_backticks(&result);
    fix_spaces_around_math(&result)
}

fn convert_math_fences(text: &str) -> String {
    MATH_FENCE
        .replace_all(text, |caps: &regex::Captures| {
            format!("$$\n{}\n$$", &caps[1])
        })
        .into_owned()
}

fn strip_inline_math_backticks(text: &str) -> String {
    INLINE_MATH_BACKTICKS
        .replace_all(text, |caps: &regex::Captures| format!("${}$", &caps[1]))
        .into_owned()
}

fn fix_spaces_around_math(text: &str) -> String {
    let result = SPACE_BEFORE_MATH.replace_all(text, "`${1}` ${2}");
    SPACE_AFTER_MATH.replace_all(&result, "${1} `${2}`").into_owned()
}
