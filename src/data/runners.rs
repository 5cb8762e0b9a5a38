//! Code-runner directive mappings
//!
//! Maps fenced-code language tags (lowercased) to the LiaScript runner
//! macro appended after the block, following the official CodeRunner
//! language list. Aliases map to the same runner.

use phf::phf_map;

/// Language tag to runner directive mapping
pub static LANGUAGE_RUNNERS: phf::Map<&'static str, &'static str> = phf_map! {
    // A
    "ada" => "@LIA.ada",
    "algol" => "@LIA.algol",
    "apl" => "@LIA.apl",
    "awk" => "@LIA.awk",

    // B
    "basic" => "@LIA.basic",
    "bas" => "@LIA.basic",

    // C
    "c" => "@LIA.c",
    "clojure" => "@LIA.clojure",
    "clj" => "@LIA.clojure",
    "cpp" => "@LIA.cpp",
    "c++" => "@LIA.cpp",
    "cxx" => "@LIA.cpp",
    "cobol" => "@LIA.cobol",
    "cob" => "@LIA.cobol",
    "coq" => "@LIA.coq",
    "csharp" => "@LIA.dotnet",
    "cs" => "@LIA.dotnet",
    "c#" => "@LIA.dotnet",

    // D
    "d" => "@LIA.d",

    // E
    "elixir" => "@LIA.elixir",
    "exs" => "@LIA.elixir",
    "erlang" => "@LIA.erlang",
    "erl" => "@LIA.erlang",

    // F
    "forth" => "@LIA.forth",
    "fs" => "@LIA.forth",
    "fortran" => "@LIA.fortran",
    "f90" => "@LIA.fortran",
    "fsharp" => "@LIA.fsharp",
    "f#" => "@LIA.fsharp",

    // G
    "go" => "@LIA.go",
    "golang" => "@LIA.go",
    "groovy" => "@LIA.groovy",

    // H
    "haskell" => "@LIA.haskell",
    "hs" => "@LIA.haskell",
    "haxe" => "@LIA.haxe",
    "hx" => "@LIA.haxe",

    // I
    "inform" => "@LIA.inform",
    "io" => "@LIA.io",

    // J
    "java" => "@LIA.java",
    "javascript" => "@LIA.nodejs",
    "js" => "@LIA.nodejs",
    "julia" => "@LIA.julia",
    "jl" => "@LIA.julia",

    // K
    "kotlin" => "@LIA.kotlin",
    "kt" => "@LIA.kotlin",

    // L
    "lua" => "@LIA.lua",

    // M
    "mono" => "@LIA.mono",

    // N
    "nasm" => "@LIA.nasm",
    "asm" => "@LIA.nasm",
    "nim" => "@LIA.nim",
    "nodejs" => "@LIA.nodejs",
    "node" => "@LIA.nodejs",

    // O
    "ocaml" => "@LIA.ocaml",
    "ml" => "@LIA.ocaml",

    // P
    "perl" => "@LIA.perl",
    "pl" => "@LIA.perl",
    "php" => "@LIA.php",
    "postscript" => "@LIA.postscript",
    "ps" => "@LIA.postscript",
    "prolog" => "@LIA.prolog",
    "python" => "@LIA.python",
    "py" => "@LIA.python",
    "python2" => "@LIA.python2",
    "python3" => "@LIA.python3",

    // Q
    "qsharp" => "@LIA.qsharp",
    "qs" => "@LIA.qsharp",

    // R
    "r" => "@LIA.r",
    "racket" => "@LIA.racket",
    "rkt" => "@LIA.racket",
    "ruby" => "@LIA.ruby",
    "rb" => "@LIA.ruby",
    "rust" => "@LIA.rust",
    "rs" => "@LIA.rust",

    // S
    "scala" => "@LIA.scala",
    "scheme" => "@LIA.scheme",
    "scm" => "@LIA.scheme",
    "selectscript" => "@LIA.selectscript",
    "s2" => "@LIA.selectscript",
    "smalltalk" => "@LIA.smalltalk",
    "st" => "@LIA.smalltalk",
    "bash" => "@LIA.bash",
    "sh" => "@LIA.bash",
    "shell" => "@LIA.bash",

    // T
    "tcl" => "@LIA.tcl",
    "typescript" => "@LIA.nodejs",
    "ts" => "@LIA.nodejs",

    // V
    "v" => "@LIA.v",
    "vlang" => "@LIA.v",
    "verilog" => "@LIA.verilog",
    "vhdl" => "@LIA.vhdl",

    // Z
    "zig" => "@LIA.zig",
};

/// Looks up the runner directive for a (case-insensitive) language tag.
pub fn runner_for(language: &str) -> Option<&'static str> {
    LANGUAGE_RUNNERS
        .get(language.to_lowercase().trim())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_lookup() {
        assert_eq!(runner_for("python"), Some("@LIA.python"));
        assert_eq!(runner_for("go"), Some("@LIA.go"));
    }

    #[test]
    fn test_alias_lookup() {
        assert_eq!(runner_for("js"), Some("@LIA.nodejs"));
        assert_eq!(runner_for("typescript"), Some("@LIA.nodejs"));
        assert_eq!(runner_for("golang"), Some("@LIA.go"));
        assert_eq!(runner_for("sh"), Some("@LIA.bash"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(runner_for("Python"), Some("@LIA.python"));
        assert_eq!(runner_for("RUST"), Some("@LIA.rust"));
    }

    #[test]
    fn test_unknown_language() {
        assert_eq!(runner_for("foobar"), None);
        assert_eq!(runner_for(""), None);
    }
}
