//! # ECMA-262 Patterns
//!
//! JSON Schema `pattern` values are ECMA-262 regular expressions. They are
//! compiled with `fancy-regex`, which adds the lookaround and backreferences
//! the `regex` crate lacks, after rewriting the shorthand classes whose
//! meaning differs between the two dialects:
//!
//! | ECMA       | outside `[...]`     | inside `[...]`  |
//! |------------|---------------------|-----------------|
//! | `\d` `\D`  | `[0-9]` `[^0-9]`    | `0-9` `[:^digit:]` |
//! | `\w` `\W`  | ASCII word class    | `A-Za-z0-9_` `[:^word:]` |
//! | `\b` `\B`  | ASCII word boundary | backspace (`\b` only) |
//!
//! A literal `[` inside a class is escaped, since Rust would read it as a
//! nested class.

use fancy_regex::Regex;

const WORD: &str = "[A-Za-z0-9_]";
const NOT_WORD: &str = "[^A-Za-z0-9_]";
const WORD_BOUNDARY: &str =
    "(?:(?<=[A-Za-z0-9_])(?![A-Za-z0-9_])|(?<![A-Za-z0-9_])(?=[A-Za-z0-9_]))";
const NOT_WORD_BOUNDARY: &str =
    "(?:(?<=[A-Za-z0-9_])(?=[A-Za-z0-9_])|(?<![A-Za-z0-9_])(?![A-Za-z0-9_]))";

/// Compile an ECMA-262 pattern.
pub fn compile_pattern(pattern: &str) -> Result<Regex, fancy_regex::Error> {
    Regex::new(&translate(pattern))
}

/// Rewrite ECMA-only syntax into the `fancy-regex` dialect.
pub fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(escaped) = chars.next() else {
                    // Dangling escape; let the compiler reject it.
                    out.push('\\');
                    break;
                };
                let replacement = match (escaped, in_class) {
                    ('d', false) => "[0-9]",
                    ('D', false) => "[^0-9]",
                    ('w', false) => WORD,
                    ('W', false) => NOT_WORD,
                    ('b', false) => WORD_BOUNDARY,
                    ('B', false) => NOT_WORD_BOUNDARY,
                    ('d', true) => "0-9",
                    ('D', true) => "[:^digit:]",
                    ('w', true) => "A-Za-z0-9_",
                    ('W', true) => "[:^word:]",
                    ('b', true) => "\\x08",
                    _ => {
                        out.push('\\');
                        out.push(escaped);
                        continue;
                    }
                };
                out.push_str(replacement);
            }
            '[' if in_class => out.push_str("\\["),
            '[' => {
                in_class = true;
                out.push('[');
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}
