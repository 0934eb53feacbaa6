//! Structural re-tokenization of nested argument lists
//!
//! Generic type arguments and other comma-separated lists may nest
//! (`Dictionary(String, List(Int32))`); splitting them on every comma
//! mangles the inner groups. The splitter here tracks a bracket depth
//! counter and only splits when the depth is zero.

/// Bracket pairs the depth counter recognizes
const OPENERS: [char; 4] = ['(', '[', '{', '<'];
const CLOSERS: [char; 4] = [')', ']', '}', '>'];

/// Split `input` on top-level occurrences of `separator`
///
/// Tokens are trimmed; empty tokens are preserved (a trailing separator is
/// caller data, not ours to hide). Unbalanced input never panics — closers
/// below depth zero are treated as literal characters.
pub fn split_top_level(input: &str, separator: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth: u32 = 0;

    for ch in input.chars() {
        if OPENERS.contains(&ch) {
            depth += 1;
            current.push(ch);
        } else if CLOSERS.contains(&ch) {
            depth = depth.saturating_sub(1);
            current.push(ch);
        } else if ch == separator && depth == 0 {
            tokens.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

/// Whether `input` contains any bracketed group at all
pub fn has_nested_groups(input: &str) -> bool {
    input.chars().any(|c| OPENERS.contains(&c))
}
