//! Text-level layout transforms shared by the block renderers.
//!
//! Everything here works on already-rendered strings; no node knowledge.

use crate::width::str_width;

pub(crate) fn spaces(n: usize) -> String {
    " ".repeat(n)
}

/// Hangs `body` under `bullet`.
///
/// The first line keeps the block's own `indent`, its remaining leading
/// whitespace is replaced by `bullet + " "`. Every following non-empty line is
/// shifted right by the width of `bullet + " "`.
pub(crate) fn hang_bullet(body: &str, indent: usize, bullet: &str) -> String {
    let hang = spaces(str_width(bullet) + 1);
    let mut lines = body.split_inclusive('\n');
    let mut out = String::with_capacity(body.len() + bullet.len() + 1);

    out.push_str(&spaces(indent));
    out.push_str(bullet);
    match lines.next() {
        Some(first) => {
            let rest = first.trim_start_matches(' ');
            if !rest.trim_end_matches('\n').is_empty() {
                out.push(' ');
            }
            out.push_str(rest);
        }
        None => out.push('\n'),
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }

    for line in lines {
        if line != "\n" {
            out.push_str(&hang);
        }
        out.push_str(line);
    }
    out
}

/// Ensures a non-empty block ends with exactly one newline.
pub(crate) fn collapse_trailing_newlines(mut body: String) -> String {
    let trimmed = body.trim_end_matches('\n').len();
    body.truncate(trimmed);
    if !body.is_empty() {
        body.push('\n');
    }
    body
}

/// Prefixes each non-empty line of `text` with `indent` spaces.
pub(crate) fn indent_lines(text: &str, indent: usize) -> String {
    if indent == 0 {
        return text.to_string();
    }
    let pad = spaces(indent);
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line != "\n" {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

/// A dashed separator line.
pub(crate) fn rule(indent: usize, width: usize) -> String {
    format!("{}{}\n", spaces(indent), "-".repeat(width))
}

/// Collapses rendered text onto a single line.
pub(crate) fn flatten_inline(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
