//! Column widths and width-aware wrapping.
//!
//! The layout model is deliberately simple: a character inside the
//! single-byte range (`U+0000..=U+00FF`) takes one column, anything above it
//! takes two. Wrapping only ever breaks between grapheme clusters, so a
//! double-width character (or a base character with its combining marks) is
//! never split across lines.

use unicode_segmentation::UnicodeSegmentation;

/// Width of a single character in columns.
#[inline]
pub fn char_width(c: char) -> usize {
    if (c as u32) <= 0xFF { 1 } else { 2 }
}

/// Width of a string in columns.
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Greedy word wrap of a single line (no embedded newlines) to `budget`
/// columns.
///
/// Runs of spaces between words are collapsed at break points. Words wider
/// than the budget are split at grapheme boundaries; a lone grapheme wider
/// than the budget still gets its own line.
pub fn wrap_line(line: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    if str_width(line) <= budget {
        return vec![line.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in line.split(' ').filter(|w| !w.is_empty()) {
        let word_width = str_width(word);
        let sep = usize::from(!current.is_empty());

        if current_width + sep + word_width <= budget {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= budget {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for grapheme in word.graphemes(true) {
            let w = str_width(grapheme);
            if current_width + w > budget && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += w;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
