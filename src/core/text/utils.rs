//! Grapheme-aware truncation.

use unicode_segmentation::UnicodeSegmentation;

use super::ansi::extract_ansi_code;
use super::width::{next_ansi_or_end, visible_width};

const ANSI_RESET: &str = "\x1b[0m";

pub fn grapheme_segments(text: &str) -> unicode_segmentation::Graphemes<'_> {
    UnicodeSegmentation::graphemes(text, true)
}

/// Cut `text` to at most `max_width` visible cells, appending `ellipsis` when
/// anything was dropped. Color codes before the cut are kept and closed with a
/// reset; text without codes stays free of escapes.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let target_width = max_width.saturating_sub(visible_width(ellipsis));
    if target_width == 0 {
        return ellipsis.chars().take(max_width).collect();
    }

    let mut truncated = String::new();
    let mut current_width = 0;
    let mut idx = 0;
    let mut colored = false;
    'outer: while idx < text.len() {
        if let Some(ansi) = extract_ansi_code(text, idx) {
            truncated.push_str(&ansi.code);
            idx += ansi.length;
            colored = true;
            continue;
        }
        let end = next_ansi_or_end(text, idx);
        for grapheme in grapheme_segments(&text[idx..end]) {
            let width = visible_width(grapheme);
            if current_width + width > target_width {
                break 'outer;
            }
            truncated.push_str(grapheme);
            current_width += width;
        }
        idx = end;
    }

    if colored {
        truncated.push_str(ANSI_RESET);
    }
    truncated.push_str(ellipsis);
    truncated
}
