//! Text composition primitives shared by the page views.
//!
//! Views build `ratatui` lines and compose them with the helpers here:
//! horizontal joins, bordered boxes, wrapping, truncation. All pure
//! string/span manipulation.

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::theme::Theme;

/// Join two blocks side by side. Left lines are padded to a common width,
/// `gap` columns separate the blocks, and the taller block decides the row
/// count.
pub fn join_horizontal(
    left: Vec<Line<'static>>,
    right: Vec<Line<'static>>,
    gap: usize,
) -> Vec<Line<'static>> {
    let left_width = left.iter().map(Line::width).max().unwrap_or(0);
    let rows = left.len().max(right.len());
    let mut out = Vec::with_capacity(rows);
    let mut left_iter = left.into_iter();
    let mut right_iter = right.into_iter();
    for _ in 0..rows {
        let l = left_iter.next().unwrap_or_default();
        let r = right_iter.next().unwrap_or_default();
        let pad = left_width.saturating_sub(l.width()) + gap;
        let mut spans = l.spans;
        spans.push(Span::raw(" ".repeat(pad)));
        spans.extend(r.spans);
        out.push(Line::from(spans));
    }
    out
}

/// Cut a line down to `width` columns, span styles preserved.
pub fn truncate_line(line: Line<'static>, width: usize) -> Line<'static> {
    if line.width() <= width {
        return line;
    }
    let mut spans = Vec::new();
    let mut used = 0;
    for span in line.spans {
        let span_width = UnicodeWidthStr::width(span.content.as_ref());
        if used + span_width <= width {
            used += span_width;
            spans.push(span);
            continue;
        }
        let remaining = width - used;
        let mut taken = String::new();
        let mut taken_width = 0;
        for ch in span.content.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if taken_width + ch_width > remaining {
                break;
            }
            taken.push(ch);
            taken_width += ch_width;
        }
        if !taken.is_empty() {
            spans.push(Span::styled(taken, span.style));
        }
        break;
    }
    Line::from(spans)
}

/// Wrap plain text into lines no wider than `width`, breaking on spaces and
/// hard-breaking words that don't fit on their own line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in paragraph.split_whitespace() {
            place_word(&mut lines, &mut current, &mut current_width, word, width);
        }
        lines.push(current);
    }
    lines
}

fn place_word(
    lines: &mut Vec<String>,
    current: &mut String,
    current_width: &mut usize,
    word: &str,
    width: usize,
) {
    let mut word = word;
    loop {
        let word_width = UnicodeWidthStr::width(word);
        let sep = if *current_width == 0 { 0 } else { 1 };
        if *current_width + sep + word_width <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            *current_width += sep + word_width;
            return;
        }
        if *current_width > 0 {
            lines.push(std::mem::take(current));
            *current_width = 0;
            continue;
        }
        // the word alone exceeds the width; hard-break it
        let mut split = word.len();
        let mut taken_width = 0;
        for (i, ch) in word.char_indices() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if taken_width + ch_width > width {
                split = i;
                break;
            }
            taken_width += ch_width;
        }
        if split == 0 {
            return;
        }
        lines.push(word[..split].to_string());
        word = &word[split..];
        if word.is_empty() {
            return;
        }
    }
}

/// Center `text` inside `width` columns.
pub fn center(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width >= width {
        return text.to_string();
    }
    let left = (width - text_width) / 2;
    let right = width - text_width - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Wrap content lines in a rounded border, `width` columns outside edge to
/// outside edge. Selected boxes get the accent border.
pub fn boxed(
    content: Vec<Line<'static>>,
    width: usize,
    selected: bool,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let width = width.max(4);
    let inner = width - 4;
    let border = if selected { theme.accent() } else { theme.muted() };

    let mut out = Vec::with_capacity(content.len() + 2);
    out.push(Line::from(Span::styled(
        format!("╭{}╮", "─".repeat(width - 2)),
        border,
    )));
    for line in content {
        let line = truncate_line(line, inner);
        let pad = inner.saturating_sub(line.width());
        let mut spans = vec![Span::styled("│ ".to_string(), border)];
        spans.extend(line.spans);
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(" │".to_string(), border));
        out.push(Line::from(spans));
    }
    out.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(width - 2)),
        border,
    )));
    out
}

/// A one-line box with a centered label ("add address").
pub fn centered_box(
    label: &str,
    width: usize,
    selected: bool,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let inner = width.max(4) - 4;
    let style = if selected { theme.accent() } else { theme.base() };
    boxed(
        vec![Line::from(Span::styled(center(label, inner), style))],
        width,
        selected,
        theme,
    )
}

/// Trailing animation dots for "working on it" labels.
pub fn spinner_dots(frame: u64) -> &'static str {
    match (frame / 15) % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_breaks_on_spaces() {
        let lines = wrap_text("single origin whole bean coffee", 12);
        assert!(lines.iter().all(|l| UnicodeWidthStr::width(l.as_str()) <= 12));
        assert_eq!(lines.join(" "), "single origin whole bean coffee");
    }

    #[test]
    fn test_wrap_text_hard_breaks_long_words() {
        let lines = wrap_text("aaaaaaaaaaaaaaaaaaaa", 8);
        assert_eq!(lines, vec!["aaaaaaaa", "aaaaaaaa", "aaaa"]);
    }

    #[test]
    fn test_truncate_line_keeps_width() {
        let line = Line::from(vec![Span::raw("hello "), Span::raw("world")]);
        let cut = truncate_line(line, 8);
        assert_eq!(cut.width(), 8);
    }

    #[test]
    fn test_join_horizontal_pads_left_block() {
        let left = vec![Line::from("ab"), Line::from("a")];
        let right = vec![Line::from("x"), Line::from("y"), Line::from("z")];
        let joined = join_horizontal(left, right, 2);
        assert_eq!(joined.len(), 3);
        // both rows align: left block padded to width 2 plus the gap
        assert_eq!(joined[0].width(), 5);
        assert_eq!(joined[1].width(), 5);
        // row without a left line still indents the right block
        assert_eq!(joined[2].width(), 5);
    }

    #[test]
    fn test_boxed_dimensions() {
        let theme = Theme::default();
        let lines = boxed(vec![Line::from("hi")], 20, false, &theme);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.width() == 20));
    }

    #[test]
    fn test_center() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
        assert_eq!(center("toolong", 3), "toolong");
    }
}
