//! Input rendering adapters.
//!
//! The engine variants decide behavior; these adapters only decide how the
//! text and cursor are laid out inside the input box.

use fieldhint_engine::{MultiLine, SingleLine};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual lines of an input and the cursor cell relative to the text area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputLayout {
    pub lines: Vec<String>,
    /// `(column, line)`
    pub cursor: (u16, u16),
}

pub trait InputView {
    /// Height of the input box including borders.
    fn box_height(&self) -> u16;

    /// Lay out `text` in an area `width` cells wide with the cursor at byte
    /// index `cursor`.
    fn layout(&self, text: &str, cursor: usize, width: u16) -> InputLayout;
}

impl InputView for SingleLine {
    fn box_height(&self) -> u16 {
        3
    }

    /// Scrolls horizontally so the cursor stays visible.
    fn layout(&self, text: &str, cursor: usize, width: u16) -> InputLayout {
        let width = usize::from(width.max(1));
        let mut cursor_column = text[..cursor].width();
        let mut skip = 0;
        for ch in text.chars() {
            if cursor_column < width {
                break;
            }
            cursor_column -= ch.width().unwrap_or(0);
            skip += ch.len_utf8();
        }

        let mut visible = String::new();
        let mut used = 0;
        for ch in text[skip..].chars() {
            let ch = if ch == '\n' { ' ' } else { ch };
            let ch_width = ch.width().unwrap_or(0);
            if used + ch_width > width {
                break;
            }
            used += ch_width;
            visible.push(ch);
        }

        InputLayout {
            lines: vec![visible],
            cursor: (to_cell(cursor_column), 0),
        }
    }
}

impl InputView for MultiLine {
    fn box_height(&self) -> u16 {
        6
    }

    /// Hard breaks on `\n`, soft wraps at the area width.
    fn layout(&self, text: &str, cursor: usize, width: u16) -> InputLayout {
        let width = usize::from(width.max(1));
        let mut lines = vec![String::new()];
        let mut column = 0;
        let mut cursor_cell = None;

        for (index, ch) in text.char_indices() {
            if ch == '\n' {
                if index == cursor {
                    cursor_cell = Some((column, lines.len() - 1));
                }
                lines.push(String::new());
                column = 0;
                continue;
            }
            let ch_width = ch.width().unwrap_or(0);
            if column + ch_width > width && column > 0 {
                lines.push(String::new());
                column = 0;
            }
            if index == cursor {
                cursor_cell = Some((column, lines.len() - 1));
            }
            if let Some(line) = lines.last_mut() {
                line.push(ch);
            }
            column += ch_width;
        }

        let (column, line) = match cursor_cell {
            Some(cell) => cell,
            None if column >= width => {
                lines.push(String::new());
                (0, lines.len() - 1)
            }
            None => (column, lines.len() - 1),
        };
        InputLayout {
            lines,
            cursor: (to_cell(column), to_cell(line)),
        }
    }
}

fn to_cell(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Clip `text` to `width` cells, ending with `…` when shortened.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    if width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_scrolls_to_keep_cursor_visible() {
        let layout = SingleLine::default().layout("abcdefgh", 8, 5);
        assert_eq!(layout.lines, vec!["efgh".to_string()]);
        assert_eq!(layout.cursor, (4, 0));

        let start = SingleLine::default().layout("abcdefgh", 0, 5);
        assert_eq!(start.lines, vec!["abcde".to_string()]);
        assert_eq!(start.cursor, (0, 0));
    }

    #[test]
    fn multi_line_breaks_on_newlines_and_width() {
        let text = "Fragile\nglass items";
        let layout = MultiLine::default().layout(text, text.len(), 6);
        assert_eq!(layout.lines, vec!["Fragil", "e", "glass ", "items"]);
        assert_eq!(layout.cursor, (5, 3));
    }

    #[test]
    fn multi_line_cursor_on_newline_and_full_line() {
        let layout = MultiLine::default().layout("ab\ncd", 2, 10);
        assert_eq!(layout.cursor, (2, 0));

        let full = MultiLine::default().layout("abcd", 4, 4);
        assert_eq!(full.lines.len(), 2);
        assert_eq!(full.cursor, (0, 1));
    }

    #[test]
    fn multi_line_counts_cells_not_bytes() {
        let text = "į Vilnių";
        let layout = MultiLine::default().layout(text, text.len(), 20);
        assert_eq!(layout.cursor, (8, 0));
    }

    #[test]
    fn fit_to_width_adds_ellipsis() {
        assert_eq!(fit_to_width("Kaunas", 10), "Kaunas");
        assert_eq!(fit_to_width("Klaipėdos uostas", 8), "Klaipėd…");
    }
}
