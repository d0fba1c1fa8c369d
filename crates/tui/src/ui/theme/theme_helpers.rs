use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard bordered Block with the field label as title.
///
/// Required fields carry a `*` marker after the label.
pub fn field_block<'a, T: Theme + ?Sized>(theme: &T, label: &'a str, required: bool, focused: bool) -> Block<'a> {
    let mut title = vec![Span::styled(label, theme.text_secondary_style().add_modifier(Modifier::BOLD))];
    if required {
        title.push(Span::styled(" *", theme.status_error()));
    }
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme))
        .title(Line::from(title))
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for the suggestion dropdown surface.
pub fn popup_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { popup_bg, text, .. } = *theme.roles();
    Style::default().bg(popup_bg).fg(text)
}

/// Style for a focused dropdown row.
pub fn row_selected_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

/// Key label style used by the hint bar.
pub fn key_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.accent_emphasis_style()
}
