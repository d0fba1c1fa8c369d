//! Hint bar for keyboard shortcuts.
//!
//! Renders the single-line strip below the form. The hints follow the focused
//! field's state so only keys that do something are listed.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::component::FieldHint;
use crate::ui::theme::{Theme, theme_helpers};

fn hints_for(hint: Option<FieldHint>) -> &'static [(&'static str, &'static str)] {
    match hint {
        None => &[("Tab", " focus form  "), ("Ctrl-C", " quit")],
        Some(FieldHint::Editing) => &[("Tab", " next field  "), ("↓", " suggestions  "), ("Ctrl-C", " quit")],
        Some(FieldHint::DropdownOpen) => &[("↓", " pick  "), ("Esc", " close  "), ("Tab", " next field")],
        Some(FieldHint::RowFocused) => &[("↑/↓", " move  "), ("Enter", " select  "), ("Esc", " close")],
    }
}

pub fn render(frame: &mut Frame, area: Rect, hint: Option<FieldHint>, theme: &dyn Theme) {
    let mut spans = vec![Span::styled("Hints: ", theme.text_muted_style())];
    for (key, action) in hints_for(hint) {
        spans.push(Span::styled(*key, theme_helpers::key_style(theme)));
        spans.push(Span::styled(*action, theme.text_muted_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.text_muted_style()), area);
}
