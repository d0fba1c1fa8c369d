//! Read-only panel echoing the form's current values.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::component::FormField;
use crate::ui::theme::{Theme, theme_helpers};

/// Wrap `value` to `width` columns, keeping explicit line breaks.
pub fn wrap_value(value: &str, width: usize) -> Vec<String> {
    if value.trim().is_empty() {
        return vec!["(empty)".to_string()];
    }
    let width = width.max(1);
    value
        .lines()
        .flat_map(|line| {
            let wrapped = textwrap::wrap(line, width);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped.into_iter().map(|part| part.into_owned()).collect()
            }
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, fields: &[Box<dyn FormField>], store_label: &str, theme: &dyn Theme) {
    let block = Block::default()
        .title(Span::styled(" Summary ", theme.text_secondary_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(false))
        .style(theme_helpers::panel_style(theme));
    let inner = block.inner(area);
    let width = usize::from(inner.width.saturating_sub(2));

    let mut lines = Vec::new();
    for field in fields {
        lines.push(Line::from(Span::styled(field.label().to_string(), theme.accent_primary_style())));
        for part in wrap_value(field.value(), width) {
            lines.push(Line::from(Span::styled(format!("  {part}"), theme.text_primary_style())));
        }
        lines.push(Line::default());
    }
    lines.push(Line::from(vec![
        Span::styled("Store: ", theme.text_muted_style()),
        Span::styled(store_label.to_string(), theme.text_secondary_style()),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
