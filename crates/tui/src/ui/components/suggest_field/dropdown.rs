//! Suggestion dropdown rendering.
//!
//! Draws the overlay below (or, near the bottom edge, above) the input and
//! reports where the rows landed so pointer-downs can be classified.

use fieldhint_types::{DropdownState, Suggestion};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::view::fit_to_width;
use crate::ui::theme::{Theme, theme_helpers};

static FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// What the dropdown needs from the field for one frame.
pub struct DropdownView<'a> {
    pub state: DropdownState,
    pub rows: &'a [Suggestion],
    pub focused_row: Option<usize>,
    pub throbber_idx: usize,
}

/// Geometry of a rendered dropdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropdownPlacement {
    pub frame: Rect,
    pub rows: Rect,
    pub row_count: usize,
    /// Index of the first visible row.
    pub offset: usize,
}

/// First visible row so that `focused_row` stays inside a window of
/// `visible` rows.
pub fn window_offset(focused_row: Option<usize>, total: usize, visible: usize) -> usize {
    let visible = visible.max(1);
    let last_start = total.saturating_sub(visible);
    focused_row
        .map(|row| row.saturating_sub(visible - 1))
        .unwrap_or(0)
        .min(last_start)
}

/// Where the dropdown goes for an input drawn at `anchor` on `screen`.
pub fn place(anchor: Rect, screen: Rect, content_lines: usize) -> Rect {
    let wanted = u16::try_from(content_lines.max(1)).unwrap_or(u16::MAX).saturating_add(2);
    let below = anchor.bottom();
    let room_below = screen.bottom().saturating_sub(below);
    let room_above = anchor.y.saturating_sub(screen.y);

    if room_below >= wanted || room_below >= room_above {
        Rect::new(anchor.x, below, anchor.width, wanted.min(room_below))
    } else {
        let height = wanted.min(room_above);
        Rect::new(anchor.x, anchor.y - height, anchor.width, height)
    }
}

/// Render the dropdown for `view`, returning its placement; `None` when closed
/// or when there is no room.
///
/// Every row is drawn when the screen has room for it. Otherwise the rows
/// scroll with the focused row and the last line counts the hidden ones.
pub fn render(frame: &mut Frame, anchor: Rect, view: &DropdownView<'_>, theme: &dyn Theme) -> Option<DropdownPlacement> {
    let screen = frame.area();
    let (area, lines, row_count, offset) = match view.state {
        DropdownState::Closed => return None,
        DropdownState::Loading => {
            let spinner = FRAMES[view.throbber_idx % FRAMES.len()];
            let line = Line::from(vec![
                Span::styled(spinner, theme.accent_secondary_style()),
                Span::styled(" Searching…", theme.text_muted_style()),
            ]);
            (place(anchor, screen, 1), vec![line], 0, 0)
        }
        DropdownState::Open if view.rows.is_empty() => (
            place(anchor, screen, 1),
            vec![Line::from(Span::styled("No suggestions", theme.text_muted_style()))],
            0,
            0,
        ),
        DropdownState::Open => {
            let total = view.rows.len();
            let area = place(anchor, screen, total);
            let capacity = usize::from(area.height.saturating_sub(2));
            let visible = if total > capacity { capacity.saturating_sub(1).max(1) } else { total };
            let offset = window_offset(view.focused_row, total, visible);
            let width = usize::from(anchor.width.saturating_sub(2));

            let mut lines = view
                .rows
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible)
                .map(|(index, row)| row_line(row, view.focused_row == Some(index), width, theme))
                .collect::<Vec<_>>();
            let count = lines.len();
            let hidden = total - count;
            if hidden > 0 && count < capacity {
                lines.push(Line::from(Span::styled(format!("+{hidden} more"), theme.text_muted_style())));
            }
            (area, lines, count, offset)
        }
    };

    if area.height < 3 {
        return None;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(true))
        .style(theme_helpers::popup_style(theme));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let rendered_rows = row_count.min(usize::from(inner.height));
    Some(DropdownPlacement {
        frame: area,
        rows: Rect::new(inner.x, inner.y, inner.width, u16::try_from(rendered_rows).unwrap_or(0)),
        row_count: rendered_rows,
        offset,
    })
}

fn row_line(row: &Suggestion, focused: bool, width: usize, theme: &dyn Theme) -> Line<'static> {
    let badge = row.usage_badge().map(|badge| format!(" {badge}")).unwrap_or_default();
    let label = row.value.replace('\n', " ⏎ ");
    let label = fit_to_width(&label, width.saturating_sub(badge.width()));
    let padding = " ".repeat(width.saturating_sub(label.width() + badge.width()));

    let (label_style, badge_style) = if focused {
        let style = theme_helpers::row_selected_style(theme);
        (style, style)
    } else {
        (theme.text_primary_style(), theme.badge_style())
    };
    Line::from(vec![
        Span::styled(label, label_style),
        Span::styled(padding, label_style),
        Span::styled(badge, badge_style),
    ])
}
