//! Suggestion-backed input field.
//!
//! A [`SuggestField`] couples a [`WidgetDriver`] with a text buffer and the
//! rendering adapters. Keys are translated into engine messages; the engine's
//! value notifications are mirrored back into the buffer so selections show up
//! in the input.

pub mod dropdown;
pub mod view;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fieldhint_engine::{InputVariant, WidgetDriver, WidgetId, WidgetProps};
use fieldhint_types::{DropdownState, Effect, Msg, Point, PointerTarget, Region, WidgetKey};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use self::dropdown::DropdownView;
use self::view::InputView;
use crate::ui::components::common::TextInputState;
use crate::ui::components::component::{FieldHint, FormField};
use crate::ui::theme::{Theme, theme_helpers};

pub struct SuggestField<V: InputVariant + InputView> {
    label: String,
    driver: WidgetDriver<V>,
    input: TextInputState,
    /// Set once the field has been blurred; enables the required check.
    touched: bool,
    input_area: Rect,
    dropdown_offset: usize,
}

impl<V: InputVariant + InputView> SuggestField<V> {
    pub fn new(label: impl Into<String>, driver: WidgetDriver<V>) -> Self {
        let mut input = TextInputState::new();
        input.sync(driver.engine().value());
        Self {
            label: label.into(),
            driver,
            input,
            touched: false,
            input_area: Rect::default(),
            dropdown_offset: 0,
        }
    }

    fn deliver(&mut self, msg: Msg) -> Vec<Effect> {
        let effects = self.driver.handle(msg);
        for effect in &effects {
            match effect {
                Effect::ValueChanged(value) => {
                    self.input.sync(value);
                }
                Effect::Blurred => self.touched = true,
                _ => {}
            }
        }
        effects
    }

    fn edited(&mut self) -> Vec<Effect> {
        self.deliver(Msg::TextChanged(self.input.input().to_string()))
    }

    fn handle_row_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up => self.deliver(Msg::Key(WidgetKey::ArrowUp)),
            KeyCode::Down => self.deliver(Msg::Key(WidgetKey::ArrowDown)),
            KeyCode::Enter => self.deliver(Msg::Key(WidgetKey::Enter)),
            KeyCode::Esc => self.deliver(Msg::Key(WidgetKey::Escape)),
            _ => Vec::new(),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.input.insert_char(c);
                self.edited()
            }
            KeyCode::Enter if self.driver.engine().variant().accepts_newlines() => {
                self.input.insert_char('\n');
                self.edited()
            }
            KeyCode::Backspace if self.input.backspace() => self.edited(),
            KeyCode::Delete if self.input.delete() => self.edited(),
            KeyCode::Left => {
                self.input.move_left();
                Vec::new()
            }
            KeyCode::Right => {
                self.input.move_right();
                Vec::new()
            }
            KeyCode::Home => {
                self.input.move_home();
                Vec::new()
            }
            KeyCode::End => {
                self.input.move_end();
                Vec::new()
            }
            KeyCode::Down => self.deliver(Msg::Key(WidgetKey::ArrowDown)),
            KeyCode::Up => self.deliver(Msg::Key(WidgetKey::ArrowUp)),
            KeyCode::Esc => self.deliver(Msg::Key(WidgetKey::Escape)),
            _ => Vec::new(),
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme, focused: bool) {
        let engine = self.driver.engine();
        let props = engine.props();
        let input_focused = focused && engine.input_focused();
        let mut block = theme_helpers::field_block(theme, &self.label, props.required, input_focused);
        if props.required && self.touched && self.input.is_blank() {
            block = block.title_bottom(Line::from(Span::styled(" required ", theme.status_error())));
        }
        let inner = block.inner(area);

        if self.input.input().is_empty() {
            let placeholder = props.placeholder.as_deref().unwrap_or_default();
            frame.render_widget(
                Paragraph::new(Span::styled(placeholder, theme.text_muted_style())).block(block),
                area,
            );
            if input_focused {
                frame.set_cursor_position(Position::new(inner.x, inner.y));
            }
            return;
        }

        let layout = engine.variant().layout(self.input.input(), self.input.cursor(), inner.width);
        let (cursor_column, cursor_line) = layout.cursor;
        let scroll = cursor_line.saturating_sub(inner.height.saturating_sub(1));
        let lines: Vec<Line> = layout
            .lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, theme.text_primary_style())))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);

        if input_focused && inner.width > 0 && inner.height > 0 {
            let x = inner.x.saturating_add(cursor_column.min(inner.width - 1));
            let y = inner.y.saturating_add(cursor_line - scroll);
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

impl<V: InputVariant + InputView> FormField for SuggestField<V> {
    fn widget_id(&self) -> WidgetId {
        self.driver.id()
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> &str {
        self.driver.engine().value()
    }

    fn props(&self) -> &WidgetProps {
        self.driver.engine().props()
    }

    fn height(&self) -> u16 {
        self.driver.engine().variant().box_height()
    }

    fn is_loading(&self) -> bool {
        self.driver.engine().dropdown() == DropdownState::Loading
    }

    fn hint(&self) -> FieldHint {
        let engine = self.driver.engine();
        if engine.focused_row().is_some() {
            FieldHint::RowFocused
        } else if engine.dropdown().is_open() {
            FieldHint::DropdownOpen
        } else {
            FieldHint::Editing
        }
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.driver.engine().focused_row().is_some() {
            self.handle_row_key(key)
        } else {
            self.handle_input_key(key)
        }
    }

    fn handle_message(&mut self, msg: Msg) -> Vec<Effect> {
        self.deliver(msg)
    }

    fn pointer_target(&self, point: Point) -> PointerTarget {
        self.driver.watcher().classify(point)
    }

    fn route_pointer(&mut self, point: Point) -> Option<(PointerTarget, Vec<Effect>)> {
        let Some(Msg::PointerDown(target)) = self.driver.watcher().route(point) else {
            return None;
        };
        let target = match target {
            PointerTarget::Dropdown(Some(row)) => PointerTarget::Dropdown(Some(row + self.dropdown_offset)),
            other => other,
        };
        Some((target, self.deliver(Msg::PointerDown(target))))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, focused: bool) {
        self.input_area = area;
        self.driver.watcher_mut().set_input_region(to_region(area));
        self.render_input(frame, area, theme, focused);
    }

    fn render_dropdown(&mut self, frame: &mut Frame, theme: &dyn Theme, throbber_idx: usize) {
        let engine = self.driver.engine();
        let view = DropdownView {
            state: engine.dropdown(),
            rows: engine.visible_rows(),
            focused_row: engine.focused_row(),
            throbber_idx,
        };
        match dropdown::render(frame, self.input_area, &view, theme) {
            Some(placement) => {
                self.dropdown_offset = placement.offset;
                self.driver
                    .watcher_mut()
                    .set_dropdown_region(to_region(placement.frame), to_region(placement.rows), placement.row_count);
            }
            None => {
                self.dropdown_offset = 0;
                self.driver.watcher_mut().clear_dropdown();
            }
        }
    }

    fn teardown(&mut self) -> Vec<Effect> {
        self.driver.teardown()
    }
}

fn to_region(rect: Rect) -> Region {
    Region::new(rect.x, rect.y, rect.width, rect.height)
}
