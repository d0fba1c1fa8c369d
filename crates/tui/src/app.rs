//! Application state for the fieldhint form.
//!
//! The `App` owns the form fields, tracks which one holds keyboard focus and
//! routes terminal events and driver completions to them. Field-level
//! behavior lives in the suggestion engine; the app only translates focus
//! changes and pointer-downs into engine messages and honors the host effects
//! the fields report back.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use fieldhint_engine::{
    DriverMessage, MultiLine, SingleLine, SuggestionEngine, SuggestionStore, WidgetDriver, WidgetProps,
};
use fieldhint_types::{Effect, Msg, Point, PointerTarget};
use fieldhint_util::WidgetSettings;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::ui::components::{FieldHint, FormField, SuggestField, hint_bar, summary};
use crate::ui::theme::{self, Theme, theme_helpers};

pub const CLIENT_NAME_FIELD: &str = "client_name";
pub const CARGO_DESCRIPTION_FIELD: &str = "cargo_description";

pub struct App {
    fields: Vec<Box<dyn FormField>>,
    /// Index of the field holding keyboard focus.
    focused: Option<usize>,
    theme: Box<dyn Theme>,
    /// Animation frame for the loading throbber.
    throbber_idx: usize,
    store_label: String,
}

impl App {
    /// Build the shipment form: a required client name and a free-text cargo
    /// description, both backed by `store`.
    pub fn new(
        settings: &WidgetSettings,
        store: Arc<dyn SuggestionStore>,
        store_label: impl Into<String>,
        sender: UnboundedSender<DriverMessage>,
    ) -> Self {
        let blur_grace = Duration::from_millis(settings.blur_grace_ms);

        let client = SuggestionEngine::new(
            SingleLine::from_settings(settings),
            WidgetProps::new(CLIENT_NAME_FIELD)
                .with_placeholder("Company or person")
                .with_required(true),
        )
        .with_blur_grace(blur_grace);
        let cargo = SuggestionEngine::new(
            MultiLine::from_settings(settings),
            WidgetProps::new(CARGO_DESCRIPTION_FIELD).with_placeholder("What is being shipped, handling notes"),
        )
        .with_blur_grace(blur_grace);

        let fields: Vec<Box<dyn FormField>> = vec![
            Box::new(SuggestField::new(
                "Client",
                WidgetDriver::new(0, client, store.clone(), sender.clone()),
            )),
            Box::new(SuggestField::new("Cargo description", WidgetDriver::new(1, cargo, store, sender))),
        ];

        Self {
            fields,
            focused: None,
            theme: theme::load(),
            throbber_idx: 0,
            store_label: store_label.into(),
        }
    }

    #[cfg(test)]
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    #[cfg(test)]
    pub fn value_of(&self, field_type: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.props().field_type.as_str() == field_type)
            .map(|field| field.value())
    }

    /// Whether any field waits on a search; the runtime ticks only then.
    pub fn is_loading(&self) -> bool {
        self.fields.iter().any(|field| field.is_loading())
    }

    pub fn tick(&mut self) {
        self.throbber_idx = self.throbber_idx.wrapping_add(1);
    }

    pub fn handle_key_events(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            _ => {
                let Some(index) = self.focused else {
                    return;
                };
                let effects = self.fields[index].handle_key_events(key);
                self.apply_effects(index, effects);
            }
        }
    }

    pub fn handle_mouse_events(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let point = Point::new(mouse.column, mouse.row);

        let mut consumed = false;
        for index in 0..self.fields.len() {
            if let Some((target, effects)) = self.fields[index].route_pointer(point) {
                consumed |= matches!(target, PointerTarget::Dropdown(_));
                self.apply_effects(index, effects);
            }
        }
        if consumed {
            return;
        }

        let clicked = self
            .fields
            .iter()
            .position(|field| field.pointer_target(point) == PointerTarget::Input);
        if clicked != self.focused {
            self.move_focus(clicked);
        }
    }

    /// Deliver an async completion to the widget that scheduled it.
    pub fn handle_driver_message(&mut self, message: DriverMessage) {
        let Some(index) = self.fields.iter().position(|field| field.widget_id() == message.widget) else {
            debug!(widget = message.widget, "message for unknown widget dropped");
            return;
        };
        let effects = self.fields[index].handle_message(message.msg);
        self.apply_effects(index, effects);
    }

    /// Tear down every field so no timer fires after the form closes.
    pub fn shutdown(&mut self) {
        for index in 0..self.fields.len() {
            let effects = self.fields[index].teardown();
            self.apply_effects(index, effects);
        }
        self.focused = None;
    }

    fn cycle_focus(&mut self, forward: bool) {
        let count = self.fields.len();
        if count == 0 {
            return;
        }
        let next = match (self.focused, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(index), true) => (index + 1) % count,
            (Some(index), false) => (index + count - 1) % count,
        };
        self.move_focus(Some(next));
    }

    fn move_focus(&mut self, next: Option<usize>) {
        if let Some(previous) = self.focused.take() {
            let effects = self.fields[previous].handle_message(Msg::FocusLost);
            self.apply_effects(previous, effects);
        }
        if let Some(index) = next {
            self.focused = Some(index);
            let effects = self.fields[index].handle_message(Msg::FocusGained);
            self.apply_effects(index, effects);
        }
    }

    fn apply_effects(&mut self, index: usize, effects: Vec<Effect>) {
        for effect in effects {
            if effect == Effect::ReleaseFocus && self.focused == Some(index) {
                self.focused = None;
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme_helpers::panel_style(&*self.theme)), area);

        let [title_area, body_area, hint_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let [form_area, summary_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body_area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Shipment ", self.theme.accent_emphasis_style()),
                Span::styled("new order", self.theme.text_muted_style()),
            ])),
            title_area,
        );

        let constraints = self
            .fields
            .iter()
            .map(|field| Constraint::Length(field.height()))
            .chain(std::iter::once(Constraint::Min(0)));
        let field_areas = Layout::vertical(constraints).split(form_area.inner(Margin::new(1, 0)));
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.render(frame, field_areas[index], &*self.theme, self.focused == Some(index));
        }

        summary::render(frame, summary_area, &self.fields, &self.store_label, &*self.theme);

        hint_bar::render(frame, hint_area, self.focused_hint(), &*self.theme);

        // Overlays last so they stack above neighbouring fields; the focused
        // field's dropdown goes on top.
        let order = (0..self.fields.len()).filter(|index| Some(*index) != self.focused).chain(self.focused);
        for index in order.collect::<Vec<_>>() {
            self.fields[index].render_dropdown(frame, &*self.theme, self.throbber_idx);
        }
    }

    /// Key hints for the focused field, `None` when the form has no focus.
    pub fn focused_hint(&self) -> Option<FieldHint> {
        self.focused.map(|index| self.fields[index].hint())
    }
}
