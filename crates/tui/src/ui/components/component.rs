//! Component system for the fieldhint form.
//!
//! A form is a vertical stack of fields. Each field owns its local state,
//! translates terminal events into engine messages and renders itself into a
//! provided `Rect`, reporting host effects back to the application.

use crossterm::event::KeyEvent;
use fieldhint_engine::{WidgetId, WidgetProps};
use fieldhint_types::{Effect, Msg, Point, PointerTarget};
use ratatui::{Frame, layout::Rect};

use crate::ui::theme::Theme;

/// Which key hints apply to the focused field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldHint {
    Editing,
    DropdownOpen,
    RowFocused,
}

/// A suggestion-backed form field.
///
/// # Lifecycle
///
/// 1. **Events**: `handle_key_events` for keys, `route_pointer` for clicks
///    while the field watches outside pointer-downs
/// 2. **Async results**: `handle_message` for timer and store completions
/// 3. **Rendering**: `render` draws the input, `render_dropdown` draws the
///    overlay after every field so it stacks on top
/// 4. **Teardown**: `teardown` cancels pending work when the form closes
pub trait FormField {
    fn widget_id(&self) -> WidgetId;

    fn label(&self) -> &str;

    fn value(&self) -> &str;

    fn props(&self) -> &WidgetProps;

    /// Rows occupied by the input box.
    fn height(&self) -> u16;

    /// Whether a search is in flight; drives the throbber ticker.
    fn is_loading(&self) -> bool;

    fn hint(&self) -> FieldHint;

    fn handle_key_events(&mut self, key: KeyEvent) -> Vec<Effect>;

    fn handle_message(&mut self, msg: Msg) -> Vec<Effect>;

    /// Classify `point` against the regions recorded at the last render.
    fn pointer_target(&self, point: Point) -> PointerTarget;

    /// Deliver a pointer-down while the outside watcher is active. `None` when
    /// the field is not watching.
    fn route_pointer(&mut self, point: Point) -> Option<(PointerTarget, Vec<Effect>)>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, focused: bool);

    fn render_dropdown(&mut self, frame: &mut Frame, theme: &dyn Theme, throbber_idx: usize);

    fn teardown(&mut self) -> Vec<Effect>;
}
