//! Outside-interaction watcher.
//!
//! Each widget owns one watcher. The host records where the input and the
//! dropdown were last drawn; pointer-downs are then classified against those
//! regions. The watcher only forwards events while it is active, which the
//! engine requests with [`Effect::WatchOutside`] when the dropdown opens and
//! drops with [`Effect::UnwatchOutside`] when it closes.

use fieldhint_types::{Effect, Msg, Point, PointerTarget, Region};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutsideWatcher {
    active: bool,
    input: Region,
    dropdown: Region,
    /// Area holding the dropdown rows, one terminal line per row.
    rows: Region,
    row_count: usize,
}

impl OutsideWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Track watcher-related effects emitted by the engine.
    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::WatchOutside => self.active = true,
            Effect::UnwatchOutside => {
                self.active = false;
                self.clear_dropdown();
            }
            _ => {}
        }
    }

    pub fn set_input_region(&mut self, region: Region) {
        self.input = region;
    }

    pub fn input_region(&self) -> Region {
        self.input
    }

    /// Record the dropdown frame and the area its `row_count` rows occupy.
    pub fn set_dropdown_region(&mut self, frame: Region, rows: Region, row_count: usize) {
        self.dropdown = frame;
        self.rows = rows;
        self.row_count = row_count;
    }

    pub fn clear_dropdown(&mut self) {
        self.dropdown = Region::default();
        self.rows = Region::default();
        self.row_count = 0;
    }

    /// Where `point` lands relative to this widget.
    pub fn classify(&self, point: Point) -> PointerTarget {
        if self.input.contains(point) {
            return PointerTarget::Input;
        }
        if self.rows.contains(point) {
            let row = usize::from(point.y - self.rows.y);
            return PointerTarget::Dropdown((row < self.row_count).then_some(row));
        }
        if self.dropdown.contains(point) {
            return PointerTarget::Dropdown(None);
        }
        PointerTarget::Outside
    }

    /// The message to deliver for a pointer-down, if the watcher is active.
    pub fn route(&self, point: Point) -> Option<Msg> {
        self.active.then(|| Msg::PointerDown(self.classify(point)))
    }
}
