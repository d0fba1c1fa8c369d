//! Suggestion engine: the state machine shared by every suggestion-backed
//! input.
//!
//! The engine is a pure reducer. Hosts feed it [`Msg`]s (edits, focus
//! changes, keys, classified pointer events, timer and search completions)
//! and execute the [`Effect`]s it returns. It never sleeps, spawns or performs
//! I/O, which keeps every transition testable without a runtime.
//!
//! Key behaviors:
//! - Every keystroke restarts the debounce timer; a query is dispatched only
//!   when the timer that fires carries the latest token.
//! - Every dispatched query carries a fresh request id and only the response
//!   matching the most recent id is applied.
//! - Blurring the input starts a grace timer so that a click on a dropdown row
//!   (which blurs the input first) wins over the blur-triggered close.
//! - The outside watcher is requested while the dropdown is open and released
//!   when it closes or the widget is torn down.

use std::time::Duration;

use fieldhint_types::{DropdownState, Effect, FieldType, Msg, PointerTarget, SearchOutcome, Suggestion, TimerKind, WidgetKey};
use tracing::debug;

use crate::variant::InputVariant;

/// Default window after a blur during which focus may move into the dropdown.
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(200);

/// Host-facing configuration of one widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetProps {
    pub field_type: FieldType,
    pub placeholder: Option<String>,
    pub required: bool,
}

impl WidgetProps {
    pub fn new(field_type: impl Into<FieldType>) -> Self {
        Self {
            field_type: field_type.into(),
            placeholder: None,
            required: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// State machine for one suggestion-backed input.
#[derive(Debug)]
pub struct SuggestionEngine<V: InputVariant> {
    variant: V,
    props: WidgetProps,
    blur_grace: Duration,
    value: String,
    suggestions: Vec<Suggestion>,
    dropdown: DropdownState,
    input_focused: bool,
    /// Dropdown row holding focus; the input is unfocused while this is set.
    focused_row: Option<usize>,
    debounce_token: Option<u64>,
    blur_token: Option<u64>,
    timer_seq: u64,
    request_seq: u64,
    /// Request id whose response is still wanted.
    in_flight: Option<u64>,
    watching: bool,
}

impl<V: InputVariant> SuggestionEngine<V> {
    pub fn new(variant: V, props: WidgetProps) -> Self {
        Self {
            variant,
            props,
            blur_grace: DEFAULT_BLUR_GRACE,
            value: String::new(),
            suggestions: Vec::new(),
            dropdown: DropdownState::Closed,
            input_focused: false,
            focused_row: None,
            debounce_token: None,
            blur_token: None,
            timer_seq: 0,
            request_seq: 0,
            in_flight: None,
            watching: false,
        }
    }

    pub fn with_blur_grace(mut self, blur_grace: Duration) -> Self {
        self.blur_grace = blur_grace;
        self
    }

    /// Replace the value from the host side (controlled input). No effects
    /// are produced and no query is scheduled.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn props(&self) -> &WidgetProps {
        &self.props
    }

    pub fn field_type(&self) -> &FieldType {
        &self.props.field_type
    }

    pub fn variant(&self) -> &V {
        &self.variant
    }

    pub fn dropdown(&self) -> DropdownState {
        self.dropdown
    }

    /// Rows to render; empty unless results are shown.
    pub fn visible_rows(&self) -> &[Suggestion] {
        match self.dropdown {
            DropdownState::Open => &self.suggestions,
            _ => &[],
        }
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn focused_row(&self) -> Option<usize> {
        self.focused_row
    }

    /// Whether the input or one of its dropdown rows holds focus.
    pub fn has_focus(&self) -> bool {
        self.input_focused || self.focused_row.is_some()
    }

    pub fn is_watching_outside(&self) -> bool {
        self.watching
    }

    pub fn pending_timer(&self, timer: TimerKind) -> bool {
        match timer {
            TimerKind::Debounce => self.debounce_token.is_some(),
            TimerKind::BlurGrace => self.blur_token.is_some(),
        }
    }

    /// Apply one message and return the effects the host must execute, in
    /// order.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::TextChanged(text) => self.on_text_changed(text, &mut effects),
            Msg::FocusGained => self.on_focus_gained(&mut effects),
            Msg::FocusLost => self.on_focus_lost(&mut effects),
            Msg::Key(key) => self.on_key(key, &mut effects),
            Msg::PointerDown(target) => self.on_pointer_down(target, &mut effects),
            Msg::CandidateSelected(index) => self.select(index, &mut effects),
            Msg::TimerElapsed { timer, token } => self.on_timer(timer, token, &mut effects),
            Msg::SearchCompleted { request_id, outcome } => self.on_search_completed(request_id, outcome, &mut effects),
            Msg::Teardown => self.teardown(&mut effects),
        }
        effects
    }

    fn on_text_changed(&mut self, text: String, effects: &mut Vec<Effect>) {
        self.value = text;
        effects.push(Effect::ValueChanged(self.value.clone()));

        if self.variant.query_text(&self.value).is_some() {
            self.timer_seq += 1;
            self.debounce_token = Some(self.timer_seq);
            effects.push(Effect::StartTimer {
                timer: TimerKind::Debounce,
                delay: self.variant.debounce(),
                token: self.timer_seq,
            });
        } else {
            self.cancel_timer(TimerKind::Debounce, effects);
            self.close(effects);
        }
    }

    fn on_focus_gained(&mut self, effects: &mut Vec<Effect>) {
        self.input_focused = true;
        self.focused_row = None;
        self.cancel_timer(TimerKind::BlurGrace, effects);

        if let Some(query) = self.variant.query_text(&self.value) {
            self.cancel_timer(TimerKind::Debounce, effects);
            self.dispatch(query, effects);
        }
    }

    fn on_focus_lost(&mut self, effects: &mut Vec<Effect>) {
        if !self.has_focus() {
            return;
        }
        if self.input_focused {
            effects.push(Effect::Blurred);
        }
        self.input_focused = false;
        self.focused_row = None;

        self.timer_seq += 1;
        self.blur_token = Some(self.timer_seq);
        effects.push(Effect::StartTimer {
            timer: TimerKind::BlurGrace,
            delay: self.blur_grace,
            token: self.timer_seq,
        });
    }

    fn on_key(&mut self, key: WidgetKey, effects: &mut Vec<Effect>) {
        match (key, self.focused_row) {
            (WidgetKey::Escape, _) => self.close(effects),
            (WidgetKey::ArrowDown, None) => {
                let has_rows = self.dropdown == DropdownState::Open && !self.suggestions.is_empty();
                if self.input_focused && has_rows {
                    self.input_focused = false;
                    self.focused_row = Some(0);
                    effects.push(Effect::FocusCandidate(0));
                    effects.push(Effect::Blurred);
                }
            }
            (WidgetKey::ArrowDown, Some(row)) => {
                if row + 1 < self.suggestions.len() {
                    self.focused_row = Some(row + 1);
                    effects.push(Effect::FocusCandidate(row + 1));
                }
            }
            (WidgetKey::ArrowUp, Some(0)) => {
                self.focused_row = None;
                self.input_focused = true;
            }
            (WidgetKey::ArrowUp, Some(row)) => {
                self.focused_row = Some(row - 1);
                effects.push(Effect::FocusCandidate(row - 1));
            }
            (WidgetKey::Enter, Some(row)) => self.select(row, effects),
            (WidgetKey::ArrowUp | WidgetKey::Enter, None) => {}
        }
    }

    fn on_pointer_down(&mut self, target: PointerTarget, effects: &mut Vec<Effect>) {
        match target {
            PointerTarget::Dropdown(Some(row)) => self.select(row, effects),
            PointerTarget::Dropdown(None) => {}
            PointerTarget::Input => {
                if self.focused_row.take().is_some() {
                    self.input_focused = true;
                }
            }
            PointerTarget::Outside => self.close(effects),
        }
    }

    fn on_timer(&mut self, timer: TimerKind, token: u64, effects: &mut Vec<Effect>) {
        match timer {
            TimerKind::Debounce => {
                if self.debounce_token != Some(token) {
                    return;
                }
                self.debounce_token = None;
                if !self.has_focus() {
                    debug!(field_type = %self.props.field_type, "debounce elapsed without focus; query skipped");
                    return;
                }
                match self.variant.query_text(&self.value) {
                    Some(query) => self.dispatch(query, effects),
                    None => {
                        debug!(
                            field_type = %self.props.field_type,
                            min_length = self.variant.min_length(),
                            "query below minimum length; dropdown closed"
                        );
                        self.close(effects);
                    }
                }
            }
            TimerKind::BlurGrace => {
                if self.blur_token != Some(token) {
                    return;
                }
                self.blur_token = None;
                if self.has_focus() {
                    return;
                }
                self.finalize_blur(effects);
            }
        }
    }

    fn on_search_completed(&mut self, request_id: u64, outcome: SearchOutcome, effects: &mut Vec<Effect>) {
        if self.in_flight != Some(request_id) {
            debug!(
                field_type = %self.props.field_type,
                request_id,
                latest = ?self.in_flight,
                "discarding stale suggestion response"
            );
            return;
        }
        self.in_flight = None;

        match outcome {
            SearchOutcome::Found(rows) => {
                debug!(field_type = %self.props.field_type, request_id, rows = rows.len(), "suggestions received");
                self.suggestions = rows;
                self.dropdown = DropdownState::Open;
                if self.focused_row.is_some_and(|row| row >= self.suggestions.len()) {
                    self.focused_row = None;
                    self.input_focused = true;
                }
            }
            SearchOutcome::Failed(error) => {
                debug!(field_type = %self.props.field_type, request_id, %error, "suggestion search failed");
                self.close(effects);
            }
        }
    }

    /// Adopt the candidate at `index`, close and commit its exact text.
    fn select(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if self.dropdown != DropdownState::Open {
            return;
        }
        let Some(candidate) = self.suggestions.get(index).map(|row| row.value.clone()) else {
            return;
        };

        self.cancel_timer(TimerKind::Debounce, effects);
        self.cancel_timer(TimerKind::BlurGrace, effects);

        self.value = self.variant.apply_candidate(&self.value, &candidate);
        effects.push(Effect::ValueChanged(self.value.clone()));
        self.close(effects);

        if self.input_focused {
            effects.push(Effect::Blurred);
        }
        self.input_focused = false;
        self.focused_row = None;
        effects.push(Effect::ReleaseFocus);
        effects.push(Effect::Commit {
            field_type: self.props.field_type.clone(),
            value: candidate,
        });
    }

    fn finalize_blur(&mut self, effects: &mut Vec<Effect>) {
        self.cancel_timer(TimerKind::Debounce, effects);
        self.close(effects);
        // Closing with a focused row hands focus back to the input; a finalised
        // blur leaves the widget unfocused.
        self.input_focused = false;

        if let Some(text) = self.variant.commit_text(&self.value) {
            effects.push(Effect::Commit {
                field_type: self.props.field_type.clone(),
                value: text,
            });
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.cancel_timer(TimerKind::Debounce, effects);
        self.cancel_timer(TimerKind::BlurGrace, effects);
        self.close(effects);
        self.input_focused = false;
    }

    fn dispatch(&mut self, query: String, effects: &mut Vec<Effect>) {
        self.request_seq += 1;
        self.in_flight = Some(self.request_seq);
        self.dropdown = DropdownState::Loading;
        if !self.watching {
            self.watching = true;
            effects.push(Effect::WatchOutside);
        }
        effects.push(Effect::Search {
            request_id: self.request_seq,
            field_type: self.props.field_type.clone(),
            query,
        });
    }

    /// Hide the dropdown and forget its rows. A focused row hands focus back
    /// to the input.
    fn close(&mut self, effects: &mut Vec<Effect>) {
        self.dropdown = DropdownState::Closed;
        self.suggestions.clear();
        self.in_flight = None;
        if self.focused_row.take().is_some() {
            self.input_focused = true;
        }
        if self.watching {
            self.watching = false;
            effects.push(Effect::UnwatchOutside);
        }
    }

    fn cancel_timer(&mut self, timer: TimerKind, effects: &mut Vec<Effect>) {
        let slot = match timer {
            TimerKind::Debounce => &mut self.debounce_token,
            TimerKind::BlurGrace => &mut self.blur_token,
        };
        if slot.take().is_some() {
            effects.push(Effect::CancelTimer(timer));
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldhint_types::SuggestionId;

    use super::*;
    use crate::variant::{MultiLine, SingleLine};

    fn single() -> SuggestionEngine<SingleLine> {
        SuggestionEngine::new(SingleLine::default(), WidgetProps::new("client_name"))
    }

    fn multi() -> SuggestionEngine<MultiLine> {
        SuggestionEngine::new(MultiLine::default(), WidgetProps::new("cargo_description"))
    }

    fn rows(values: &[(&str, u32)]) -> Vec<Suggestion> {
        values
            .iter()
            .enumerate()
            .map(|(index, (value, usage))| Suggestion::new(SuggestionId::Number(index as i64 + 1), *value, *usage))
            .collect()
    }

    fn started_token(effects: &[Effect], kind: TimerKind) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::StartTimer { timer, token, .. } if *timer == kind => Some(*token),
                _ => None,
            })
            .expect("timer started")
    }

    fn search_id(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Search { request_id, .. } => Some(*request_id),
                _ => None,
            })
            .expect("search dispatched")
    }

    fn commits(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Commit { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Focus, type `text` and let the debounce fire; returns the request id.
    fn type_and_settle<V: InputVariant>(engine: &mut SuggestionEngine<V>, text: &str) -> u64 {
        engine.update(Msg::FocusGained);
        let typed = engine.update(Msg::TextChanged(text.into()));
        let token = started_token(&typed, TimerKind::Debounce);
        let fired = engine.update(Msg::TimerElapsed {
            timer: TimerKind::Debounce,
            token,
        });
        search_id(&fired)
    }

    fn open_with<V: InputVariant>(engine: &mut SuggestionEngine<V>, text: &str, found: Vec<Suggestion>) {
        let request_id = type_and_settle(engine, text);
        engine.update(Msg::SearchCompleted {
            request_id,
            outcome: SearchOutcome::Found(found),
        });
    }

    #[test]
    fn short_query_issues_no_search_and_closes() {
        let mut engine = single();
        engine.update(Msg::FocusGained);
        let effects = engine.update(Msg::TextChanged("V".into()));

        assert_eq!(effects, vec![Effect::ValueChanged("V".into())]);
        assert_eq!(engine.dropdown(), DropdownState::Closed);
    }

    #[test]
    fn typing_below_guard_cancels_pending_debounce_and_closes() {
        let mut engine = single();
        open_with(&mut engine, "Vi", rows(&[("Vilnius", 1)]));
        engine.update(Msg::TextChanged("Vil".into()));

        let effects = engine.update(Msg::TextChanged("V".into()));
        assert!(effects.contains(&Effect::CancelTimer(TimerKind::Debounce)));
        assert!(effects.contains(&Effect::UnwatchOutside));
        assert_eq!(engine.dropdown(), DropdownState::Closed);
        assert!(engine.visible_rows().is_empty());
    }

    #[test]
    fn burst_of_keystrokes_yields_one_query_with_final_text() {
        let mut engine = single();
        engine.update(Msg::FocusGained);
        let mut tokens = Vec::new();
        for text in ["Vi", "Vil", "Viln"] {
            let effects = engine.update(Msg::TextChanged(text.into()));
            tokens.push(started_token(&effects, TimerKind::Debounce));
        }

        for stale in &tokens[..2] {
            let effects = engine.update(Msg::TimerElapsed {
                timer: TimerKind::Debounce,
                token: *stale,
            });
            assert!(effects.is_empty(), "stale debounce must be ignored");
        }

        let effects = engine.update(Msg::TimerElapsed {
            timer: TimerKind::Debounce,
            token: tokens[2],
        });
        assert_eq!(
            effects,
            vec![
                Effect::WatchOutside,
                Effect::Search {
                    request_id: 1,
                    field_type: FieldType::from("client_name"),
                    query: "Viln".into(),
                },
            ]
        );
        assert_eq!(engine.dropdown(), DropdownState::Loading);
    }

    #[test]
    fn results_open_dropdown_with_exact_row_count() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 3), ("Kauno g. 5", 1)]));

        assert_eq!(engine.dropdown(), DropdownState::Open);
        let visible = engine.visible_rows();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].usage_badge().as_deref(), Some("×3"));
        assert_eq!(visible[1].usage_badge(), None);
    }

    #[test]
    fn empty_results_still_open_dropdown() {
        let mut engine = single();
        open_with(&mut engine, "Zzz", Vec::new());
        assert_eq!(engine.dropdown(), DropdownState::Open);
        assert!(engine.visible_rows().is_empty());
        assert!(engine.is_watching_outside());
    }

    #[test]
    fn failed_search_clears_and_closes() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        engine.update(Msg::TextChanged("Kaun".into()));
        let request_id = search_id(&engine.update(Msg::TimerElapsed {
            timer: TimerKind::Debounce,
            token: engine.debounce_token.expect("pending"),
        }));

        let effects = engine.update(Msg::SearchCompleted {
            request_id,
            outcome: SearchOutcome::Failed("503".into()),
        });
        assert_eq!(effects, vec![Effect::UnwatchOutside]);
        assert_eq!(engine.dropdown(), DropdownState::Closed);
        assert!(engine.suggestions.is_empty());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut engine = single();
        let first = type_and_settle(&mut engine, "Ka");
        engine.update(Msg::TextChanged("Kau".into()));
        let second = search_id(&engine.update(Msg::TimerElapsed {
            timer: TimerKind::Debounce,
            token: engine.debounce_token.expect("pending"),
        }));
        assert!(second > first);

        engine.update(Msg::SearchCompleted {
            request_id: second,
            outcome: SearchOutcome::Found(rows(&[("Kaunas", 1)])),
        });
        let effects = engine.update(Msg::SearchCompleted {
            request_id: first,
            outcome: SearchOutcome::Found(rows(&[("Kalvarija", 1), ("Kaišiadorys", 1)])),
        });

        assert!(effects.is_empty());
        assert_eq!(engine.visible_rows().len(), 1);
        assert_eq!(engine.visible_rows()[0].value, "Kaunas");
    }

    #[test]
    fn selecting_candidate_sets_value_commits_once_and_closes() {
        let mut engine = single();
        open_with(&mut engine, "uab", rows(&[("UAB Vilniaus krovos", 2)]));

        let effects = engine.update(Msg::CandidateSelected(0));
        assert_eq!(engine.value(), "UAB Vilniaus krovos");
        assert_eq!(commits(&effects), vec!["UAB Vilniaus krovos".to_string()]);
        assert!(effects.contains(&Effect::ReleaseFocus));
        assert!(effects.contains(&Effect::UnwatchOutside));
        assert_eq!(engine.dropdown(), DropdownState::Closed);
        assert!(!engine.has_focus());
    }

    #[test]
    fn row_click_within_grace_beats_blur_close() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));

        let blur = engine.update(Msg::FocusLost);
        assert!(blur.contains(&Effect::Blurred));
        let grace = started_token(&blur, TimerKind::BlurGrace);
        assert_eq!(engine.dropdown(), DropdownState::Open, "dropdown survives the blur itself");

        let select = engine.update(Msg::PointerDown(PointerTarget::Dropdown(Some(0))));
        assert!(select.contains(&Effect::CancelTimer(TimerKind::BlurGrace)));
        assert!(!select.contains(&Effect::Blurred), "blur was already reported");

        let late = engine.update(Msg::TimerElapsed {
            timer: TimerKind::BlurGrace,
            token: grace,
        });
        assert!(late.is_empty());
        assert_eq!(commits(&select), vec!["Kaunas".to_string()]);
    }

    #[test]
    fn blur_commits_trimmed_value_after_grace() {
        let mut engine = single();
        engine.update(Msg::FocusGained);
        engine.update(Msg::TextChanged("  Klaipėda ".into()));
        let blur = engine.update(Msg::FocusLost);
        let effects = engine.update(Msg::TimerElapsed {
            timer: TimerKind::BlurGrace,
            token: started_token(&blur, TimerKind::BlurGrace),
        });

        assert!(effects.contains(&Effect::CancelTimer(TimerKind::Debounce)));
        assert_eq!(commits(&effects), vec!["Klaipėda".to_string()]);
        assert_eq!(engine.value(), "  Klaipėda ", "the value itself is not rewritten");
    }

    #[test]
    fn blur_with_short_value_commits_nothing() {
        let mut engine = single();
        engine.update(Msg::FocusGained);
        engine.update(Msg::TextChanged(" K ".into()));
        let blur = engine.update(Msg::FocusLost);
        let effects = engine.update(Msg::TimerElapsed {
            timer: TimerKind::BlurGrace,
            token: started_token(&blur, TimerKind::BlurGrace),
        });
        assert!(commits(&effects).is_empty());
    }

    #[test]
    fn refocus_within_grace_cancels_blur_and_requeries() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        let blur = engine.update(Msg::FocusLost);
        let grace = started_token(&blur, TimerKind::BlurGrace);

        let focus = engine.update(Msg::FocusGained);
        assert!(focus.contains(&Effect::CancelTimer(TimerKind::BlurGrace)));
        assert!(matches!(focus.last(), Some(Effect::Search { query, .. }) if query == "Kau"));

        let late = engine.update(Msg::TimerElapsed {
            timer: TimerKind::BlurGrace,
            token: grace,
        });
        assert!(late.is_empty());
    }

    #[test]
    fn focus_gain_queries_immediately_when_value_passes_guard() {
        let mut engine = single();
        engine.set_value("Vilnius");
        let effects = engine.update(Msg::FocusGained);
        assert_eq!(engine.dropdown(), DropdownState::Loading);
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::StartTimer { .. })));
        assert_eq!(search_id(&effects), 1);

        let mut short = single();
        short.set_value("V");
        assert!(short.update(Msg::FocusGained).is_empty());
    }

    #[test]
    fn escape_closes_without_touching_value() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        let effects = engine.update(Msg::Key(WidgetKey::Escape));

        assert_eq!(effects, vec![Effect::UnwatchOutside]);
        assert_eq!(engine.value(), "Kau");
        assert_eq!(engine.dropdown(), DropdownState::Closed);
        assert!(engine.input_focused());
    }

    #[test]
    fn escape_leaves_pending_debounce_alive() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        engine.update(Msg::TextChanged("Kaun".into()));
        let effects = engine.update(Msg::Key(WidgetKey::Escape));
        assert!(!effects.contains(&Effect::CancelTimer(TimerKind::Debounce)));
        assert!(engine.pending_timer(TimerKind::Debounce));
    }

    #[test]
    fn pointer_outside_closes_and_inside_does_not() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));

        assert!(engine.update(Msg::PointerDown(PointerTarget::Input)).is_empty());
        assert!(engine.update(Msg::PointerDown(PointerTarget::Dropdown(None))).is_empty());
        assert_eq!(engine.dropdown(), DropdownState::Open);

        let effects = engine.update(Msg::PointerDown(PointerTarget::Outside));
        assert_eq!(effects, vec![Effect::UnwatchOutside]);
        assert_eq!(engine.dropdown(), DropdownState::Closed);
        assert!(commits(&effects).is_empty());
    }

    #[test]
    fn arrow_down_hops_into_first_row_without_grace_close() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1), ("Kauno g.", 1)]));

        let hop = engine.update(Msg::Key(WidgetKey::ArrowDown));
        assert_eq!(hop, vec![Effect::FocusCandidate(0), Effect::Blurred]);
        assert_eq!(engine.focused_row(), Some(0));
        assert!(!engine.pending_timer(TimerKind::BlurGrace));

        engine.update(Msg::Key(WidgetKey::ArrowDown));
        assert_eq!(engine.focused_row(), Some(1));
        engine.update(Msg::Key(WidgetKey::ArrowDown));
        assert_eq!(engine.focused_row(), Some(1), "traversal stops at the last row");

        let effects = engine.update(Msg::Key(WidgetKey::Enter));
        assert_eq!(commits(&effects), vec!["Kauno g.".to_string()]);
        assert_eq!(engine.value(), "Kauno g.");
    }

    #[test]
    fn arrow_down_without_rows_does_nothing() {
        let mut engine = single();
        open_with(&mut engine, "Zzz", Vec::new());
        assert!(engine.update(Msg::Key(WidgetKey::ArrowDown)).is_empty());
        assert!(engine.input_focused());
    }

    #[test]
    fn arrow_up_from_first_row_returns_to_input() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        engine.update(Msg::Key(WidgetKey::ArrowDown));
        engine.update(Msg::Key(WidgetKey::ArrowUp));
        assert!(engine.input_focused());
        assert_eq!(engine.focused_row(), None);
        assert_eq!(engine.dropdown(), DropdownState::Open);
    }

    #[test]
    fn escape_on_row_hands_focus_back_to_input() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        engine.update(Msg::Key(WidgetKey::ArrowDown));
        engine.update(Msg::Key(WidgetKey::Escape));
        assert!(engine.input_focused());
        assert_eq!(engine.dropdown(), DropdownState::Closed);
    }

    #[test]
    fn leaving_a_focused_row_commits_after_grace() {
        let mut engine = single();
        open_with(&mut engine, "Kaunas", rows(&[("Kaunas", 1)]));
        engine.update(Msg::Key(WidgetKey::ArrowDown));

        let blur = engine.update(Msg::FocusLost);
        assert!(!blur.contains(&Effect::Blurred), "input blur was reported at the hop");
        let effects = engine.update(Msg::TimerElapsed {
            timer: TimerKind::BlurGrace,
            token: started_token(&blur, TimerKind::BlurGrace),
        });
        assert_eq!(commits(&effects), vec!["Kaunas".to_string()]);
        assert!(!engine.has_focus());
        assert_eq!(engine.dropdown(), DropdownState::Closed);
    }

    #[test]
    fn debounce_elapsing_after_blur_does_not_query() {
        let mut engine = single();
        engine.update(Msg::FocusGained);
        let typed = engine.update(Msg::TextChanged("Kaunas".into()));
        engine.update(Msg::FocusLost);
        let effects = engine.update(Msg::TimerElapsed {
            timer: TimerKind::Debounce,
            token: started_token(&typed, TimerKind::Debounce),
        });
        assert!(effects.is_empty());
        assert_eq!(engine.dropdown(), DropdownState::Closed);
    }

    #[test]
    fn response_after_close_is_ignored() {
        let mut engine = single();
        let request_id = type_and_settle(&mut engine, "Kau");
        engine.update(Msg::PointerDown(PointerTarget::Outside));
        let effects = engine.update(Msg::SearchCompleted {
            request_id,
            outcome: SearchOutcome::Found(rows(&[("Kaunas", 1)])),
        });
        assert!(effects.is_empty());
        assert_eq!(engine.dropdown(), DropdownState::Closed);
    }

    #[test]
    fn teardown_cancels_timers_and_releases_watcher() {
        let mut engine = single();
        open_with(&mut engine, "Kau", rows(&[("Kaunas", 1)]));
        engine.update(Msg::TextChanged("Kaun".into()));
        engine.update(Msg::FocusLost);

        let effects = engine.update(Msg::Teardown);
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimer(TimerKind::Debounce),
                Effect::CancelTimer(TimerKind::BlurGrace),
                Effect::UnwatchOutside,
            ]
        );
        assert!(commits(&effects).is_empty());
    }

    #[test]
    fn multi_line_queries_last_phrase_and_replaces_it() {
        let mut engine = multi();
        let typed = {
            engine.update(Msg::FocusGained);
            engine.update(Msg::TextChanged("Pristatymas į Vilnių rytoj".into()))
        };
        assert!(typed.contains(&Effect::StartTimer {
            timer: TimerKind::Debounce,
            delay: Duration::from_millis(500),
            token: started_token(&typed, TimerKind::Debounce),
        }));
        let fired = engine.update(Msg::TimerElapsed {
            timer: TimerKind::Debounce,
            token: started_token(&typed, TimerKind::Debounce),
        });
        assert!(matches!(fired.last(), Some(Effect::Search { query, .. }) if query == "į Vilnių rytoj"));

        engine.update(Msg::SearchCompleted {
            request_id: search_id(&fired),
            outcome: SearchOutcome::Found(rows(&[("į Vilnių vakare", 4)])),
        });
        let effects = engine.update(Msg::CandidateSelected(0));

        assert_eq!(engine.value(), "Pristatymas į Vilnių vakare ");
        assert_eq!(commits(&effects), vec!["į Vilnių vakare".to_string()]);
    }

    #[test]
    fn multi_line_blur_commit_is_capped() {
        let mut engine = multi();
        engine.update(Msg::FocusGained);
        engine.update(Msg::TextChanged(format!("{} ", "x".repeat(520))));
        let blur = engine.update(Msg::FocusLost);
        let effects = engine.update(Msg::TimerElapsed {
            timer: TimerKind::BlurGrace,
            token: started_token(&blur, TimerKind::BlurGrace),
        });
        let committed = commits(&effects);
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].chars().count(), MultiLine::MAX_COMMIT_LENGTH);
    }

    #[test]
    fn selection_is_ignored_unless_results_are_shown() {
        let mut engine = single();
        type_and_settle(&mut engine, "Kau");
        assert!(engine.update(Msg::CandidateSelected(0)).is_empty());
        assert_eq!(engine.value(), "Kau");
    }

    #[test]
    fn props_builder_keeps_host_configuration() {
        let props = WidgetProps::new("client_name").with_placeholder("Client").with_required(true);
        let engine = SuggestionEngine::new(SingleLine::default(), props).with_blur_grace(Duration::from_millis(50));
        assert_eq!(engine.props().placeholder.as_deref(), Some("Client"));
        assert!(engine.props().required);
        assert_eq!(engine.blur_grace, Duration::from_millis(50));
    }
}
