//! Tokio shell around a [`SuggestionEngine`].
//!
//! The driver executes the engine's runtime effects: timers become spawned
//! sleeps whose handles are aborted when replaced or cancelled, searches and
//! commits become spawned store calls. Completions are posted back through an
//! unbounded channel tagged with the widget id, and the host loop hands them to
//! [`WidgetDriver::handle`] again. Effects that concern the host (value and
//! focus notifications) are returned to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use fieldhint_types::{Effect, FieldType, Msg, SearchOutcome, TimerKind};
use fieldhint_util::truncate_for_summary;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::SuggestionEngine;
use crate::store::SuggestionStore;
use crate::variant::InputVariant;
use crate::watcher::OutsideWatcher;

/// Identifies a widget within one host.
pub type WidgetId = usize;

/// Message posted back to the host loop by timers and store calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverMessage {
    pub widget: WidgetId,
    pub msg: Msg,
}

pub struct WidgetDriver<V: InputVariant> {
    id: WidgetId,
    engine: SuggestionEngine<V>,
    watcher: OutsideWatcher,
    store: Arc<dyn SuggestionStore>,
    timers: HashMap<TimerKind, JoinHandle<()>>,
    sender: UnboundedSender<DriverMessage>,
}

impl<V: InputVariant> WidgetDriver<V> {
    pub fn new(
        id: WidgetId,
        engine: SuggestionEngine<V>,
        store: Arc<dyn SuggestionStore>,
        sender: UnboundedSender<DriverMessage>,
    ) -> Self {
        Self {
            id,
            engine,
            watcher: OutsideWatcher::new(),
            store,
            timers: HashMap::new(),
            sender,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn engine(&self) -> &SuggestionEngine<V> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SuggestionEngine<V> {
        &mut self.engine
    }

    pub fn watcher(&self) -> &OutsideWatcher {
        &self.watcher
    }

    pub fn watcher_mut(&mut self) -> &mut OutsideWatcher {
        &mut self.watcher
    }

    /// Deliver `msg` to the engine and execute runtime effects. Returns the
    /// effects the host has to act on.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle(&mut self, msg: Msg) -> Vec<Effect> {
        let mut host_effects = Vec::new();
        for effect in self.engine.update(msg) {
            match effect {
                Effect::StartTimer { timer, delay, token } => self.start_timer(timer, delay, token),
                Effect::CancelTimer(timer) => self.cancel_timer(timer),
                Effect::Search {
                    request_id,
                    field_type,
                    query,
                } => self.spawn_search(request_id, field_type, query),
                Effect::Commit { field_type, value } => self.spawn_commit(field_type, value),
                Effect::WatchOutside | Effect::UnwatchOutside => {
                    self.watcher.apply(&effect);
                    host_effects.push(effect);
                }
                other => host_effects.push(other),
            }
        }
        host_effects
    }

    /// Tear the widget down: no timer fires afterwards. In-flight store calls
    /// finish on their own and their results are ignored.
    pub fn teardown(&mut self) -> Vec<Effect> {
        let effects = self.handle(Msg::Teardown);
        self.abort_timers();
        effects
    }

    fn start_timer(&mut self, timer: TimerKind, delay: Duration, token: u64) {
        self.cancel_timer(timer);
        let sender = self.sender.clone();
        let widget = self.id;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(DriverMessage {
                widget,
                msg: Msg::TimerElapsed { timer, token },
            });
        });
        self.timers.insert(timer, handle);
    }

    fn cancel_timer(&mut self, timer: TimerKind) {
        if let Some(handle) = self.timers.remove(&timer) {
            handle.abort();
        }
    }

    fn abort_timers(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    fn spawn_search(&self, request_id: u64, field_type: FieldType, query: String) {
        let store = Arc::clone(&self.store);
        let sender = self.sender.clone();
        let widget = self.id;
        debug!(widget, request_id, field_type = %field_type, query_chars = query.chars().count(), "dispatching suggestion search");
        tokio::spawn(async move {
            let outcome = match store.search(&field_type, &query).await {
                Ok(rows) => SearchOutcome::Found(rows),
                Err(error) => SearchOutcome::Failed(format!("{error:#}")),
            };
            let _ = sender.send(DriverMessage {
                widget,
                msg: Msg::SearchCompleted { request_id, outcome },
            });
        });
    }

    fn spawn_commit(&self, field_type: FieldType, value: String) {
        let store = Arc::clone(&self.store);
        let widget = self.id;
        tokio::spawn(async move {
            match store.save(&field_type, &value).await {
                Ok(()) => debug!(widget, field_type = %field_type, "suggestion committed"),
                Err(error) => warn!(
                    widget,
                    field_type = %field_type,
                    value = %truncate_for_summary(&value, 40),
                    error = %format!("{error:#}"),
                    "suggestion commit dropped"
                ),
            }
        });
    }
}

impl<V: InputVariant> Drop for WidgetDriver<V> {
    fn drop(&mut self) {
        self.abort_timers();
    }
}
