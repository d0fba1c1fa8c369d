//! Runtime: event loop and input routing for the form.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode,
//!   mouse capture).
//! - Multiplex terminal input, widget driver completions, animation ticks and
//!   Ctrl+C in a single `select!` loop.
//! - Render only after something changed.
//!
//! Input comes from a dedicated OS thread that owns `poll()`/`read()` and
//! forwards events over a channel. Ticks run only while a search is in flight
//! so an idle form does not wake up.

use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fieldhint_engine::{DriverMessage, SuggestionStore};
use fieldhint_util::WidgetSettings;
use ratatui::{Terminal, prelude::CrosstermBackend};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::App;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel. The thread exits once the
/// receiver is dropped.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    std::thread::spawn(move || {
        loop {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!("Failed to read event: {}", error);
                        break;
                    }
                },
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to poll events: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Returns `false` when the event asks the form to quit.
fn handle_input_event(app: &mut App, input_event: Event) -> bool {
    match input_event {
        Event::Key(key) if key.kind != KeyEventKind::Press => {}
        Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) => {
            return false;
        }
        Event::Key(key) => app.handle_key_events(key),
        Event::Mouse(mouse) => app.handle_mouse_events(mouse),
        Event::Resize(..) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
    }
    true
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop and restores the terminal on exit.
pub async fn run_app(settings: WidgetSettings, store: Arc<dyn SuggestionStore>, store_label: String) -> Result<()> {
    let (driver_sender, mut driver_receiver) = mpsc::unbounded_channel::<DriverMessage>();
    let mut app = App::new(&settings, store, store_label, driver_sender);

    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &mut app, &mut input_receiver, &mut driver_receiver).await;

    app.shutdown();
    cleanup_terminal(&mut terminal)?;
    info!("form closed");
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    input_receiver: &mut mpsc::Receiver<Event>,
    driver_receiver: &mut mpsc::UnboundedReceiver<DriverMessage>,
) -> Result<()> {
    let mut ticker = time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    terminal.draw(|frame| app.render(frame))?;

    loop {
        let animating = app.is_loading();
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    debug!("input channel closed");
                    break;
                };
                if !handle_input_event(app, event) {
                    break;
                }
            }

            Some(message) = driver_receiver.recv() => {
                app.handle_driver_message(message);
            }

            _ = ticker.tick(), if animating => {
                app.tick();
            }

            _ = signal::ctrl_c() => { break; }
        }

        terminal.draw(|frame| app.render(frame))?;
    }
    Ok(())
}
