mod input;
mod model;
mod state;
mod terminal;
mod types;
mod view;

use std::io;

use crossterm::ExecutableCommand;
use crossterm::event::{Event as TermEvent, EventStream};
use crossterm::terminal::LeaveAlternateScreen;
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use redbeard_browser_core::config::BrowserConfig;
use redbeard_browser_core::{AdminClient, BrowserState, Completion, Controller, Effect, KeyName};
use tokio::sync::mpsc;
use tracing::{debug, info};

use self::input::KeyOutcome;
use self::model::Palette;
use self::state::UiState;
use self::terminal::TerminalGuard;
use self::types::{Overlay, ToastKind};

pub async fn run_browser(
    client: AdminClient,
    cfg: &BrowserConfig,
    fragment: Option<KeyName>,
) -> anyhow::Result<()> {
    let mut term_guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    info!(base = %client.base(), "browser started");

    let mut controller = Controller::new(BrowserState::new(client.base().clone()));
    let mut ui = UiState::default();
    let palette = Palette::default();

    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let effects = controller.start(fragment);
    apply_effects(&client, &tx, &controller, &mut ui, effects);

    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(cfg.tick());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());

    let mut should_redraw = true;
    loop {
        if should_redraw {
            let view = controller.view();
            terminal.draw(|f| view::render_app(f, palette, &mut ui, controller.state(), &view))?;
            should_redraw = false;
        }

        if ui.should_exit {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                should_redraw = ui.expire_toast();
            }
            _ = &mut ctrl_c => {
                ui.should_exit = true;
                break;
            }
            Some(completion) = rx.recv() => {
                ui.in_flight = ui.in_flight.saturating_sub(1);
                let before = controller.state().detail().clone();
                let effects = controller.complete(completion);
                if controller.state().detail() != &before {
                    ui.detail_scroll = 0;
                }
                apply_effects(&client, &tx, &controller, &mut ui, effects);
                should_redraw = true;
            }
            maybe_event = events.next() => {
                let Some(Ok(event)) = maybe_event else { continue; };
                match event {
                    TermEvent::Key(key) if input::should_accept_key_event(&key) => {
                        let view = controller.view();
                        match input::handle_key_event(controller.state(), &view, &mut ui, key) {
                            KeyOutcome::Ignored => {}
                            KeyOutcome::Redraw => should_redraw = true,
                            KeyOutcome::Emit(event) => {
                                debug!(?event, "ui event");
                                let before = controller.state().detail().clone();
                                let effects = controller.handle(event);
                                if controller.state().detail() != &before {
                                    ui.detail_scroll = 0;
                                }
                                apply_effects(&client, &tx, &controller, &mut ui, effects);
                                should_redraw = true;
                            }
                        }
                    }
                    TermEvent::Resize(_, _) => {
                        should_redraw = true;
                    }
                    _ => {}
                }
            }
        }
    }

    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    term_guard.disarm();
    info!("browser closed");
    Ok(())
}

/// Carries out what the controller asked for. Fetches run on the runtime and
/// report back through `tx`.
fn apply_effects(
    client: &AdminClient,
    tx: &mpsc::UnboundedSender<Completion>,
    controller: &Controller,
    ui: &mut UiState,
    effects: Vec<Effect>,
) {
    for effect in effects {
        match effect {
            Effect::Fetch(request) => {
                ui.in_flight += 1;
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let completion = client.execute(request).await;
                    // The receiver only goes away when the browser is closing.
                    let _ = tx.send(completion);
                });
            }
            Effect::ScrollTo(key) => {
                ui.select_key(&controller.view(), &key);
            }
            Effect::ShowAddKeyMenu(_) => {
                ui.add_key_idx = 0;
                ui.overlay = Overlay::AddKey;
            }
            Effect::HideAddKeyMenu => {
                if ui.overlay == Overlay::AddKey {
                    ui.overlay = Overlay::None;
                }
            }
            Effect::Flash(msg) => ui.notify(ToastKind::Info, msg),
            Effect::Failed(msg) => ui.notify(ToastKind::Error, msg),
        }
    }
}
