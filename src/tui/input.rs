use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use redbeard_browser_core::{BrowserState, BrowserView, Database, Event, KeyType};

use super::state::{UiState, adjust_menu_idx};
use super::types::{Focus, Overlay};

const PAGE_STEP: i32 = 10;

/// What a key press amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::tui) enum KeyOutcome {
    Ignored,
    /// Only the UI state changed.
    Redraw,
    /// Hand this to the controller.
    Emit(Event),
}

pub(in crate::tui) fn should_accept_key_event(event: &KeyEvent) -> bool {
    matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

pub(in crate::tui) fn handle_key_event(
    state: &BrowserState,
    view: &BrowserView,
    ui: &mut UiState,
    key: KeyEvent,
) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        ui.should_exit = true;
        return KeyOutcome::Redraw;
    }

    match ui.overlay {
        Overlay::None => match ui.focus {
            Focus::Filter => handle_key_filter(state, ui, key),
            Focus::Keys | Focus::Detail => handle_key_normal(state, view, ui, key),
        },
        Overlay::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                ui.overlay = Overlay::None;
                KeyOutcome::Redraw
            }
            _ => KeyOutcome::Ignored,
        },
        Overlay::AddKey => handle_key_add_menu(ui, key),
        Overlay::Database => handle_key_db_menu(ui, key),
        Overlay::ConfirmDelete => handle_key_confirm_delete(ui, key),
    }
}

fn handle_key_filter(state: &BrowserState, ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    let term = state.filter_term();
    match key.code {
        KeyCode::Enter => {
            ui.focus = Focus::Keys;
            KeyOutcome::Emit(Event::FilterSubmitted)
        }
        KeyCode::Esc | KeyCode::Tab | KeyCode::Down => {
            ui.focus = Focus::Keys;
            KeyOutcome::Redraw
        }
        KeyCode::Backspace => {
            let mut next = term.to_string();
            if next.pop().is_none() {
                return KeyOutcome::Ignored;
            }
            KeyOutcome::Emit(Event::FilterChanged(next))
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if term.is_empty() {
                return KeyOutcome::Ignored;
            }
            KeyOutcome::Emit(Event::FilterChanged(String::new()))
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut next = term.to_string();
            next.push(c);
            KeyOutcome::Emit(Event::FilterChanged(next))
        }
        _ => KeyOutcome::Ignored,
    }
}

fn handle_key_normal(
    state: &BrowserState,
    view: &BrowserView,
    ui: &mut UiState,
    key: KeyEvent,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char('q') => {
            ui.should_exit = true;
            return KeyOutcome::Redraw;
        }
        KeyCode::Char('?') => {
            ui.overlay = Overlay::Help;
            return KeyOutcome::Redraw;
        }
        KeyCode::Char('/') => {
            ui.focus = Focus::Filter;
            return KeyOutcome::Redraw;
        }
        KeyCode::Tab => {
            ui.focus = match ui.focus {
                Focus::Keys => Focus::Detail,
                Focus::Detail | Focus::Filter => Focus::Keys,
            };
            return KeyOutcome::Redraw;
        }
        KeyCode::BackTab => {
            ui.focus = match ui.focus {
                Focus::Detail => Focus::Keys,
                Focus::Keys | Focus::Filter => Focus::Filter,
            };
            return KeyOutcome::Redraw;
        }
        KeyCode::Char('r') => return KeyOutcome::Emit(Event::RefreshRequested),
        KeyCode::Char('a') => {
            ui.add_key_idx = 0;
            return KeyOutcome::Emit(Event::AddKeyRequested);
        }
        KeyCode::Char('D') => {
            ui.db_idx = state
                .database()
                .map(|db| usize::from(db.index()))
                .unwrap_or(0);
            ui.overlay = Overlay::Database;
            return KeyOutcome::Redraw;
        }
        KeyCode::Char('i') | KeyCode::Backspace => {
            if state.location().is_some() || state.fragment().is_some() {
                return KeyOutcome::Emit(Event::IndexRequested);
            }
            return KeyOutcome::Ignored;
        }
        KeyCode::Esc => {
            if state.fragment().is_some() {
                return KeyOutcome::Emit(Event::FragmentChanged(None));
            }
            return KeyOutcome::Ignored;
        }
        _ => {}
    }

    match ui.focus {
        Focus::Keys => handle_key_list(view, ui, key),
        Focus::Detail => handle_key_detail(ui, key),
        Focus::Filter => KeyOutcome::Ignored,
    }
}

fn handle_key_list(view: &BrowserView, ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    let delta = match key.code {
        KeyCode::Up | KeyCode::Char('k') => -1,
        KeyCode::Down | KeyCode::Char('j') => 1,
        KeyCode::PageUp => -PAGE_STEP,
        KeyCode::PageDown => PAGE_STEP,
        KeyCode::Home | KeyCode::Char('g') => i32::MIN / 2,
        KeyCode::End | KeyCode::Char('G') => i32::MAX / 2,
        KeyCode::Enter => {
            return match ui.selected_key(view) {
                Some(key) => KeyOutcome::Emit(Event::ItemActivated(key)),
                None => KeyOutcome::Ignored,
            };
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            let Some(key) = ui.selected_key(view) else {
                return KeyOutcome::Ignored;
            };
            ui.pending_delete = Some(key);
            ui.overlay = Overlay::ConfirmDelete;
            return KeyOutcome::Redraw;
        }
        _ => return KeyOutcome::Ignored,
    };
    ui.move_selection(view, delta);
    KeyOutcome::Redraw
}

fn handle_key_detail(ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    let next = match key.code {
        KeyCode::Up | KeyCode::Char('k') => ui.detail_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => ui.detail_scroll.saturating_add(1),
        KeyCode::PageUp => ui.detail_scroll.saturating_sub(PAGE_STEP as u16),
        KeyCode::PageDown => ui.detail_scroll.saturating_add(PAGE_STEP as u16),
        KeyCode::Home | KeyCode::Char('g') => 0,
        _ => return KeyOutcome::Ignored,
    };
    ui.detail_scroll = next;
    KeyOutcome::Redraw
}

fn handle_key_add_menu(ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    let len = KeyType::ALL.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Emit(Event::AddKeyDismissed),
        KeyCode::Up | KeyCode::Char('k') => {
            ui.add_key_idx = adjust_menu_idx(ui.add_key_idx, len, -1);
            KeyOutcome::Redraw
        }
        KeyCode::Down | KeyCode::Char('j') => {
            ui.add_key_idx = adjust_menu_idx(ui.add_key_idx, len, 1);
            KeyOutcome::Redraw
        }
        KeyCode::Enter => match KeyType::ALL.get(ui.add_key_idx) {
            Some(kind) => KeyOutcome::Emit(Event::AddKeyChosen(*kind)),
            None => KeyOutcome::Ignored,
        },
        _ => KeyOutcome::Ignored,
    }
}

fn handle_key_db_menu(ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    let len = Database::all().count();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            ui.overlay = Overlay::None;
            KeyOutcome::Redraw
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ui.db_idx = adjust_menu_idx(ui.db_idx, len, -1);
            KeyOutcome::Redraw
        }
        KeyCode::Down | KeyCode::Char('j') => {
            ui.db_idx = adjust_menu_idx(ui.db_idx, len, 1);
            KeyOutcome::Redraw
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            ui.db_idx = usize::from(c as u8 - b'0');
            KeyOutcome::Redraw
        }
        KeyCode::Enter => {
            ui.overlay = Overlay::None;
            match Database::all().nth(ui.db_idx) {
                Some(db) => KeyOutcome::Emit(Event::DatabaseSelected(db)),
                None => KeyOutcome::Redraw,
            }
        }
        _ => KeyOutcome::Ignored,
    }
}

fn handle_key_confirm_delete(ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            ui.overlay = Overlay::None;
            match ui.pending_delete.take() {
                Some(key) => KeyOutcome::Emit(Event::DeleteConfirmed(key)),
                None => KeyOutcome::Redraw,
            }
        }
        KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
            ui.overlay = Overlay::None;
            ui.pending_delete = None;
            KeyOutcome::Redraw
        }
        _ => KeyOutcome::Ignored,
    }
}
