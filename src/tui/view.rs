use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use redbeard_browser_core::{BrowserState, BrowserView};

use super::model::Palette;
use super::state::UiState;
use super::types::Overlay;

mod chrome;
mod detail;
mod keys;
mod modals;
mod widgets;

pub(in crate::tui) fn render_app(
    f: &mut Frame<'_>,
    p: Palette,
    ui: &mut UiState,
    state: &BrowserState,
    view: &BrowserView,
) {
    f.render_widget(widgets::BackgroundWidget { p }, f.area());

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    chrome::render_header(f, p, ui, state, view, outer[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(outer[1]);
    keys::render_keys_panel(f, p, ui, view, body[0]);
    detail::render_detail_panel(f, p, ui, state, body[1]);

    chrome::render_footer(f, p, ui, outer[2]);

    match ui.overlay {
        Overlay::None => {}
        Overlay::Help => modals::render_help_modal(f, p),
        Overlay::AddKey => modals::render_add_key_modal(f, p, ui),
        Overlay::Database => modals::render_database_modal(f, p, ui, state),
        Overlay::ConfirmDelete => modals::render_confirm_delete_modal(f, p, ui),
    }
}
