use ratatui::Frame;
use ratatui::prelude::{Line, Modifier, Span, Style, Text};
use ratatui::widgets::{Clear, List, ListItem, Paragraph, Wrap};
use redbeard_browser_core::{BrowserState, Database, KeyType};

use crate::tui::model::Palette;
use crate::tui::state::UiState;

use super::widgets::{centered_rect, kv_line, panel_block};

pub(super) fn render_help_modal(f: &mut Frame<'_>, p: Palette) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);
    let block = panel_block(p, "Help".to_string(), true);

    let key = Style::default().fg(p.accent);
    let rows = [
        ("/", "edit the filter (Enter/Esc to leave)"),
        ("↑/↓ j/k", "move in the key list, scroll the detail"),
        ("Enter", "open the selected key"),
        ("Tab", "switch between list and detail"),
        ("Esc", "clear the selection"),
        ("r", "refresh the key list"),
        ("a", "add a key"),
        ("x / Del", "delete the selected key"),
        ("D", "switch database"),
        ("i", "back to the key index"),
        ("q", "quit"),
    ];
    let mut lines = vec![Line::from("")];
    lines.extend(
        rows.into_iter()
            .map(|(k, v)| kv_line(p, k, v.to_string(), Style::default().fg(p.text))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc or ? closes this window.",
        key,
    )));

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

pub(super) fn render_add_key_modal(f: &mut Frame<'_>, p: Palette, ui: &mut UiState) {
    let area = centered_rect(40, 45, f.area());
    f.render_widget(Clear, area);
    let block = panel_block(p, "Add key".to_string(), true);

    let items = KeyType::ALL
        .iter()
        .map(|t| ListItem::new(Line::from(t.label())))
        .collect::<Vec<_>>();

    ui.menu_list.select(Some(
        ui.add_key_idx.min(KeyType::ALL.len().saturating_sub(1)),
    ));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(p.highlight).fg(p.text))
        .highlight_symbol("  ");
    f.render_stateful_widget(list, area, &mut ui.menu_list);
}

pub(super) fn render_database_modal(
    f: &mut Frame<'_>,
    p: Palette,
    ui: &mut UiState,
    state: &BrowserState,
) {
    let area = centered_rect(40, 60, f.area());
    f.render_widget(Clear, area);
    let block = panel_block(p, "Select database".to_string(), true);

    let active = state.database();
    let items = Database::all()
        .map(|db| {
            let mut label = db.to_string();
            if Some(db) == active {
                label.push_str(" *");
            }
            ListItem::new(Line::from(label))
        })
        .collect::<Vec<_>>();

    let len = items.len();
    ui.menu_list.select(Some(ui.db_idx.min(len.saturating_sub(1))));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(p.highlight).fg(p.text))
        .highlight_symbol("  ");
    f.render_stateful_widget(list, area, &mut ui.menu_list);
}

pub(super) fn render_confirm_delete_modal(f: &mut Frame<'_>, p: Palette, ui: &UiState) {
    let area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, area);
    let block = panel_block(p, "Delete key".to_string(), true);

    let name = ui
        .pending_delete
        .as_ref()
        .map(|k| k.to_string())
        .unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Delete ", Style::default().fg(p.text)),
            Span::styled(
                name,
                Style::default().fg(p.bad).add_modifier(Modifier::BOLD),
            ),
            Span::styled("?", Style::default().fg(p.text)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter confirm   n/Esc cancel",
            Style::default().fg(p.muted),
        )),
    ];
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
