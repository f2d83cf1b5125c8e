use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Line, Modifier, Span, Style};
use ratatui::widgets::Paragraph;
use redbeard_browser_core::{BrowserState, BrowserView};

use crate::tui::model::{Palette, shorten};
use crate::tui::state::UiState;
use crate::tui::types::{Focus, ToastKind};

use super::widgets::panel_block;

pub(super) fn render_header(
    f: &mut Frame<'_>,
    p: Palette,
    ui: &UiState,
    state: &BrowserState,
    view: &BrowserView,
    area: Rect,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(area);

    let focused = ui.focus == Focus::Filter;
    let block = panel_block(p, "Filter".to_string(), focused);
    let mut spans = vec![Span::styled(
        view.filter_term.clone(),
        Style::default().fg(p.text),
    )];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(p.focus)));
    } else if view.filter_term.is_empty() {
        spans.push(Span::styled(
            "press / to filter",
            Style::default().fg(p.muted),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), cols[0]);

    let db = state
        .database()
        .map(|db| db.to_string())
        .unwrap_or_else(|| "db?".to_string());
    let width = usize::from(cols[1].width.saturating_sub(4 + db.len() as u16 + 3));
    let line = Line::from(vec![
        Span::styled(
            db,
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(shorten(&view.address, width), Style::default().fg(p.text)),
    ]);
    let block = panel_block(p, "Location".to_string(), false);
    f.render_widget(Paragraph::new(line).block(block), cols[1]);
}

pub(super) fn render_footer(f: &mut Frame<'_>, p: Palette, ui: &UiState, area: Rect) {
    let busy = if ui.in_flight > 0 {
        Span::styled(
            format!(" loading ({}) ", ui.in_flight),
            Style::default().fg(p.accent),
        )
    } else {
        Span::raw(" ")
    };

    let line = match &ui.toast {
        Some((msg, kind, _)) => {
            let color = match kind {
                ToastKind::Info => p.good,
                ToastKind::Error => p.bad,
            };
            Line::from(vec![
                busy,
                Span::styled(
                    shorten(msg, usize::from(area.width.saturating_sub(16))),
                    Style::default().fg(color),
                ),
            ])
        }
        None => Line::from(vec![
            busy,
            Span::styled(
                "/ filter  ↑/↓ move  Enter open  r refresh  a add  x delete  D db  i index  ? help  q quit",
                Style::default().fg(p.muted),
            ),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}
