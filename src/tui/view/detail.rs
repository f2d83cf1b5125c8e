use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Line, Span, Style, Text};
use ratatui::widgets::{Paragraph, Wrap};
use redbeard_browser_core::{BrowserState, Detail, markup};

use crate::tui::model::Palette;
use crate::tui::state::UiState;
use crate::tui::types::Focus;

use super::widgets::panel_block;

pub(super) fn render_detail_panel(
    f: &mut Frame<'_>,
    p: Palette,
    ui: &mut UiState,
    state: &BrowserState,
    area: Rect,
) {
    let title = match state.detail() {
        Detail::Empty => "Detail".to_string(),
        Detail::Key { key, .. } => format!("Key: {key}"),
        Detail::Page { route, .. } => route.path(state.base()),
    };
    let block = panel_block(p, title, ui.focus == Focus::Detail);

    let text = match state.detail().markup() {
        None => Text::from(Line::from(Span::styled(
            "Select a key to see its contents.",
            Style::default().fg(p.muted),
        ))),
        Some(markup) => Text::from(
            markup::to_lines(markup)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(p.text))))
                .collect::<Vec<_>>(),
        ),
    };

    let max_scroll = u16::try_from(text.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
    ui.detail_scroll = ui.detail_scroll.min(max_scroll);

    let para = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((ui.detail_scroll, 0));
    f.render_widget(para, area);
}
