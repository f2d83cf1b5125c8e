use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Line, Modifier, Span, Style};
use ratatui::widgets::{List, ListItem, Paragraph};
use redbeard_browser_core::BrowserView;

use crate::tui::model::{Palette, shorten};
use crate::tui::state::UiState;
use crate::tui::types::Focus;

use super::widgets::panel_block;

/// Entries hidden by the filter are collapsed out of the list entirely.
pub(super) fn render_keys_panel(
    f: &mut Frame<'_>,
    p: Palette,
    ui: &mut UiState,
    view: &BrowserView,
    area: Rect,
) {
    let total = view.items.len();
    let shown = view.visible().count();
    let title = if shown == total {
        format!("Keys ({total})")
    } else {
        format!("Keys ({shown}/{total})")
    };
    let block = panel_block(p, title, ui.focus == Focus::Keys);

    if shown == 0 {
        let msg = if total == 0 { "No keys." } else { "No matches." };
        let empty = Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(p.muted))))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(6));
    let items = view
        .visible()
        .map(|item| {
            let style = if item.current {
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(p.text)
            };
            let marker = if item.current { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(p.accent)),
                Span::styled(shorten(item.key.as_str(), width), style),
            ]))
        })
        .collect::<Vec<_>>();

    ui.clamp_selection(view);
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(p.highlight).fg(p.text))
        .highlight_symbol("");
    f.render_stateful_widget(list, area, &mut ui.keys_list);
}
