use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use redbeard_browser_core::{BrowserView, KeyName};

use super::types::{Focus, Overlay, ToastKind};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug)]
pub(in crate::tui) struct UiState {
    pub(in crate::tui) focus: Focus,
    pub(in crate::tui) overlay: Overlay,
    pub(in crate::tui) keys_list: ListState,
    pub(in crate::tui) menu_list: ListState,
    pub(in crate::tui) add_key_idx: usize,
    pub(in crate::tui) db_idx: usize,
    pub(in crate::tui) detail_scroll: u16,
    pub(in crate::tui) toast: Option<(String, ToastKind, Instant)>,
    pub(in crate::tui) pending_delete: Option<KeyName>,
    pub(in crate::tui) in_flight: usize,
    pub(in crate::tui) should_exit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::Keys,
            overlay: Overlay::None,
            keys_list: ListState::default(),
            menu_list: ListState::default(),
            add_key_idx: 0,
            db_idx: 0,
            detail_scroll: 0,
            toast: None,
            pending_delete: None,
            in_flight: 0,
            should_exit: false,
        }
    }
}

impl UiState {
    pub(in crate::tui) fn notify(&mut self, kind: ToastKind, msg: impl Into<String>) {
        self.toast = Some((msg.into(), kind, Instant::now()));
    }

    /// Drops the toast once it has been on screen long enough. Returns true if
    /// something changed.
    pub(in crate::tui) fn expire_toast(&mut self) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|(_, _, at)| at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
            return true;
        }
        false
    }

    /// Key under the list cursor, among the entries the filter lets through.
    pub(in crate::tui) fn selected_key(&self, view: &BrowserView) -> Option<KeyName> {
        let idx = self.keys_list.selected()?;
        view.visible().nth(idx).map(|i| i.key.clone())
    }

    /// Moves the cursor onto `key` if it is visible. Returns false otherwise.
    pub(in crate::tui) fn select_key(&mut self, view: &BrowserView, key: &KeyName) -> bool {
        match view.visible().position(|i| &i.key == key) {
            Some(idx) => {
                self.keys_list.select(Some(idx));
                true
            }
            None => false,
        }
    }

    pub(in crate::tui) fn clamp_selection(&mut self, view: &BrowserView) {
        let len = view.visible().count();
        if len == 0 {
            self.keys_list.select(None);
            return;
        }
        let idx = self.keys_list.selected().unwrap_or(0).min(len - 1);
        self.keys_list.select(Some(idx));
    }

    pub(in crate::tui) fn move_selection(&mut self, view: &BrowserView, delta: i32) {
        let len = view.visible().count();
        if len == 0 {
            self.keys_list.select(None);
            return;
        }
        let cur = self.keys_list.selected().unwrap_or(0) as i64;
        let next = (cur + delta as i64).clamp(0, len as i64 - 1) as usize;
        self.keys_list.select(Some(next));
    }
}

pub(in crate::tui) fn adjust_menu_idx(idx: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let next = (idx as i64 + delta as i64).clamp(0, len as i64 - 1);
    next as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use redbeard_browser_core::route::parse_base_url;
    use redbeard_browser_core::{BrowserState, Completion, Controller, Event, Response};
    use redbeard_browser_core::{Effect, RequestKind};

    fn view_with(keys: &[&str], filter: &str) -> BrowserView {
        let base = parse_base_url("http://127.0.0.1:5000").expect("base");
        let mut c = Controller::new(BrowserState::new(base));
        let effects = c.start(None);
        let Some(Effect::Fetch(req)) = effects.into_iter().next() else {
            panic!("expected a keys fetch");
        };
        assert!(matches!(req.kind, RequestKind::Keys(_)));
        c.complete(Completion {
            request: req,
            outcome: Ok(Response::Keys(keys.iter().map(|s| s.to_string()).collect())),
        });
        c.handle(Event::FilterChanged(filter.to_string()));
        c.view()
    }

    fn name(s: &str) -> KeyName {
        KeyName::new(s).expect("key")
    }

    #[test]
    fn selection_indexes_visible_entries_only() {
        let view = view_with(&["foo", "bar", "foobar"], "foo");
        let mut ui = UiState::default();
        assert!(ui.select_key(&view, &name("foobar")));
        assert_eq!(ui.keys_list.selected(), Some(1));
        assert_eq!(ui.selected_key(&view), Some(name("foobar")));
        assert!(!ui.select_key(&view, &name("bar")));
    }

    #[test]
    fn clamp_follows_shrinking_list() {
        let mut ui = UiState::default();
        ui.keys_list.select(Some(2));
        ui.clamp_selection(&view_with(&["foo", "bar", "foobar"], "foo"));
        assert_eq!(ui.keys_list.selected(), Some(1));
        ui.clamp_selection(&view_with(&["foo"], "zzz"));
        assert_eq!(ui.keys_list.selected(), None);
    }

    #[test]
    fn move_selection_stops_at_edges() {
        let view = view_with(&["a", "b", "c"], "");
        let mut ui = UiState::default();
        ui.move_selection(&view, -1);
        assert_eq!(ui.keys_list.selected(), Some(0));
        ui.move_selection(&view, 10);
        assert_eq!(ui.keys_list.selected(), Some(2));
        assert_eq!(adjust_menu_idx(4, 5, 1), 4);
        assert_eq!(adjust_menu_idx(0, 5, -1), 0);
    }
}
