//! Event handling for the key browser.
//!
//! The controller is a pure state machine: UI events and request completions go
//! in, [`Effect`]s come out. Performing the requests is the caller's job (see
//! [`crate::client::AdminClient::execute`]), which keeps every routing rule
//! testable without a server.

use tracing::{debug, warn};

use crate::error::BrowserError;
use crate::filter::KeyFilter;
use crate::key_type::KeyType;
use crate::route::{Database, KeyName, Route};
use crate::state::{BrowserState, BrowserView, Detail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Why a key detail is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOrigin {
    /// The fragment changed (navigation, bookmark, reload).
    Fragment,
    /// A list entry was activated; the fragment follows once the content is in.
    Click,
}

/// Why the key list is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysOrigin {
    /// First load of the page. The fragment is kept.
    Initial,
    /// The "refresh keys" action. The fragment is cleared afterwards.
    Refresh,
    /// Page reload after switching databases. The fragment is kept.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Key { key: KeyName, origin: DetailOrigin },
    Page(Route),
    Keys(KeysOrigin),
    ChangeDatabase(Database),
    DeleteKey(KeyName),
}

impl RequestKind {
    pub fn route(&self) -> Route {
        match self {
            RequestKind::Key { key, .. } => Route::Key(key.clone()),
            RequestKind::Page(route) => route.clone(),
            RequestKind::Keys(_) => Route::Keys,
            RequestKind::ChangeDatabase(_) => Route::ChangeDb,
            RequestKind::DeleteKey(key) => Route::DeleteKey(key.clone()),
        }
    }
}

/// A request the caller has to perform and report back as a [`Completion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub kind: RequestKind,
}

/// Successful payloads, by request kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Markup(String),
    Keys(Vec<String>),
    Flash(Option<String>),
    Done,
}

#[derive(Debug)]
pub struct Completion {
    pub request: Request,
    pub outcome: Result<Response, BrowserError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FilterChanged(String),
    /// Enter in the filter input. Never navigates.
    FilterSubmitted,
    /// The fragment was set from outside (startup, address bar).
    FragmentChanged(Option<KeyName>),
    ItemActivated(KeyName),
    RefreshRequested,
    AddKeyRequested,
    AddKeyChosen(KeyType),
    AddKeyDismissed,
    DatabaseSelected(Database),
    DeleteConfirmed(KeyName),
    /// Back to the key index from a full page load.
    IndexRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(Request),
    /// Bring the entry into view in the list.
    ScrollTo(KeyName),
    ShowAddKeyMenu(&'static [KeyType]),
    HideAddKeyMenu,
    Flash(String),
    /// A request failed; state is unchanged.
    Failed(String),
}

#[derive(Debug, Default)]
struct Sequencer {
    next: u64,
    latest_detail: Option<RequestId>,
    latest_keys: Option<RequestId>,
}

impl Sequencer {
    fn issue(&mut self) -> RequestId {
        self.next += 1;
        RequestId(self.next)
    }
}

#[derive(Debug)]
pub struct Controller {
    state: BrowserState,
    seq: Sequencer,
}

impl Controller {
    pub fn new(state: BrowserState) -> Self {
        Self {
            state,
            seq: Sequencer::default(),
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn view(&self) -> BrowserView {
        self.state.view()
    }

    /// Initial page load: fetch the key list, and the detail of the bookmarked
    /// key when a fragment is present.
    pub fn start(&mut self, fragment: Option<KeyName>) -> Vec<Effect> {
        let mut out = vec![self.fetch_keys(KeysOrigin::Initial)];
        self.set_fragment(fragment, &mut out);
        out
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut out = Vec::new();
        match event {
            Event::FilterChanged(term) => {
                self.state.filter = KeyFilter::new(term);
            }
            Event::FilterSubmitted => {}
            Event::FragmentChanged(fragment) => self.set_fragment(fragment, &mut out),
            Event::ItemActivated(key) => {
                self.state.current = Some(key.clone());
                out.push(self.fetch_detail(RequestKind::Key {
                    key,
                    origin: DetailOrigin::Click,
                }));
            }
            Event::RefreshRequested => out.push(self.fetch_keys(KeysOrigin::Refresh)),
            Event::AddKeyRequested => {
                self.state.add_key_menu_open = true;
                out.push(Effect::ShowAddKeyMenu(&KeyType::ALL));
            }
            Event::AddKeyChosen(key_type) => {
                self.state.add_key_menu_open = false;
                out.push(Effect::HideAddKeyMenu);
                self.navigate(Route::NewKey(key_type), &mut out);
            }
            Event::AddKeyDismissed => {
                if self.state.add_key_menu_open {
                    self.state.add_key_menu_open = false;
                    out.push(Effect::HideAddKeyMenu);
                }
            }
            Event::DatabaseSelected(db) => {
                let id = self.seq.issue();
                out.push(Effect::Fetch(Request {
                    id,
                    kind: RequestKind::ChangeDatabase(db),
                }));
            }
            Event::DeleteConfirmed(key) => {
                let id = self.seq.issue();
                out.push(Effect::Fetch(Request {
                    id,
                    kind: RequestKind::DeleteKey(key),
                }));
            }
            Event::IndexRequested => {
                self.state.location = None;
                self.set_fragment(None, &mut out);
                self.seq.latest_detail = None;
                self.state.detail = Detail::Empty;
                out.push(self.fetch_keys(KeysOrigin::Reload));
            }
        }
        out
    }

    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        let Completion { request, outcome } = completion;
        let mut out = Vec::new();

        if self.is_stale(&request) {
            debug!(id = request.id.0, kind = ?request.kind, "dropping superseded response");
            return out;
        }

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!(route = ?request.kind.route(), "request failed: {err}");
                out.push(Effect::Failed(err.short(160)));
                return out;
            }
        };

        match (request.kind, response) {
            (RequestKind::Key { key, origin }, Response::Markup(markup)) => {
                self.state.detail = Detail::Key {
                    key: key.clone(),
                    markup,
                };
                if origin == DetailOrigin::Click {
                    self.set_fragment(Some(key), &mut out);
                }
            }
            (RequestKind::Page(route), Response::Markup(markup)) => {
                self.state.detail = Detail::Page { route, markup };
            }
            (RequestKind::Keys(origin), Response::Keys(names)) => {
                self.state.keys = names
                    .into_iter()
                    .filter_map(|name| match KeyName::new(name) {
                        Ok(key) => Some(key),
                        Err(err) => {
                            warn!("skipping key list entry: {err}");
                            None
                        }
                    })
                    .collect();
                match origin {
                    KeysOrigin::Refresh => {
                        // The list is rebuilt from scratch, so no entry keeps the marker.
                        self.state.current = None;
                        self.set_fragment(None, &mut out);
                    }
                    KeysOrigin::Initial | KeysOrigin::Reload => {
                        if let Some(key) = self.state.fragment.clone() {
                            self.mark_current(key, &mut out);
                        }
                    }
                }
            }
            (RequestKind::ChangeDatabase(db), _) => {
                self.state.database = Some(db);
                out.push(self.fetch_keys(KeysOrigin::Reload));
                if let Some(route) = self.state.location.clone() {
                    out.push(self.fetch_detail(RequestKind::Page(route)));
                } else if let Some(key) = self.state.fragment.clone() {
                    out.push(self.fetch_detail(RequestKind::Key {
                        key,
                        origin: DetailOrigin::Fragment,
                    }));
                }
            }
            (RequestKind::DeleteKey(key), response) => {
                if let Response::Flash(Some(msg)) = response {
                    out.push(Effect::Flash(msg));
                }
                self.state.keys.retain(|k| k != &key);
                if self.state.current.as_ref() == Some(&key) {
                    self.state.current = None;
                }
                if self.state.fragment.as_ref() == Some(&key) {
                    self.set_fragment(None, &mut out);
                }
            }
            (kind, response) => {
                warn!(?kind, ?response, "response does not match request kind");
            }
        }
        out
    }

    fn is_stale(&self, request: &Request) -> bool {
        match request.kind {
            RequestKind::Key { .. } | RequestKind::Page(_) => {
                self.seq.latest_detail != Some(request.id)
            }
            RequestKind::Keys(_) => self.seq.latest_keys != Some(request.id),
            RequestKind::ChangeDatabase(_) | RequestKind::DeleteKey(_) => false,
        }
    }

    fn fetch_detail(&mut self, kind: RequestKind) -> Effect {
        let id = self.seq.issue();
        self.seq.latest_detail = Some(id);
        Effect::Fetch(Request { id, kind })
    }

    fn fetch_keys(&mut self, origin: KeysOrigin) -> Effect {
        let id = self.seq.issue();
        self.seq.latest_keys = Some(id);
        Effect::Fetch(Request {
            id,
            kind: RequestKind::Keys(origin),
        })
    }

    /// Assigning the fragment only counts as a change when the value differs.
    fn set_fragment(&mut self, fragment: Option<KeyName>, out: &mut Vec<Effect>) {
        if self.state.fragment == fragment {
            return;
        }
        self.state.fragment = fragment.clone();
        match fragment {
            Some(key) => {
                if self.state.detail.shows_key(&key) {
                    // Already on screen; whatever is still in flight is obsolete.
                    self.seq.latest_detail = None;
                } else {
                    out.push(self.fetch_detail(RequestKind::Key {
                        key: key.clone(),
                        origin: DetailOrigin::Fragment,
                    }));
                }
                self.mark_current(key, out);
            }
            None => {
                // Anything still in flight for the panel is now obsolete.
                self.seq.latest_detail = None;
                self.state.current = None;
                self.state.detail = Detail::Empty;
            }
        }
    }

    fn mark_current(&mut self, key: KeyName, out: &mut Vec<Effect>) {
        self.state.current = Some(key.clone());
        if self.state.keys.contains(&key) {
            out.push(Effect::ScrollTo(key));
        }
    }

    /// Full page load of `route`. A new location starts without a fragment.
    fn navigate(&mut self, route: Route, out: &mut Vec<Effect>) {
        self.state.location = Some(route.clone());
        self.state.fragment = None;
        self.state.current = None;
        out.push(self.fetch_detail(RequestKind::Page(route)));
    }
}
