use reqwest::Url;

use crate::filter::KeyFilter;
use crate::route::{Database, KeyName, Route};

/// What the right-hand panel currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Detail {
    #[default]
    Empty,
    /// Markup returned by `GET /key/<name>`, verbatim.
    Key { key: KeyName, markup: String },
    /// A full page load (e.g. the add-key form), verbatim.
    Page { route: Route, markup: String },
}

impl Detail {
    pub fn markup(&self) -> Option<&str> {
        match self {
            Detail::Empty => None,
            Detail::Key { markup, .. } | Detail::Page { markup, .. } => Some(markup.as_str()),
        }
    }

    pub fn shows_key(&self, key: &KeyName) -> bool {
        matches!(self, Detail::Key { key: k, .. } if k == key)
    }
}

/// Everything the browser knows. Handlers only mutate this; the view is derived
/// from it by [`BrowserState::view`].
#[derive(Debug, Clone)]
pub struct BrowserState {
    pub(crate) base: Url,
    /// Page the browser is on. `None` is the key index.
    pub(crate) location: Option<Route>,
    pub(crate) keys: Vec<KeyName>,
    pub(crate) filter: KeyFilter,
    /// Selection encoded in the URL fragment.
    pub(crate) fragment: Option<KeyName>,
    /// Entry carrying the "current" marker. Follows `fragment`, except right
    /// after a click when it runs ahead of it.
    pub(crate) current: Option<KeyName>,
    pub(crate) detail: Detail,
    pub(crate) database: Option<Database>,
    pub(crate) add_key_menu_open: bool,
}

impl BrowserState {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            location: None,
            keys: Vec::new(),
            filter: KeyFilter::default(),
            fragment: None,
            current: None,
            detail: Detail::Empty,
            database: None,
            add_key_menu_open: false,
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn keys(&self) -> &[KeyName] {
        &self.keys
    }

    pub fn filter_term(&self) -> &str {
        self.filter.term()
    }

    pub fn fragment(&self) -> Option<&KeyName> {
        self.fragment.as_ref()
    }

    pub fn current(&self) -> Option<&KeyName> {
        self.current.as_ref()
    }

    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    pub fn database(&self) -> Option<Database> {
        self.database
    }

    pub fn location(&self) -> Option<&Route> {
        self.location.as_ref()
    }

    pub fn add_key_menu_open(&self) -> bool {
        self.add_key_menu_open
    }

    /// Address bar text: page url plus `#fragment` when a key is selected.
    pub fn address(&self) -> String {
        let mut url = match &self.location {
            Some(route) => route.url(&self.base),
            None => self.base.clone(),
        };
        url.set_fragment(self.fragment.as_ref().map(|k| k.as_str()));
        url.to_string()
    }

    pub fn view(&self) -> BrowserView {
        let items = self
            .keys
            .iter()
            .map(|key| ListItemView {
                href: Route::Key(key.clone()).path(&self.base),
                visible: self.filter.matches(key.as_str()),
                current: self.current.as_ref() == Some(key),
                key: key.clone(),
            })
            .collect();
        BrowserView {
            address: self.address(),
            filter_term: self.filter.term().to_string(),
            items,
        }
    }
}

/// One `<li><a href="/key/...">name</a></li>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemView {
    pub key: KeyName,
    pub href: String,
    pub visible: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserView {
    pub address: String,
    pub filter_term: String,
    pub items: Vec<ListItemView>,
}

impl BrowserView {
    pub fn visible(&self) -> impl Iterator<Item = &ListItemView> {
        self.items.iter().filter(|i| i.visible)
    }

    pub fn current_items(&self) -> impl Iterator<Item = &ListItemView> {
        self.items.iter().filter(|i| i.current)
    }
}
