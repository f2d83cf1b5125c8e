use std::fmt;

use reqwest::Url;

use crate::error::{BrowserError, BrowserResult};
use crate::key_type::KeyType;

/// A Redis key name that is safe to interpolate into a route.
///
/// The only local validation is presence; everything else is handled by
/// percent-encoding the name as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyName(String);

impl KeyName {
    pub fn new(name: impl Into<String>) -> BrowserResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(BrowserError::EmptyKeyName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Interpret a raw fragment (`#name`, `name` or empty) as a selection.
pub fn parse_fragment(raw: &str) -> Option<KeyName> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    KeyName::new(raw).ok()
}

/// Redis logical database index accepted by the server's db switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Database(u8);

impl Database {
    pub const MAX: u8 = 9;

    pub fn new(index: i64) -> BrowserResult<Self> {
        if !(0..=i64::from(Self::MAX)).contains(&index) {
            return Err(BrowserError::InvalidDatabase(index));
        }
        Ok(Self(index as u8))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Database> {
        (0..=Self::MAX).map(Database)
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "db{}", self.0)
    }
}

/// Server endpoints consumed by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /keys`, JSON `{"keys": [...]}`.
    Keys,
    /// `GET /key/<name>`, detail markup.
    Key(KeyName),
    /// `GET /key/new/<type>`, creation page (navigation target).
    NewKey(KeyType),
    /// `GET /key/delete/<name>`, JSON `{"flash": "..."}`.
    DeleteKey(KeyName),
    /// `POST /change_db`, form `redis_db=<n>`.
    ChangeDb,
}

impl Route {
    fn segments(&self) -> Vec<&str> {
        match self {
            Route::Keys => vec!["keys"],
            Route::Key(name) => vec!["key", name.as_str()],
            Route::NewKey(t) => vec!["key", "new", t.token()],
            Route::DeleteKey(name) => vec!["key", "delete", name.as_str()],
            Route::ChangeDb => vec!["change_db"],
        }
    }

    /// Resolve against the server base. Each dynamic part is pushed as one
    /// percent-encoded segment, so `/`, `#` and `?` inside key names stay inside the name.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(self.segments());
        }
        url
    }

    /// Path component of [`Route::url`], used as the list entry link.
    pub fn path(&self, base: &Url) -> String {
        self.url(base).path().to_string()
    }
}

/// Parse and check a server base URL; only `http`/`https` bases can carry routes.
pub fn parse_base_url(raw: &str) -> BrowserResult<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| BrowserError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BrowserError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(BrowserError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "url cannot carry a path".to_string(),
        });
    }
    Ok(url)
}
