use thiserror::Error;

/// Failures surfaced by the admin client and the routing layer.
///
/// None of these ever mutate browser state: the controller treats a failed
/// request as "nothing happened" and only reports it.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("key name must not be empty")]
    EmptyKeyName,

    #[error("database {0} is out of range (0-9)")]
    InvalidDatabase(i64),

    #[error("invalid server url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

pub type BrowserResult<T> = Result<T, BrowserError>;

impl BrowserError {
    /// Short single-line form for toasts and status bars.
    pub fn short(&self, max: usize) -> String {
        let text = self.to_string();
        let text = text.lines().next().unwrap_or_default();
        if text.chars().count() <= max {
            return text.to_string();
        }
        text.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}
