use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, REFERER};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::controller::{Completion, Request, RequestKind, Response};
use crate::error::{BrowserError, BrowserResult};
use crate::route::{Database, KeyName, Route, parse_base_url};

#[derive(Debug, Deserialize)]
struct KeysBody {
    keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FlashBody {
    #[serde(default)]
    flash: Option<String>,
}

/// HTTP client for the admin server.
///
/// The server keeps the selected database in its session cookie, so the client
/// carries a cookie store and is meant to be cloned rather than rebuilt.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base: Url,
}

impl AdminClient {
    pub fn new(base_url: &str, timeout: Duration) -> BrowserResult<Self> {
        let base = parse_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|source| BrowserError::Http {
                url: base.to_string(),
                source,
            })?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn get(&self, route: &Route, accept: &str) -> BrowserResult<(Url, reqwest::Response)> {
        let url = route.url(&self.base);
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|source| BrowserError::Http {
                url: url.to_string(),
                source,
            })?;
        check_status(&url, &resp)?;
        Ok((url, resp))
    }

    async fn text(url: &Url, resp: reqwest::Response) -> BrowserResult<String> {
        resp.text().await.map_err(|source| BrowserError::Http {
            url: url.to_string(),
            source,
        })
    }

    async fn json<T: DeserializeOwned>(
        url: &Url,
        resp: reqwest::Response,
        expected: &str,
    ) -> BrowserResult<T> {
        let body = Self::text(url, resp).await?;
        serde_json::from_str::<T>(&body).map_err(|e| BrowserError::Decode {
            url: url.to_string(),
            reason: format!("expected {expected}: {e}"),
        })
    }

    /// `GET /keys`: the key names in server order.
    pub async fn keys(&self) -> BrowserResult<Vec<String>> {
        let (url, resp) = self.get(&Route::Keys, "application/json").await?;
        let body: KeysBody = Self::json(&url, resp, "a JSON object with a `keys` array").await?;
        Ok(body.keys)
    }

    /// `GET /key/<name>`: detail markup, verbatim.
    pub async fn key_markup(&self, key: &KeyName) -> BrowserResult<String> {
        self.page(&Route::Key(key.clone())).await
    }

    /// Any markup route, verbatim.
    pub async fn page(&self, route: &Route) -> BrowserResult<String> {
        let (url, resp) = self.get(route, "text/html").await?;
        Self::text(&url, resp).await
    }

    /// `POST /change_db`. The server answers with a redirect back to the
    /// referring page, which the client follows and discards.
    pub async fn change_database(&self, db: Database) -> BrowserResult<()> {
        let url = Route::ChangeDb.url(&self.base);
        let resp = self
            .http
            .post(url.clone())
            .header(REFERER, self.base.as_str())
            .form(&[("redis_db", db.index().to_string())])
            .send()
            .await
            .map_err(|source| BrowserError::Http {
                url: url.to_string(),
                source,
            })?;
        check_status(&url, &resp)?;
        info!(%db, "switched database");
        Ok(())
    }

    /// `GET /key/delete/<name>`: the server's flash message, if any.
    pub async fn delete_key(&self, key: &KeyName) -> BrowserResult<Option<String>> {
        let (url, resp) = self
            .get(&Route::DeleteKey(key.clone()), "application/json")
            .await?;
        let body: FlashBody = Self::json(&url, resp, "a JSON object with a `flash` message").await?;
        info!(key = %key, "delete requested");
        Ok(body.flash)
    }

    /// Perform a controller request and package the outcome for
    /// [`crate::controller::Controller::complete`].
    pub async fn execute(&self, request: Request) -> Completion {
        let outcome = match &request.kind {
            RequestKind::Key { key, .. } => self.key_markup(key).await.map(Response::Markup),
            RequestKind::Page(route) => self.page(route).await.map(Response::Markup),
            RequestKind::Keys(_) => self.keys().await.map(Response::Keys),
            RequestKind::ChangeDatabase(db) => {
                self.change_database(*db).await.map(|_| Response::Done)
            }
            RequestKind::DeleteKey(key) => self.delete_key(key).await.map(Response::Flash),
        };
        Completion { request, outcome }
    }
}

fn check_status(url: &Url, resp: &reqwest::Response) -> BrowserResult<()> {
    let status = resp.status();
    if !status.is_success() {
        return Err(BrowserError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}
