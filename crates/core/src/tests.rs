use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Form;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use pretty_assertions::assert_eq;
use serde::Deserialize;

use crate::client::AdminClient;
use crate::controller::{Controller, Effect, Event};
use crate::error::BrowserError;
use crate::key_type::KeyType;
use crate::route::{Database, KeyName};
use crate::state::{BrowserState, Detail};

#[derive(Default)]
struct FakeRedis {
    keys: Vec<String>,
    db: Option<u8>,
    detail_hits: Vec<String>,
}

type Shared = Arc<Mutex<FakeRedis>>;

fn spawn_axum_server(app: axum::Router) -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    listener.set_nonblocking(true).expect("nonblocking");
    let listener = tokio::net::TcpListener::from_std(listener).expect("to tokio listener");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, handle)
}

#[derive(Deserialize)]
struct ChangeDbForm {
    redis_db: String,
}

fn admin_app(shared: Shared) -> axum::Router {
    axum::Router::new()
        .route("/", get(|| async { Html("<ul id=\"keylist\"></ul>") }))
        .route(
            "/keys",
            get(|State(s): State<Shared>| async move {
                let keys = s.lock().expect("lock").keys.clone();
                Json(serde_json::json!({ "keys": keys }))
            }),
        )
        .route(
            "/key/{name}",
            get(
                |State(s): State<Shared>, Path(name): Path<String>| async move {
                    s.lock().expect("lock").detail_hits.push(name.clone());
                    if name == "broken" {
                        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
                    }
                    Html(format!("<h2>{name}</h2><p>type: string</p>")).into_response()
                },
            ),
        )
        .route(
            "/key/new/{kind}",
            get(|Path(kind): Path<String>| async move {
                Html(format!("<form id=\"new_{kind}\">new {kind}</form>"))
            }),
        )
        .route(
            "/key/delete/{name}",
            get(
                |State(s): State<Shared>, Path(name): Path<String>| async move {
                    let mut g = s.lock().expect("lock");
                    let before = g.keys.len();
                    g.keys.retain(|k| k != &name);
                    let flash = if g.keys.len() < before {
                        format!("Key '{name}' was deleted successfully")
                    } else {
                        format!("Key '{name}' was not found in Redis")
                    };
                    Json(serde_json::json!({ "flash": flash }))
                },
            ),
        )
        .route(
            "/change_db",
            post(
                |State(s): State<Shared>, Form(form): Form<ChangeDbForm>| async move {
                    if let Ok(db) = form.redis_db.parse::<u8>() {
                        s.lock().expect("lock").db = Some(db);
                    }
                    Redirect::to("/")
                },
            ),
        )
        .route("/setup/", get(|| async { Html("<form>setup</form>") }))
        .with_state(shared)
}

fn start_server(keys: &[&str]) -> (AdminClient, Shared, tokio::task::JoinHandle<()>) {
    let shared: Shared = Arc::new(Mutex::new(FakeRedis {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        ..Default::default()
    }));
    let (addr, handle) = spawn_axum_server(admin_app(shared.clone()));
    let client =
        AdminClient::new(&format!("http://{addr}"), Duration::from_secs(5)).expect("client");
    (client, shared, handle)
}

fn key(name: &str) -> KeyName {
    KeyName::new(name).expect("key")
}

/// Run every fetch the controller asks for (and the ones those trigger) to completion.
async fn drive(c: &mut Controller, client: &AdminClient, effects: Vec<Effect>) -> Vec<Effect> {
    let mut seen = Vec::new();
    let mut queue = effects;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for effect in queue {
            if let Effect::Fetch(req) = &effect {
                let completion = client.execute(req.clone()).await;
                next.extend(c.complete(completion));
            }
            seen.push(effect);
        }
        queue = next;
    }
    seen
}

#[tokio::test]
async fn keys_endpoint_returns_names_in_order() {
    let (client, _shared, handle) = start_server(&["b", "a", "c"]);
    let keys = client.keys().await.expect("keys");
    assert_eq!(keys, vec!["b", "a", "c"]);
    handle.abort();
}

#[tokio::test]
async fn key_names_reach_the_server_as_one_segment() {
    let (client, shared, handle) = start_server(&[]);
    let markup = client
        .key_markup(&key("user:1/name x"))
        .await
        .expect("markup");
    assert_eq!(markup, "<h2>user:1/name x</h2><p>type: string</p>");
    assert_eq!(
        shared.lock().expect("lock").detail_hits,
        vec!["user:1/name x".to_string()]
    );
    handle.abort();
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (client, _shared, handle) = start_server(&[]);
    let err = client.key_markup(&key("broken")).await.expect_err("500");
    assert!(matches!(err, BrowserError::Status { status: 500, .. }));
    handle.abort();
}

#[tokio::test]
async fn markup_where_json_is_expected_is_a_decode_error() {
    let app = axum::Router::new().route("/keys", get(|| async { Html("<form>setup</form>") }));
    let (addr, handle) = spawn_axum_server(app);
    let client = AdminClient::new(&format!("http://{addr}/"), Duration::from_secs(5)).expect("client");
    let err = client.keys().await.expect_err("decode");
    assert!(matches!(err, BrowserError::Decode { .. }));
    handle.abort();
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local_addr")
    };
    let client =
        AdminClient::new(&format!("http://{addr}"), Duration::from_millis(500)).expect("client");
    let err = client.keys().await.expect_err("connect");
    assert!(matches!(err, BrowserError::Http { .. }));
}

#[tokio::test]
async fn startup_with_bookmark_loads_list_and_detail() {
    let (client, _shared, handle) = start_server(&["a", "mykey"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));

    let effects = c.start(Some(key("mykey")));
    drive(&mut c, &client, effects).await;

    assert_eq!(c.state().keys(), &[key("a"), key("mykey")]);
    assert_eq!(
        c.state().detail(),
        &Detail::Key {
            key: key("mykey"),
            markup: "<h2>mykey</h2><p>type: string</p>".to_string()
        }
    );
    let current: Vec<String> = c.view().current_items().map(|i| i.key.to_string()).collect();
    assert_eq!(current, vec!["mykey"]);
    handle.abort();
}

#[tokio::test]
async fn click_then_fragment_fetches_once() {
    let (client, shared, handle) = start_server(&["other", "mykey"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));
    let effects = c.start(None);
    drive(&mut c, &client, effects).await;

    let effects = c.handle(Event::ItemActivated(key("mykey")));
    let seen = drive(&mut c, &client, effects).await;

    assert!(seen.contains(&Effect::ScrollTo(key("mykey"))));
    assert_eq!(c.state().fragment(), Some(&key("mykey")));
    assert_eq!(
        c.state().detail().markup(),
        Some("<h2>mykey</h2><p>type: string</p>")
    );
    assert_eq!(
        shared.lock().expect("lock").detail_hits,
        vec!["mykey".to_string()]
    );
    handle.abort();
}

#[tokio::test]
async fn refresh_rebuilds_from_server_and_clears_fragment() {
    let (client, shared, handle) = start_server(&["x"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));
    let effects = c.start(Some(key("x")));
    drive(&mut c, &client, effects).await;

    shared.lock().expect("lock").keys = vec!["a".into(), "b".into(), "c".into()];
    let effects = c.handle(Event::RefreshRequested);
    drive(&mut c, &client, effects).await;

    let hrefs: Vec<String> = c.view().items.into_iter().map(|i| i.href).collect();
    assert_eq!(hrefs, vec!["/key/a", "/key/b", "/key/c"]);
    assert_eq!(c.state().fragment(), None);
    assert_eq!(c.state().detail(), &Detail::Empty);
    handle.abort();
}

#[tokio::test]
async fn failed_detail_fetch_is_a_silent_no_op_for_the_panel() {
    let (client, _shared, handle) = start_server(&["a", "broken"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));
    let effects = c.start(Some(key("a")));
    drive(&mut c, &client, effects).await;

    let effects = c.handle(Event::ItemActivated(key("broken")));
    let seen = drive(&mut c, &client, effects).await;

    assert!(seen.iter().any(|e| matches!(e, Effect::Failed(_))));
    assert!(c.state().detail().shows_key(&key("a")));
    assert_eq!(c.state().fragment(), Some(&key("a")));
    handle.abort();
}

#[tokio::test]
async fn add_key_navigates_to_creation_form() {
    let (client, _shared, handle) = start_server(&["a"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));
    let effects = c.start(None);
    drive(&mut c, &client, effects).await;

    c.handle(Event::AddKeyRequested);
    let effects = c.handle(Event::AddKeyChosen(KeyType::SortedSet));
    drive(&mut c, &client, effects).await;

    assert_eq!(
        c.state().detail().markup(),
        Some("<form id=\"new_zset\">new zset</form>")
    );
    assert!(c.state().address().ends_with("/key/new/zset"));
    handle.abort();
}

#[tokio::test]
async fn database_switch_posts_form_and_reloads() {
    let (client, shared, handle) = start_server(&["a"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));
    let effects = c.start(None);
    drive(&mut c, &client, effects).await;

    shared.lock().expect("lock").keys = vec!["db4-key".into()];
    let db = Database::new(4).expect("db");
    let effects = c.handle(Event::DatabaseSelected(db));
    drive(&mut c, &client, effects).await;

    assert_eq!(shared.lock().expect("lock").db, Some(4));
    assert_eq!(c.state().database(), Some(db));
    assert_eq!(c.state().keys(), &[key("db4-key")]);
    handle.abort();
}

#[tokio::test]
async fn delete_flashes_and_drops_entry() {
    let (client, _shared, handle) = start_server(&["a", "b"]);
    let mut c = Controller::new(BrowserState::new(client.base().clone()));
    let effects = c.start(Some(key("a")));
    drive(&mut c, &client, effects).await;

    let effects = c.handle(Event::DeleteConfirmed(key("a")));
    let seen = drive(&mut c, &client, effects).await;

    assert!(seen.contains(&Effect::Flash(
        "Key 'a' was deleted successfully".to_string()
    )));
    assert_eq!(c.state().keys(), &[key("b")]);
    assert_eq!(c.state().fragment(), None);
    handle.abort();
}
