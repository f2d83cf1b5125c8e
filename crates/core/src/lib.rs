pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod key_type;
pub mod markup;
pub mod route;
pub mod state;

#[cfg(test)]
mod tests;

pub use client::AdminClient;
pub use controller::{Completion, Controller, Effect, Event, Request, RequestKind, Response};
pub use error::{BrowserError, BrowserResult};
pub use key_type::KeyType;
pub use route::{Database, KeyName, Route, parse_fragment};
pub use state::{BrowserState, BrowserView, Detail, ListItemView};
