//! GitHub REST proxying
//!
//! the client fetches raw JSON and classifies the remote status into a
//! [`ProxyResult`]; the types module turns that JSON into the HTML blocks the
//! `github?` and `githubActivity?` routes return.

mod client;
mod types;

pub use client::GithubClient;
pub use types::{
    parse_events, parse_repositories, reformat_date, render_events, render_repositories, Event,
    EventRepo, Owner, Repository,
};

use async_trait::async_trait;
use std::fmt;

/// outcome of a single remote GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyResult {
    Ok(String),
    NotFound,
    BadRequest,
    TransportFailure(String),
}

impl ProxyResult {
    /// the failure a remote status maps to, None for 200 where the body is wanted
    pub fn failure_for(status: u16) -> Option<Self> {
        match status {
            200 => None,
            404 => Some(ProxyResult::NotFound),
            400 => Some(ProxyResult::BadRequest),
            other => Some(ProxyResult::TransportFailure(format!(
                "Received HTTP error: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProxyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyResult::Ok(body) => write!(f, "ok ({} bytes)", body.len()),
            ProxyResult::NotFound => write!(f, "not found"),
            ProxyResult::BadRequest => write!(f, "bad request"),
            ProxyResult::TransportFailure(detail) => write!(f, "transport failure: {}", detail),
        }
    }
}

/// anything that can answer a GET for a full URL
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn fetch(&self, url: &str) -> ProxyResult;
}
