//! route matching and dispatch
//!
//! routes are tried in order and the first predicate that matches wins.
//! matching is by substring, not by prefix: `foo/file/bar` is a file request
//! and `x/multiply?num1=1&num2=2` is a multiplication.

use std::fmt;

use crate::config::{GithubBaseUrl, ServerConfig};
use crate::github::{GithubClient, RemoteApi};
use crate::handlers::{self, HandlerError};
use crate::request::Request;
use crate::resources::ResourceProvider;
use crate::response::{Response, ILLEGAL_REQUEST};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    RandomPage,
    RandomImage,
    File,
    Multiply,
    Github,
    GithubActivity,
    Password,
    Unrecognized,
}

impl Route {
    /// marker removed from the target to get the query, for query routes
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Route::File => Some("file/"),
            Route::Multiply => Some("multiply?"),
            Route::Github => Some("github?"),
            Route::GithubActivity => Some("githubActivity?"),
            Route::Password => Some("pass?"),
            _ => None,
        }
    }

    pub fn matches(&self, target: &str) -> bool {
        match self {
            Route::Index => target.is_empty(),
            Route::RandomPage => target.eq_ignore_ascii_case("random"),
            Route::RandomImage => target.eq_ignore_ascii_case("json"),
            Route::Unrecognized => true,
            _ => self.marker().map(|m| target.contains(m)).unwrap_or(false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Index => "index",
            Route::RandomPage => "random",
            Route::RandomImage => "json",
            Route::File => "file",
            Route::Multiply => "multiply",
            Route::Github => "github",
            Route::GithubActivity => "githubActivity",
            Route::Password => "pass",
            Route::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// routes in priority order, `Unrecognized` matches everything and comes last
pub const ROUTES: &[Route] = &[
    Route::Index,
    Route::RandomPage,
    Route::RandomImage,
    Route::File,
    Route::Multiply,
    Route::Github,
    Route::GithubActivity,
    Route::Password,
    Route::Unrecognized,
];

/// pick the route for a request target
pub fn route_for(target: &str) -> Route {
    ROUTES
        .iter()
        .copied()
        .find(|route| route.matches(target))
        .unwrap_or(Route::Unrecognized)
}

/// the query part of a target: the target with every route marker removed
fn query_of(route: Route, target: &str) -> String {
    match route.marker() {
        Some(marker) => target.replace(marker, ""),
        None => String::new(),
    }
}

/// stateless dispatcher, shared by every connection
pub struct Router {
    resources: ResourceProvider,
    remote: Box<dyn RemoteApi>,
    github_api: GithubBaseUrl,
}

impl Router {
    pub fn new(resources: ResourceProvider, remote: Box<dyn RemoteApi>, github_api: GithubBaseUrl) -> Self {
        Router {
            resources,
            remote,
            github_api,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let resources = ResourceProvider::new(
            config.www_dir.clone(),
            config.file_root.clone(),
            config.strict_path_containment,
        );
        let remote = GithubClient::from_config(config);
        log::info!("github client {}", remote);
        Router::new(resources, Box::new(remote), config.github_api.clone())
    }

    /// bytes to write back for whatever the reader produced
    pub async fn respond(&self, request: Option<&Request>) -> Vec<u8> {
        match request {
            Some(request) => self.dispatch(request).await.to_bytes(),
            None => {
                log::info!("no GET line received, answering illegal request");
                ILLEGAL_REQUEST.to_vec()
            }
        }
    }

    pub async fn dispatch(&self, request: &Request) -> Response {
        let route = route_for(&request.target);
        let query = query_of(route, &request.target);

        let result = match route {
            Route::Index => handlers::pages::index(&self.resources).await,
            Route::RandomPage => handlers::pages::random_page(&self.resources).await,
            Route::RandomImage => Ok(handlers::pages::random_image()),
            Route::File => handlers::pages::file(&self.resources, &request.target).await,
            Route::Multiply => handlers::multiply::multiply(&query),
            Route::Github => {
                handlers::github::repositories(self.remote.as_ref(), &self.github_api, &query).await
            }
            Route::GithubActivity => {
                handlers::github::activity(self.remote.as_ref(), &self.github_api, &query).await
            }
            Route::Password => Ok(handlers::password::password(&query)),
            Route::Unrecognized => Err(HandlerError::UnrecognizedRoute),
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log::debug!("{} route failed: {}", route, err);
                err.into_response()
            }
        };

        log::info!("GET /{} -> {} ({})", request.target, response.status.code(), route);
        response
    }
}
