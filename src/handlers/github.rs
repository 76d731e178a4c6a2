use super::HandlerError;
use crate::config::GithubBaseUrl;
use crate::github::{parse_events, parse_repositories, render_events, render_repositories, RemoteApi};
use crate::query::{decode, DecodeMode};
use crate::response::Response;

pub const MISSING_QUERY: &str = "<html>ERROR: Query parameter is missing or blank.</html>";
pub const MISSING_USER: &str = "<html>ERROR: User parameter is missing or blank.</html>";
const EMPTY_BODY: &str = "Invalid response from GitHub API.";

/// `github?query=<path>`: list repositories returned by `<api>/<path>`
pub async fn repositories(
    remote: &dyn RemoteApi,
    api: &GithubBaseUrl,
    raw_query: &str,
) -> Result<Response, HandlerError> {
    let params = decode(raw_query, DecodeMode::Strict)?;
    let query = params
        .get_non_blank("query")
        .ok_or_else(|| HandlerError::MissingParameter(MISSING_QUERY.to_string()))?;

    let json = fetch_json(remote, &api.join(query)).await?;
    let repos = parse_repositories(&json).map_err(HandlerError::MalformedResponseShape)?;

    Ok(Response::ok_html(render_repositories(&repos)))
}

/// `githubActivity?user=<login>`: list the user's public events
pub async fn activity(
    remote: &dyn RemoteApi,
    api: &GithubBaseUrl,
    raw_query: &str,
) -> Result<Response, HandlerError> {
    let params = decode(raw_query, DecodeMode::Strict)?;
    let user = params
        .get_non_blank("user")
        .ok_or_else(|| HandlerError::MissingParameter(MISSING_USER.to_string()))?;

    let path = format!("users/{}/events/public", user);
    let json = fetch_json(remote, &api.join(&path)).await?;
    let events = parse_events(&json).map_err(HandlerError::MalformedResponseShape)?;
    let html = render_events(&events).map_err(HandlerError::MalformedResponseShape)?;

    Ok(Response::ok_html(html))
}

async fn fetch_json(remote: &dyn RemoteApi, url: &str) -> Result<String, HandlerError> {
    let body = HandlerError::from_proxy(remote.fetch(url).await)?;
    if body.trim().is_empty() {
        return Err(HandlerError::RemoteUnavailable(EMPTY_BODY.to_string()));
    }
    Ok(body)
}
