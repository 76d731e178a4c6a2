use std::fmt;

use crate::github::ProxyResult;
use crate::query::QueryError;
use crate::response::{Response, Status};

/// everything a handler can fail with, each maps to exactly one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    MalformedQuery(QueryError),
    MissingParameter(String),
    InvalidNumber(String),
    RemoteNotFound,
    RemoteBadRequest(String),
    RemoteUnavailable(String),
    MalformedResponseShape(String),
    ResourceNotFound(String),
    UnrecognizedRoute,
}

impl HandlerError {
    pub fn status(&self) -> Status {
        match self {
            HandlerError::MalformedQuery(_)
            | HandlerError::MissingParameter(_)
            | HandlerError::InvalidNumber(_)
            | HandlerError::RemoteBadRequest(_)
            | HandlerError::UnrecognizedRoute => Status::BadRequest,
            HandlerError::RemoteNotFound | HandlerError::ResourceNotFound(_) => Status::NotFound,
            HandlerError::RemoteUnavailable(_) => Status::ServiceUnavailable,
            HandlerError::MalformedResponseShape(_) => Status::InternalServerError,
        }
    }

    /// the body shown to the client
    pub fn body(&self) -> String {
        match self {
            HandlerError::MalformedQuery(_) => "<html>ERROR: Malformed query parameters. Please ensure your query parameters are correctly formatted.</html>".to_string(),
            HandlerError::MissingParameter(msg) | HandlerError::InvalidNumber(msg) => msg.clone(),
            HandlerError::RemoteNotFound => {
                "<html>ERROR: The requested user does not exist on GitHub.</html>".to_string()
            }
            HandlerError::RemoteBadRequest(detail) => {
                format!("<html>ERROR: Bad request - {}</html>", detail)
            }
            HandlerError::RemoteUnavailable(detail) => {
                format!("<html>ERROR: Could not reach GitHub API - {}</html>", detail)
            }
            HandlerError::MalformedResponseShape(detail) => {
                format!("<html>ERROR: Invalid JSON format - {}</html>", detail)
            }
            HandlerError::ResourceNotFound(path) => format!("File not found: {}", path),
            HandlerError::UnrecognizedRoute => "I am not sure what you want me to do...".to_string(),
        }
    }

    pub fn into_response(self) -> Response {
        Response::html(self.status(), self.body())
    }

    /// turn a non-Ok proxy outcome into an error, Ok bodies are handed back
    pub fn from_proxy(result: ProxyResult) -> Result<String, HandlerError> {
        match result {
            ProxyResult::Ok(body) => Ok(body),
            ProxyResult::NotFound => Err(HandlerError::RemoteNotFound),
            ProxyResult::BadRequest => Err(HandlerError::RemoteBadRequest("Bad request".to_string())),
            ProxyResult::TransportFailure(detail) => Err(HandlerError::RemoteUnavailable(detail)),
        }
    }
}

impl From<QueryError> for HandlerError {
    fn from(err: QueryError) -> Self {
        HandlerError::MalformedQuery(err)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::MalformedQuery(e) => write!(f, "malformed query: {}", e),
            HandlerError::MissingParameter(msg) => write!(f, "missing parameter: {}", msg),
            HandlerError::InvalidNumber(msg) => write!(f, "invalid number: {}", msg),
            HandlerError::RemoteNotFound => write!(f, "remote resource not found"),
            HandlerError::RemoteBadRequest(d) => write!(f, "remote rejected request: {}", d),
            HandlerError::RemoteUnavailable(d) => write!(f, "remote unavailable: {}", d),
            HandlerError::MalformedResponseShape(d) => write!(f, "unexpected response shape: {}", d),
            HandlerError::ResourceNotFound(p) => write!(f, "resource not found: {}", p),
            HandlerError::UnrecognizedRoute => write!(f, "unrecognized route"),
        }
    }
}

impl std::error::Error for HandlerError {}
