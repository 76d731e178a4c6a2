pub mod config;
pub mod github;
pub mod handlers;
pub mod message;
pub mod password;
pub mod query;
pub mod request;
pub mod resources;
pub mod response;
pub mod router;
pub mod server;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
