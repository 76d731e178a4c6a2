//! one function per route, each returns a finished response or a
//! [`HandlerError`] that the router turns into one

mod error;
pub mod github;
pub mod multiply;
pub mod pages;
pub mod password;

pub use error::HandlerError;
