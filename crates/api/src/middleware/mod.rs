//! HTTP middleware: identity resolution and request correlation.

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, identity_middleware};
pub use request_id::request_id_middleware;
