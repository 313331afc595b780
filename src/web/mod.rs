//! HTTP surface: chat page plus JSON API.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{AppState, chat_routes};
