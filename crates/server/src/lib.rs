//! Clean Hurghada chat server
//!
//! Hosts per-session conversations behind a REST API: chat, language
//! toggle, and the three embedded widgets (calculator, booking, rating).

pub mod http;
pub mod session;
pub mod state;

pub use http::create_router;
pub use session::{ChatSession, SessionManager};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Session limit reached")]
    SessionLimit,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("A response is already being generated for this session")]
    Busy,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Session(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::SessionLimit => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Busy => axum::http::StatusCode::CONFLICT,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
