//! API key authentication gate for axum services.
//!
//! The key is read from one configured location (header, query parameter or
//! cookie), handed to a [`Validator`](services::validator::Validator), and the
//! request either continues untouched or fails with 400 (no key) / 401 (key
//! rejected).

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
