/*
 * Responsibility
 * - v1 の公開ポイント (routes() の re-export など)
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::{HEALTH_PATH, routes};
