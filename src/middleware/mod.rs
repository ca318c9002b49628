/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - key_auth: API key gate / http: request-id, trace, limit, timeout
 */
pub mod http;
pub mod key_auth;
