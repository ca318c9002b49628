/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (KeyAuth は内部 Arc なので Clone cheap)
 * - 起動後は read-only。リクエスト間で可変状態は持たない
 */
use crate::middleware::key_auth::KeyAuth;

#[derive(Clone, Debug)]
pub struct AppState {
    pub key_auth: KeyAuth,
}

impl AppState {
    pub fn new(key_auth: KeyAuth) -> Self {
        Self { key_auth }
    }
}
