/*
 * Responsibility
 * - Config読み込み → KeyAuth 組み立て → Router 組み立て
 * - Middleware の適用 (key auth / request-id / trace など)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{
    http::{self, HttpConfig},
    key_auth::{self, KeyAuth, KeyAuthConfig, KeyAuthConfigError},
};
use crate::services::validator::Validator;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

fn init_tracing() {
    // RUST_LOG があればそれを優先
    // Ex:
    // RUST_LOG=info,key_auth_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    let Config {
        addr,
        app_env,
        key_auth,
        api_keys,
        http: http_config,
    } = config;

    tracing::info!(
        key_lookup = %key_auth.key_lookup,
        keys = api_keys.len(),
        "starting key auth gate in {:?} mode on {}",
        app_env,
        addr
    );

    // lookup 不正・validator 無しはここで起動失敗
    let gate = build_gate(key_auth, api_keys).context("invalid key auth configuration")?;
    let app = build_router(AppState::new(gate), http_config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the gate used by the service: everything but the health probe is protected.
pub fn build_gate(
    config: KeyAuthConfig,
    validator: impl Validator + 'static,
) -> Result<KeyAuth, KeyAuthConfigError> {
    let health = format!("{API_PREFIX}{}", api::v1::HEALTH_PATH);

    KeyAuth::builder()
        .config(config)
        .validator(validator)
        .skipper(move |parts| parts.uri.path() == health)
        .build()
}

pub fn build_router(state: AppState, http_config: HttpConfig) -> Router {
    let api = Router::new().nest(API_PREFIX, api::v1::routes());
    let api = key_auth::apply(api, state.key_auth.clone()).with_state(state);

    http::apply(api, http_config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
