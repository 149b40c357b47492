//! Webhook mode: Telegram pushes updates to `POST /<random-uuid>/`.
//!
//! The path segment is regenerated on every start and is the only thing
//! standing between the route and the internet.

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use teloxide::{
    prelude::*,
    types::{Update, UpdateKind},
};
use tokio::net::TcpListener;
use uuid::Uuid;

use jhb_core::config::Config;

use crate::{handlers, router::AppState};

pub async fn run_webhook(bot: Bot, cfg: Arc<Config>, state: Arc<AppState>) -> anyhow::Result<()> {
    let secret = Uuid::new_v4().to_string();
    let url = cfg.webhook_url(&secret)?;

    bot.delete_webhook()
        .await
        .context("failed to remove previous webhook")?;
    bot.set_webhook(url)
        .await
        .context("failed to register webhook")?;
    tracing::info!(base = %cfg.webhook_base_url, "webhook registered");

    let listener = TcpListener::bind(cfg.webhook_listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.webhook_listen_addr))?;
    tracing::info!("listening on http://{}", cfg.webhook_listen_addr);

    axum::serve(listener, router(&secret, state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server failed")?;

    if let Err(e) = bot.delete_webhook().await {
        tracing::warn!(error = %e, "failed to remove webhook on shutdown");
    }
    Ok(())
}

pub fn router(secret: &str, state: Arc<AppState>) -> Router {
    Router::new()
        .route(&format!("/{secret}/"), post(receive_update))
        .with_state(state)
}

async fn receive_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !is_json(&headers) {
        return StatusCode::FORBIDDEN;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable webhook payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    let update_id = update.id;
    let UpdateKind::Message(msg) = update.kind else {
        return StatusCode::OK;
    };

    match handlers::handle_message(msg, state).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(update_id, error = %e, "update handling failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down webhook server");
}
