use std::{env, net::SocketAddr};

use url::Url;

use crate::{errors::Error, Result};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "joinhider_bot";
pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://telebot.grablab.org/joinhider_bot";
pub const DEFAULT_WEBHOOK_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Typed configuration, read from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    // Webhook mode
    pub webhook_base_url: Url,
    pub webhook_listen_addr: SocketAddr,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Existing env vars win over `.env`; a missing file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;

        let mongodb_uri = get("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string());
        let mongodb_database =
            get("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_MONGODB_DATABASE.to_string());

        let raw_base =
            get("WEBHOOK_BASE_URL").unwrap_or_else(|| DEFAULT_WEBHOOK_BASE_URL.to_string());
        let webhook_base_url = Url::parse(raw_base.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid WEBHOOK_BASE_URL {raw_base:?}: {e}")))?;

        let raw_addr =
            get("WEBHOOK_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_WEBHOOK_LISTEN_ADDR.to_string());
        let webhook_listen_addr = raw_addr.parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!("invalid WEBHOOK_LISTEN_ADDR {raw_addr:?}: {e}"))
        })?;

        Ok(Self {
            telegram_bot_token,
            mongodb_uri,
            mongodb_database,
            webhook_base_url,
            webhook_listen_addr,
        })
    }

    /// Public URL Telegram should push updates to for the given secret path segment.
    pub fn webhook_url(&self, secret: &str) -> Result<Url> {
        let base = self.webhook_base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{secret}/"))
            .map_err(|e| Error::Config(format!("invalid webhook url: {e}")))
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = Config::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(cfg.telegram_bot_token, "123:abc");
        assert_eq!(cfg.mongodb_uri, DEFAULT_MONGODB_URI);
        assert_eq!(cfg.mongodb_database, DEFAULT_MONGODB_DATABASE);
        assert_eq!(cfg.webhook_listen_addr.port(), 8080);
        assert_eq!(
            cfg.webhook_url("s3cr3t").unwrap().as_str(),
            "https://telebot.grablab.org/joinhider_bot/s3cr3t/"
        );
    }

    #[test]
    fn overrides_and_validation() {
        let cfg = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "jh"),
            ("WEBHOOK_BASE_URL", "https://example.org/hook/"),
            ("WEBHOOK_LISTEN_ADDR", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.mongodb_uri, "mongodb://db:27017");
        assert_eq!(cfg.mongodb_database, "jh");
        assert_eq!(
            cfg.webhook_url("x").unwrap().as_str(),
            "https://example.org/hook/x/"
        );
        assert_eq!(cfg.webhook_listen_addr.to_string(), "127.0.0.1:9000");

        let bad = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_LISTEN_ADDR", "not-an-addr"),
        ]));
        assert!(matches!(bad, Err(Error::Config(_))));
    }
}
