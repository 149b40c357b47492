use crate::{Error, Result};

/// Initialize tracing for the bot.
///
/// teloxide logs through the `log` facade; the fmt subscriber bridges those
/// records so both end up in the same output.
pub fn init(service_name: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    // Default: info for our crates and everything else. Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,jhb_core=info,jhb_telegram=info,jhb_mongo=info,{service_name}=info"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init()
        .map_err(|e| Error::External(format!("failed to init logging: {e}")))
}
