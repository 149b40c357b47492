use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError},
};

use teloxide::{dispatching::Dispatcher, dptree, error_handlers::LoggingErrorHandler, prelude::*};

use tokio::sync::{Mutex, OwnedMutexGuard};

use jhb_core::{config::Config, store::MembershipStore, BotContext};

use crate::{handlers, webhook, TelegramMessenger};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Polling,
    Webhook,
}

#[derive(Clone)]
pub struct AppState {
    pub ctx: BotContext,
    pub chat_locks: Arc<ChatLocks>,
}

impl AppState {
    pub fn new(ctx: BotContext) -> Self {
        Self {
            ctx,
            chat_locks: Arc::new(ChatLocks::default()),
        }
    }
}

type LockMap = HashMap<i64, Arc<Mutex<()>>>;

/// One async lock per chat so updates of the same chat never interleave.
///
/// An entry lives only while some update of that chat holds or waits for it.
#[derive(Default)]
pub struct ChatLocks {
    inner: Arc<StdMutex<LockMap>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> ChatGuard {
        // Clones of a lock are only taken under the map mutex.
        let lock = lock_map(&self.inner)
            .entry(chat_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        ChatGuard {
            map: self.inner.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Chats with a lock currently held or awaited.
    #[cfg(test)]
    fn active(&self) -> usize {
        lock_map(&self.inner).len()
    }
}

pub struct ChatGuard {
    map: Arc<StdMutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ChatGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        // A count of one means only the map still refers to the lock. This also
        // sweeps locks left behind by waiters that were cancelled.
        lock_map(&self.map).retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

fn lock_map(map: &StdMutex<LockMap>) -> MutexGuard<'_, LockMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build the Telegram side, run until Ctrl-C, then release the store.
pub async fn run(
    mode: RunMode,
    cfg: Arc<Config>,
    store: Arc<dyn MembershipStore>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!("joinhider started: @{} ({:?} mode)", me.username(), mode),
        Err(e) => tracing::warn!(error = %e, "getMe failed"),
    }

    let messenger = Arc::new(TelegramMessenger::new(bot.clone()));
    let ctx = BotContext::new(messenger, store);
    let state = Arc::new(AppState::new(ctx.clone()));

    let res = match mode {
        RunMode::Polling => run_polling(bot, state).await,
        RunMode::Webhook => webhook::run_webhook(bot, cfg, state).await,
    };

    if let Err(e) = ctx.shutdown().await {
        tracing::warn!(error = %e, "failed to close store");
    }
    res
}

pub async fn run_polling(bot: Bot, state: Arc<AppState>) -> anyhow::Result<()> {
    // The default polling listener drops any registered webhook first.
    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
