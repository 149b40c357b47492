//! Telegram adapter (teloxide).
//!
//! This crate implements the `jhb-core` MessagingPort over Telegram Bot API and
//! drives update delivery in polling or webhook mode.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode, ApiError, RequestError};

use tokio::time::sleep;

pub mod handlers;
pub mod router;
pub mod webhook;

use jhb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::{DeleteError, Error},
    messaging::{port::MessagingPort, types::LinkPreview},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: RequestError) -> Error {
        Error::Messaging(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(
        &self,
        mut op: impl FnMut() -> Fut,
    ) -> std::result::Result<T, RequestError>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(RequestError::RetryAfter(d)) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    sleep(d).await;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

/// Sort a delete-message failure into the kinds the handlers act on.
pub fn classify_delete_error(e: &RequestError) -> DeleteError {
    match e {
        RequestError::Api(ApiError::MessageToDeleteNotFound) => DeleteError::NotFound,
        RequestError::Api(ApiError::MessageCantBeDeleted) => DeleteError::Undeletable,
        // Newer Bot API wordings that teloxide does not model yet.
        RequestError::Api(ApiError::Unknown(text)) => {
            let lower = text.to_lowercase();
            if lower.contains("message to delete not found") {
                DeleteError::NotFound
            } else if lower.contains("message can't be deleted") {
                DeleteError::Undeletable
            } else {
                DeleteError::Other(text.clone())
            }
        }
        other => DeleteError::Other(other.to_string()),
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(
        &self,
        chat_id: ChatId,
        html: &str,
        preview: LinkPreview,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
                    .disable_web_page_preview(preview == LinkPreview::Disabled)
            })
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn delete_message(&self, msg: MessageRef) -> std::result::Result<(), DeleteError> {
        self.with_retry(|| {
            self.bot
                .delete_message(Self::tg_chat(msg.chat_id), Self::tg_msg_id(msg.message_id))
        })
        .await
        .map_err(|e| classify_delete_error(&e))?;
        Ok(())
    }
}
