use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    errors::DeleteError,
    messaging::types::LinkPreview,
    Result,
};

/// Outbound messenger port.
///
/// Telegram is the only implementation. Deletion returns a classified
/// [`DeleteError`] so handlers never inspect free-text API errors.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(
        &self,
        chat_id: ChatId,
        html: &str,
        preview: LinkPreview,
    ) -> Result<MessageRef>;

    async fn delete_message(&self, msg: MessageRef) -> std::result::Result<(), DeleteError>;
}
