use std::sync::Arc;

use crate::{messaging::port::MessagingPort, store::MembershipStore, Result};

/// Everything a handler needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct BotContext {
    pub messenger: Arc<dyn MessagingPort>,
    pub store: Arc<dyn MembershipStore>,
}

impl BotContext {
    pub fn new(messenger: Arc<dyn MessagingPort>, store: Arc<dyn MembershipStore>) -> Self {
        Self { messenger, store }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.store.close().await
    }
}
