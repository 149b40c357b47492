//! Persistence port for membership bookkeeping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{ChatId, UserId},
    Result,
};

/// Which per-user collection a membership event lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberStatus {
    Joined,
    Left,
}

impl MemberStatus {
    pub fn collection_name(self) -> &'static str {
        match self {
            MemberStatus::Joined => "joined_user",
            MemberStatus::Left => "left_user",
        }
    }
}

/// Chat activity to record: refreshes `chat_username` + `active_date`,
/// sets `date` only when the chat document is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatActivity {
    pub chat_id: ChatId,
    pub chat_username: Option<String>,
    pub at: DateTime<Utc>,
}

/// Latest join or leave of one user in one chat. Keyed by `(chat_id, user_id)`;
/// every other field is overwritten on each upsert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRecord {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub chat_username: Option<String>,
    pub user_username: Option<String>,
    pub date: DateTime<Utc>,
}

/// Document-store port.
///
/// Every write is an upsert on a unique key, so replaying the same event
/// converges to the same state.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn touch_chat(&self, activity: &ChatActivity) -> Result<()>;

    async fn upsert_member(&self, status: MemberStatus, record: &MemberRecord) -> Result<()>;

    /// Release the underlying connection pool.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
