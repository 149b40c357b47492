use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::Serialize;

use jhb_core::store::{ChatActivity, MemberRecord};

/// `chat` fields refreshed on every event. The creation `date` is insert-only
/// and is not part of this document.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatActivityDoc {
    pub chat_id: i64,
    pub chat_username: Option<String>,
    pub active_date: bson::DateTime,
}

impl From<&ChatActivity> for ChatActivityDoc {
    fn from(a: &ChatActivity) -> Self {
        Self {
            chat_id: a.chat_id.0,
            chat_username: a.chat_username.clone(),
            active_date: bson_date(a.at),
        }
    }
}

/// `joined_user` / `left_user` document.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MemberDoc {
    pub chat_id: i64,
    pub user_id: i64,
    pub chat_username: Option<String>,
    pub user_username: Option<String>,
    pub date: bson::DateTime,
}

impl From<&MemberRecord> for MemberDoc {
    fn from(r: &MemberRecord) -> Self {
        Self {
            chat_id: r.chat_id.0,
            user_id: r.user_id.0,
            chat_username: r.chat_username.clone(),
            user_username: r.user_username.clone(),
            date: bson_date(r.date),
        }
    }
}

pub(crate) fn bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}
