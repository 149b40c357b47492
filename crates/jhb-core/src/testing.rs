//! In-process fakes for the messaging and storage ports.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{ChatId, MessageRef, UserId},
    errors::{DeleteError, Error},
    messaging::{port::MessagingPort, types::LinkPreview},
    store::{ChatActivity, MemberRecord, MemberStatus, MembershipStore},
    Result,
};

#[derive(Default)]
pub struct FakeMessenger {
    sent: Mutex<Vec<(ChatId, String, LinkPreview)>>,
    deleted: Mutex<Vec<MessageRef>>,
    delete_error: Option<DeleteError>,
}

impl FakeMessenger {
    pub fn failing_delete(err: DeleteError) -> Self {
        Self {
            delete_error: Some(err),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String, LinkPreview)> {
        self.sent.lock().unwrap().clone()
    }

    /// Every delete attempt, successful or not.
    pub fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(
        &self,
        chat_id: ChatId,
        html: &str,
        preview: LinkPreview,
    ) -> Result<MessageRef> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((chat_id, html.to_string(), preview));
        Ok(MessageRef {
            chat_id,
            message_id: crate::domain::MessageId(sent.len() as i32),
        })
    }

    async fn delete_message(&self, msg: MessageRef) -> std::result::Result<(), DeleteError> {
        self.deleted.lock().unwrap().push(msg);
        match &self.delete_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRecord {
    pub chat_id: ChatId,
    pub chat_username: Option<String>,
    pub date: DateTime<Utc>,
    pub active_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCall {
    Chat(ChatId),
    Member(MemberStatus, ChatId, UserId),
}

/// Store honouring `$set` / `$setOnInsert` semantics on the same keys as MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    chats: Mutex<HashMap<ChatId, ChatRecord>>,
    members: Mutex<HashMap<(MemberStatus, ChatId, UserId), MemberRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chats(&self) -> Vec<ChatRecord> {
        self.chats.lock().unwrap().values().cloned().collect()
    }

    pub fn chat(&self, chat_id: ChatId) -> Option<ChatRecord> {
        self.chats.lock().unwrap().get(&chat_id).cloned()
    }

    pub fn members(&self, status: MemberStatus) -> Vec<MemberRecord> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .filter(|((s, _, _), _)| *s == status)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn member(
        &self,
        status: MemberStatus,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Option<MemberRecord> {
        self.members
            .lock()
            .unwrap()
            .get(&(status, chat_id, user_id))
            .cloned()
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn touch_chat(&self, activity: &ChatActivity) -> Result<()> {
        if self.fail {
            return Err(Error::Storage("connection refused".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Chat(activity.chat_id));

        let mut chats = self.chats.lock().unwrap();
        let rec = chats.entry(activity.chat_id).or_insert_with(|| ChatRecord {
            chat_id: activity.chat_id,
            chat_username: None,
            date: activity.at,
            active_date: activity.at,
        });
        rec.chat_username = activity.chat_username.clone();
        rec.active_date = activity.at;
        Ok(())
    }

    async fn upsert_member(&self, status: MemberStatus, record: &MemberRecord) -> Result<()> {
        if self.fail {
            return Err(Error::Storage("connection refused".to_string()));
        }
        self.calls.lock().unwrap().push(StoreCall::Member(
            status,
            record.chat_id,
            record.user_id,
        ));
        self.members
            .lock()
            .unwrap()
            .insert((status, record.chat_id, record.user_id), record.clone());
        Ok(())
    }
}
