//! MongoDB adapter.
//!
//! Implements the `jhb-core` MembershipStore port over three collections:
//! `chat`, `joined_user` and `left_user`.

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_document, Document},
    options::IndexOptions,
    Client, Collection, IndexModel,
};

pub mod models;

use jhb_core::{
    errors::Error,
    store::{ChatActivity, MemberRecord, MemberStatus, MembershipStore},
    Result,
};

use crate::models::{bson_date, ChatActivityDoc, MemberDoc};

pub struct MongoStore {
    client: Client,
    pub chats: Collection<Document>,
    pub joined_users: Collection<Document>,
    pub left_users: Collection<Document>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(map_err)?;
        let db = client.database(database);

        let store = Self {
            chats: db.collection("chat"),
            joined_users: db.collection(MemberStatus::Joined.collection_name()),
            left_users: db.collection(MemberStatus::Left.collection_name()),
            client,
        };
        store.ensure_indexes().await;

        tracing::info!(database, "connected to MongoDB");
        Ok(store)
    }

    /// Unique keys back the at-most-one-document-per-key invariant.
    async fn ensure_indexes(&self) {
        let unique = || IndexOptions::builder().unique(true).build();

        if let Err(e) = self
            .chats
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1 })
                    .options(unique())
                    .build(),
            )
            .await
        {
            tracing::warn!(collection = "chat", error = %e, "failed to create unique index");
        }

        for status in [MemberStatus::Joined, MemberStatus::Left] {
            if let Err(e) = self
                .members(status)
                .create_index(
                    IndexModel::builder()
                        .keys(doc! { "chat_id": 1, "user_id": 1 })
                        .options(unique())
                        .build(),
                )
                .await
            {
                tracing::warn!(
                    collection = status.collection_name(),
                    error = %e,
                    "failed to create unique index"
                );
            }
        }
    }

    fn members(&self, status: MemberStatus) -> &Collection<Document> {
        match status {
            MemberStatus::Joined => &self.joined_users,
            MemberStatus::Left => &self.left_users,
        }
    }
}

#[async_trait]
impl MembershipStore for MongoStore {
    async fn touch_chat(&self, activity: &ChatActivity) -> Result<()> {
        self.chats
            .update_one(chat_filter(activity), chat_update(activity)?)
            .upsert(true)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn upsert_member(&self, status: MemberStatus, record: &MemberRecord) -> Result<()> {
        self.members(status)
            .update_one(member_filter(record), member_update(record)?)
            .upsert(true)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

fn map_err(e: mongodb::error::Error) -> Error {
    Error::Storage(format!("mongodb error: {e}"))
}

pub(crate) fn chat_filter(activity: &ChatActivity) -> Document {
    doc! { "chat_id": activity.chat_id.0 }
}

/// `date` only on insert; username and activity on every call.
pub(crate) fn chat_update(activity: &ChatActivity) -> Result<Document> {
    let set = to_document(&ChatActivityDoc::from(activity))
        .map_err(|e| Error::Storage(format!("failed to encode chat: {e}")))?;
    Ok(doc! {
        "$set": set,
        "$setOnInsert": {
            "date": bson_date(activity.at),
        },
    })
}

pub(crate) fn member_filter(record: &MemberRecord) -> Document {
    doc! {
        "chat_id": record.chat_id.0,
        "user_id": record.user_id.0,
    }
}

pub(crate) fn member_update(record: &MemberRecord) -> Result<Document> {
    let set = to_document(&MemberDoc::from(record))
        .map_err(|e| Error::Storage(format!("failed to encode member: {e}")))?;
    Ok(doc! { "$set": set })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use jhb_core::domain::{ChatId, UserId};
    use mongodb::bson::Bson;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn chat_update_sets_creation_date_on_insert_only() {
        let activity = ChatActivity {
            chat_id: ChatId(-100123),
            chat_username: Some("grp".to_string()),
            at: at(),
        };

        assert_eq!(chat_filter(&activity), doc! { "chat_id": -100123_i64 });

        let update = chat_update(&activity).unwrap();
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_i64("chat_id").unwrap(), -100123);
        assert_eq!(set.get_str("chat_username").unwrap(), "grp");
        assert_eq!(set.get_datetime("active_date").unwrap(), &bson_date(at()));
        assert!(set.get("date").is_none());

        let on_insert = update.get_document("$setOnInsert").unwrap();
        assert_eq!(on_insert.get_datetime("date").unwrap(), &bson_date(at()));
        assert_eq!(on_insert.len(), 1);
    }

    #[test]
    fn member_update_overwrites_all_fields() {
        let record = MemberRecord {
            chat_id: ChatId(-100123),
            user_id: UserId(42),
            chat_username: None,
            user_username: None,
            date: at(),
        };

        assert_eq!(
            member_filter(&record),
            doc! { "chat_id": -100123_i64, "user_id": 42_i64 }
        );

        let update = member_update(&record).unwrap();
        assert!(update.get("$setOnInsert").is_none());
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_i64("user_id").unwrap(), 42);
        assert_eq!(set.get("user_username"), Some(&Bson::Null));
        assert_eq!(set.get("chat_username"), Some(&Bson::Null));
        assert_eq!(set.get_datetime("date").unwrap(), &bson_date(at()));
    }
}
