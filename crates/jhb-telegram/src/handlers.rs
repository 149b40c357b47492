//! Telegram message → core update translation.

use std::sync::Arc;

use teloxide::types::{Message, User};

use jhb_core::{
    dispatch::{dispatch, parse_command},
    domain::{ChatId, ChatInfo, ChatKind, Member, MessageId, MessageRef, UserId},
    messaging::types::{Command, IncomingUpdate, MemberLeft, MembersJoined},
    Result,
};

use crate::router::AppState;

/// Entry point shared by the polling dispatcher and the webhook route.
pub async fn handle_message(msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(update) = classify(&msg) else {
        return Ok(());
    };

    let _guard = state.chat_locks.lock_chat(msg.chat.id.0).await;
    dispatch(&state.ctx, update).await
}

/// Map a Telegram message onto the updates the bot reacts to; `None` for the rest.
pub fn classify(msg: &Message) -> Option<IncomingUpdate> {
    let chat = chat_info(msg);

    if let Some(users) = msg.new_chat_members() {
        return Some(IncomingUpdate::MembersJoined(MembersJoined {
            message: message_ref(msg),
            chat,
            users: users.iter().map(member).collect(),
        }));
    }

    if let Some(user) = msg.left_chat_member() {
        return Some(IncomingUpdate::MemberLeft(MemberLeft {
            message: message_ref(msg),
            chat,
            user: member(user),
        }));
    }

    let name = parse_command(msg.text()?)?;
    Some(IncomingUpdate::Command(Command { chat, name }))
}

fn chat_info(msg: &Message) -> ChatInfo {
    ChatInfo {
        id: ChatId(msg.chat.id.0),
        username: msg.chat.username().map(str::to_string),
        kind: if msg.chat.is_private() {
            ChatKind::Private
        } else {
            ChatKind::Group
        },
    }
}

fn message_ref(msg: &Message) -> MessageRef {
    MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    }
}

fn member(user: &User) -> Member {
    Member {
        id: UserId(user.id.0 as i64),
        username: user.username.clone(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    pub(crate) fn join_message_json() -> serde_json::Value {
        json!({
            "message_id": 77,
            "date": 1700000000,
            "chat": {"id": -100123, "type": "supergroup", "title": "Group", "username": "somegroup"},
            "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
            "new_chat_members": [
                {"id": 42, "is_bot": false, "first_name": "Ann"},
                {"id": 43, "is_bot": false, "first_name": "Bo", "username": "bo"}
            ]
        })
    }

    fn parse(value: serde_json::Value) -> Message {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn classifies_joins() {
        let Some(IncomingUpdate::MembersJoined(ev)) = classify(&parse(join_message_json())) else {
            panic!("expected a join");
        };
        assert_eq!(ev.message.message_id, MessageId(77));
        assert_eq!(ev.chat.id, ChatId(-100123));
        assert_eq!(ev.chat.kind, ChatKind::Group);
        assert_eq!(ev.chat.username.as_deref(), Some("somegroup"));
        assert_eq!(ev.users.len(), 2);
        assert_eq!(ev.users[0].display_name(), "#42");
        assert_eq!(ev.users[1].display_name(), "bo");
    }

    #[test]
    fn classifies_leaves() {
        let msg = parse(json!({
            "message_id": 78,
            "date": 1700000000,
            "chat": {"id": -100123, "type": "supergroup", "title": "Group"},
            "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
            "left_chat_member": {"id": 42, "is_bot": false, "first_name": "Ann"}
        }));
        let Some(IncomingUpdate::MemberLeft(ev)) = classify(&msg) else {
            panic!("expected a leave");
        };
        assert_eq!(ev.user.id, UserId(42));
        assert_eq!(ev.chat.username, None);
    }

    #[test]
    fn classifies_private_help_and_ignores_plain_text() {
        let help = parse(json!({
            "message_id": 1,
            "date": 1700000000,
            "chat": {"id": 5, "type": "private", "first_name": "Ann"},
            "from": {"id": 5, "is_bot": false, "first_name": "Ann"},
            "text": "/help"
        }));
        let Some(IncomingUpdate::Command(cmd)) = classify(&help) else {
            panic!("expected a command");
        };
        assert_eq!(cmd.name, "help");
        assert!(cmd.chat.is_private());

        let chatter = parse(json!({
            "message_id": 2,
            "date": 1700000000,
            "chat": {"id": -100123, "type": "supergroup", "title": "Group"},
            "from": {"id": 5, "is_bot": false, "first_name": "Ann"},
            "text": "hello there"
        }));
        assert!(classify(&chatter).is_none());
    }
}
