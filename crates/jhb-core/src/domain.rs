/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric, negative for groups).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    /// One-to-one conversation with the bot.
    Private,
    /// Group, supergroup or channel.
    Group,
}

/// The chat an update arrived in, as far as the handlers care.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: ChatId,
    pub username: Option<String>,
    pub kind: ChatKind,
}

impl ChatInfo {
    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}

/// A user that joined or left a chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: UserId,
    pub username: Option<String>,
}

impl Member {
    /// Username if the user has one, otherwise `#<id>`.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) => name.clone(),
            None => format!("#{}", self.id.0),
        }
    }
}
