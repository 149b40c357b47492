use crate::domain::{ChatInfo, Member, MessageRef};

/// Messenger-agnostic incoming update model.
///
/// Only the update shapes the bot reacts to exist here; the Telegram adapter
/// drops everything else before it reaches the core.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    MembersJoined(MembersJoined),
    MemberLeft(MemberLeft),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat: ChatInfo,
    /// Lowercased command name without the leading `/` or `@botname` suffix.
    pub name: String,
}

/// "X joined the group" service message. Telegram may batch several users.
#[derive(Clone, Debug)]
pub struct MembersJoined {
    pub message: MessageRef,
    pub chat: ChatInfo,
    pub users: Vec<Member>,
}

/// "X left the group" service message. Always exactly one user.
#[derive(Clone, Debug)]
pub struct MemberLeft {
    pub message: MessageRef,
    pub chat: ChatInfo,
    pub user: Member,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkPreview {
    Enabled,
    Disabled,
}
