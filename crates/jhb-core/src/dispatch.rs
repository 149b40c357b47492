//! Routes incoming updates to the handler set.

use crate::{
    context::BotContext,
    handlers,
    help::HELP_COMMANDS,
    messaging::types::IncomingUpdate,
    Result,
};

/// Lowercased command name of `/cmd@botname ...`; anything after it is dropped.
pub fn parse_command(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();
    if cmd.is_empty() {
        return None;
    }

    Some(cmd)
}

/// Unknown commands are ignored, same as any update type without a handler.
pub async fn dispatch(ctx: &BotContext, update: IncomingUpdate) -> Result<()> {
    match update {
        IncomingUpdate::Command(cmd) if HELP_COMMANDS.contains(&cmd.name.as_str()) => {
            handlers::handle_start_help(ctx, &cmd).await
        }
        IncomingUpdate::Command(_) => Ok(()),
        IncomingUpdate::MembersJoined(ev) => handlers::handle_new_members(ctx, &ev).await,
        IncomingUpdate::MemberLeft(ev) => handlers::handle_left_member(ctx, &ev).await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        domain::{ChatId, ChatInfo, ChatKind, Member, MessageId, MessageRef, UserId},
        messaging::types::{Command, MemberLeft},
        store::MemberStatus,
        testing::{FakeMessenger, MemoryStore},
    };

    #[test]
    fn parses_commands_with_bot_suffix() {
        assert_eq!(parse_command("/help@joinhider_bot"), Some("help".to_string()));
        assert_eq!(parse_command("  /START   now please "), Some("start".to_string()));
        assert_eq!(parse_command("help"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/@bot"), None);
    }

    fn private_command(name: &str) -> IncomingUpdate {
        IncomingUpdate::Command(Command {
            chat: ChatInfo {
                id: ChatId(10),
                username: None,
                kind: ChatKind::Private,
            },
            name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn start_and_help_reach_help_handler() {
        let messenger = Arc::new(FakeMessenger::default());
        let ctx = BotContext::new(messenger.clone(), Arc::new(MemoryStore::default()));

        dispatch(&ctx, private_command("start")).await.unwrap();
        dispatch(&ctx, private_command("help")).await.unwrap();

        assert_eq!(messenger.sent().len(), 2);
    }

    #[tokio::test]
    async fn other_commands_are_ignored() {
        let messenger = Arc::new(FakeMessenger::default());
        let store = Arc::new(MemoryStore::default());
        let ctx = BotContext::new(messenger.clone(), store.clone());

        dispatch(&ctx, private_command("settings")).await.unwrap();

        assert!(messenger.sent().is_empty());
        assert!(messenger.deleted().is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn left_member_reaches_left_handler() {
        let messenger = Arc::new(FakeMessenger::default());
        let store = Arc::new(MemoryStore::default());
        let ctx = BotContext::new(messenger.clone(), store.clone());

        dispatch(
            &ctx,
            IncomingUpdate::MemberLeft(MemberLeft {
                message: MessageRef {
                    chat_id: ChatId(-3),
                    message_id: MessageId(2),
                },
                chat: ChatInfo {
                    id: ChatId(-3),
                    username: None,
                    kind: ChatKind::Group,
                },
                user: Member {
                    id: UserId(4),
                    username: None,
                },
            }),
        )
        .await
        .unwrap();

        assert_eq!(messenger.deleted().len(), 1);
        assert!(store
            .member(MemberStatus::Left, ChatId(-3), UserId(4))
            .is_some());
    }
}
