//! The handler set: help reply, join cleanup, leave cleanup.

use chrono::Utc;

use crate::{
    context::BotContext,
    domain::{ChatInfo, Member, MessageRef},
    help::HELP_HTML,
    messaging::types::{Command, LinkPreview, MemberLeft, MembersJoined},
    store::{ChatActivity, MemberRecord, MemberStatus},
    Result,
};

/// `/start` and `/help`: answer in private chats only.
pub async fn handle_start_help(ctx: &BotContext, cmd: &Command) -> Result<()> {
    if !cmd.chat.is_private() {
        return Ok(());
    }
    ctx.messenger
        .send_html(cmd.chat.id, HELP_HTML, LinkPreview::Disabled)
        .await?;
    Ok(())
}

pub async fn handle_new_members(ctx: &BotContext, ev: &MembersJoined) -> Result<()> {
    delete_notification(ctx, ev.message).await?;
    for user in &ev.users {
        record_membership(ctx, &ev.chat, user, MemberStatus::Joined).await?;
        tracing::debug!(
            "Removed join message for user {} at chat {}",
            user.display_name(),
            ev.chat.id.0
        );
    }
    Ok(())
}

pub async fn handle_left_member(ctx: &BotContext, ev: &MemberLeft) -> Result<()> {
    delete_notification(ctx, ev.message).await?;
    record_membership(ctx, &ev.chat, &ev.user, MemberStatus::Left).await?;
    tracing::debug!(
        "Removed left message for user {} at chat {}",
        ev.user.display_name(),
        ev.chat.id.0
    );
    Ok(())
}

/// Delete the service message. Not-found / undeletable is logged and ignored.
async fn delete_notification(ctx: &BotContext, msg: MessageRef) -> Result<()> {
    match ctx.messenger.delete_message(msg).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_recoverable() => {
            tracing::error!(
                chat_id = msg.chat_id.0,
                message_id = msg.message_id.0,
                "Failed to delete msg: {e}"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Chat first, then the user record. The two writes are independent upserts.
async fn record_membership(
    ctx: &BotContext,
    chat: &ChatInfo,
    user: &Member,
    status: MemberStatus,
) -> Result<()> {
    ctx.store
        .touch_chat(&ChatActivity {
            chat_id: chat.id,
            chat_username: chat.username.clone(),
            at: Utc::now(),
        })
        .await?;
    ctx.store
        .upsert_member(
            status,
            &MemberRecord {
                chat_id: chat.id,
                user_id: user.id,
                chat_username: chat.username.clone(),
                user_username: user.username.clone(),
                date: Utc::now(),
            },
        )
        .await
}
