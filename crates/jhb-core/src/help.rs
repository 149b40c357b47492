/// Reply to `/start` and `/help` in private chats (Telegram HTML).
pub const HELP_HTML: &str = r#"<b>Join Hider Bot</b>

This bot removes messages about new user joined or left the chat.

<b>Commands</b>

/help - display this help message

<b>How to Use</b>

- Add bot as ADMIN to the chat group
- Allow bot to delete messages, any other admin permissions are not required

<b>Questions, Feedback</b>

Email: lorien@lorien.name

<b>Open Source</b>

The source code is available at <a href="https://github.com/lorien/joinhider_bot">github.com/lorien/joinhider_bot</a>

<b>My Other Projects</b>

<a href="https://t.me/daysandbox_bot">@daysandbox_bot</a> - bot that fights with spam messages in chat groups
<a href="https://t.me/nosticker_bot">@nosticker_bot</a> - bot to delete stickers posted to group
<a href="https://t.me/coinsignal_robot">@coinsignal_robot</a> - bot to be notified when price of specific coin reaches the level you have set, also you can use this bot just to see price of coins.
<a href="https://t.me/watchdog_robot">@watchdog_robot</a> - bot to delete stickers, file attachments, links, photos, videos and many other types of messages
"#;

/// Commands answered with [`HELP_HTML`].
pub const HELP_COMMANDS: &[&str] = &["start", "help"];
