//! teloxide types -> core update model.

use teloxide::types::{CallbackQuery as TgCallbackQuery, Message};

use gradebot_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{parse_command, CallbackQuery, ChatKind, Command, IncomingUpdate, TextMessage},
};

/// Staff chat wins over everything; other groups and channels are `Other`.
pub(crate) fn classify_chat(chat_id: i64, is_private: bool, staff_chat: ChatId) -> ChatKind {
    if chat_id == staff_chat.0 {
        ChatKind::Staff
    } else if is_private {
        ChatKind::Private
    } else {
        ChatKind::Other
    }
}

/// Build the core update for a text message.
///
/// Staff-chat text is never parsed as a command so a reply that happens to
/// start with `/` is still relayed.
pub(crate) fn text_update(
    kind: ChatKind,
    chat_id: ChatId,
    sender_id: UserId,
    username: Option<String>,
    text: &str,
    reply_to: Option<MessageId>,
) -> IncomingUpdate {
    if kind != ChatKind::Staff && text.starts_with('/') {
        let (name, args) = parse_command(text);
        return IncomingUpdate::Command(Command {
            chat_id,
            chat_kind: kind,
            user_id: sender_id,
            username,
            name,
            args,
        });
    }

    IncomingUpdate::Text(TextMessage {
        chat_id,
        chat_kind: kind,
        sender_id,
        username,
        text: text.to_string(),
        reply_to,
    })
}

/// `None` for non-text messages and messages without a sender.
pub(crate) fn message_update(msg: &Message, staff_chat: ChatId) -> Option<IncomingUpdate> {
    let text = msg.text()?;
    let user = msg.from()?;

    let chat_id = ChatId(msg.chat.id.0);
    let kind = classify_chat(chat_id.0, msg.chat.is_private(), staff_chat);
    let reply_to = msg.reply_to_message().map(|m| MessageId(m.id.0));

    Some(text_update(
        kind,
        chat_id,
        UserId(user.id.0 as i64),
        user.username.clone(),
        text,
        reply_to,
    ))
}

/// Callbacks without a message (inline mode) fall back to the user's private chat.
pub(crate) fn callback_update(q: &TgCallbackQuery) -> IncomingUpdate {
    let user_id = UserId(q.from.id.0 as i64);
    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    IncomingUpdate::Callback(CallbackQuery {
        chat_id: message.map(|m| m.chat_id).unwrap_or(ChatId(user_id.0)),
        user_id,
        username: q.from.username.clone(),
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
        message,
    })
}
