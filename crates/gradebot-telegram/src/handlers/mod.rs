//! Telegram update handlers.
//!
//! Each handler converts the teloxide update into the core model and hands it
//! to `GradeBot`. Failures are logged inside the core; handlers always
//! return `Ok(())` so the dispatcher never sees an error.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};
use tracing::debug;

use crate::router::AppState;

mod convert;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(update) = convert::message_update(&msg, state.staff_chat) else {
        return Ok(());
    };

    let route = state.core.handle(update).await;
    debug!(chat_id = msg.chat.id.0, ?route, "message handled");
    Ok(())
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let route = state.core.handle(convert::callback_update(&q)).await;
    debug!(user_id = q.from.id.0, ?route, "callback handled");
    Ok(())
}
