use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    conversation::{
        state::{Reply, Stage},
        store::SessionStore,
    },
    domain::{ChatId, UserId},
    messaging::port::MessagingPort,
};

/// What happened to one calculator input.
#[derive(Clone, Debug, PartialEq)]
pub enum Handled {
    /// The user has no active session; nothing was sent.
    Ignored,
    Replied(Reply),
    /// The reply could not be delivered. State already advanced.
    DeliveryFailed(Reply),
}

/// Drives the grade calculator for private chats.
pub struct CalculatorEngine {
    sessions: SessionStore,
    messenger: Arc<dyn MessagingPort>,
}

impl CalculatorEngine {
    pub fn new(messenger: Arc<dyn MessagingPort>) -> Self {
        Self {
            sessions: SessionStore::new(),
            messenger,
        }
    }

    /// "Enter midterm" action: (re)start the dialogue and prompt for the midterm.
    pub async fn start(&self, user: UserId, chat: ChatId) -> Handled {
        let reply = self.sessions.begin(user).await;
        debug!(user_id = user.0, "calculator started");
        self.deliver(chat, reply).await
    }

    /// Private, non-command text. Idle users are ignored.
    pub async fn handle_text(&self, user: UserId, chat: ChatId, text: &str) -> Handled {
        let Some(transition) = self.sessions.apply(user, text).await else {
            return Handled::Ignored;
        };
        debug!(
            user_id = user.0,
            stage = ?transition.next.map(|s| s.stage()).unwrap_or(Stage::Idle),
            retry = transition.reply.is_retry(),
            "calculator input"
        );
        self.deliver(chat, transition.reply).await
    }

    /// Drop the user's session without replying.
    pub async fn reset(&self, user: UserId) -> bool {
        self.sessions.clear(user).await
    }

    pub async fn stage(&self, user: UserId) -> Stage {
        self.sessions.stage(user).await
    }

    async fn deliver(&self, chat: ChatId, reply: Reply) -> Handled {
        match self.messenger.send_text(chat, &reply.render()).await {
            Ok(_) => Handled::Replied(reply),
            Err(e) => {
                warn!(chat_id = chat.0, error = %e, "failed to send calculator reply");
                Handled::DeliveryFailed(reply)
            }
        }
    }
}
