//! Routes classified updates to the calculator, the relay, or a command.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    audit::{AuditEvent, AuditLogger},
    conversation::{CalculatorEngine, Handled},
    domain::{ChatId, UserId},
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, ChatKind, Command, IncomingUpdate, InlineKeyboard, TextMessage},
    },
    relay::{RelayOutcome, ReplyCorrelator},
    texts,
};

/// Callback data of the "enter midterm" inline button.
pub const CALLBACK_ENTER_MIDTERM: &str = "enter_register_midterm";

/// Which path an update took.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Calculator(Handled),
    Relay(RelayOutcome),
    Command(String),
    Callback,
    Ignored,
}

pub struct GradeBot {
    calculator: CalculatorEngine,
    relay: ReplyCorrelator,
    messenger: Arc<dyn MessagingPort>,
    audit: Arc<AuditLogger>,
}

impl GradeBot {
    /// `bot_id` is the bot's own user id, resolved once at startup.
    pub fn new(
        staff_chat: ChatId,
        bot_id: UserId,
        messenger: Arc<dyn MessagingPort>,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            calculator: CalculatorEngine::new(messenger.clone()),
            relay: ReplyCorrelator::new(staff_chat, bot_id, messenger.clone()),
            messenger,
            audit,
        }
    }

    pub fn calculator(&self) -> &CalculatorEngine {
        &self.calculator
    }

    pub fn relay(&self) -> &ReplyCorrelator {
        &self.relay
    }

    /// Never fails: every branch ends in a reply or a deliberate no-op.
    pub async fn handle(&self, update: IncomingUpdate) -> Route {
        match update {
            IncomingUpdate::Command(cmd) if cmd.chat_kind == ChatKind::Private => {
                self.handle_command(cmd).await
            }
            IncomingUpdate::Command(cmd) => {
                debug!(chat_id = cmd.chat_id.0, command = %cmd.name, "command outside private chat");
                Route::Ignored
            }
            IncomingUpdate::Text(msg) => match msg.chat_kind {
                ChatKind::Private => self.handle_private_text(msg).await,
                ChatKind::Staff => self.handle_staff_text(msg).await,
                ChatKind::Other => Route::Ignored,
            },
            IncomingUpdate::Callback(q) => self.handle_callback(q).await,
        }
    }

    async fn handle_command(&self, cmd: Command) -> Route {
        match cmd.name.as_str() {
            "start" => {
                self.calculator.reset(cmd.user_id).await;
                info!(user_id = cmd.user_id.0, "user started the bot");
                self.audit
                    .record(AuditEvent::start(cmd.user_id.0, cmd.username.as_deref()));
                if let Err(e) = self
                    .messenger
                    .send_inline_keyboard(
                        cmd.chat_id,
                        texts::GREETING,
                        InlineKeyboard::single(texts::ENTER_MIDTERM_BUTTON, CALLBACK_ENTER_MIDTERM),
                    )
                    .await
                {
                    warn!(chat_id = cmd.chat_id.0, error = %e, "failed to send greeting");
                }
            }
            "cancel" => {
                let text = if self.calculator.reset(cmd.user_id).await {
                    texts::CANCELLED
                } else {
                    texts::NOTHING_TO_CANCEL
                };
                self.notify(cmd.chat_id, text).await;
            }
            "help" => self.notify(cmd.chat_id, texts::HELP).await,
            "bug" => self.handle_bug(&cmd).await,
            other => {
                debug!(command = other, "unknown command");
                self.notify(cmd.chat_id, texts::UNKNOWN_COMMAND).await;
            }
        }
        Route::Command(cmd.name)
    }

    async fn handle_bug(&self, cmd: &Command) {
        if cmd.args.trim().is_empty() {
            self.notify(cmd.chat_id, texts::BUG_USAGE).await;
            return;
        }

        match self
            .relay
            .forward_report(cmd.user_id, cmd.username.as_deref(), cmd.chat_id, &cmd.args)
            .await
        {
            Ok(posted) => {
                self.audit.record(AuditEvent::bug_report(
                    cmd.user_id.0,
                    cmd.username.as_deref(),
                    posted.message_id.0,
                    &cmd.args,
                ));
                self.notify(cmd.chat_id, texts::BUG_ACCEPTED).await;
            }
            Err(e) => {
                warn!(user_id = cmd.user_id.0, error = %e, "failed to forward bug report");
                self.notify(cmd.chat_id, texts::BUG_NOT_DELIVERED).await;
            }
        }
    }

    async fn handle_private_text(&self, msg: TextMessage) -> Route {
        let handled = self
            .calculator
            .handle_text(msg.sender_id, msg.chat_id, &msg.text)
            .await;

        if let Handled::Replied(reply) | Handled::DeliveryFailed(reply) = &handled {
            if let Some(outcome) = reply.outcome() {
                self.audit.record(AuditEvent::calc_result(
                    msg.sender_id.0,
                    msg.username.as_deref(),
                    outcome,
                ));
            }
        }
        Route::Calculator(handled)
    }

    async fn handle_staff_text(&self, msg: TextMessage) -> Route {
        let outcome = self.relay.handle_staff_message(&msg).await;
        match outcome {
            RelayOutcome::Relayed { origin } => {
                self.audit
                    .record(AuditEvent::relay(msg.sender_id.0, origin.0, &msg.text));
            }
            RelayOutcome::DeliveryFailed { origin } => {
                self.audit.record(AuditEvent::relay_failed(
                    msg.sender_id.0,
                    origin.0,
                    "requester unreachable",
                ));
            }
            RelayOutcome::Ignored(_) => {}
        }
        Route::Relay(outcome)
    }

    async fn handle_callback(&self, q: CallbackQuery) -> Route {
        if let Err(e) = self
            .messenger
            .answer_callback_query(&q.callback_id, None)
            .await
        {
            warn!(error = %e, "failed to answer callback query");
        }

        if q.data != CALLBACK_ENTER_MIDTERM {
            debug!(data = %q.data, "unknown callback data");
            return Route::Ignored;
        }

        self.calculator.start(q.user_id, q.chat_id).await;
        Route::Callback
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text).await {
            warn!(chat_id = chat_id.0, error = %e, "failed to send message");
        }
    }
}
