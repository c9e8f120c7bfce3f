//! Bug-report bridge between private chats and the staff chat.
//!
//! A report is posted into the staff chat and remembered by the id of that
//! post. The first staff reply to the post is sent back to the reporter and
//! the entry is dropped.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::{port::MessagingPort, types::TextMessage},
    texts, Result,
};

/// Reports waiting for a staff reply, keyed by the staff-chat message id.
#[derive(Default)]
pub struct PendingReports {
    inner: Mutex<HashMap<MessageId, ChatId>>,
}

impl PendingReports {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, group_message: MessageId, origin: ChatId) {
        self.inner.lock().await.insert(group_message, origin);
    }

    /// Remove and return the origin chat. Only one caller can ever win.
    pub async fn take(&self, group_message: MessageId) -> Option<ChatId> {
        self.inner.lock().await.remove(&group_message)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    OtherChat,
    OwnMessage,
    NotAReply,
    Untracked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    Relayed { origin: ChatId },
    Ignored(IgnoreReason),
    /// The entry was consumed but the reporter could not be reached.
    DeliveryFailed { origin: ChatId },
}

pub struct ReplyCorrelator {
    staff_chat: ChatId,
    bot_id: UserId,
    pending: PendingReports,
    messenger: Arc<dyn MessagingPort>,
}

impl ReplyCorrelator {
    /// `bot_id` must be resolved before the first event is served.
    pub fn new(staff_chat: ChatId, bot_id: UserId, messenger: Arc<dyn MessagingPort>) -> Self {
        Self {
            staff_chat,
            bot_id,
            pending: PendingReports::new(),
            messenger,
        }
    }

    pub fn staff_chat(&self) -> ChatId {
        self.staff_chat
    }

    pub fn pending(&self) -> &PendingReports {
        &self.pending
    }

    /// Post a report into the staff chat and start tracking it.
    ///
    /// Nothing is registered if the post fails.
    pub async fn forward_report(
        &self,
        reporter: UserId,
        username: Option<&str>,
        origin: ChatId,
        text: &str,
    ) -> Result<MessageRef> {
        let body = texts::bug_report(username, reporter.0, text);
        let posted = self.messenger.send_text(self.staff_chat, &body).await?;
        self.pending.register(posted.message_id, origin).await;
        info!(
            user_id = reporter.0,
            group_message_id = posted.message_id.0,
            "bug report forwarded to staff chat"
        );
        Ok(posted)
    }

    /// Handle a text message from the staff chat.
    pub async fn handle_staff_message(&self, msg: &TextMessage) -> RelayOutcome {
        if msg.chat_id != self.staff_chat {
            return RelayOutcome::Ignored(IgnoreReason::OtherChat);
        }
        if msg.sender_id == self.bot_id {
            return RelayOutcome::Ignored(IgnoreReason::OwnMessage);
        }
        let Some(replied_to) = msg.reply_to else {
            return RelayOutcome::Ignored(IgnoreReason::NotAReply);
        };
        let Some(origin) = self.pending.take(replied_to).await else {
            debug!(message_id = replied_to.0, "reply to untracked message");
            return RelayOutcome::Ignored(IgnoreReason::Untracked);
        };

        match self
            .messenger
            .send_text(origin, &texts::developer_reply(&msg.text))
            .await
        {
            Ok(_) => {
                info!(
                    origin_chat = origin.0,
                    staff_user = msg.sender_id.0,
                    "developer reply relayed"
                );
                RelayOutcome::Relayed { origin }
            }
            Err(e) => {
                warn!(origin_chat = origin.0, error = %e, "failed to relay developer reply");
                RelayOutcome::DeliveryFailed { origin }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{testing::FakeMessenger, types::ChatKind};

    const STAFF: ChatId = ChatId(-100_123);
    const BOT: UserId = UserId(999);

    fn correlator() -> (Arc<FakeMessenger>, Arc<ReplyCorrelator>) {
        let fake = Arc::new(FakeMessenger::new());
        let c = ReplyCorrelator::new(STAFF, BOT, fake.clone());
        (fake, Arc::new(c))
    }

    fn staff_reply(sender: UserId, reply_to: Option<MessageId>, text: &str) -> TextMessage {
        TextMessage {
            chat_id: STAFF,
            chat_kind: ChatKind::Staff,
            sender_id: sender,
            username: Some("dev".to_string()),
            text: text.to_string(),
            reply_to,
        }
    }

    #[tokio::test]
    async fn forwards_report_and_relays_first_reply_once() {
        let (fake, c) = correlator();
        let posted = c
            .forward_report(UserId(42), Some("student"), ChatId(42), "button does nothing")
            .await
            .unwrap();
        assert_eq!(posted.chat_id, STAFF);
        assert_eq!(
            fake.sends_to(STAFF),
            vec!["🐞 Баг-репорт от @student (id 42):\nbutton does nothing".to_string()]
        );

        let reply = staff_reply(UserId(7), Some(posted.message_id), "fixed, thanks");
        assert_eq!(
            c.handle_staff_message(&reply).await,
            RelayOutcome::Relayed { origin: ChatId(42) }
        );
        assert_eq!(
            fake.sends_to(ChatId(42)),
            vec!["Ответ от разработчиков: fixed, thanks".to_string()]
        );

        assert_eq!(
            c.handle_staff_message(&reply).await,
            RelayOutcome::Ignored(IgnoreReason::Untracked)
        );
        assert_eq!(fake.sends_to(ChatId(42)).len(), 1);
        assert!(c.pending().is_empty().await);
    }

    #[tokio::test]
    async fn own_replies_are_never_relayed() {
        let (fake, c) = correlator();
        let posted = c
            .forward_report(UserId(1), None, ChatId(1), "crash")
            .await
            .unwrap();

        let own = staff_reply(BOT, Some(posted.message_id), "echo");
        assert_eq!(
            c.handle_staff_message(&own).await,
            RelayOutcome::Ignored(IgnoreReason::OwnMessage)
        );
        assert!(fake.sends_to(ChatId(1)).is_empty());
        assert_eq!(c.pending().len().await, 1);
    }

    #[tokio::test]
    async fn plain_messages_and_other_chats_are_ignored() {
        let (fake, c) = correlator();
        let posted = c
            .forward_report(UserId(1), None, ChatId(1), "crash")
            .await
            .unwrap();

        let chatter = staff_reply(UserId(7), None, "anyone seen this?");
        assert_eq!(
            c.handle_staff_message(&chatter).await,
            RelayOutcome::Ignored(IgnoreReason::NotAReply)
        );

        let mut elsewhere = staff_reply(UserId(7), Some(posted.message_id), "hi");
        elsewhere.chat_id = ChatId(-5);
        assert_eq!(
            c.handle_staff_message(&elsewhere).await,
            RelayOutcome::Ignored(IgnoreReason::OtherChat)
        );

        let untracked = staff_reply(UserId(7), Some(MessageId(1)), "hi");
        assert_eq!(
            c.handle_staff_message(&untracked).await,
            RelayOutcome::Ignored(IgnoreReason::Untracked)
        );

        assert!(fake.sends_to(ChatId(1)).is_empty());
        assert_eq!(c.pending().len().await, 1);
    }

    #[tokio::test]
    async fn failed_relay_consumes_entry_and_stays_out_of_staff_chat() {
        let (fake, c) = correlator();
        let posted = c
            .forward_report(UserId(9), None, ChatId(9), "crash")
            .await
            .unwrap();
        fake.make_unreachable(ChatId(9));

        let reply = staff_reply(UserId(7), Some(posted.message_id), "fixed");
        assert_eq!(
            c.handle_staff_message(&reply).await,
            RelayOutcome::DeliveryFailed { origin: ChatId(9) }
        );
        assert!(c.pending().is_empty().await);
        assert_eq!(fake.sends_to(STAFF).len(), 1);
    }

    #[tokio::test]
    async fn failed_forward_registers_nothing() {
        let (fake, c) = correlator();
        fake.make_unreachable(STAFF);
        assert!(c
            .forward_report(UserId(9), None, ChatId(9), "crash")
            .await
            .is_err());
        assert!(c.pending().is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_replies_relay_exactly_once() {
        let (fake, c) = correlator();
        let posted = c
            .forward_report(UserId(3), None, ChatId(3), "crash")
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for staff in 10..18 {
            let c = c.clone();
            let reply = staff_reply(UserId(staff), Some(posted.message_id), "on it");
            tasks.push(tokio::spawn(async move { c.handle_staff_message(&reply).await }));
        }

        let mut relayed = 0;
        for t in tasks {
            if let RelayOutcome::Relayed { .. } = t.await.unwrap() {
                relayed += 1;
            }
        }
        assert_eq!(relayed, 1);
        assert_eq!(fake.sends_to(ChatId(3)).len(), 1);
    }
}
