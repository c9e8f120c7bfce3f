use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::{
    conversation::state::{advance, Reply, Session, Stage, Transition},
    domain::UserId,
};

/// Per-user calculator sessions.
///
/// Every access is a short take/put under the lock; nothing is awaited while
/// the map is held.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the dialogue for `user`.
    pub async fn begin(&self, user: UserId) -> Reply {
        let (session, reply) = Session::start();
        self.inner.lock().await.insert(user, session);
        reply
    }

    /// Feed one input to the user's session. `None` if the user is idle.
    pub async fn apply(&self, user: UserId, input: &str) -> Option<Transition> {
        let mut map = self.inner.lock().await;
        let session = map.remove(&user)?;
        let transition = advance(session, input);
        if let Some(next) = transition.next {
            map.insert(user, next);
        }
        Some(transition)
    }

    /// Drop the user's session. Returns whether one existed.
    pub async fn clear(&self, user: UserId) -> bool {
        self.inner.lock().await.remove(&user).is_some()
    }

    pub async fn stage(&self, user: UserId) -> Stage {
        self.inner
            .lock()
            .await
            .get(&user)
            .map(Session::stage)
            .unwrap_or(Stage::Idle)
    }

    pub async fn get(&self, user: UserId) -> Option<Session> {
        self.inner.lock().await.get(&user).copied()
    }
}
