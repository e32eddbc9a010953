//! Deferred assistant replies
//!
//! The assistant answers after a fixed delay. Each pending answer runs as a
//! tokio task guarded by a [`CancellationToken`], so navigating away before
//! the delay elapses discards the reply instead of writing it into a
//! session the user has left.

use super::{ChatMessage, ChatStore};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to an assistant reply that has not been written yet
#[derive(Debug)]
pub struct PendingReply {
    session_id: String,
    token: CancellationToken,
    handle: JoinHandle<Option<ChatMessage>>,
}

impl PendingReply {
    /// Schedule `content` to be appended to `session_id` after `delay`
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(
        store: ChatStore,
        session_id: impl Into<String>,
        content: impl Into<String>,
        delay: Duration,
    ) -> Self {
        let session_id = session_id.into();
        let content = content.into();
        let token = CancellationToken::new();

        let task_token = token.clone();
        let task_session = session_id.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = task_token.cancelled() => {
                    tracing::debug!("Assistant reply for {} cancelled", task_session);
                    None
                }

                _ = tokio::time::sleep(delay) => {
                    let message = ChatMessage::assistant(content);
                    match store.append_message(&task_session, message.clone()) {
                        Ok(Some(_)) => Some(message),
                        Ok(None) => {
                            tracing::debug!(
                                "Chat {} disappeared before the assistant replied",
                                task_session
                            );
                            None
                        }
                        Err(e) => {
                            tracing::warn!("Failed to store assistant reply: {}", e);
                            None
                        }
                    }
                }
            }
        });

        Self {
            session_id,
            token,
            handle,
        }
    }

    /// Session the reply belongs to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Discard the reply if it has not been written yet
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the reply task has finished (written or cancelled)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the reply; `None` if it was cancelled or could not be stored
    pub async fn wait(self) -> Option<ChatMessage> {
        match self.handle.await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Assistant reply task failed: {}", e);
                None
            }
        }
    }

    /// Wait for the reply unless `interrupt` completes first
    ///
    /// An interrupted reply is cancelled and never written.
    pub async fn wait_until<F>(self, interrupt: F) -> Option<ChatMessage>
    where
        F: Future<Output = ()>,
    {
        let token = self.token.clone();
        tokio::select! {
            reply = self.wait() => reply,
            _ = interrupt => {
                token.cancel();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatSession, Sender};
    use crate::storage::Storage;

    fn seeded_store() -> (ChatStore, ChatSession) {
        let store = ChatStore::new(Storage::in_memory(), "ana");
        let session = ChatSession::start("Hello", 50, None, None);
        store.save(&session).unwrap();
        (store, session)
    }

    #[tokio::test]
    async fn test_reply_is_appended_after_delay() {
        let (store, session) = seeded_store();
        let pending = PendingReply::schedule(
            store.clone(),
            &session.id,
            "Happy to help",
            Duration::from_millis(10),
        );
        assert_eq!(pending.session_id(), session.id);

        let reply = pending.wait().await.expect("reply written");
        assert_eq!(reply.sender, Sender::Assistant);

        let stored = store.get(&session.id).unwrap().unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert_eq!(stored.last_message, "Happy to help");
    }

    #[tokio::test]
    async fn test_cancelled_reply_writes_nothing() {
        let (store, session) = seeded_store();
        let pending = PendingReply::schedule(
            store.clone(),
            &session.id,
            "too late",
            Duration::from_secs(30),
        );
        pending.cancel();

        assert!(pending.wait().await.is_none());
        assert_eq!(store.get(&session.id).unwrap().unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_interrupted_wait_cancels_reply() {
        let (store, session) = seeded_store();
        let pending = PendingReply::schedule(
            store.clone(),
            &session.id,
            "never shown",
            Duration::from_millis(200),
        );

        assert!(pending.wait_until(std::future::ready(())).await.is_none());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.get(&session.id).unwrap().unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_uninterrupted_wait_returns_reply() {
        let (store, session) = seeded_store();
        let pending =
            PendingReply::schedule(store, &session.id, "done", Duration::from_millis(10));
        let reply = pending.wait_until(std::future::pending()).await;
        assert_eq!(reply.unwrap().content, "done");
    }

    #[tokio::test]
    async fn test_reply_to_deleted_session_is_dropped() {
        let (store, session) = seeded_store();
        let pending = PendingReply::schedule(
            store.clone(),
            &session.id,
            "anyone there?",
            Duration::from_millis(10),
        );
        store.delete(&session.id).unwrap();

        assert!(pending.wait().await.is_none());
        assert!(store.get(&session.id).unwrap().is_none());
    }
}
