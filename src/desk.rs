//! The desk: application state behind one front end
//!
//! [`Desk`] wires the router, the per-user stores, the webhook dispatcher
//! and the pending assistant reply together. It owns the "send a message"
//! flow: persist the user's message, notify the search webhook, then let
//! the assistant answer after a delay unless the user moves on first.

use crate::chat::{ChatMessage, ChatSession, ChatStore, PendingReply};
use crate::config::Config;
use crate::error::Result;
use crate::reminders::{ReminderBadge, ReminderStore};
use crate::router::{ActiveView, ViewRouter};
use crate::settings::SettingsStore;
use crate::storage::Storage;
use crate::user::UserSession;
use crate::webhook::{
    DispatchOutcome, FileAttachment, SearchType, WebhookDispatcher, WebhookRequest,
};
use crate::workflows::{self, NO_WORKFLOW_REPLY};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// What the user typed plus the search context chosen alongside it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatInput {
    pub text: String,
    pub search_type: Option<SearchType>,
    pub client_name: Option<String>,
    pub file: Option<FileAttachment>,
}

impl ChatInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Tag the message with a search type and optional client
    pub fn with_search(mut self, search_type: SearchType, client_name: Option<String>) -> Self {
        self.search_type = Some(search_type);
        self.client_name = client_name;
        self
    }

    /// Describe an attached file in the webhook payload
    pub fn with_file(mut self, file: FileAttachment) -> Self {
        self.file = Some(file);
        self
    }
}

/// Result of a successful send
#[derive(Debug)]
pub struct SentMessage {
    /// The session as saved, including the new user message
    pub session: ChatSession,
    /// The detached webhook task, when one was started
    ///
    /// Dropping it does not stop the request.
    pub webhook: Option<JoinHandle<DispatchOutcome>>,
}

/// Greeting for the hour of day (0-23)
///
/// # Examples
///
/// ```
/// use consultdesk::desk::greeting;
///
/// assert_eq!(greeting(9), "Good morning");
/// assert_eq!(greeting(12), "Good afternoon");
/// assert_eq!(greeting(17), "Good evening");
/// ```
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 17 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Application state for one user at a time
#[derive(Debug)]
pub struct Desk {
    config: Config,
    storage: Storage,
    user: String,
    router: ViewRouter,
    dispatcher: Option<Arc<WebhookDispatcher>>,
    pending: Option<PendingReply>,
}

impl Desk {
    /// Build a desk over `storage` for the logged-in (or default) user
    ///
    /// # Errors
    ///
    /// Returns an error if the current user cannot be read or the webhook
    /// client cannot be built
    pub fn new(config: Config, storage: Storage) -> Result<Self> {
        let user = UserSession::new(storage.clone()).resolve(&config.user.default_user)?;
        let dispatcher = WebhookDispatcher::new(&config.webhooks)?;
        tracing::debug!("Desk ready for {}", user);

        Ok(Self {
            config,
            storage,
            user,
            router: ViewRouter::new(),
            dispatcher: Some(Arc::new(dispatcher)),
            pending: None,
        })
    }

    /// Open the configured on-disk store and build a desk over it
    pub fn open(config: Config) -> Result<Self> {
        let storage = Storage::open(&config.storage)?;
        Self::new(config, storage)
    }

    /// Replace the webhook dispatcher; `None` disables webhooks
    pub fn with_dispatcher(mut self, dispatcher: Option<Arc<WebhookDispatcher>>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Identifier all per-user data is stored under
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn chat_store(&self) -> ChatStore {
        ChatStore::with_capacity(self.storage.clone(), &self.user, self.config.chat.max_sessions)
    }

    pub fn reminder_store(&self) -> ReminderStore {
        ReminderStore::new(self.storage.clone(), &self.user)
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore::new(self.storage.clone())
    }

    pub fn session(&self) -> UserSession {
        UserSession::new(self.storage.clone())
    }

    /// Start the reminder badge for the current user
    pub fn spawn_badge(&self) -> ReminderBadge {
        ReminderBadge::spawn(
            self.reminder_store(),
            Duration::from_millis(self.config.reminders.badge_poll_interval_ms),
        )
    }

    /// Greeting line for the banner, e.g. `Good morning, Tony`
    pub fn greeting_line(&self, hour: u32) -> String {
        format!("{}, {}", greeting(hour), self.config.company.greeting_name)
    }

    /// Log in and switch to that user's data
    pub fn login(&mut self, email: &str) -> Result<()> {
        self.user = self.session().login(email)?;
        self.cancel_pending();
        self.router = ViewRouter::new();
        Ok(())
    }

    /// Log out and fall back to the default user
    pub fn logout(&mut self) -> Result<()> {
        self.session().logout()?;
        self.user = self.config.user.default_user.clone();
        self.cancel_pending();
        self.router = ViewRouter::new();
        Ok(())
    }

    pub fn set_view(&mut self, view: ActiveView) {
        if view != self.router.view() {
            self.cancel_pending();
        }
        self.router.set_view(view);
    }

    pub fn select_workflow(&mut self, id: &str) {
        self.cancel_pending();
        self.router.select_workflow(id);
    }

    pub fn select_chat(&mut self, id: &str) {
        if self.router.selected_chat() != Some(id) || self.router.view() != ActiveView::Chat {
            self.cancel_pending();
        }
        self.router.select_chat(id);
    }

    pub fn new_chat(&mut self) {
        self.cancel_pending();
        self.router.new_chat();
    }

    /// Delete a session and drop the selection if it pointed there
    pub fn delete_chat(&mut self, id: &str) -> Result<bool> {
        if self.pending.as_ref().map(PendingReply::session_id) == Some(id) {
            self.cancel_pending();
        }
        let removed = self.chat_store().delete(id)?;
        self.router.clear_chat_if(id);
        Ok(removed)
    }

    /// Send a chat message
    ///
    /// Blank input is ignored and yields `None`. Otherwise the message is
    /// appended to the selected session (or starts a new one), the session
    /// is selected, the search webhook fires when a search type is set and
    /// the assistant reply is scheduled.
    pub fn send_message(&mut self, input: ChatInput) -> Result<Option<SentMessage>> {
        let reply = self.config.chat.assistant_reply.clone();
        let target = self.router.selected_chat().map(str::to_string);
        let sent = self.submit(input, reply, target)?;
        if let Some(sent) = &sent {
            self.router.select_chat(sent.session.id.as_str());
        }
        Ok(sent)
    }

    /// Send a message from the workflows view
    ///
    /// Same flow as [`Desk::send_message`], but the view stays on workflows
    /// and the assistant acknowledges the selected workflow. The message goes
    /// to the workflow's own session, never to the chat selected in the chat
    /// view.
    pub fn send_workflow_message(&mut self, input: ChatInput) -> Result<Option<SentMessage>> {
        if self.router.view() != ActiveView::Workflows {
            self.set_view(ActiveView::Workflows);
        }
        let reply = self
            .router
            .selected_workflow()
            .and_then(workflows::by_id)
            .map(|workflow| workflow.reply_for())
            .unwrap_or_else(|| NO_WORKFLOW_REPLY.to_string());

        let target = self.router.workflow_chat().map(str::to_string);
        let sent = self.submit(input, reply, target)?;
        if let Some(sent) = &sent {
            self.router.set_workflow_chat(sent.session.id.as_str());
        }
        Ok(sent)
    }

    /// Whether an assistant reply is still outstanding
    pub fn has_pending_reply(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Wait for the outstanding assistant reply, if any
    pub async fn await_reply(&mut self) -> Option<ChatMessage> {
        match self.pending.take() {
            Some(pending) => pending.wait().await,
            None => None,
        }
    }

    /// Wait for the outstanding reply unless `interrupt` completes first
    ///
    /// An interrupted reply is discarded.
    pub async fn await_reply_until<F>(&mut self, interrupt: F) -> Option<ChatMessage>
    where
        F: Future<Output = ()>,
    {
        match self.pending.take() {
            Some(pending) => pending.wait_until(interrupt).await,
            None => None,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                tracing::debug!("Cancelling reply for chat {}", pending.session_id());
            }
            pending.cancel();
        }
    }

    fn submit(
        &mut self,
        input: ChatInput,
        reply: String,
        target: Option<String>,
    ) -> Result<Option<SentMessage>> {
        if input.text.trim().is_empty() {
            return Ok(None);
        }
        self.cancel_pending();

        let store = self.chat_store();
        let existing = match target {
            Some(id) => store.get(&id)?,
            None => None,
        };

        let session = match existing {
            Some(mut session) => {
                session.push(ChatMessage::user(input.text.clone()));
                if input.search_type.is_some() {
                    session.search_type = input.search_type;
                    session.client_name = input.client_name.clone();
                }
                session
            }
            None => ChatSession::start(
                &input.text,
                self.config.chat.title_max_chars,
                input.search_type,
                input.client_name.clone(),
            ),
        };
        store.save(&session)?;

        let webhook = match (input.search_type, &self.dispatcher) {
            (Some(search_type), Some(dispatcher)) => {
                Some(dispatcher.notify(WebhookRequest {
                    search_type,
                    client_name: input.client_name,
                    query: input.text,
                    user_id: self.user.clone(),
                    file: input.file,
                }))
            }
            _ => None,
        };

        self.pending = Some(PendingReply::schedule(
            store,
            session.id.clone(),
            reply,
            Duration::from_millis(self.config.chat.reply_delay_ms),
        ));

        Ok(Some(SentMessage { session, webhook }))
    }
}
