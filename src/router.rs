//! View routing state
//!
//! Tracks which top-level view is active and which workflow and chat are
//! selected. The chat view and the workflows view each write to their own
//! session, so messages never cross between them. Every transition is
//! total; nothing here is persisted.

use crate::error::DeskError;
use colored::Colorize;
use std::fmt;
use std::str::FromStr;

/// Top-level view of the desk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    /// Free-form chat with the assistant
    #[default]
    Chat,

    /// Workflow catalog and workflow-scoped chat
    Workflows,

    /// Reminder list
    Reminders,
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Workflows => write!(f, "workflows"),
            Self::Reminders => write!(f, "reminders"),
        }
    }
}

impl FromStr for ActiveView {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "workflows" => Ok(Self::Workflows),
            "reminders" => Ok(Self::Reminders),
            other => Err(DeskError::Validation(format!("Unknown view: {}", other))),
        }
    }
}

impl ActiveView {
    /// Colored tag for prompts and banners
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Chat => format!("[{}]", "CHAT".cyan()),
            Self::Workflows => format!("[{}]", "WORKFLOWS".purple()),
            Self::Reminders => format!("[{}]", "REMINDERS".yellow()),
        }
    }
}

/// Active view plus the current selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRouter {
    view: ActiveView,
    selected_workflow: Option<String>,
    selected_chat: Option<String>,
    workflow_chat: Option<String>,
}

impl ViewRouter {
    /// Router in the chat view with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    pub fn selected_workflow(&self) -> Option<&str> {
        self.selected_workflow.as_deref()
    }

    pub fn selected_chat(&self) -> Option<&str> {
        self.selected_chat.as_deref()
    }

    /// Session holding the conversation of the selected workflow
    pub fn workflow_chat(&self) -> Option<&str> {
        self.workflow_chat.as_deref()
    }

    /// Switch views, keeping the selections
    pub fn set_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    /// Open a workflow
    ///
    /// Switching to a different workflow starts a new workflow conversation.
    pub fn select_workflow(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.selected_workflow.as_deref() != Some(id.as_str()) {
            self.workflow_chat = None;
        }
        self.view = ActiveView::Workflows;
        self.selected_workflow = Some(id);
    }

    /// Open a chat session
    pub fn select_chat(&mut self, id: impl Into<String>) {
        self.view = ActiveView::Chat;
        self.selected_chat = Some(id.into());
    }

    /// Record the session the workflows view writes to
    pub fn set_workflow_chat(&mut self, id: impl Into<String>) {
        self.workflow_chat = Some(id.into());
    }

    /// Start a fresh chat: no session selected, chat view active
    pub fn new_chat(&mut self) {
        self.view = ActiveView::Chat;
        self.selected_chat = None;
    }

    /// Drop any session selection that points at `id`
    ///
    /// Returns whether a selection was cleared.
    pub fn clear_chat_if(&mut self, id: &str) -> bool {
        let mut cleared = false;
        for slot in [&mut self.selected_chat, &mut self.workflow_chat] {
            if slot.as_deref() == Some(id) {
                *slot = None;
                cleared = true;
            }
        }
        cleared
    }
}
