//! Built-in workflow catalog
//!
//! Workflows are static form templates. The catalog is read-only and
//! compiled into the binary; looking up an unknown id yields `None`.

use crate::error::{DeskError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

mod catalog;

/// Reply used when a workflow message arrives with no workflow selected
pub const NO_WORKFLOW_REPLY: &str = "I'm processing your request...";

/// Input control of a workflow field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Select,
    Text,
}

/// One choice of a select field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [FieldOption],
}

fn no_options(options: &&'static [FieldOption]) -> bool {
    options.is_empty()
}

impl WorkflowField {
    fn check(&self, value: Option<&str>) -> Result<()> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(DeskError::Validation(format!("{} is required", self.label)).into());
        }
        if self.kind == FieldKind::Select && !self.options.iter().any(|o| o.value == value) {
            let allowed: Vec<&str> = self.options.iter().map(|o| o.value).collect();
            return Err(DeskError::Validation(format!(
                "Invalid {} '{}'. Must be one of: {}",
                self.label,
                value,
                allowed.join(", ")
            ))
            .into());
        }
        Ok(())
    }
}

/// A named workflow and its form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [WorkflowField],
}

impl WorkflowDefinition {
    /// Check submitted form values keyed by field name
    ///
    /// Every field must be present and non-blank; select fields must use one
    /// of their option values. Extra keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::Validation` naming the first offending field
    pub fn validate_inputs(&self, inputs: &BTreeMap<String, String>) -> Result<()> {
        for field in self.fields {
            field.check(inputs.get(field.name).map(String::as_str))?;
        }
        Ok(())
    }

    /// Assistant acknowledgement for a message sent inside this workflow
    pub fn reply_for(&self) -> String {
        format!(
            "I'm analyzing your {} request. Let me help you with the next steps in this workflow.",
            self.name
        )
    }
}

/// All workflows in display order
pub fn all() -> &'static [WorkflowDefinition] {
    catalog::WORKFLOWS
}

/// Look up a workflow by id
///
/// # Examples
///
/// ```
/// use consultdesk::workflows;
///
/// assert_eq!(workflows::by_id("risk-assessment").unwrap().name, "Risk Assessment");
/// assert!(workflows::by_id("nonexistent-workflow").is_none());
/// ```
pub fn by_id(id: &str) -> Option<&'static WorkflowDefinition> {
    all().iter().find(|w| w.id == id)
}

/// Workflows whose name or description contains `term`, ignoring case
///
/// A blank term matches everything.
pub fn search(term: &str) -> Vec<&'static WorkflowDefinition> {
    let needle = term.trim().to_lowercase();
    all()
        .iter()
        .filter(|w| {
            needle.is_empty()
                || w.name.to_lowercase().contains(&needle)
                || w.description.to_lowercase().contains(&needle)
        })
        .collect()
}
