//! Text views over item snapshots and user-facing error text.

use shared::{domain::Item, error::StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Show,
    Add,
    Update,
    Delete,
}

impl Action {
    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Load => "Failed to load items",
            Action::Show => "Failed to load item",
            Action::Add => "Failed to add item",
            Action::Update => "Failed to update item",
            Action::Delete => "Failed to delete item",
        }
    }
}

pub fn describe_error(action: Action, err: &StoreError) -> String {
    let detail = match err {
        StoreError::Unreachable { .. } => match err.hint() {
            Some(hint) => format!("cannot connect to the item service; {hint}"),
            None => "cannot connect to the item service".to_string(),
        },
        StoreError::NotFound { .. } => "item or endpoint not found".to_string(),
        StoreError::ServerError {
            status,
            status_text,
        } => format!("server error: {status} {status_text}"),
        StoreError::Unknown(reason) => format!("unexpected failure: {reason}"),
    };
    format!("{}: {detail}", action.failure_prefix())
}

/// Checks the fields a form would mark as required.
pub fn validate_fields(name: &str, description: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }
    Ok(())
}

pub fn render_item(item: &Item) -> String {
    format!("#{:<4} {} - {}", item.id.0, item.name, item.description)
}

pub fn render_items(items: &[Item]) -> String {
    if items.is_empty() {
        return "(no items)".to_string();
    }
    items.iter().map(render_item).collect::<Vec<_>>().join("\n")
}

pub fn render_summary(items: &[Item]) -> String {
    format!("Total Items: {}", items.len())
}
