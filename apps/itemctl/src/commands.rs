//! Item actions shared by one-shot subcommands and the interactive shell.

use std::sync::Arc;

use item_store::ItemStore;
use shared::domain::{Item, ItemId};

use crate::render::{
    describe_error, render_item, render_items, render_summary, validate_fields, Action,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    /// Reload and print the collection.
    List,
    /// Reload only; observing views render the new snapshot.
    Refresh,
    Show {
        id: ItemId,
    },
    Add {
        name: String,
        description: String,
    },
    Edit {
        id: ItemId,
        name: String,
        description: String,
    },
    Remove {
        id: ItemId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Run(ItemCommand),
    Help,
    Quit,
    Empty,
}

pub const SHELL_HELP: &str = "\
commands:
  refresh                          reload the collection
  show <id>                        fetch one item
  add <name> | <description>       add an item
  edit <id> <name> | <description> replace an item's fields
  rm <id>                          delete an item
  help                             show this help
  quit                             leave the shell";

/// Runs one command against the store, returning the text to print on success or
/// the user-facing failure message.
pub async fn execute(store: &Arc<ItemStore>, command: ItemCommand) -> Result<String, String> {
    match command {
        ItemCommand::List => {
            let items = store
                .refresh()
                .await
                .map_err(|err| describe_error(Action::Load, &err))?;
            Ok(format!("{}\n{}", render_items(&items), render_summary(&items)))
        }
        ItemCommand::Refresh => {
            let items = store
                .refresh()
                .await
                .map_err(|err| describe_error(Action::Load, &err))?;
            Ok(format!("Reloaded {} item(s).", items.len()))
        }
        ItemCommand::Show { id } => {
            let item = store
                .get(id)
                .await
                .map_err(|err| describe_error(Action::Show, &err))?;
            Ok(render_item(&item))
        }
        ItemCommand::Add { name, description } => {
            validate_fields(&name, &description)?;
            let created = store
                .create(&Item::draft(name, description))
                .await
                .map_err(|err| describe_error(Action::Add, &err))?;
            Ok(format!("Item added successfully! {}", render_item(&created)))
        }
        ItemCommand::Edit {
            id,
            name,
            description,
        } => {
            validate_fields(&name, &description)?;
            let patch = Item {
                id,
                name,
                description,
            };
            let updated = store
                .update(id, &patch)
                .await
                .map_err(|err| describe_error(Action::Update, &err))?;
            Ok(format!("Item updated. {}", render_item(&updated)))
        }
        ItemCommand::Remove { id } => {
            store
                .delete(id)
                .await
                .map_err(|err| describe_error(Action::Delete, &err))?;
            Ok(format!("Item #{id} deleted."))
        }
    }
}

pub fn parse_shell_line(line: &str) -> Result<ShellInput, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "" => ShellInput::Empty,
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" => ShellInput::Quit,
        "refresh" | "ls" | "list" => ShellInput::Run(ItemCommand::Refresh),
        "show" => ShellInput::Run(ItemCommand::Show {
            id: parse_id(rest)?,
        }),
        "add" => {
            let (name, description) = split_fields(rest)?;
            ShellInput::Run(ItemCommand::Add { name, description })
        }
        "edit" => {
            let (id, fields) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: edit <id> <name> | <description>".to_string())?;
            let (name, description) = split_fields(fields)?;
            ShellInput::Run(ItemCommand::Edit {
                id: parse_id(id)?,
                name,
                description,
            })
        }
        "rm" | "delete" => ShellInput::Run(ItemCommand::Remove {
            id: parse_id(rest)?,
        }),
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(input)
}

fn parse_id(raw: &str) -> Result<ItemId, String> {
    raw.trim()
        .parse::<i64>()
        .map(ItemId)
        .map_err(|_| format!("'{}' is not a valid item id", raw.trim()))
}

fn split_fields(raw: &str) -> Result<(String, String), String> {
    let (name, description) = raw
        .split_once('|')
        .ok_or_else(|| "expected '<name> | <description>'".to_string())?;
    Ok((name.trim().to_string(), description.trim().to_string()))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
