use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use item_store::ItemRemote;
use shared::{
    error::StoreError,
    protocol::{NewItemRequest, UpdateItemRequest},
};

/// Answers every call with the same failure and counts how often it was asked.
struct DownRemote {
    calls: AtomicUsize,
}

impl DownRemote {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::Unreachable {
            url: "https://localhost:7122/api/Items".into(),
            reason: "connection refused".into(),
        }
    }
}

#[async_trait]
impl ItemRemote for DownRemote {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        Err(self.fail())
    }

    async fn fetch(&self, _id: ItemId) -> Result<Item, StoreError> {
        Err(self.fail())
    }

    async fn create(&self, _body: NewItemRequest) -> Result<Item, StoreError> {
        Err(self.fail())
    }

    async fn update(&self, _id: ItemId, _body: UpdateItemRequest) -> Result<Item, StoreError> {
        Err(self.fail())
    }

    async fn delete(&self, _id: ItemId) -> Result<(), StoreError> {
        Err(self.fail())
    }
}

#[test]
fn parses_shell_commands() {
    assert_eq!(parse_shell_line("  "), Ok(ShellInput::Empty));
    assert_eq!(parse_shell_line("quit"), Ok(ShellInput::Quit));
    assert_eq!(
        parse_shell_line("refresh"),
        Ok(ShellInput::Run(ItemCommand::Refresh))
    );
    assert_eq!(
        parse_shell_line("add desk lamp | warm white"),
        Ok(ShellInput::Run(ItemCommand::Add {
            name: "desk lamp".into(),
            description: "warm white".into(),
        }))
    );
    assert_eq!(
        parse_shell_line("edit 4 lamp | floor lamp"),
        Ok(ShellInput::Run(ItemCommand::Edit {
            id: ItemId(4),
            name: "lamp".into(),
            description: "floor lamp".into(),
        }))
    );
    assert_eq!(
        parse_shell_line("rm 9"),
        Ok(ShellInput::Run(ItemCommand::Remove { id: ItemId(9) }))
    );
}

#[test]
fn rejects_malformed_shell_commands() {
    assert!(parse_shell_line("rm nine").is_err());
    assert!(parse_shell_line("add lamp without separator").is_err());
    assert!(parse_shell_line("edit 4").is_err());
    assert!(parse_shell_line("frobnicate").is_err());
}

#[tokio::test]
async fn blank_fields_never_reach_the_store() {
    let remote = DownRemote::new();
    let store = ItemStore::new(remote.clone());

    let err = execute(
        &store,
        ItemCommand::Add {
            name: "lamp".into(),
            description: " ".into(),
        },
    )
    .await
    .expect_err("invalid");
    assert_eq!(err, "Description is required");
    assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_failures_become_user_messages() {
    let remote = DownRemote::new();
    let store = ItemStore::new(remote.clone());

    let err = execute(&store, ItemCommand::Remove { id: ItemId(3) })
        .await
        .expect_err("down");
    assert!(err.starts_with("Failed to delete item: cannot connect to the item service"));

    let err = execute(&store, ItemCommand::Refresh)
        .await
        .expect_err("down");
    assert!(err.starts_with("Failed to load items"));
    assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    assert!(store.snapshot().is_empty());
}

/// Serves a fixed collection and refuses every write.
struct FixedRemote {
    items: Vec<Item>,
}

#[async_trait]
impl ItemRemote for FixedRemote {
    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.clone())
    }

    async fn fetch(&self, id: ItemId) -> Result<Item, StoreError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                url: format!("memory://items/{id}"),
            })
    }

    async fn create(&self, _body: NewItemRequest) -> Result<Item, StoreError> {
        Err(StoreError::Unknown("read-only".into()))
    }

    async fn update(&self, _id: ItemId, _body: UpdateItemRequest) -> Result<Item, StoreError> {
        Err(StoreError::Unknown("read-only".into()))
    }

    async fn delete(&self, _id: ItemId) -> Result<(), StoreError> {
        Err(StoreError::Unknown("read-only".into()))
    }
}

fn fixed_store() -> Arc<ItemStore> {
    ItemStore::new(Arc::new(FixedRemote {
        items: vec![Item {
            id: ItemId(1),
            name: "lamp".into(),
            description: "desk lamp".into(),
        }],
    }))
}

#[tokio::test]
async fn shell_refresh_acknowledges_without_rendering_items() {
    let store = fixed_store();
    let mut view = store.observe_items();
    view.try_next_snapshot().expect("replay");

    let output = execute(&store, ItemCommand::Refresh)
        .await
        .expect("refresh");
    assert_eq!(output, "Reloaded 1 item(s).");
    assert!(!output.contains("lamp"));

    let rendered_by_view = view.try_next_snapshot().expect("view receives snapshot");
    assert_eq!(rendered_by_view.len(), 1);
}

#[tokio::test]
async fn list_command_renders_items_and_summary() {
    let store = fixed_store();

    let output = execute(&store, ItemCommand::List).await.expect("list");
    assert_eq!(output, "#1    lamp - desk lamp\nTotal Items: 1");
}

#[test]
fn shell_list_aliases_only_reload() {
    assert_eq!(
        parse_shell_line("ls"),
        Ok(ShellInput::Run(ItemCommand::Refresh))
    );
}
