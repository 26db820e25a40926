//! Interactive session: a list view and a summary view observe the same store
//! while commands are read from stdin.

use std::sync::Arc;

use anyhow::{Context, Result};
use item_store::{ItemStore, ItemsSubscription};
use shared::domain::Item;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    commands::{execute, parse_shell_line, ShellInput, SHELL_HELP},
    render::{render_items, render_summary},
};

pub async fn run(store: Arc<ItemStore>) -> Result<()> {
    let list_view = spawn_view("list", store.observe_items(), render_items);
    let summary_view = spawn_view("summary", store.observe_items(), render_summary);
    println!("{SHELL_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read shell command")?
    {
        match parse_shell_line(&line) {
            Ok(ShellInput::Run(command)) => match execute(&store, command).await {
                Ok(output) => println!("{output}"),
                Err(message) => eprintln!("{message}"),
            },
            Ok(ShellInput::Help) => println!("{SHELL_HELP}"),
            Ok(ShellInput::Empty) => {}
            Ok(ShellInput::Quit) => break,
            Err(message) => eprintln!("{message}"),
        }
    }

    list_view.abort();
    summary_view.abort();
    Ok(())
}

fn spawn_view(
    name: &'static str,
    mut subscription: ItemsSubscription,
    render: fn(&[Item]) -> String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = subscription.next_snapshot().await {
            debug!(view = name, count = snapshot.len(), "shell: snapshot received");
            println!("[{name}]\n{}", render(&snapshot));
        }
    })
}
