use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use item_store::{HttpItemRemote, ItemRemote, ItemStore};
use shared::domain::ItemId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod shell;

use commands::{execute, ItemCommand};
use config::{load_settings, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "itemctl", about = "Browse and edit the shared item collection")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Collection URL of the item service.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    /// Trust self-signed development certificates.
    #[arg(long)]
    accept_invalid_certs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Show {
        id: i64,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    Remove {
        id: i64,
    },
    /// Interactive session with live list and summary views.
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config);
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(secs) = cli.request_timeout_secs {
        settings.request_timeout_secs = secs;
    }
    if cli.accept_invalid_certs {
        settings.accept_invalid_certs = true;
    }

    let remote = HttpItemRemote::new(&settings.remote_settings())
        .context("failed to configure item service client")?;
    info!(api_url = %remote.collection_url(), "itemctl: using item service");
    let remote: Arc<dyn ItemRemote> = Arc::new(remote);

    let command = match cli.command {
        Command::Shell => return shell::run(ItemStore::start(remote)).await,
        Command::List => ItemCommand::List,
        Command::Show { id } => ItemCommand::Show { id: ItemId(id) },
        Command::Add { name, description } => ItemCommand::Add { name, description },
        Command::Edit {
            id,
            name,
            description,
        } => ItemCommand::Edit {
            id: ItemId(id),
            name,
            description,
        },
        Command::Remove { id } => ItemCommand::Remove { id: ItemId(id) },
    };

    let store = ItemStore::new(remote);
    let output = execute(&store, command).await.map_err(|message| anyhow!(message))?;
    println!("{output}");
    Ok(())
}
