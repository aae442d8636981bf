use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use assistant::{distribute_clusters, parse_command, project, DesignSession, DesignStore};
use clap::{Parser, Subcommand};
use client_core::RemoteInterpreter;
use shared::domain::{BalloonSize, DesignId};
use storage::Storage;
use tracing_subscriber::EnvFilter;

mod synonyms;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/designs.db")]
    database_url: String,
    /// TOML file with extra color synonym groups.
    #[arg(long)]
    synonyms: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the correction a command parses to.
    Parse { text: String },
    /// Print the balloon projection for a cluster total.
    Project {
        total_clusters: u32,
        #[arg(required = true)]
        colors: Vec<String>,
    },
    CreateDesign {
        total_clusters: u32,
        #[arg(required = true)]
        colors: Vec<String>,
    },
    ShowDesign { design_id: i64 },
    /// Interpret a command against a stored design, preview it and optionally commit it.
    Assist {
        design_id: i64,
        text: String,
        #[arg(long)]
        yes: bool,
        /// Use a remote text-understanding service instead of the local rules.
        #[arg(long)]
        interpreter_url: Option<String>,
    },
    SetInventory {
        color: String,
        size: String,
        quantity: u32,
    },
    Inventory { color: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let matcher = synonyms::matcher_from(cli.synonyms.as_deref())?;

    match cli.command {
        Command::Parse { text } => match parse_command(&text) {
            Some(correction) => print_json(&correction)?,
            None => bail!("command not recognized: '{text}'"),
        },
        Command::Project {
            total_clusters,
            colors,
        } => print_json(&project(total_clusters, &colors))?,
        Command::CreateDesign {
            total_clusters,
            colors,
        } => {
            let storage = Storage::new(&cli.database_url).await?;
            let clusters = distribute_clusters(total_clusters, &colors);
            let record = storage
                .create_design(&project(total_clusters, &colors), &clusters)
                .await?;
            println!("created design_id={}", record.design_id.0);
        }
        Command::ShowDesign { design_id } => {
            let storage = Storage::new(&cli.database_url).await?;
            let record = storage
                .load_design(DesignId(design_id))
                .await?
                .with_context(|| format!("design {design_id} not found"))?;
            print_json(&record)?;
        }
        Command::Assist {
            design_id,
            text,
            yes,
            interpreter_url,
        } => {
            let storage = Storage::new(&cli.database_url).await?;
            let design_id = DesignId(design_id);
            let record = storage
                .load_design(design_id)
                .await?
                .with_context(|| format!("design {} not found", design_id.0))?;
            let store: Arc<dyn DesignStore> = Arc::new(storage);
            let mut session =
                DesignSession::new(design_id, record.clusters, store).with_matcher(matcher);
            if let Some(url) = interpreter_url {
                session = session.with_interpreter(Arc::new(RemoteInterpreter::new(&url)?));
            }

            let correction = session.propose(&text).await?.clone();
            println!("correction:");
            print_json(&correction)?;
            let preview = session.preview()?;
            println!("preview:");
            print_json(&preview)?;

            if yes {
                let applied = session.confirm().await?;
                println!(
                    "committed design_id={} total_clusters={}",
                    design_id.0, applied.total_clusters
                );
            } else {
                session.cancel();
                println!("not committed; re-run with --yes to apply");
            }
        }
        Command::SetInventory {
            color,
            size,
            quantity,
        } => {
            let size: BalloonSize = size.parse()?;
            let storage = Storage::new(&cli.database_url).await?;
            storage.upsert_inventory(color.trim(), size, quantity).await?;
            println!("stored {quantity} x {} {}", size.label(), color.trim());
        }
        Command::Inventory { color } => {
            let storage = Storage::new(&cli.database_url).await?;
            match color {
                Some(color) => {
                    let availability = storage
                        .lookup_inventory(&color, &matcher)
                        .await?
                        .with_context(|| format!("no inventory matches color '{color}'"))?;
                    print_json(&availability)?;
                }
                None => print_json(&storage.list_inventory().await?)?,
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
