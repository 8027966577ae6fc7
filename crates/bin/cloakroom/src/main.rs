//! cloakroom cli
//!
//! commands:
//! - note: generate a fresh deposit note
//! - inspect: show the public values of a note
//! - path: rebuild the tree from an exported event log and print a note's path
//! - demo: deposit -> send -> withdraw against an in-memory vault

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use cloakroom_primitives::{Asset, Commitment, Note, NullifierHash, Root, TokenContract, TokenId};
use cloakroom_tree::MerklePath;
use cloakroom_vault::{PathBuilder, VaultConfig, VaultEvent};

mod demo;

#[derive(Parser, Debug)]
#[command(name = "cloakroom")]
#[command(about = "private nft custody vault tooling", long_about = None)]
struct Cli {
    /// vault config (toml), defaults when absent
    #[arg(long, env = "CLOAKROOM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random note for an asset
    Note {
        /// Token contract (0x hex field element)
        #[arg(long)]
        token_contract: String,
        /// Token id (0x hex field element)
        #[arg(long)]
        token_id: String,
    },

    /// Print commitment, nullifier hash and asset of a note
    Inspect {
        /// Note string (cloakroom-note-v1-...)
        note: String,
    },

    /// Build the inclusion path of a note from an exported event log
    Path {
        /// Event log (json array)
        #[arg(long)]
        events: PathBuf,
        /// Note string
        #[arg(long)]
        note: String,
    },

    /// Run deposit, send and withdraw with the transparent backend
    Demo {
        /// Write the resulting event log here
        #[arg(long)]
        events_out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct NoteSummary {
    commitment: Commitment,
    nullifier_hash: NullifierHash,
    asset: Asset,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            commitment: note.commitment(),
            nullifier_hash: note.nullifier_hash(),
            asset: note.asset,
        }
    }
}

#[derive(Serialize)]
struct PathOutput {
    root: Root,
    path: MerklePath,
    spent: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloakroom=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Note {
            token_contract,
            token_id,
        } => cmd_note(&token_contract, &token_id),
        Commands::Inspect { note } => cmd_inspect(&note),
        Commands::Path { events, note } => cmd_path(&config, &events, &note),
        Commands::Demo { events_out } => demo::run(&config, events_out.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<VaultConfig> {
    let config = match path {
        Some(path) => VaultConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VaultConfig::default(),
    };
    info!(
        "tree height {}, root window {}",
        config.tree_height, config.root_history_size
    );
    Ok(config)
}

fn parse_note(s: &str) -> Result<Note> {
    s.trim().parse().context("invalid note string")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_note(token_contract: &str, token_id: &str) -> Result<()> {
    let asset = Asset::new(
        TokenContract::from_hex(token_contract).context("invalid token contract")?,
        TokenId::from_hex(token_id).context("invalid token id")?,
    );
    let note = Note::random(asset, rand::thread_rng());

    println!("{}", note.encode());
    print_json(&NoteSummary::from(&note))
}

fn cmd_inspect(note: &str) -> Result<()> {
    let note = parse_note(note)?;
    print_json(&NoteSummary::from(&note))
}

fn cmd_path(config: &VaultConfig, events: &Path, note: &str) -> Result<()> {
    let note = parse_note(note)?;
    let raw = std::fs::read_to_string(events)
        .with_context(|| format!("reading event log {}", events.display()))?;
    let events: Vec<VaultEvent> =
        serde_json::from_str(&raw).context("event log is not a json array of vault events")?;

    let builder = PathBuilder::from_events(config.tree_height, &events)
        .context("replaying event log")?;
    info!("replayed {} events, {} leaves", events.len(), builder.len());

    let (root, path) = builder
        .witness_path(&note)
        .context("note commitment not found in event log")?;
    print_json(&PathOutput {
        root,
        path,
        spent: builder.is_spent(&note.nullifier_hash()),
    })
}
