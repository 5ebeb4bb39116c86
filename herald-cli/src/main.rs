use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use herald_core::mentions::extract_mentions;
use herald_core::{
    Dispatcher, HeraldConfig, NotificationEvent, RecordingChatService, ReviewRequestPolicy,
    VcsSnapshot,
};

/// Herald: code-review notification dispatcher
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Work out who to notify about code-review events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay one event against a snapshot and print the messages it would send
    Dispatch(DispatchArgs),
    /// Print the users mentioned in a piece of text
    Mentions(MentionsArgs),
}

#[derive(Parser, Debug)]
struct DispatchArgs {
    /// JSON snapshot of pull requests, comments, reviews, review requests and settings
    #[arg(long)]
    snapshot: PathBuf,

    /// JSON event to handle (tagged with "type": comment, review_request or review)
    #[arg(long)]
    event: PathBuf,

    /// Whether review requests honour the requestee's preference
    /// (overrides HERALD_REVIEW_REQUEST_POLICY)
    #[arg(long, value_parser = ["gated", "ungated"])]
    review_request_policy: Option<String>,
}

#[derive(Parser, Debug)]
struct MentionsArgs {
    /// Text to scan for @mentions
    text: String,
}

fn init_logging(config: &HeraldConfig) {
    let filter = config
        .log_filter
        .as_deref()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {} {}", what, path.display()))
}

async fn run_dispatch(mut config: HeraldConfig, args: DispatchArgs) -> Result<()> {
    if let Some(policy) = args.review_request_policy {
        config.review_request_policy = policy
            .parse::<ReviewRequestPolicy>()
            .map_err(anyhow::Error::msg)?;
    }

    let snapshot = VcsSnapshot::from_json(&read_file(&args.snapshot, "snapshot")?)
        .with_context(|| format!("Invalid snapshot {}", args.snapshot.display()))?;
    let event: NotificationEvent = serde_json::from_str(&read_file(&args.event, "event")?)
        .with_context(|| format!("Invalid event {}", args.event.display()))?;

    let (vcs, store) = snapshot.into_collaborators().await?;
    let chat = Arc::new(RecordingChatService::new());

    let dispatcher =
        Dispatcher::new(Arc::new(vcs), Arc::new(store), chat.clone()).with_config(config);

    info!(
        "Handling {} event by {} on PR {} (review request policy: {})",
        event.kind(),
        event.actor(),
        event.pr(),
        dispatcher.config().review_request_policy
    );

    dispatcher
        .handle(&event)
        .await
        .with_context(|| format!("Failed to handle {} event", event.kind()))?;

    for message in chat.sent().await {
        println!("{}\t{}", message.to, message.text);
    }

    Ok(())
}

fn run_mentions(args: MentionsArgs) -> Result<()> {
    for user in extract_mentions(&args.text) {
        println!("{}", user);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = HeraldConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config);

    match cli.command {
        Commands::Dispatch(args) => run_dispatch(config, args).await,
        Commands::Mentions(args) => run_mentions(args),
    }
}
