//! CLI entrypoint for boardroom
//!
//! This is the main binary that wires together all layers using
//! dependency injection: in-memory message log and lock coordinator, the
//! JSONL checkpoint store for restart recovery, and the built-in
//! specialist panel.

use anyhow::{Context, Result, bail};
use boardroom_application::{
    CheckpointManager, GetRoomStateUseCase, IntakeConsumer, RoomStateError, SubmitMessageInput,
    SubmitMessageUseCase, use_cases::run_deliberation::RunDeliberationUseCase,
};
use boardroom_domain::RoomId;
use boardroom_infrastructure::{
    ConfigLoader, InMemoryMessageLog, InMemoryRoomLocks, JsonlCheckpointStore, TracingMetricsSink,
    specialist_pool,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boardroom", about = "Multi-agent boardroom deliberation engine")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Explicit configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip configuration files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Directory for checkpoint files (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a message and deliberate it to a terminal outcome
    Run {
        /// Room to deliberate in
        room: String,
        /// Message content (the proposal text)
        content: String,
        /// Verified author identity
        #[arg(long, default_value = "operator")]
        author: String,
    },
    /// Print a room's latest committed deliberation state
    State {
        /// Room to inspect
        room: String,
    },
}

fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("boardroom")
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting boardroom");

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("loading configuration")?
    };
    let config = file_config
        .to_engine_config()
        .context("validating configuration")?;

    // === Dependency Injection ===
    let store = Arc::new(
        JsonlCheckpointStore::new(data_dir(&cli)).context("opening checkpoint store")?,
    );

    match cli.command {
        Command::Run {
            room,
            content,
            author,
        } => {
            let Some(room_id) = RoomId::try_new(room) else {
                bail!("Room id cannot be empty");
            };

            let log = Arc::new(InMemoryMessageLog::new());
            let locks = Arc::new(InMemoryRoomLocks::new(config.lock().lease_ttl));
            let metrics = Arc::new(TracingMetricsSink::new());
            let checkpoints = Arc::new(CheckpointManager::new(
                store.clone(),
                metrics.clone(),
                config.checkpoint().clone(),
            ));
            let orchestrator = Arc::new(RunDeliberationUseCase::new(
                specialist_pool(),
                Arc::clone(&checkpoints),
                metrics.clone(),
                *config.rule(),
                config.rooms().clone(),
            ));
            let consumer = IntakeConsumer::new(
                log.clone(),
                locks,
                checkpoints,
                orchestrator,
                metrics,
                config.intake().clone(),
                config.rooms().clone(),
                "boardroom-cli",
            );

            let submit = SubmitMessageUseCase::new(log);
            let record_id = submit
                .execute(SubmitMessageInput::new(room_id.clone(), author, content))
                .await
                .context("submitting message")?;
            println!("accepted record {record_id} in room {room_id}");

            let summary = consumer
                .drain_room(&room_id, &CancellationToken::new())
                .await
                .context("deliberating")?;
            info!(?summary, "intake drained");

            let state = GetRoomStateUseCase::new(store).execute(&room_id).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::State { room } => {
            let Some(room_id) = RoomId::try_new(room) else {
                bail!("Room id cannot be empty");
            };
            match GetRoomStateUseCase::new(store).execute(&room_id).await {
                Ok(state) => println!("{}", serde_json::to_string_pretty(&state)?),
                Err(RoomStateError::NotFound(room)) => bail!("No deliberation found for room {room}"),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
