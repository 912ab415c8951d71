#![forbid(unsafe_code)]

//! `lead-desk`: dealership lead queue and messaging simulator.
//!
//! Loads a lead seed file, renders ranked work-queue tabs, and sends
//! messages whose simulated replies advance the lead's journey stage.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use lead_desk::config::GlobalConfig;
use lead_desk::config_watcher::WeightsWatcher;
use lead_desk::journey::machine::{advance_named, StageView};
use lead_desk::models::journey::JourneyStage;
use lead_desk::models::lead::Lead;
use lead_desk::models::message::Channel;
use lead_desk::orchestrator::messenger::Messenger;
use lead_desk::orchestrator::reply_consumer::spawn_reply_consumer;
use lead_desk::orchestrator::reply_simulator::ReplySimulator;
use lead_desk::queue::pipeline::{self, QueueEntry, QueueQuery, SortKey};
use lead_desk::queue::summary::TabCounts;
use lead_desk::scoring::categorizer::Category;
use lead_desk::scoring::scorer::PriorityScorer;
use lead_desk::scoring::weights::ScoringWeights;
use lead_desk::store::lead_store::LeadStore;
use lead_desk::store::message_log::MessageLog;
use lead_desk::store::seed::load_seed_file;
use lead_desk::{AppError, Result};

/// Extra wait on top of the reply delay before giving up on a reply.
const REPLY_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "lead-desk", about = "Dealership lead queue", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one work-queue tab as JSON lines, followed by tab counts.
    Queue {
        /// Lead seed file; overrides `seed_path` from the config.
        #[arg(long)]
        seed: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Category::All)]
        tab: Category,
        /// Case-insensitive search over name, vehicle and email.
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = SortKey::Priority)]
        sort: SortKey,
        /// `all`, a priority tier, or a status.
        #[arg(long, default_value = "all")]
        filter: String,
        /// Re-render every N seconds, picking up weight changes in the config.
        #[arg(long)]
        refresh_seconds: Option<u64>,
    },

    /// Send a message and wait for the simulated reply.
    Send {
        /// Lead seed file; overrides `seed_path` from the config.
        #[arg(long)]
        seed: Option<PathBuf>,
        /// Lead identifier.
        #[arg(long)]
        lead: String,
        /// Message text.
        #[arg(long)]
        message: String,
        #[arg(long, value_enum, default_value_t = Channel::Text)]
        channel: Channel,
    },

    /// Show the journey view and successor for a stage name.
    Stage {
        /// Stage name, e.g. `proposal`.
        name: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = match args.config {
        Some(ref path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    info!("configuration loaded");

    match args.command {
        Command::Queue {
            seed,
            tab,
            search,
            sort,
            filter,
            refresh_seconds,
        } => {
            let store = load_store(seed, &config)?;
            let query = QueueQuery {
                category: tab,
                search,
                sort,
                filter: filter.parse().unwrap_or_default(),
            };
            match (refresh_seconds, args.config) {
                (Some(secs), Some(path)) => {
                    let watcher = WeightsWatcher::new(&path)?;
                    watch_queue(&store, &query, &watcher, Duration::from_secs(secs.max(1))).await
                }
                (Some(_), None) => Err(AppError::Config(
                    "--refresh-seconds requires --config".into(),
                )),
                (None, _) => render_queue(&store, &query, config.scoring),
            }
        }
        Command::Send {
            seed,
            lead,
            message,
            channel,
        } => {
            let store = load_store(seed, &config)?;
            send_and_wait(store, &config, &lead, &message, channel).await
        }
        Command::Stage { name } => {
            let stage: JourneyStage = name.parse()?;
            let next = advance_named(&name)?;
            print_json(&json!({
                "view": StageView::for_stage(stage),
                "next": next,
            }))
        }
    }
}

fn load_store(seed: Option<PathBuf>, config: &GlobalConfig) -> Result<LeadStore> {
    let path = seed
        .or_else(|| config.seed_path.clone())
        .ok_or_else(|| AppError::Config("no seed file given (--seed or seed_path)".into()))?;
    let leads = load_seed_file(&path, Utc::now())?;
    info!(path = %path.display(), count = leads.len(), "leads loaded");
    LeadStore::from_leads(leads)
}

fn render_queue(store: &LeadStore, query: &QueueQuery, weights: ScoringWeights) -> Result<()> {
    let scorer = PriorityScorer::new(weights, Utc::now());
    for entry in pipeline::run(store.leads(), query, &scorer)? {
        print_json(&entry_json(&entry))?;
    }
    print_json(&json!({ "tabs": TabCounts::tally(store.leads(), &scorer)? }))
}

async fn watch_queue(
    store: &LeadStore,
    query: &QueueQuery,
    watcher: &WeightsWatcher,
    every: Duration,
) -> Result<()> {
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                return Ok(());
            }
            _ = interval.tick() => {
                render_queue(store, query, watcher.current())?;
            }
        }
    }
}

async fn send_and_wait(
    store: LeadStore,
    config: &GlobalConfig,
    lead_id: &str,
    content: &str,
    channel: Channel,
) -> Result<()> {
    let store = store.into_shared();
    let log = MessageLog::new().into_shared();
    let ct = CancellationToken::new();

    let (event_tx, event_rx) = mpsc::channel(32);
    let (report_tx, mut report_rx) = mpsc::channel(32);
    let consumer = spawn_reply_consumer(
        event_rx,
        store.clone(),
        log.clone(),
        report_tx,
        ct.clone(),
    );

    let simulator = config
        .simulation
        .enabled
        .then(|| ReplySimulator::new(config.reply_delay(), event_tx, ct.clone()));
    let messenger = Messenger::new(store.clone(), log.clone(), simulator);

    let sent = messenger.send_message(lead_id, content, channel).await?;
    print_json(&json!({ "sent": sent }))?;

    if config.simulation.enabled {
        let wait = config.reply_delay() + REPLY_GRACE;
        match tokio::time::timeout(wait, report_rx.recv()).await {
            Ok(Some(report)) => print_json(&json!({ "reply": format!("{:?}", report.outcome) }))?,
            Ok(None) => warn!("reply consumer exited before the reply arrived"),
            Err(_) => warn!(?wait, "no reply within the simulation window"),
        }
    }

    if let Some(lead) = store.lock().await.get(lead_id) {
        print_json(&json!({
            "lead": lead,
            "stage": StageView::for_stage(lead.journey_stage),
            "thread": log.lock().await.thread(lead_id),
        }))?;
    }

    ct.cancel();
    messenger.shutdown().await;
    let _ = consumer.await;
    Ok(())
}

fn entry_json(entry: &QueueEntry<'_>) -> serde_json::Value {
    let lead: &Lead = entry.lead;
    json!({
        "id": lead.id,
        "name": lead.name,
        "vehicle": lead.vehicle,
        "score": entry.score,
        "category": entry.category,
        "priority": lead.priority,
        "status": lead.status,
        "stage": lead.journey_stage,
        "value": lead.value,
        "lastActivity": lead.last_activity.summary,
    })
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
