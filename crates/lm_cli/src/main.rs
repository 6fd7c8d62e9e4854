//! Livematch demo CLI
//!
//! Creates one match, starts it, and streams the event feed to stdout
//! until full time. Match records land in the data directory and can
//! be inspected after the process exits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use lm_core::EventKind;
use lm_host::{
    FileMatchStore, HeuristicAdvisor, MatchFeed, MatchService, NullAdvisor, TacticsAdvisor,
};

#[derive(Parser)]
#[command(name = "livematch")]
#[command(about = "Run a simulated football match and stream its events", long_about = None)]
struct Cli {
    /// Home team name
    #[arg(long, default_value = "Red")]
    home: String,

    /// Away team name
    #[arg(long, default_value = "Blue")]
    away: String,

    /// Directory for durable match records
    #[arg(long, default_value = "matches")]
    data_dir: PathBuf,

    /// RNG seed (random when omitted; same seed replays the same match)
    #[arg(long)]
    seed: Option<u64>,

    /// Run without the built-in heuristic advisor
    #[arg(long, default_value = "false")]
    no_advisor: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(FileMatchStore::new(&cli.data_dir)?);
    let advisor: Arc<dyn TacticsAdvisor> =
        if cli.no_advisor { Arc::new(NullAdvisor) } else { Arc::new(HeuristicAdvisor) };
    let service = MatchService::new(store, advisor);

    let id = match cli.seed {
        Some(seed) => service.create_match_with_seed(&cli.home, &cli.away, seed)?,
        None => service.create_match(&cli.home, &cli.away)?,
    };
    let mut feed = service.subscribe(id)?;
    service.start_match(id).await?;
    println!("{} vs {} (match {})", cli.home, cli.away, id);

    loop {
        match feed.recv().await {
            Ok(MatchFeed::Event(event)) => {
                match event.kind {
                    EventKind::StateUpdate => {}
                    EventKind::Goal => {
                        let snap = service.snapshot(id).await?;
                        println!(
                            "{:>5.1}' GOAL! {} {} - {} {}",
                            event.clock_min,
                            snap.home_name,
                            snap.score.0,
                            snap.score.1,
                            snap.away_name
                        );
                    }
                    kind => {
                        let who =
                            event.player.map(|p| format!(" ({})", p)).unwrap_or_default();
                        println!("{:>5.1}' {:?}{}", event.clock_min, kind, who);
                    }
                }
                if event.kind == EventKind::GameEnd {
                    break;
                }
            }
            Ok(MatchFeed::Snapshot(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                eprintln!("feed lagged, skipped {} messages", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    let record = service.persisted(id)?;
    println!(
        "full time: {} {} - {} {}",
        record.home.name, record.home.score, record.away.score, record.away.name
    );
    Ok(())
}
