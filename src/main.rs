use clap::Parser;
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use slot_lottery::SlotConfig;
use std::{
    path::PathBuf,
    sync::OnceLock,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

mod client;
mod ui;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "slot-lottery", about = "Draw lottery winners on animated slot reels")]
struct Args {
    /// JSON array of `{ "number": .., "display_name": .. }` candidates
    #[arg(long)]
    candidates: Option<PathBuf>,

    /// JSON file overriding the reel settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replays the same draws for the same text
    #[arg(long)]
    seed: Option<String>,

    /// Size of the made-up pool used without --candidates
    #[arg(long, default_value_t = 40)]
    demo_size: usize,

    /// Write logs to ./logs/slot-lottery.log.<date>
    #[arg(long)]
    tracing: bool,
}

fn init_tracing() {
    let file = rolling::daily("logs", "slot-lottery.log");
    let (writer, guard) = tracing_appender::non_blocking(file);
    let _ = LOG_GUARD.set(guard);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    if args.tracing {
        init_tracing();
    }
    tracing::info!("starting slot-lottery");

    let slot = match &args.config {
        Some(path) => SlotConfig::from_json_file(path)
            .wrap_err_with(|| format!("loading config from {}", path.display()))?,
        None => SlotConfig::default(),
    };
    client::run_app(client::AppConfig {
        slot,
        candidates: args.candidates,
        seed: args.seed,
        demo_size: args.demo_size,
    })
    .await
}
