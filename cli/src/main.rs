mod console;
mod logging;
mod tail;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use telop_core::config::AppConfigExt;
use telop_core::telops::{TelopOverlayManager, TelopTable, TickerMatcher, load_telops_from_dir};
use telop_core::{
    AppConfig, AudioPlayer, CombatantPoller, DetachedSource, SettingsHandle, SnapshotStore,
    TelemetrySource,
};

use console::{ConsoleAudio, ConsoleSurfaceFactory, PositionStore};

#[derive(Parser)]
#[command(version, about = "Log-triggered telop overlay engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine against a live combat log
    Run {
        /// Tail this specific log file
        #[arg(short = 'f', long)]
        log_file: Option<PathBuf>,

        /// Watch this directory, following the newest log file in it
        #[arg(short = 'd', long)]
        log_dir: Option<PathBuf>,

        /// Directory of telop definition TOML files
        #[arg(short, long)]
        telops: Option<PathBuf>,

        /// Keep every telop on screen regardless of matches (layout mode)
        #[arg(long)]
        always_visible: bool,
    },
    /// Validate telop definition files and exit
    Check {
        /// Directory of telop definition TOML files
        #[arg(short, long)]
        telops: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            log_file,
            log_dir,
            telops,
            always_visible,
        } => run(log_file, log_dir, telops, always_visible).await,
        Commands::Check { telops } => check(telops),
    }
}

async fn run(
    log_file: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    telops_dir: Option<PathBuf>,
    always_visible: bool,
) -> Result<(), String> {
    let _guard = logging::init();

    let mut config = AppConfig::load();
    if let Some(dir) = &telops_dir {
        config.telop_directory = dir.display().to_string();
    }
    if let Some(dir) = &log_dir {
        config.log_directory = dir.display().to_string();
    }
    if always_visible {
        config.overlay.telop_always_visible = true;
    }

    // Definitions, with persisted positions layered over the files
    let mut definitions = load_telops_from_dir(PathBuf::from(&config.telop_directory).as_path())
        .map_err(|e| format!("failed to load telop definitions: {e}"))?;
    for def in &mut definitions {
        if let Some(position) = config.position_of(def.id) {
            def.left = position.left;
            def.top = position.top;
        }
    }
    info!(telops = definitions.len(), "starting telop engine");

    let table = Arc::new(TelopTable::new());
    table.set_definitions(definitions);

    let settings = Arc::new(SettingsHandle::new(config.overlay.clone()));
    let snapshots = Arc::new(SnapshotStore::new());
    let audio: Arc<dyn AudioPlayer> = Arc::new(ConsoleAudio);

    let (wake_tx, mut wake_rx) = mpsc::unbounded_channel();
    let matcher = TickerMatcher::new(
        Arc::clone(&table),
        Arc::clone(&snapshots),
        Arc::clone(&settings),
        Arc::clone(&audio),
        wake_tx,
    );
    let mut manager = TelopOverlayManager::new(
        Arc::clone(&table),
        Arc::clone(&settings),
        Arc::clone(&audio),
        Box::new(ConsoleSurfaceFactory),
    );
    let mut positions = PositionStore::new(config.clone());

    // No telemetry integration is wired in this host; the engine runs in its
    // detached mode (no party-name substitution, matching fully live).
    let telemetry: Arc<dyn TelemetrySource> = Arc::new(DetachedSource);
    let mut poller = CombatantPoller::new(
        telemetry,
        Arc::clone(&snapshots),
        Duration::from_millis(config.poll_interval_ms),
    );
    poller.start();

    let cancel = CancellationToken::new();
    let (line_tx, mut line_rx) = mpsc::channel(64);
    let tail_task = tokio::spawn(tail::run_tail(
        log_file,
        (!config.log_directory.is_empty()).then(|| PathBuf::from(&config.log_directory)),
        line_tx,
        cancel.clone(),
    ));

    let mut refresh = tokio::time::interval(Duration::from_millis(100));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            Some(lines) = line_rx.recv() => {
                matcher.match_lines(&lines, Local::now().naive_local());
            }
            Some(id) = wake_rx.recv() => {
                manager.refresh_telop(id, Local::now().naive_local());
            }
            _ = refresh.tick() => {
                let now = Local::now().naive_local();
                manager.refresh(now);
                manager.garbage_collect();
                manager.execute_close(&mut positions);
            }
        }
    }

    // Cooperative shutdown: stop the background loops, then close every
    // telop through the same deferred pass used at runtime.
    poller.stop().await;
    cancel.cancel();
    let _ = tail_task.await;
    manager.close_telops();
    manager.execute_close(&mut positions);

    info!("telop engine stopped");
    Ok(())
}

fn check(telops_dir: PathBuf) -> Result<(), String> {
    let definitions = load_telops_from_dir(&telops_dir)
        .map_err(|e| format!("failed to load telop definitions: {e}"))?;

    if definitions.is_empty() {
        println!("no telop definitions found in {}", telops_dir.display());
        return Ok(());
    }

    for def in &definitions {
        let condition = if def.keyword.trim().is_empty() {
            "no primary condition".to_string()
        } else if def.regex_enabled {
            format!("pattern: {}", def.keyword)
        } else {
            format!("keyword: {}", def.keyword)
        };
        println!(
            "{:>6}  {:<30} {} (delay {:.1}s, display {:.1}s)",
            def.id, def.title, condition, def.delay_secs, def.display_secs
        );
    }
    println!("{} telop definition(s) OK", definitions.len());
    Ok(())
}
