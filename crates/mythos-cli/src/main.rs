//! MythOS - a small multi-user interactive shell
//!
//! # Data directory
//!
//! Resolved with priority:
//!
//! 1. `--data-dir`
//! 2. `MYTHOS_HOME`
//! 3. The platform data directory (`~/.local/share/mythos` on Linux)
//! 4. `./mythos`
//!
//! It holds `mythos.json`, the account store, the namespace tree and
//! `mythos.log`.

use anyhow::{Context, Result};
use clap::Parser;
use mythos_cli::{boot, failure_report, CrosstermTerminal};
use mythos_core::account::AccountStore;
use mythos_core::config::{resolve_data_dir, ShellConfig, HOME_ENV};
use mythos_core::shell::format_line;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// MythOS - a small multi-user interactive shell
#[derive(Parser, Debug)]
#[command(name = "mythos")]
#[command(version, about, long_about = None)]
struct Args {
    /// Data directory (also: MYTHOS_HOME)
    #[arg(long, value_name = "DIR", env = HOME_ENV)]
    data_dir: Option<PathBuf>,

    /// Lock a login after this many wrong passwords
    #[arg(long, value_name = "N")]
    max_login_attempts: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Write an empty account store and exit
    #[arg(long)]
    init: bool,
}

fn init_tracing(data_dir: &Path, debug: bool) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;
    let log_path = data_dir.join("mythos.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("cannot open {}", log_path.display()))?;

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // The screen is in raw mode, so logs only go to the file
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn run(args: Args, data_dir: PathBuf) -> Result<i32> {
    let mut config = ShellConfig::load(&data_dir)?;
    if args.max_login_attempts.is_some() {
        config.max_login_attempts = args.max_login_attempts;
    }

    if args.init {
        let path = config.account_path();
        AccountStore::initialize(&path)?;
        println!("Initialized account store at {}", path.display());
        return Ok(0);
    }

    let mut term = CrosstermTerminal::new().context("cannot enter raw mode")?;
    let code = boot(&mut term, config).await?;
    Ok(code)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = resolve_data_dir(args.data_dir.clone(), None);
    init_tracing(&data_dir, args.debug)?;

    info!(data_dir = %data_dir.display(), "MythOS v{}", env!("CARGO_PKG_VERSION"));

    match run(args, data_dir).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let (level, status) = failure_report(&e);
            error!("{}: {:#}", level.label(), e);
            eprintln!("{}", format_line(level, &format!("{:#}", e)));
            std::process::exit(status);
        }
    }
}
