mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use config::KbdctlConfig;

/// Inspect and switch keyboards through the system layout switcher and IBus.
#[derive(Parser)]
#[command(name = "kbdctl", version)]
struct Args {
    /// TOML file with [controller], [xkb] and [ibus] tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available keyboards.
    List {
        /// Include keyboards that are no longer installed.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Resolve a keyboard identifier (`layout-locale`, `layout|locale` or a legacy id).
    Resolve { id: String },
    /// Resolve the keyboard named by obsolete writing-system fields.
    Legacy {
        /// Windows locale identifier, e.g. 1033.
        #[arg(long)]
        lcid: Option<String>,
        /// Old keyboard name, e.g. "German-de-DE".
        #[arg(long)]
        keyboard: Option<String>,
        #[arg(long, default_value = "und")]
        language: String,
    },
    /// Activate a keyboard.
    Activate { id: String },
    /// Show the active keyboard.
    Active,
    /// Show the system default keyboard.
    Default,
    /// Show the programs that configure keyboards.
    Setup,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = KbdctlConfig::load(args.config.as_deref())?;
    let mut controller = commands::start(config)?;

    let result = match args.command {
        Command::List { all, json } => commands::list(&controller, all, json),
        Command::Resolve { id } => commands::resolve(&controller, &id),
        Command::Legacy { lcid, keyboard, language } => {
            commands::legacy(&controller, language, lcid, keyboard)
        }
        Command::Activate { id } => commands::activate(&mut controller, &id),
        Command::Active => commands::active(&mut controller),
        Command::Default => commands::default(&controller),
        Command::Setup => commands::setup(&controller),
    };

    controller.shutdown();
    result
}
