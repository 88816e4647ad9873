//! Toggle Checkout CLI - Feature flag and pricing tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the effective flags
//! checkout-cli flags show
//!
//! # Turn cash on delivery on
//! checkout-cli flags set enable_cod on --file toggles.json
//!
//! # Price a cart document
//! checkout-cli quote cart.json
//!
//! # Price it under a different shipping rule
//! checkout-cli quote cart.json --threshold 300 --fee 45
//! ```
//!
//! # Commands
//!
//! - `flags show` - Print the flags the server would see
//! - `flags set` - Edit one flag in a flag document
//! - `quote` - Price a cart and show the free-shipping nudge

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use toggle_checkout_core::FeatureFlag;

mod commands;

/// Flag document used when `--file` is not given.
const DEFAULT_FLAGS_PATH: &str = "toggles.json";

#[derive(Parser)]
#[command(name = "checkout-cli")]
#[command(author, version, about = "Toggle Checkout CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit feature flags
    Flags {
        #[command(subcommand)]
        action: FlagsAction,
    },
    /// Price a cart document
    Quote {
        /// JSON array of line items
        cart: PathBuf,

        /// Flag document consulted for the free-shipping nudge
        #[arg(short, long)]
        flags: Option<PathBuf>,

        /// Free-shipping threshold (default: `CHECKOUT_FREE_SHIPPING_THRESHOLD` or 200)
        #[arg(long)]
        threshold: Option<u64>,

        /// Shipping fee below the threshold (default: `CHECKOUT_FLAT_SHIPPING_FEE` or 60)
        #[arg(long)]
        fee: Option<u64>,
    },
}

#[derive(Subcommand)]
enum FlagsAction {
    /// Print the effective value of every flag
    Show {
        /// Flag document (default: `CHECKOUT_FLAGS_PATH` or toggles.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Set one flag, keeping the rest of the document intact
    Set {
        /// Flag key (`enable_cod`, `enable_free_shipping_nudge`)
        #[arg(value_parser = parse_flag)]
        flag: FeatureFlag,

        /// New value
        value: Switch,

        /// Flag document (default: `CHECKOUT_FLAGS_PATH` or toggles.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

fn parse_flag(raw: &str) -> Result<FeatureFlag, String> {
    raw.parse::<FeatureFlag>().map_err(|e| e.to_string())
}

/// Resolve the flag document path the same way the server does.
fn flags_path(file: Option<PathBuf>) -> PathBuf {
    file.or_else(|| std::env::var_os("CHECKOUT_FLAGS_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FLAGS_PATH))
}

#[tokio::main]
async fn main() {
    // Pick up CHECKOUT_FLAGS_PATH from .env, like the server
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Flags { action } => match action {
            FlagsAction::Show { file } => commands::flags::show(&flags_path(file)).await,
            FlagsAction::Set { flag, value, file } => {
                commands::flags::set(&flags_path(file), flag, value.enabled()).await?;
            }
        },
        Commands::Quote {
            cart,
            flags,
            threshold,
            fee,
        } => {
            let rule =
                commands::quote::shipping_rule(threshold, fee, |key| std::env::var(key).ok())?;
            commands::quote::run(&cart, flags.as_deref(), rule).await?;
        }
    }
    Ok(())
}
