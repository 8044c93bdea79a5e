//! GoMarketplace CLI - Drive the persistent cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cli list
//!
//! # Add a product
//! gm-cli add --id sku-1 --title "Mug" --image-url https://img/mug.png --price 12.50
//!
//! # Change quantities
//! gm-cli increment sku-1
//! gm-cli decrement sku-1
//! ```
//!
//! The cart is stored under `GOMARKETPLACE_DATA_DIR` (default `.gomarketplace`),
//! keyed by `GOMARKETPLACE_STORAGE_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gomarketplace_core::Price;

mod commands;

/// Data directory used when neither `--data-dir` nor the environment set one.
const DEFAULT_DATA_DIR: &str = ".gomarketplace";

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents and totals
    List,
    /// Add a product to the cart with a quantity of one
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Display name
        #[arg(short, long)]
        title: String,

        /// Display image URL
        #[arg(short, long)]
        image_url: String,

        /// Unit price (e.g. `12.50`)
        #[arg(short, long)]
        price: Price,
    },
    /// Increase a product's quantity by one
    Increment {
        /// Product ID
        id: String,
    },
    /// Decrease a product's quantity by one
    Decrement {
        /// Product ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarketplace_cart=info,gm_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = commands::cart::open(cli.data_dir, DEFAULT_DATA_DIR).await?;

    match cli.command {
        Commands::List => commands::cart::list(&store),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(&store, id, title, image_url, price),
        Commands::Increment { id } => commands::cart::increment(&store, &id.into()),
        Commands::Decrement { id } => commands::cart::decrement(&store, &id.into()),
    }

    store.flush().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "gm-cli", "add", "--id", "sku-1", "-t", "Mug", "-i", "u", "-p", "12.50",
        ])
        .unwrap();

        let Commands::Add { id, price, .. } = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(id, "sku-1");
        assert_eq!(price, Price::from_cents(1250));
    }

    #[test]
    fn test_parse_rejects_invalid_price() {
        let result = Cli::try_parse_from([
            "gm-cli", "add", "--id", "x", "-t", "T", "-i", "u", "-p", "cheap",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_data_dir() {
        let cli = Cli::try_parse_from(["gm-cli", "increment", "x", "--data-dir", "/tmp/cart"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/cart")));
    }
}
