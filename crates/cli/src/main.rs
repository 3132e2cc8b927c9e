//! Aurelia CLI - catalog listing and a file-backed cart.
//!
//! # Usage
//!
//! ```bash
//! # List every product, or one category
//! aurelia-cli catalog
//! aurelia-cli catalog --category Tables
//!
//! # Work with the cart stored under ./.aurelia
//! aurelia-cli cart show
//! aurelia-cli cart add 2
//! aurelia-cli cart remove 2
//! ```
//!
//! # Environment Variables
//!
//! - `AURELIA_STORE_DIR` - Cart store directory (default: ./.aurelia)
//! - `AURELIA_CATALOG_PATH` - JSON catalog file replacing the built-in collection

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use aurelia_core::ProductId;
use aurelia_storefront::catalog::Catalog;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "aurelia-cli")]
#[command(author, version, about = "Aurelia CLI tools")]
struct Cli {
    /// Directory holding the cart file
    #[arg(long, global = true, env = "AURELIA_STORE_DIR", default_value = ".aurelia")]
    store: PathBuf,

    /// JSON catalog file (defaults to the built-in collection)
    #[arg(long, global = true, env = "AURELIA_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog {
        /// Only list this category ("All" lists everything)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Render the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove a product's line entirely
    Remove {
        /// Product id
        id: ProductId,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => commands::emit(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, commands::CliError> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    let output = match cli.command {
        Commands::Catalog { category } => commands::catalog::list(&catalog, category.as_deref()),
        Commands::Cart { action } => commands::cart::run(&catalog, &cli.store, &action),
    };
    Ok(output)
}
