//! CLI command implementations.
//!
//! Commands return their output as text; `main` writes it to stdout.

pub mod cart;
pub mod catalog;

use aurelia_storefront::catalog::CatalogError;
use thiserror::Error;

/// Errors that can stop a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog file could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(output: &str) {
    print!("{output}");
}
