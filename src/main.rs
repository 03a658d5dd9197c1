//! codepocket - Code Snippet Manager
//!
//! A local-first tool for storing, organizing, and retrieving code snippets
//! from the terminal. Snippets and preferences persist as plain JSON blobs
//! under the platform data directory, so the library survives restarts and
//! never needs a server.
//!
//! codepocket provides developers with a single place to:
//! - Save frequently used code snippets with a title, language, and folder
//! - Tag snippets and filter the library by folder, tag, language, or text
//! - Tune presentation and editor preferences kept in a flat settings record
//! - Optionally generate descriptions and tags with a locally running model

use std::env;
use std::error::Error;

mod cli;
mod filter;
mod handlers;
mod models;

fn main() -> Result<(), Box<dyn Error>> {
    color_eyre::install()?;

    let args: Vec<String> = env::args().skip(1).collect();
    cli::execute_cli(&args)
}
