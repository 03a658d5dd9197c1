//! Command-line interface for codepocket.
//! This module wires the snippet and settings stores to terminal commands,
//! letting users manage their library without any graphical frontend. The
//! stores are constructed once per invocation and passed by reference into
//! the individual command handlers.

pub mod commands;

use crate::models::{SettingsStore, SnippetStore, Storage};
use colored::Colorize;
use std::error::Error;

/// Executes CLI commands based on the provided arguments
pub fn execute_cli(args: &[String]) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        // No arguments provided, show help
        print_help();
        return Ok(());
    }

    let storage = Storage::open(Storage::default_dir()?)?;
    let mut snippets = SnippetStore::load(storage.clone());
    let mut settings = SettingsStore::load(storage);

    match args[0].as_str() {
        "list" | "ls" => {
            commands::list_snippets(&snippets, &settings, &args[1..])?;
        }
        "show" | "view" | "cat" => {
            if args.len() < 2 {
                println!(
                    "{}  Error: Missing snippet name or ID",
                    "┃".bright_magenta()
                );
                println!(
                    "{}  Usage: codepocket show <SNIPPET_NAME_OR_ID>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::show_snippet(&snippets, &args[1]);
        }
        "search" | "find" => {
            if args.len() < 2 {
                println!("{}  Error: Missing search query", "┃".bright_magenta());
                println!(
                    "{}  Usage: codepocket search <QUERY>",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::search_snippets(&snippets, &args[1]);
        }
        "tags" => {
            commands::list_tags(&snippets);
        }
        "folders" => {
            commands::list_folders(&snippets);
        }
        "languages" | "langs" => {
            commands::list_languages(&snippets);
        }
        "add" | "new" => {
            commands::add_snippet(&mut snippets, &settings, &args[1..])?;
        }
        "edit" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet ID", "┃".bright_magenta());
                println!(
                    "{}  Usage: codepocket edit <SNIPPET_ID> [OPTIONS]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::edit_snippet(&mut snippets, &args[1], &args[2..])?;
        }
        "delete" | "rm" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet ID", "┃".bright_magenta());
                println!(
                    "{}  Usage: codepocket delete <SNIPPET_ID> [--yes]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::delete_snippet(&mut snippets, &args[1], &args[2..])?;
        }
        "assist" | "ai" => {
            if args.len() < 2 {
                println!("{}  Error: Missing snippet ID", "┃".bright_magenta());
                println!(
                    "{}  Usage: codepocket assist <SNIPPET_ID> [--apply]",
                    "┃".bright_magenta()
                );
                return Ok(());
            }

            commands::assist_snippet(&mut snippets, &args[1], &args[2..])?;
        }
        "settings" | "config" => {
            commands::settings_command(&mut settings, &args[1..])?;
        }
        "help" => {
            print_help();
        }
        _ => {
            println!("{}  Unknown command: {}", "┃".bright_magenta(), args[0]);

            print_help();
        }
    }

    Ok(())
}

/// Prints the help message with available commands
fn print_help() {
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "CODEPOCKET - CODE SNIPPET MANAGER".bold()
    );

    println!("{}  {}", "┃".bright_magenta(), "USAGE:".bright_yellow());
    println!("{}  codepocket [COMMAND] [ARGS]", "┃".bright_magenta());
    println!("{}  {}", "┃".bright_magenta(), "COMMANDS:".bright_yellow());
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "list, ls [OPTIONS]".bright_white(),
        "List snippets; filter with --folder, --tag, --lang, --query"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "show, view <NAME_OR_ID>".bright_white(),
        "Display a snippet by ID or title (partial title works)"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "search, find <QUERY>".bright_white(),
        "Search snippet titles and descriptions"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "tags".bright_white(),
        "List every tag across the library"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "folders".bright_white(),
        "List folders with snippet counts"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "languages, langs".bright_white(),
        "List the language catalog"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "add, new [OPTIONS]".bright_white(),
        "Create a snippet; code from --file, --code, or stdin"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "edit <ID> [OPTIONS]".bright_white(),
        "Update the given fields of a snippet"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "delete, rm <ID> [--yes]".bright_white(),
        "Delete a snippet after confirmation"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "assist, ai <ID> [--apply]".bright_white(),
        "Generate a description and tags with a local model"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "settings [show|set|reset]".bright_white(),
        "Show or change settings (set takes KEY VALUE pairs)"
    );
    println!(
        "{}  {:<34} {}",
        "┃".bright_magenta(),
        "help".bright_white(),
        "Display this help message"
    );
}
