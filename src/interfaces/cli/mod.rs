//! CLI interface module
//!
//! This module provides command-line interface functionality for smartslug.

pub mod commands;

use std::fmt;

use serde::Serialize;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::SmartSlugError;
use commands::{config_generate, generate_slug, heuristic_slug, learn_slug_pattern, show_signals};

#[derive(Debug)]
pub enum CliError {
    ParseError(String),
    CommandError(String),
    Engine(SmartSlugError),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
            CliError::Engine(e) => e.format_simple(),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
            CliError::Engine(e) => e.format_colored(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<SmartSlugError> for CliError {
    fn from(err: SmartSlugError) -> Self {
        CliError::Engine(err)
    }
}

/// Print `value` as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::CommandError(format!("JSON encoding failed: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, json: bool) -> Result<(), CliError> {
    match cmd {
        Commands::Generate {
            url,
            metadata,
            tier,
            style,
            avoid,
            include,
            history,
            brand_guidelines,
            user_id,
            taken,
            no_ai,
        } => {
            let options = commands::GenerateOptions {
                url,
                metadata,
                tier,
                style,
                avoid,
                include,
                history,
                brand_guidelines,
                user_id,
                taken,
                no_ai,
            };
            generate_slug(options, json).await
        }

        Commands::Heuristic { url } => heuristic_slug(url, json),

        Commands::Signals { metadata } => show_signals(metadata, json),

        Commands::Pattern { slugs } => learn_slug_pattern(slugs, json),

        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
        },
    }
}
