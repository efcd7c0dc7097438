//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for smartslug using clap's derive macros.

use clap::{Args, Parser, Subcommand};

use crate::models::SlugStyle;

/// smartslug - readable slug suggestions for a URL shortener
#[derive(Parser)]
#[command(name = "smartslug")]
#[command(version)]
#[command(about = "Generate human-readable short-link slugs", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Print machine-readable JSON instead of colored text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Page metadata flags shared by `generate` and `signals`
#[derive(Args, Debug, Clone, Default)]
pub struct MetadataArgs {
    /// Page title
    #[arg(long)]
    pub title: Option<String>,

    /// Page description
    #[arg(long)]
    pub description: Option<String>,

    /// Displayed price text (e.g. "$19.99")
    #[arg(long)]
    pub price: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a slug for a URL (AI with heuristic fallback)
    Generate {
        /// Destination URL
        url: String,

        #[command(flatten)]
        metadata: MetadataArgs,

        /// Subscription tier (free, starter, pro, business, enterprise)
        #[arg(long)]
        tier: Option<String>,

        /// Slug style (descriptive, short, branded, promotional)
        #[arg(long)]
        style: Option<SlugStyle>,

        /// Words that must never appear (comma separated)
        #[arg(long, value_delimiter = ',')]
        avoid: Vec<String>,

        /// Words to include when possible (comma separated)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,

        /// Previous slugs of the user, most recent first
        #[arg(long = "history", value_delimiter = ',')]
        history: Vec<String>,

        /// User has brand guidelines on file
        #[arg(long)]
        brand_guidelines: bool,

        /// User id passed to usage accounting
        #[arg(long)]
        user_id: Option<String>,

        /// Slugs already taken; resolves collisions against them
        #[arg(long, value_delimiter = ',')]
        taken: Vec<String>,

        /// Skip the AI path even if an API key is configured
        #[arg(long)]
        no_ai: bool,
    },

    /// Heuristic slug only, no network
    Heuristic {
        /// Destination URL
        url: String,
    },

    /// Detect promotional signals in page metadata
    Signals {
        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Learn the naming pattern from a list of slugs (most recent first)
    Pattern {
        #[arg(required = true, num_args = 1..)]
        slugs: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "smartslug",
            "--json",
            "generate",
            "https://example.com/a",
            "--title",
            "50% off",
            "--style",
            "Short",
            "--avoid",
            "cheap,free",
            "--taken",
            "Example.A",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Generate {
                url,
                metadata,
                style,
                avoid,
                taken,
                ..
            } => {
                assert_eq!(url, "https://example.com/a");
                assert_eq!(metadata.title.as_deref(), Some("50% off"));
                assert_eq!(style, Some(SlugStyle::Short));
                assert_eq!(avoid, vec!["cheap", "free"]);
                assert_eq!(taken, vec!["Example.A"]);
            }
            _ => panic!("expected generate"),
        }
    }
}
