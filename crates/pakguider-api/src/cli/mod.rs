//! CLI command definitions for the `pakguider` binary.
//!
//! Uses clap derive macros for argument parsing. Every command shares the
//! same global flags for output format, verbosity and configuration.

pub mod ask;
pub mod chat;
pub mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Pakistan tourist guide: answers travel questions from official documents.
#[derive(Parser)]
#[command(name = "pakguider", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a pakguider.toml config file.
    #[arg(long, global = true, env = "PAKGUIDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Exit at startup if either provider fails its connectivity probe.
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web chat server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Interactive chat in the terminal.
    Chat,

    /// Answer a single question and exit.
    Ask {
        /// The question to ask.
        question: String,
    },

    /// Probe the search and completion providers.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["pakguider", "serve", "--port", "9000", "--fail-fast"]).unwrap();
        assert!(cli.fail_fast);
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "pakguider",
            "-vv",
            "ask",
            "What is the visa policy?",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Ask { ref question } if question == "What is the visa policy?"));
    }
}
