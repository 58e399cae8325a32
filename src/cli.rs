//! Command-line interface definition for Titler
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for title generation, fallback preview,
//! and conversation history.

use clap::{Parser, Subcommand};

/// Titler - conversation title generation
///
/// Generates short conversation titles with an LLM, falling back to a
/// deterministic title when generation is unavailable or too slow.
#[derive(Parser, Debug, Clone)]
#[command(name = "titler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the conversation database path
    #[arg(long, env = "TITLER_HISTORY_DB")]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Titler
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate and persist a title for a conversation
    Title {
        /// User that owns the conversation
        #[arg(short, long)]
        user: String,

        /// Conversation identifier
        #[arg(short = 'C', long)]
        conversation: String,

        /// Message text the title is derived from
        #[arg(short, long)]
        text: Option<String>,

        /// Disable title generation for this client instance
        #[arg(long)]
        no_client_title: bool,
    },

    /// Print the deterministic fallback title for some text
    Fallback {
        /// Message text
        text: String,
    },

    /// Manage stored conversation titles
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored conversations
    List {
        /// Only show conversations owned by this user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show a single conversation
    Show {
        /// Conversation ID (full or 8-char prefix)
        id: String,
    },

    /// Delete a conversation
    Delete {
        /// Conversation ID (full or 8-char prefix)
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
