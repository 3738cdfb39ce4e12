//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Grouped course navigation: term headers, past/ongoing groups and disclosure toggles
#[derive(Parser, Debug)]
#[command(name = "coursenav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(long, global = true, env = "COURSENAV_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the menu from a snapshot and print it
    Render {
        /// Snapshot TOML file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Print HTML instead of the tree view
        #[arg(long)]
        html: bool,
    },

    /// Build the menu, click the past group label and print the result
    Toggle {
        /// Snapshot TOML file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,

        /// Number of clicks
        #[arg(short = 'n', long, default_value_t = 1)]
        times: u32,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Show global config file location
    Path,
}
