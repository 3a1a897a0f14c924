// ABOUTME: CLI command definitions using clap.
// ABOUTME: Handles subcommands like process, doctor, config.

pub mod doctor;
pub mod process;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lingo",
    version,
    about = "Detect, translate, and summarize text with host AI capabilities"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Capability host URL override
    #[arg(long, global = true)]
    pub host: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run text through detection, then optional summary and translations
    Process {
        /// Text to process
        text: String,
        /// Target language code; repeat for several targets
        #[arg(short, long = "translate", value_name = "CODE")]
        translate: Vec<String>,
        /// Summarize when the text is eligible
        #[arg(short, long)]
        summarize: bool,
        /// Print the message record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Probe the capability host and report readiness
    Doctor,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Show version
    Version,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Show config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
