// ABOUTME: Entry point for the lingo binary.
// ABOUTME: Parses CLI args and launches the TUI or runs subcommands.

use clap::Parser;
use lingo_tui::cli::{self, Cli, Command, ConfigAction};
use lingo_tui::state::config::Config;
use std::future::Future;

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal, so its logs go to a file
    if cli.command.is_none() {
        lingo_log::init_file("lingo");
    } else {
        lingo_log::init();
    }

    let config = match Config::load(cli.host.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Some(Command::Version) => {
            println!("lingo {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Command::Config { action }) => {
            if let Err(e) = handle_config_command(action, &config) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Doctor) => block_on(cli::doctor::run(&config)),
        Some(Command::Process {
            text,
            translate,
            summarize,
            json,
        }) => block_on(cli::process::run(&config, &text, translate, summarize, json)),
        None => block_on(async {
            lingo_tui::run_tui(&config).await?;
            Ok::<(), anyhow::Error>(())
        }),
    }
}

fn block_on(fut: impl Future<Output = anyhow::Result<()>>) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(fut) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_config_command(action: Option<ConfigAction>, config: &Config) -> anyhow::Result<()> {
    match action {
        Some(ConfigAction::Path) => {
            println!("{}", Config::config_path()?.display());
        }
        Some(ConfigAction::Init { force }) => {
            let path = Config::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
        }
        Some(ConfigAction::Show) | None => {
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}
