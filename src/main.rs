// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::{Context, Result};
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crtv::{Category, Config, Engine, Library};

mod cli;
use cli::{ChannelsCommand, InitConfigCommand, OutputFormat};

fn cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(name = "crtv")]
#[command(about = "A 1990s CRT television in your terminal")]
#[command(version)]
#[command(styles = cargo_style())]
struct Cli {
    /// Path to the config file (default: ~/.config/crtv/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging to file (crtv_debug.log)
    #[arg(long, global = true)]
    debug_log: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch the set on and watch (default if no command given)
    Watch {
        /// Remote presses to queue at power-on, e.g. "up" or "select 7"
        #[arg(long)]
        press: Vec<String>,
    },

    /// List the channel line-up
    Channels {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(cli: &Cli) -> Result<()> {
    if cli.debug_log {
        let file = File::create("crtv_debug.log")?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_level(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(EnvFilter::from_default_env().add_directive("crtv=debug".parse()?))
            .init();
    } else if cli.verbose {
        // stderr would tear the TUI, so watch mode only logs to file
        if !matches!(cli.command, Some(Commands::Watch { .. }) | None) {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
                )
                .init();
        }
    } else if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }
    Ok(())
}

fn banner(config: &Config) -> String {
    let mut genres: Vec<&str> = Vec::new();
    for channel in &config.channels {
        let genre = channel.category.genre();
        if channel.category != Category::Other && !genres.contains(&genre) {
            genres.push(genre);
        }
    }
    if genres.is_empty() {
        format!("📺 Channels: {}", config.channels.len())
    } else {
        format!("📺 Channels: {} & More!", genres.join(", "))
    }
}

async fn watch(config: Config, presses: Vec<String>) -> Result<()> {
    let settings = config.engine_settings()?;
    let library = Library::preload(&config.channels);
    let engine = Engine::new(config.channels.clone(), Box::new(library), settings)
        .context("Invalid channel line-up")?;

    println!("🖥️  crtv warming up...");
    println!("{}", banner(&config));

    crtv::run_tui(engine, &presses).await?;

    println!("📺 TV powered off - thanks for watching!");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Some(Commands::InitConfig { force }) => {
            InitConfigCommand {
                path: config_path,
                force,
            }
            .execute()?;
        }

        Some(Commands::Channels { format }) => {
            let config = Config::load_or_default(&config_path)?;
            let cmd = ChannelsCommand {
                format: OutputFormat::from_str(&format)?,
            };
            cmd.execute(&config)?;
        }

        Some(Commands::Watch { press }) => {
            let config = Config::load_or_default(&config_path)?;
            watch(config, press).await?;
        }

        None => {
            let config = Config::load_or_default(&config_path)?;
            watch(config, Vec::new()).await?;
        }
    }

    Ok(())
}
