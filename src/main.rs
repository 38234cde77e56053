//! inkpot - a small static site generator for Markdown sites.

mod cli;
mod config;
mod filter;
mod logger;
mod markdown;
mod page;
mod passthrough;
mod plugin;
mod shortcode;
mod site;
mod template;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_site};
use config::SiteConfig;

fn main() {
    if let Err(err) = run() {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { name } => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            let root = match name {
                Some(name) => cwd.join(name),
                None => cwd,
            };
            cli::init::new_site(&root, name.is_some())
        }
        Commands::Build { .. } => build_site(&config).map(|_| ()),
    }
}
