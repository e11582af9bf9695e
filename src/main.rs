//! # ProEdit - A Small Multi-Tab Text Editor
//!
//! Plain-text tabs with a line-number gutter, find and replace, and a
//! cosmetic language tag.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Run with a file
//! cargo run -- path/to/notes.txt
//!
//! # Run with a config file
//! cargo run -- --config proedit.toml
//! ```

mod frontend;

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proedit_core::{Config, Editor};

use crate::frontend::Terminal;

/// ProEdit - a small multi-tab text editor
#[derive(Parser, Debug)]
#[command(name = "proedit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting ProEdit v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    let gutter_width = config.ui.gutter_width;
    println!("{} - type :help for commands", config.ui.banner());

    let mut editor = Editor::with_config(config);
    if let Some(file) = &args.file {
        editor
            .open_path(file)
            .with_context(|| format!("Failed to open {}", file.display()))?;
    }

    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout(), gutter_width);
    terminal.run(&mut editor).context("Terminal I/O failed")?;

    if editor.has_unsaved_changes() {
        tracing::info!("Exited with unsaved changes");
    }
    Ok(())
}
