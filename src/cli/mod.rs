//! Command-line surfaces: one-shot acquisition, the control surface and a
//! projector surface.

pub mod acquire;
pub mod control;
pub mod projector;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Projection control and content packs for live meeting displays", long_about = None)]
pub struct Cli {
    /// Config file (default: ./lectern.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Acquire a configured resource and report which tier served it
    Acquire {
        /// Resource id from `[resources.<id>]`
        resource: String,
        /// Skip bundled and cached data and download again
        #[arg(short, long)]
        force: bool,
    },
    /// Run the control surface, reading commands from stdin
    Control {
        /// Hymnal resource id (default: first configured hymnal)
        #[arg(long)]
        hymnal: Option<String>,
        /// Scripture resource id (default: first configured scripture)
        #[arg(long)]
        bible: Option<String>,
    },
    /// Attach a projector surface and print every frame it renders
    Projector,
}
