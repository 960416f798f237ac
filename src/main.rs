use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use grid_topology::commands::topology::{self, CommonOpts, TopologyCommand};
use grid_topology::util;

#[derive(Parser, Debug)]
#[command(name = "grid_topology", version, about = "Turn road/building grids into topological graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify grid cells and connect graph nodes
    Topology {
        #[command(flatten)]
        common: CommonOpts,
        #[command(subcommand)]
        command: TopologyCommand,
    },

    /// Run the built-in example grid and write DOT + SQLite next to the crate
    Example {
        /// DOT output path (defaults to repo_root/grid_graph.dot)
        #[arg(long)]
        out: Option<PathBuf>,
        /// SQLite output path (defaults to repo_root/graph.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Topology { common, command } => topology::cmd_topology(common, command),
        Commands::Example { out, db } => {
            let (def_out, def_db) = util::default_paths();
            let common = CommonOpts {
                grid: None,
                warehouses: None,
                precedence: None,
                format: Some("dot".to_string()),
                out: Some(out.unwrap_or(def_out)),
                db: Some(db.unwrap_or(def_db)),
                threads: None,
                dry_run: false,
                log_level: None,
            };
            topology::cmd_topology(common, TopologyCommand::Demo)
        }
    }
}
