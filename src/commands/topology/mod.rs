use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

pub mod config;
pub mod logging;
pub mod db;
pub mod models;
pub mod grid;
pub mod graph;
pub mod neighbor_policy;
pub mod entrance_discovery;
pub mod road_classifier;
pub mod classifier;
pub mod connector;
pub mod render;
pub mod executor;

use crate::commands::load_grid::{self, LoadedGrid};

#[derive(Args, Debug, Clone)]
pub struct CommonOpts {
    /// Grid file: whitespace-separated text, or .json with rows/warehouses (or GRAPH_GRID)
    #[arg(long = "grid")]
    pub grid: Option<PathBuf>,
    /// Warehouse building ids (comma-separated or repeated)
    #[arg(long = "warehouses", value_delimiter = ',')]
    pub warehouses: Option<Vec<String>>,
    /// Which pass keeps a contested anchor: building|road (default: building)
    #[arg(long = "precedence")]
    pub precedence: Option<String>,
    /// Output format for exec/demo: dot|json|text (default: dot)
    #[arg(long = "format")]
    pub format: Option<String>,
    /// Write rendered output here instead of stdout
    #[arg(long = "out")]
    pub out: Option<PathBuf>,
    /// SQLite DB to store nodes and edges in
    #[arg(long = "db")]
    pub db: Option<PathBuf>,
    /// Number of worker threads (rayon); 1 runs BFS sequentially
    #[arg(long = "threads")]
    pub threads: Option<usize>,
    /// Dry run: compute only, no DB writes
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TopologyCommand {
    /// Print the grid as loaded
    #[command(name = "show")]
    Show,
    /// List classified nodes without connecting them
    #[command(name = "classify")]
    Classify,
    /// Classify, connect, render and store the graph
    #[command(name = "exec")]
    Exec,
    /// Run exec on the built-in 5x5 example grid
    #[command(name = "demo")]
    Demo,
}

pub fn build_config(common: &CommonOpts) -> Result<config::Config> {
    let mut cfg = config::Config {
        grid: common.grid.clone(),
        out: common.out.clone(),
        db: common.db.clone(),
        warehouses: common.warehouses.clone(),
        precedence: common
            .precedence
            .as_deref()
            .map(str::parse::<classifier::Precedence>)
            .transpose()
            .map_err(|e: String| anyhow!(e))?,
        format: common
            .format
            .as_deref()
            .map(str::parse::<render::OutputFormat>)
            .transpose()
            .map_err(|e: String| anyhow!(e))?,
        threads: common.threads,
        dry_run: common.dry_run,
        log_level: common.log_level.clone(),
    };
    // Env values override CLI values
    cfg.overlay(config::Config::from_env_defaults());
    Ok(cfg)
}

pub fn cmd_topology(common: CommonOpts, sub: TopologyCommand) -> Result<()> {
    let cfg = build_config(&common)?;

    logging::init(cfg.log_level.as_deref());
    if let Some(n) = cfg.threads {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    }

    let loaded = match sub {
        TopologyCommand::Demo => load_grid::demo_grid()?,
        _ => {
            let path = cfg
                .grid
                .as_ref()
                .ok_or_else(|| anyhow!("no grid given (use --grid or GRAPH_GRID)"))?;
            load_grid::load_grid(path)?
        }
    };
    let LoadedGrid { grid, warehouses } = loaded.with_warehouses(cfg.warehouses.iter().flatten());

    match sub {
        TopologyCommand::Show => {
            print!("{}", render::render_grid(&grid));
            Ok(())
        }
        TopologyCommand::Classify => {
            let (nodes, _) = classifier::classify(&grid, &warehouses, cfg.precedence());
            print!("{}", render::render_text(&graph::Graph::new(nodes, Vec::new())));
            Ok(())
        }
        TopologyCommand::Exec | TopologyCommand::Demo => {
            if cfg.out.is_some() {
                println!("Grid:");
                print!("{}", render::render_grid(&grid));
            }
            let out = executor::run_pipeline(&grid, &warehouses, &cfg)?;
            let rendered = render::render(&out.graph, cfg.format())?;
            match &cfg.out {
                Some(path) => {
                    fs::write(path, rendered).with_context(|| format!("write {}", path.display()))?;
                    println!(
                        "Graph with {} nodes and {} edges written to {}",
                        out.stats.nodes,
                        out.stats.edges,
                        path.display()
                    );
                }
                None => print!("{}", rendered),
            }
            Ok(())
        }
    }
}
