use std::{env, path::PathBuf};

use super::classifier::Precedence;
use super::render::OutputFormat;

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub grid: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub warehouses: Option<Vec<String>>,
    pub precedence: Option<Precedence>,
    pub format: Option<OutputFormat>,
    pub threads: Option<usize>,
    pub dry_run: bool,
    pub log_level: Option<String>,
}

impl Config {
    pub fn from_env_defaults() -> Self {
        let grid = env::var("GRAPH_GRID").ok().map(PathBuf::from);
        let out = env::var("GRAPH_OUT").ok().map(PathBuf::from);
        let db = env::var("GRAPH_DB").ok().map(PathBuf::from);
        let warehouses = env::var("GRAPH_WAREHOUSES").ok().and_then(|s| parse_list(&s));
        let precedence = env::var("GRAPH_PRECEDENCE").ok().and_then(|s| s.parse::<Precedence>().ok());
        let format = env::var("GRAPH_FORMAT").ok().and_then(|s| s.parse::<OutputFormat>().ok());
        let threads = env::var("GRAPH_THREADS").ok().and_then(|s| s.parse::<usize>().ok());
        let dry_run = env::var("GRAPH_DRY_RUN").ok().map(|v| parse_flag(&v)).unwrap_or(false);
        let log_level = env::var("GRAPH_LOG_LEVEL").ok();
        Self { grid, out, db, warehouses, precedence, format, threads, dry_run, log_level }
    }

    /// Env values replace CLI values when set.
    pub fn overlay(&mut self, env_cfg: Config) {
        if env_cfg.grid.is_some() { self.grid = env_cfg.grid; }
        if env_cfg.out.is_some() { self.out = env_cfg.out; }
        if env_cfg.db.is_some() { self.db = env_cfg.db; }
        if env_cfg.warehouses.is_some() { self.warehouses = env_cfg.warehouses; }
        if env_cfg.precedence.is_some() { self.precedence = env_cfg.precedence; }
        if env_cfg.format.is_some() { self.format = env_cfg.format; }
        if env_cfg.threads.is_some() { self.threads = env_cfg.threads; }
        if env_cfg.dry_run { self.dry_run = true; }
        if env_cfg.log_level.is_some() { self.log_level = env_cfg.log_level; }
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence.unwrap_or_default()
    }

    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// BFS runs on the rayon pool unless pinned to a single thread.
    pub fn parallel(&self) -> bool {
        self.threads != Some(1)
    }
}

pub(crate) fn parse_list(input: &str) -> Option<Vec<String>> {
    let v = input
        .split(',')
        .filter_map(|p| {
            let t = p.trim();
            if t.is_empty() { None } else { Some(t.to_string()) }
        })
        .collect::<Vec<_>>();
    if v.is_empty() { None } else { Some(v) }
}

fn parse_flag(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}
