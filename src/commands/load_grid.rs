use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::commands::topology::grid::Grid;
use crate::commands::topology::models::BuildingId;

#[derive(Deserialize, Debug)]
struct FileRoot {
    rows: Vec<Vec<String>>,
    #[serde(default)]
    warehouses: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub warehouses: BTreeSet<BuildingId>,
}

impl LoadedGrid {
    /// Adds warehouse ids given outside the grid file.
    pub fn with_warehouses<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.warehouses.extend(extra.into_iter().map(|s| BuildingId::from(s.as_ref())));
        self
    }
}

pub const DEMO_GRID: &str = "\
R R 1 1 R
R R 1 1 R
R R R R R
2 2 R 3 3
2 2 R 3 3
";

pub const DEMO_WAREHOUSES: [&str; 2] = ["1", "3"];

pub fn demo_grid() -> Result<LoadedGrid> {
    Ok(parse_text(DEMO_GRID)?.with_warehouses(DEMO_WAREHOUSES))
}

/// Reads a grid file; `.json` files use the JSON layout, anything else the
/// whitespace-separated text layout.
pub fn load_grid(path: &Path) -> Result<LoadedGrid> {
    if !path.exists() {
        anyhow::bail!("Grid file not found: {}", path.display());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read grid file {}", path.display()))?;
    let is_json = path.extension().map(|e| e.eq_ignore_ascii_case("json")).unwrap_or(false);
    let loaded = if is_json {
        parse_json(&raw).with_context(|| format!("parse JSON grid {}", path.display()))?
    } else {
        parse_text(&raw).with_context(|| format!("parse grid {}", path.display()))?
    };
    info!(
        "Loaded {}x{} grid from {} ({} warehouses)",
        loaded.grid.width(),
        loaded.grid.height(),
        path.display(),
        loaded.warehouses.len()
    );
    Ok(loaded)
}

pub fn parse_text(raw: &str) -> Result<LoadedGrid> {
    let rows: Vec<Vec<&str>> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.split_whitespace().collect())
        .collect();
    let grid = Grid::from_tokens(&rows)?;
    Ok(LoadedGrid { grid, warehouses: BTreeSet::new() })
}

pub fn parse_json(raw: &str) -> Result<LoadedGrid> {
    let root: FileRoot = serde_json::from_str(raw)?;
    let grid = Grid::from_tokens(&root.rows)?;
    let warehouses = root.warehouses.iter().map(|s| BuildingId::from(s.as_str())).collect();
    Ok(LoadedGrid { grid, warehouses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::topology::grid::GridError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn text_skips_blank_and_comment_lines() -> Result<()> {
        let loaded = parse_text("# depot\n\nR 1\n R R \n")?;
        assert_eq!(loaded.grid.width(), 2);
        assert_eq!(loaded.grid.height(), 2);
        Ok(())
    }

    #[test]
    fn ragged_text_is_rejected_with_grid_error() {
        let err = parse_text("R R\nR\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<GridError>(),
            Some(&GridError::Ragged { row: 1, expected: 2, found: 1 })
        );
        assert!(parse_text("\n# nothing\n").is_err());
    }

    #[test]
    fn json_carries_warehouses() -> Result<()> {
        let loaded = parse_json(r#"{"rows": [["R","7"],["R","R"]], "warehouses": ["7"]}"#)?
            .with_warehouses(["8"]);
        assert!(loaded.warehouses.contains(&BuildingId::from("7")));
        assert!(loaded.warehouses.contains(&BuildingId::from("8")));
        assert!(loaded.grid.is_building(crate::commands::topology::models::Position::new(1, 0)));
        Ok(())
    }

    #[test]
    fn load_grid_picks_layout_from_extension() -> Result<()> {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile()?;
        write!(f, r#"{{"rows": [["R","R"]]}}"#)?;
        let loaded = load_grid(f.path())?;
        assert_eq!(loaded.grid.width(), 2);

        let mut t = NamedTempFile::new()?;
        write!(t, "{}", DEMO_GRID)?;
        let loaded = load_grid(t.path())?;
        assert_eq!(loaded.grid.height(), 5);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_grid(Path::new("/definitely/not/here.txt")).is_err());
    }

    #[test]
    fn demo_grid_has_two_warehouses() -> Result<()> {
        let demo = demo_grid()?;
        assert_eq!(demo.warehouses.len(), 2);
        assert_eq!(demo.grid.width(), 5);
        Ok(())
    }
}
