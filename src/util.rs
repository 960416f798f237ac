use std::path::PathBuf;

pub const DB_FILE: &str = "graph.db";
pub const DOT_FILE: &str = "grid_graph.dot";

pub fn repo_root() -> PathBuf {
    // CARGO_MANIFEST_DIR is the crate root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn default_paths() -> (PathBuf, PathBuf) {
    let root = repo_root();
    (root.join(DOT_FILE), root.join(DB_FILE))
}
