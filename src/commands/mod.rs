pub mod load_grid;
pub mod topology;
