//! Grid creation and storage

pub mod flat_triangle_grid;
pub mod shapes;

pub use flat_triangle_grid::{FlatTriangleGrid, FlatTriangleGridBuilder};
