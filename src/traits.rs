//! Trait definitions

mod assembly;
mod grid;
mod matrix;

pub use assembly::{Integrand, LogProgress, NoProgress, Progress};
pub use grid::{Mesh, Triangle};
pub use matrix::Matrix;
