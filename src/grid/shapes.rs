//! Simple meshes
mod regular_sphere;
mod screen;

pub use regular_sphere::{regular_sphere, sphere};
pub use screen::screen_triangles;
