//! Quadrature rules and integrators on triangles
pub mod integrator;
mod simplex_rule_definitions;
pub mod simplex_rules;
pub mod types;

pub use integrator::{AdaptiveIntegrator, GaussIntegrator, Integrator};
