//! Boundary element operators for EEG/MEG forward modelling
//!
//! The operators act on piecewise flat triangle meshes. Potentials are represented with
//! continuous piecewise linear (P1) functions attached to mesh points and normal currents with
//! piecewise constant (P0) functions attached to triangles. The Laplace kernel is used without
//! its `1/(4π)` factor.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod analytic;
pub mod assembly;
pub mod grid;
pub mod matrix;
pub mod quadrature;
pub mod traits;
pub mod types;

pub use assembly::{AssemblyOptions, OperatorAssembler};
