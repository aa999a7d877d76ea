//! Operator assembly
//!
//! An [OperatorAssembler] fills blocks of a matrix with the boundary operators coupling two
//! meshes, and right-hand side vectors with dipole source terms.
mod boundary;
pub(crate) mod common;
mod dipole;
pub mod kernels;
mod options;

pub use options::AssemblyOptions;

use crate::quadrature::Integrator;
use crate::traits::{LogProgress, Progress};
use crate::types::AssemblyError;

/// Assembler of boundary operators and dipole source terms
pub struct OperatorAssembler<P: Progress = LogProgress> {
    options: AssemblyOptions,
    progress: P,
}

impl OperatorAssembler<LogProgress> {
    /// Create an assembler that reports progress to the `log` facade
    pub fn new(options: AssemblyOptions) -> Self {
        Self::with_progress(options, LogProgress)
    }
}

impl Default for OperatorAssembler<LogProgress> {
    fn default() -> Self {
        Self::new(AssemblyOptions::default())
    }
}

impl<P: Progress> OperatorAssembler<P> {
    /// Create an assembler that reports progress to a custom receiver
    pub fn with_progress(options: AssemblyOptions, progress: P) -> Self {
        Self { options, progress }
    }

    /// Get the assembler options
    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Get mutable assembler options
    pub fn options_mut(&mut self) -> &mut AssemblyOptions {
        &mut self.options
    }

    fn lhs_integrator(&self) -> Result<Integrator, AssemblyError> {
        Ok(Integrator::new(
            self.options.quadrature_order(),
            self.options.lhs_quadrature(),
        )?)
    }

    fn rhs_integrator(&self) -> Result<Integrator, AssemblyError> {
        Ok(Integrator::new(
            self.options.quadrature_order(),
            self.options.rhs_quadrature(),
        )?)
    }
}
