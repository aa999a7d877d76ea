//! Assembly options
use crate::quadrature::integrator::DEFAULT_TOLERANCE;
use crate::types::{KernelVariant, QuadraturePolicy};

/// Options for an operator assembler
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssemblyOptions {
    /// Order of the triangle quadrature rule
    quadrature_order: usize,
    /// Quadrature used for the boundary operators
    lhs_quadrature: QuadraturePolicy,
    /// Quadrature used for the dipole source terms
    rhs_quadrature: QuadraturePolicy,
    /// Formulation of the hypersingular operator
    operator_n_variant: KernelVariant,
    /// Formulation of the double layer operator
    operator_d_variant: KernelVariant,
    /// Maximum number of rows computed in parallel before they are written
    batch_size: usize,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            quadrature_order: 3,
            lhs_quadrature: QuadraturePolicy::Fixed,
            rhs_quadrature: QuadraturePolicy::Adaptive {
                tolerance: DEFAULT_TOLERANCE,
            },
            operator_n_variant: KernelVariant::Optimized,
            operator_d_variant: KernelVariant::Optimized,
            batch_size: 128,
        }
    }
}

impl AssemblyOptions {
    /// Order of the triangle quadrature rule
    pub fn quadrature_order(&self) -> usize {
        self.quadrature_order
    }
    /// Set the order of the triangle quadrature rule
    pub fn set_quadrature_order(&mut self, order: usize) {
        self.quadrature_order = order;
    }

    /// Quadrature used for the boundary operators
    pub fn lhs_quadrature(&self) -> QuadraturePolicy {
        self.lhs_quadrature
    }
    /// Set the quadrature used for the boundary operators
    pub fn set_lhs_quadrature(&mut self, policy: QuadraturePolicy) {
        self.lhs_quadrature = policy;
    }

    /// Quadrature used for the dipole source terms
    pub fn rhs_quadrature(&self) -> QuadraturePolicy {
        self.rhs_quadrature
    }
    /// Set the quadrature used for the dipole source terms
    pub fn set_rhs_quadrature(&mut self, policy: QuadraturePolicy) {
        self.rhs_quadrature = policy;
    }

    /// Formulation of the hypersingular operator
    pub fn operator_n_variant(&self) -> KernelVariant {
        self.operator_n_variant
    }
    /// Set the formulation of the hypersingular operator
    pub fn set_operator_n_variant(&mut self, variant: KernelVariant) {
        self.operator_n_variant = variant;
    }

    /// Formulation of the double layer operator
    pub fn operator_d_variant(&self) -> KernelVariant {
        self.operator_d_variant
    }
    /// Set the formulation of the double layer operator
    pub fn set_operator_d_variant(&mut self, variant: KernelVariant) {
        self.operator_d_variant = variant;
    }

    /// Maximum number of rows computed in parallel before they are written
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
    /// Set the maximum number of rows computed in parallel before they are written
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size;
    }
}
