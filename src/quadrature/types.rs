//! Type definitions.
use crate::types::Vect3;
use num::Zero;
use std::ops::{Add, Mul, Sub};

/// Quadrature error
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuadratureError {
    /// Rule not found
    #[error("No triangle quadrature rule of order {0}")]
    RuleNotFound(usize),
}

/// Definition of a numerical quadrature rule on the reference triangle.
pub struct NumericalQuadratureDefinition {
    /// The order of the quadrature rule.
    pub order: usize,

    /// The polynomial degree integrated exactly.
    pub degree: usize,

    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The weights of the quadrature rule. These sum to one, so that the
    /// integral over a triangle is the weighted sum times its area.
    pub weights: Vec<f64>,

    /// The barycentric coordinates of the points.
    ///
    /// A single point has the coordinates l_0, l_1, l_2, summing to one.
    /// The vector points stores all points in consecutive order, so that the
    /// second point starts at position 3.
    pub points: Vec<f64>,
}

impl NumericalQuadratureDefinition {
    /// Iterate over the points of the rule mapped onto a triangle, with their weights.
    pub fn mapped_points<'a>(
        &'a self,
        vertices: &'a [Vect3; 3],
    ) -> impl Iterator<Item = (Vect3, f64)> + 'a {
        self.points
            .chunks_exact(3)
            .zip(self.weights.iter())
            .map(move |(l, w)| {
                (
                    vertices[0] * l[0] + vertices[1] * l[1] + vertices[2] * l[2],
                    *w,
                )
            })
    }
}

/// A value that can be accumulated by a quadrature rule
pub trait QuadratureValue:
    Copy + Zero + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self> + Send
{
    /// The magnitude used to measure the error of an adaptive rule
    fn magnitude(&self) -> f64;
}

impl QuadratureValue for f64 {
    fn magnitude(&self) -> f64 {
        self.abs()
    }
}

impl QuadratureValue for Vect3 {
    fn magnitude(&self) -> f64 {
        self.norm()
    }
}
