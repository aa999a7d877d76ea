//! Types specific to meeg-bem
use crate::quadrature::types::QuadratureError;
use num::Zero;
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// A point or vector in three dimensions
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vect3 {
    /// First coordinate
    pub x: f64,
    /// Second coordinate
    pub y: f64,
    /// Third coordinate
    pub z: f64,
}

impl Vect3 {
    /// Create a vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared Euclidean norm
    pub fn norm2(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }

    /// The vector scaled to unit length
    pub fn normalized(&self) -> Self {
        *self / self.norm()
    }

    /// Check that every component is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The components as an array
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vect3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Index<usize> for Vect3 {
    type Output = f64;
    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vect3 index out of range: {index}"),
        }
    }
}

impl Add for Vect3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vect3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vect3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vect3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vect3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl AddAssign for Vect3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vect3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl MulAssign<f64> for Vect3 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl Zero for Vect3 {
    fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
    fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Storage layout of a matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    /// Only the upper triangle (row <= column) is stored
    Symmetric,
    /// Every entry is stored
    General,
}

/// Which formulation of an operator kernel to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelVariant {
    /// The fast formulation
    Optimized,
    /// The direct formulation
    Reference,
}

/// How integrals over a triangle are computed numerically
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QuadraturePolicy {
    /// A Gauss rule of the configured order
    Fixed,
    /// Subdivide until the absolute error estimate is below the tolerance
    Adaptive {
        /// Absolute error tolerance
        tolerance: f64,
    },
}

/// Assembly error
#[derive(thiserror::Error, Debug)]
pub enum AssemblyError {
    /// A block does not fit in the target
    #[error("Block of size {block_shape:?} at offset {offset:?} does not fit in a target of shape {shape:?}")]
    DimensionMismatch {
        /// Offset of the block
        offset: [usize; 2],
        /// Shape of the block
        block_shape: [usize; 2],
        /// Shape of the target
        shape: [usize; 2],
    },
    /// A block would write below the diagonal of a symmetric matrix
    #[error("Block of size {block_shape:?} at offset {offset:?} reaches below the diagonal of a symmetric matrix")]
    SymmetricStorageViolation {
        /// Offset of the block
        offset: [usize; 2],
        /// Shape of the block
        block_shape: [usize; 2],
    },
    /// The block that is read overlaps the block that is written
    #[error("Block at offset {read:?} overlaps the block at offset {write:?}")]
    OverlappingBlocks {
        /// Offset of the block that is read
        read: [usize; 2],
        /// Offset of the block that is written
        write: [usize; 2],
    },
    /// The geometry cannot be integrated over
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Quadrature error
    #[error(transparent)]
    Quadrature(#[from] QuadratureError),
}
