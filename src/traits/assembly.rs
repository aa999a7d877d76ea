//! Assembly
use crate::quadrature::types::QuadratureValue;
use crate::types::Vect3;
use log::debug;

pub trait Integrand {
    //! A function that can be integrated over a triangle

    /// The type of the value
    type Output: QuadratureValue;

    /// Evaluate at a point
    fn evaluate(&self, x: &Vect3) -> Self::Output;
}

pub trait Progress: Sync {
    //! Receiver of progress reports during assembly

    /// Report that `current` of `total` rows have been assembled
    fn report(&self, current: usize, total: usize);
}

/// Progress reporter that writes to the `log` facade
#[derive(Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn report(&self, current: usize, total: usize) {
        debug!(
            "Assembled {current} of {total} rows ({:.0}%)",
            100.0 * current as f64 / total.max(1) as f64
        );
    }
}

/// Progress reporter that does nothing
#[derive(Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _current: usize, _total: usize) {}
}
