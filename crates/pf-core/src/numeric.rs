use crate::PfError;

/// Floating point type used throughout the system
pub type Real = f64;

/// Relative tolerances for the relaxation loop, one per solved quantity.
///
/// Voltages and currents converge on different scales (volts vs milliamps),
/// so each carries its own relative tolerance.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub voltage: Real,
    pub current: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            voltage: 1e-5,
            current: 1e-6,
        }
    }
}

/// Absolute floor under which two values always compare close.
pub const CLOSE_ATOL: Real = 1e-8;

/// Element-wise relative closeness of two equal-length slices.
///
/// `|a - b| <= CLOSE_ATOL + rtol * |b|` for every element, with the second
/// argument taken as the reference.
pub fn all_close(a: &[Real], b: &[Real], rtol: Real) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .all(|(&x, &y)| (x - y).abs() <= CLOSE_ATOL + rtol * y.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}
