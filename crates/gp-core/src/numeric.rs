use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Relative difference `|a - b| / |b|`, falling back to the absolute
/// difference when `b` is zero.
pub fn relative_difference(a: Real, b: Real) -> Real {
    if b == 0.0 {
        (a - b).abs()
    } else {
        ((a - b) / b).abs()
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}
