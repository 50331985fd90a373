//! "Nice number" axis ceilings.
//!
//! Headroom and fallback ceilings are fixed per granularity.

use crate::period::Granularity;

/// Added to the tallest bucket before rounding.
pub fn headroom(granularity: Granularity) -> f64 {
    match granularity {
        Granularity::Week => 10.0,
        Granularity::Month => 50.0,
        Granularity::Year => 500.0,
    }
}

/// Axis ceiling used when every bucket is empty.
pub fn fallback_scale(granularity: Granularity) -> f64 {
    match granularity {
        Granularity::Week => 30.0,
        Granularity::Month => 200.0,
        Granularity::Year => 1000.0,
    }
}

const STEPS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

/// Round `value` up to the nearest {1, 2, 5, 10} x 10^n.
///
/// The result is never below `value`. Zero, negative and non-finite inputs
/// give 0.
pub fn nice_number(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }

    let mut magnitude = 10f64.powf(value.log10().floor());
    // log10 can land one ulp off at exact powers of ten.
    if magnitude > value {
        magnitude /= 10.0;
    } else if magnitude * 10.0 <= value {
        magnitude *= 10.0;
    }

    // Candidates are compared as products so an input that is already nice
    // maps to itself and anything above it moves to the next step.
    STEPS
        .iter()
        .map(|step| step * magnitude)
        .find(|candidate| *candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

/// Axis ceiling for a trend chart whose tallest bucket is `max_value`.
pub fn axis_ceiling(granularity: Granularity, max_value: f64) -> f64 {
    if max_value > 0.0 {
        nice_number(max_value + headroom(granularity))
    } else {
        fallback_scale(granularity)
    }
}
