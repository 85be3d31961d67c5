use std::f64::consts;

use serde_json::json;

use crate::domains::tools::definitions::common::{integer_result, number_result};
use crate::domains::tools::{OpResult, OperationError};

pub fn log(a: f64, base: f64) -> OpResult {
    if a <= 0.0 {
        return Err(OperationError::invalid_input(
            "Logarithm is only defined for positive numbers",
        ));
    }
    if base <= 0.0 || base == 1.0 {
        return Err(OperationError::invalid_input(
            "Logarithm base must be positive and not equal to 1",
        ));
    }
    number_result(a.ln() / base.ln())
}

pub fn ln(a: f64) -> OpResult {
    if a <= 0.0 {
        return Err(OperationError::invalid_input(
            "Natural logarithm is only defined for positive numbers",
        ));
    }
    number_result(a.ln())
}

pub fn sin(degrees: f64) -> OpResult {
    number_result(degrees.to_radians().sin())
}

pub fn cos(degrees: f64) -> OpResult {
    number_result(degrees.to_radians().cos())
}

pub fn tan(degrees: f64) -> OpResult {
    number_result(degrees.to_radians().tan())
}

pub fn asin(value: f64) -> OpResult {
    unit_interval(value, "Arcsine")?;
    number_result(value.asin().to_degrees())
}

pub fn acos(value: f64) -> OpResult {
    unit_interval(value, "Arccosine")?;
    number_result(value.acos().to_degrees())
}

pub fn atan(value: f64) -> OpResult {
    number_result(value.atan().to_degrees())
}

pub fn degrees_to_radians(degrees: f64) -> OpResult {
    number_result(degrees.to_radians())
}

pub fn radians_to_degrees(radians: f64) -> OpResult {
    number_result(radians.to_degrees())
}

pub fn ceil(a: f64) -> OpResult {
    integral(a.ceil())
}

pub fn floor(a: f64) -> OpResult {
    integral(a.floor())
}

/// Round half to even at the given number of decimals. Negative
/// `decimals` round to tens, hundreds and so on.
pub fn round_number(a: f64, decimals: i64) -> OpResult {
    number_result(round_half_even(a, decimals))
}

pub fn hypotenuse(a: f64, b: f64) -> OpResult {
    number_result(a.hypot(b))
}

pub fn constants() -> OpResult {
    Ok(json!({
        "pi": consts::PI,
        "e": consts::E,
        "tau": consts::TAU,
        "inf": "Infinity",
    }))
}

fn unit_interval(a: f64, what: &str) -> Result<(), OperationError> {
    if (-1.0..=1.0).contains(&a) {
        Ok(())
    } else {
        Err(OperationError::invalid_input(format!(
            "{} is only defined for values between -1 and 1",
            what
        )))
    }
}

/// Exact integer for an already-integral float; `+ 0.0` folds `-0` into `0`.
fn integral(x: f64) -> OpResult {
    if !x.is_finite() {
        return Err(OperationError::invalid_input(
            "Cannot convert an infinite or NaN value to an integer",
        ));
    }
    integer_result(&format!("{:.0}", x + 0.0))
}

fn round_half_even(a: f64, decimals: i64) -> f64 {
    if decimals == 0 {
        return a.round_ties_even();
    }
    if decimals > 0 {
        // Rounds the exact binary value: 2.675 -> 2.67.
        let places = decimals.min(340) as usize;
        return format!("{:.*}", places, a).parse().unwrap_or(a);
    }
    let factor = 10f64.powi(decimals.unsigned_abs().min(308) as i32);
    (a / factor).round_ties_even() * factor
}
