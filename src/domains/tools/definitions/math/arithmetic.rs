use num_bigint::BigUint;

use crate::domains::tools::definitions::common::{integer_result, number_result};
use crate::domains::tools::{OpResult, OperationError};

/// Largest `n` accepted by [`factorial`]; the result has about 456,000 digits.
pub const MAX_FACTORIAL: i64 = 100_000;

pub fn add(a: f64, b: f64) -> OpResult {
    number_result(a + b)
}

pub fn subtract(a: f64, b: f64) -> OpResult {
    number_result(a - b)
}

pub fn multiply(a: f64, b: f64) -> OpResult {
    number_result(a * b)
}

pub fn divide(a: f64, b: f64) -> OpResult {
    if b == 0.0 {
        return Err(OperationError::invalid_input("Division by zero"));
    }
    number_result(a / b)
}

/// Floored remainder: the result has the sign of `b`.
pub fn modulo(a: f64, b: f64) -> OpResult {
    if b == 0.0 {
        return Err(OperationError::invalid_input("Modulo by zero"));
    }
    let r = a % b;
    let r = if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    };
    number_result(r)
}

pub fn power(base: f64, exponent: f64) -> OpResult {
    if base == 0.0 && exponent < 0.0 {
        return Err(OperationError::invalid_input(
            "Zero cannot be raised to a negative power",
        ));
    }
    number_result(base.powf(exponent))
}

pub fn square_root(a: f64) -> OpResult {
    if a < 0.0 {
        return Err(OperationError::invalid_input(
            "Cannot take the square root of a negative number",
        ));
    }
    number_result(a.sqrt())
}

pub fn absolute(a: f64) -> OpResult {
    number_result(a.abs())
}

/// Exact factorial, always a JSON integer.
pub fn factorial(n: i64) -> OpResult {
    if n < 0 {
        return Err(OperationError::invalid_input(
            "Factorial is not defined for negative numbers",
        ));
    }
    if n > MAX_FACTORIAL {
        return Err(OperationError::invalid_input(format!(
            "Factorial input too large (maximum {})",
            MAX_FACTORIAL
        )));
    }

    let product = (2..=n as u64).fold(BigUint::from(1u32), |acc, k| acc * k);
    integer_result(&product.to_string())
}
