//! Calculator namespace.
//!
//! Every operation returns `{"result": value}`. Domain errors (division by
//! zero, square root of a negative, out-of-range inverse trig) are soft
//! failures.

mod arithmetic;
mod scientific;

pub use arithmetic::*;
pub use scientific::*;

use crate::domains::tools::{NamespaceDef, ParamSpec};
use crate::operation;

pub const DESCRIPTION: &str = "Standard and scientific calculator utilities.";

pub fn namespace() -> NamespaceDef {
    NamespaceDef::from_module(module_path!(), DESCRIPTION)
        // Arithmetic
        .operation(
            operation!("add", "Add two numbers.", |args, _| add(
                args.float("a")?,
                args.float("b")?
            ))
            .param(ParamSpec::float("a", "First addend"))
            .param(ParamSpec::float("b", "Second addend")),
        )
        .operation(
            operation!("subtract", "Subtract b from a.", |args, _| subtract(
                args.float("a")?,
                args.float("b")?
            ))
            .param(ParamSpec::float("a", "Minuend"))
            .param(ParamSpec::float("b", "Subtrahend")),
        )
        .operation(
            operation!("multiply", "Multiply two numbers.", |args, _| multiply(
                args.float("a")?,
                args.float("b")?
            ))
            .param(ParamSpec::float("a", "First factor"))
            .param(ParamSpec::float("b", "Second factor")),
        )
        .operation(
            operation!("divide", "Divide a by b.", |args, _| divide(
                args.float("a")?,
                args.float("b")?
            ))
            .param(ParamSpec::float("a", "Dividend"))
            .param(ParamSpec::float("b", "Divisor")),
        )
        .operation(
            operation!(
                "modulo",
                "Remainder of a divided by b; the result takes the sign of b.",
                |args, _| modulo(args.float("a")?, args.float("b")?)
            )
            .param(ParamSpec::float("a", "Dividend"))
            .param(ParamSpec::float("b", "Divisor")),
        )
        .operation(
            operation!("power", "Raise base to exponent.", |args, _| power(
                args.float("base")?,
                args.float("exponent")?
            ))
            .param(ParamSpec::float("base", "Base"))
            .param(ParamSpec::float("exponent", "Exponent")),
        )
        .operation(
            operation!("square_root", "Square root of a non-negative number.", |args, _| {
                square_root(args.float("a")?)
            })
            .param(ParamSpec::float("a", "Radicand")),
        )
        .operation(
            operation!("absolute", "Absolute value.", |args, _| absolute(
                args.float("a")?
            ))
            .param(ParamSpec::float("a", "Number")),
        )
        .operation(
            operation!("factorial", "Factorial of a non-negative integer.", |args, _| {
                factorial(args.int("n")?)
            })
            .param(ParamSpec::int("n", "Non-negative integer")),
        )
        // Logarithms
        .operation(
            operation!("log", "Logarithm of a in the given base.", |args, _| log(
                args.float("a")?,
                args.float("base")?
            ))
            .param(ParamSpec::float("a", "Positive number"))
            .param(ParamSpec::float("base", "Logarithm base").with_default(10.0)),
        )
        .operation(
            operation!("ln", "Natural logarithm.", |args, _| ln(args.float("a")?))
                .param(ParamSpec::float("a", "Positive number")),
        )
        // Trigonometry (degrees)
        .operation(
            operation!("sin", "Sine of an angle in degrees.", |args, _| sin(
                args.float("degrees")?
            ))
            .param(ParamSpec::float("degrees", "Angle in degrees")),
        )
        .operation(
            operation!("cos", "Cosine of an angle in degrees.", |args, _| cos(
                args.float("degrees")?
            ))
            .param(ParamSpec::float("degrees", "Angle in degrees")),
        )
        .operation(
            operation!("tan", "Tangent of an angle in degrees.", |args, _| tan(
                args.float("degrees")?
            ))
            .param(ParamSpec::float("degrees", "Angle in degrees")),
        )
        .operation(
            operation!("asin", "Arcsine in degrees.", |args, _| asin(args.float("value")?))
                .param(ParamSpec::float("value", "Value in [-1, 1]")),
        )
        .operation(
            operation!("acos", "Arccosine in degrees.", |args, _| acos(args.float("value")?))
                .param(ParamSpec::float("value", "Value in [-1, 1]")),
        )
        .operation(
            operation!("atan", "Arctangent in degrees.", |args, _| atan(args.float("value")?))
                .param(ParamSpec::float("value", "Value")),
        )
        .operation(
            operation!("degrees_to_radians", "Convert degrees to radians.", |args, _| {
                degrees_to_radians(args.float("degrees")?)
            })
            .param(ParamSpec::float("degrees", "Angle in degrees")),
        )
        .operation(
            operation!("radians_to_degrees", "Convert radians to degrees.", |args, _| {
                radians_to_degrees(args.float("radians")?)
            })
            .param(ParamSpec::float("radians", "Angle in radians")),
        )
        // Rounding
        .operation(
            operation!("ceil", "Smallest integer greater than or equal to a.", |args, _| {
                ceil(args.float("a")?)
            })
            .param(ParamSpec::float("a", "Number")),
        )
        .operation(
            operation!("floor", "Largest integer less than or equal to a.", |args, _| {
                floor(args.float("a")?)
            })
            .param(ParamSpec::float("a", "Number")),
        )
        .operation(
            operation!(
                "round_number",
                "Round a to the given number of decimals (ties to even).",
                |args, _| round_number(args.float("a")?, args.int("decimals")?)
            )
            .param(ParamSpec::float("a", "Number"))
            .param(ParamSpec::int("decimals", "Decimal places").with_default(0)),
        )
        // Geometry
        .operation(
            operation!("hypotenuse", "Hypotenuse of a right triangle with legs a and b.", |args, _| {
                hypotenuse(args.float("a")?, args.float("b")?)
            })
            .param(ParamSpec::float("a", "First leg"))
            .param(ParamSpec::float("b", "Second leg")),
        )
        .operation(operation!(
            "constants",
            "Common mathematical constants.",
            |_, _| constants()
        ))
}
