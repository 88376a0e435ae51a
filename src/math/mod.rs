//! Pure operators and named functions
//!
//! Everything here takes its operands in left-to-right order and returns a
//! new value or a [`MathError`]. None of it touches the machine.

pub(crate) mod arith;
pub(crate) mod complex;
pub(crate) mod real;

use crate::value::{MathError, Value};
use num_complex::Complex64;

/// Reject results a C math library would flag with EDOM or ERANGE:
/// NaN out of non-NaN input, or an infinity out of finite input.
pub(crate) fn checked(inputs: &[f64], result: f64) -> Result<f64, MathError> {
    if result.is_nan() && !inputs.iter().any(|x| x.is_nan()) {
        Err(MathError::Domain)
    } else if result.is_infinite() && inputs.iter().all(|x| x.is_finite()) {
        Err(MathError::Range)
    } else {
        Ok(result)
    }
}

/// Complex counterpart of [`checked`], applied per component
pub(crate) fn checked_complex(
    inputs: &[Complex64],
    result: Complex64,
) -> Result<Complex64, MathError> {
    let any_nan = inputs.iter().any(|z| z.re.is_nan() || z.im.is_nan());
    let all_finite = inputs.iter().all(|z| z.is_finite());
    if (result.re.is_nan() || result.im.is_nan()) && !any_nan {
        Err(MathError::Domain)
    } else if result.is_infinite() && all_finite {
        Err(MathError::Range)
    } else {
        Ok(result)
    }
}

fn arity_mismatch(expected: usize, got: usize) -> MathError {
    MathError::Invalid(format!("expected {} argument(s), got {}", expected, got))
}

pub(crate) fn unary(args: &[Value]) -> Result<&Value, MathError> {
    match args {
        [a] => Ok(a),
        _ => Err(arity_mismatch(1, args.len())),
    }
}

pub(crate) fn binary(args: &[Value]) -> Result<(&Value, &Value), MathError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(arity_mismatch(2, args.len())),
    }
}

/// Real operand of a float function
pub(crate) fn real(v: &Value) -> Result<f64, MathError> {
    v.to_f64()
}

/// Integer operand that may also be given as an integral float
pub(crate) fn integral(v: &Value) -> Result<num_bigint::BigInt, MathError> {
    match v {
        Value::Float(x) if x.fract() != 0.0 || !x.is_finite() => {
            Err(MathError::NotIntegral(crate::display::format_float(*x)))
        }
        other => other.to_bigint_exact(),
    }
}
