//! Complex-domain named functions and operator overrides

use super::{binary, checked_complex, real, unary};
use crate::value::{MathError, Value};
use num_complex::Complex64;
use num_traits::Zero;

fn complex(v: &Value) -> Result<Complex64, MathError> {
    v.to_complex()
}

/// Apply a complex function to one operand
pub(crate) fn map1(args: &[Value], f: fn(Complex64) -> Complex64) -> Result<Value, MathError> {
    let z = complex(unary(args)?)?;
    checked_complex(&[z], f(z)).map(Value::Complex)
}

/// Apply a predicate on the complex components to one operand
pub(crate) fn test1(args: &[Value], f: fn(Complex64) -> bool) -> Result<Value, MathError> {
    Ok(Value::Bool(f(complex(unary(args)?)?)))
}

/// Complex square root, the `v` override
pub(crate) fn sqrt(args: &[Value]) -> Result<Value, MathError> {
    map1(args, Complex64::sqrt)
}

pub(crate) fn log(args: &[Value]) -> Result<Value, MathError> {
    let z = complex(unary(args)?)?;
    if z.is_zero() {
        return Err(MathError::Domain);
    }
    checked_complex(&[z], z.ln()).map(Value::Complex)
}

pub(crate) fn log10(args: &[Value]) -> Result<Value, MathError> {
    let z = complex(unary(args)?)?;
    if z.is_zero() {
        return Err(MathError::Domain);
    }
    checked_complex(&[z], z.ln() / std::f64::consts::LN_10).map(Value::Complex)
}

pub(crate) fn atanh(args: &[Value]) -> Result<Value, MathError> {
    let z = complex(unary(args)?)?;
    if z.im == 0.0 && z.re.abs() == 1.0 {
        return Err(MathError::Domain);
    }
    checked_complex(&[z], z.atanh()).map(Value::Complex)
}

pub(crate) fn atan(args: &[Value]) -> Result<Value, MathError> {
    let z = complex(unary(args)?)?;
    if z.re == 0.0 && z.im.abs() == 1.0 {
        return Err(MathError::Domain);
    }
    checked_complex(&[z], z.atan()).map(Value::Complex)
}

pub(crate) fn phase(args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Float(complex(unary(args)?)?.arg()))
}

/// Modulus and phase of a complex number
pub(crate) fn polar(args: &[Value]) -> Result<Value, MathError> {
    let (r, theta) = complex(unary(args)?)?.to_polar();
    Ok(Value::Tuple(vec![Value::Float(r), Value::Float(theta)]))
}

/// Complex number from modulus and phase
pub(crate) fn rect(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    let (r, theta) = (real(a)?, real(b)?);
    Ok(Value::Complex(Complex64::from_polar(r, theta)))
}

pub(crate) fn isclose(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    let (x, y) = (complex(a)?, complex(b)?);
    if x == y {
        return Ok(Value::Bool(true));
    }
    if x.is_infinite() || y.is_infinite() {
        return Ok(Value::Bool(false));
    }
    let close = (x - y).norm() <= 1e-9 * x.norm().max(y.norm());
    Ok(Value::Bool(close))
}

/// `j`: pure imaginary number from a real one
pub(crate) fn imaginary(args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Complex(Complex64::new(0.0, real(unary(args)?)?)))
}
