//! Real-domain named functions

use super::{binary, checked, integral, real, unary};
use crate::value::{MathError, Value};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive};

/// Relative tolerance of `isclose`
const REL_TOL: f64 = 1e-9;

/// Apply a float function to one operand
pub(crate) fn map1(args: &[Value], f: fn(f64) -> f64) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    checked(&[x], f(x)).map(Value::Float)
}

/// Apply a float function to two operands
pub(crate) fn map2(args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    let (x, y) = (real(a)?, real(b)?);
    checked(&[x, y], f(x, y)).map(Value::Float)
}

/// Apply a float predicate to one operand
pub(crate) fn test1(args: &[Value], f: fn(f64) -> bool) -> Result<Value, MathError> {
    Ok(Value::Bool(f(real(unary(args)?)?)))
}

pub(crate) fn e(_args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Float(std::f64::consts::E))
}

pub(crate) fn pi(_args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Float(std::f64::consts::PI))
}

pub(crate) fn inf(_args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Float(f64::INFINITY))
}

pub(crate) fn nan(_args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Float(f64::NAN))
}

/// Logarithm with the domain guard the float function lacks at zero
pub(crate) fn log_with(args: &[Value], f: fn(f64) -> f64) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    if x <= 0.0 {
        return Err(MathError::Domain);
    }
    checked(&[x], f(x)).map(Value::Float)
}

pub(crate) fn log1p(args: &[Value]) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    if x <= -1.0 {
        return Err(MathError::Domain);
    }
    checked(&[x], x.ln_1p()).map(Value::Float)
}

pub(crate) fn atanh(args: &[Value]) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    if x.abs() >= 1.0 {
        return Err(MathError::Domain);
    }
    checked(&[x], x.atanh()).map(Value::Float)
}

/// Square root, also bound to `v`
pub(crate) fn sqrt(args: &[Value]) -> Result<Value, MathError> {
    map1(args, f64::sqrt)
}

/// Conversion from radians, also bound to `°`
pub(crate) fn degrees(args: &[Value]) -> Result<Value, MathError> {
    map1(args, f64::to_degrees)
}

pub(crate) fn pow(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    let (x, y) = (real(a)?, real(b)?);
    if x == 0.0 && y < 0.0 {
        return Err(MathError::Domain);
    }
    checked(&[x, y], x.powf(y)).map(Value::Float)
}

fn is_pole(x: f64) -> bool {
    x == f64::NEG_INFINITY || (x <= 0.0 && x == x.floor())
}

pub(crate) fn gamma(args: &[Value]) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    if is_pole(x) {
        return Err(MathError::Domain);
    }
    checked(&[x], libm::tgamma(x)).map(Value::Float)
}

pub(crate) fn lgamma(args: &[Value]) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    if x.is_finite() && is_pole(x) {
        return Err(MathError::Domain);
    }
    checked(&[x], libm::lgamma(x)).map(Value::Float)
}

/// Shared body of `ceil`, `floor` and `trunc`: exact for exact kinds,
/// and always an integer result
fn to_integer(
    args: &[Value],
    exact: fn(&BigRational) -> BigRational,
    float: fn(f64) -> f64,
) -> Result<Value, MathError> {
    match unary(args)? {
        v @ (Value::Bool(_) | Value::Int(_)) => Ok(Value::Int(v.to_bigint_exact()?)),
        Value::Float(x) => {
            if x.is_nan() {
                return Err(MathError::Invalid("cannot convert float NaN to integer".into()));
            }
            BigInt::from_f64(float(*x))
                .map(Value::Int)
                .ok_or_else(|| MathError::Invalid("cannot convert float infinity to integer".into()))
        }
        v @ (Value::Rational(_) | Value::Decimal(_)) => {
            Ok(Value::Int(exact(&v.to_rational()?).to_integer()))
        }
        other => Err(MathError::NotReal(other.type_name())),
    }
}

pub(crate) fn ceil(args: &[Value]) -> Result<Value, MathError> {
    to_integer(args, BigRational::ceil, f64::ceil)
}

pub(crate) fn floor(args: &[Value]) -> Result<Value, MathError> {
    to_integer(args, BigRational::floor, f64::floor)
}

pub(crate) fn trunc(args: &[Value]) -> Result<Value, MathError> {
    to_integer(args, BigRational::trunc, f64::trunc)
}

pub(crate) fn factorial(args: &[Value]) -> Result<Value, MathError> {
    let n = integral(unary(args)?)?;
    if n.is_negative() {
        return Err(MathError::Invalid(
            "factorial() not defined for negative values".into(),
        ));
    }
    let n = n.to_u64().ok_or(MathError::Range)?;
    let mut acc = BigInt::one();
    for i in 2..=n {
        acc *= i;
    }
    Ok(Value::Int(acc))
}

pub(crate) fn gcd(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    Ok(Value::Int(integral(a)?.gcd(&integral(b)?)))
}

pub(crate) fn abs(args: &[Value]) -> Result<Value, MathError> {
    Ok(match unary(args)? {
        v @ (Value::Bool(_) | Value::Int(_)) => Value::Int(v.to_bigint_exact()?.abs()),
        Value::Float(x) => Value::Float(x.abs()),
        Value::Decimal(d) => Value::Decimal(d.abs()),
        Value::Rational(r) => Value::Rational(r.abs()),
        Value::Complex(c) => Value::Float(checked(&[c.re, c.im], c.norm())?),
        other => {
            return Err(MathError::BadOperand {
                op: "abs()",
                got: other.type_name(),
            })
        }
    })
}

/// Mantissa and exponent: `x == m * 2^e` with `0.5 <= |m| < 1`
pub(crate) fn frexp(args: &[Value]) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    let (m, e) = if x.is_finite() { libm::frexp(x) } else { (x, 0) };
    Ok(Value::Tuple(vec![Value::Float(m), Value::int(e)]))
}

pub(crate) fn ldexp(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    let x = real(a)?;
    let exp = integral(b)?;
    let exp = exp.to_i32().unwrap_or(if exp.is_negative() { i32::MIN } else { i32::MAX });
    checked(&[x], libm::scalbn(x, exp)).map(Value::Float)
}

/// Fractional and integral parts, both carrying the sign of `x`
pub(crate) fn modf(args: &[Value]) -> Result<Value, MathError> {
    let x = real(unary(args)?)?;
    let (frac, whole) = if x.is_infinite() {
        (0.0_f64.copysign(x), x)
    } else {
        (x.fract(), x.trunc())
    };
    Ok(Value::Tuple(vec![Value::Float(frac), Value::Float(whole)]))
}

/// Compensated sum of a tuple, or of a single real
pub(crate) fn fsum(args: &[Value]) -> Result<Value, MathError> {
    let xs = match unary(args)? {
        Value::Tuple(items) => items.iter().map(real).collect::<Result<Vec<_>, _>>()?,
        other => vec![real(other)?],
    };
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &x in &xs {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            compensation += (sum - t) + x;
        } else {
            compensation += (x - t) + sum;
        }
        sum = t;
    }
    checked(&xs, sum + compensation).map(Value::Float)
}

pub(crate) fn close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    (a - b).abs() <= REL_TOL * a.abs().max(b.abs())
}

pub(crate) fn isclose(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    Ok(Value::Bool(close(real(a)?, real(b)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(x: f64) -> Vec<Value> {
        vec![Value::Float(x)]
    }

    #[test]
    fn sqrt_of_negative_is_domain_error() {
        assert_eq!(sqrt(&float(-1.0)), Err(MathError::Domain));
        assert_eq!(sqrt(&[Value::int(16)]).unwrap(), Value::Float(4.0));
    }

    #[test]
    fn log_guards() {
        assert_eq!(log_with(&float(0.0), f64::ln), Err(MathError::Domain));
        assert_eq!(log1p(&float(-1.0)), Err(MathError::Domain));
        assert_eq!(atanh(&float(1.0)), Err(MathError::Domain));
        assert_eq!(log_with(&float(100.0), f64::log10).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn gamma_poles() {
        assert_eq!(gamma(&float(0.0)), Err(MathError::Domain));
        assert_eq!(gamma(&float(-2.0)), Err(MathError::Domain));
        assert_eq!(gamma(&float(5.0)).unwrap(), Value::Float(24.0));
        assert_eq!(lgamma(&float(-1.0)), Err(MathError::Domain));
    }

    #[test]
    fn rounding_functions_return_integers() {
        assert_eq!(floor(&float(-2.5)).unwrap(), Value::int(-3));
        assert_eq!(ceil(&float(2.1)).unwrap(), Value::int(3));
        assert_eq!(trunc(&float(-2.7)).unwrap(), Value::int(-2));
        assert!(floor(&float(f64::INFINITY)).is_err());
    }

    #[test]
    fn factorial_and_gcd() {
        assert_eq!(factorial(&[Value::int(5)]).unwrap(), Value::int(120));
        assert_eq!(factorial(&float(5.0)).unwrap(), Value::int(120));
        assert!(factorial(&float(5.5)).is_err());
        assert!(factorial(&[Value::int(-1)]).is_err());
        assert_eq!(gcd(&[Value::int(12), Value::int(18)]).unwrap(), Value::int(6));
    }

    #[test]
    fn pairs_are_tuples() {
        assert_eq!(
            frexp(&float(8.0)).unwrap(),
            Value::Tuple(vec![Value::Float(0.5), Value::int(4)])
        );
        assert_eq!(
            modf(&float(-2.5)).unwrap(),
            Value::Tuple(vec![Value::Float(-0.5), Value::Float(-2.0)])
        );
    }

    #[test]
    fn fsum_is_compensated() {
        let items = Value::Tuple(vec![
            Value::Float(1e100),
            Value::Float(1.0),
            Value::Float(-1e100),
        ]);
        assert_eq!(fsum(&[items]).unwrap(), Value::Float(1.0));
        assert_eq!(fsum(&float(2.5)).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn isclose_tolerance() {
        assert_eq!(
            isclose(&[Value::Float(1.0), Value::Float(1.0 + 1e-12)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            isclose(&[Value::Float(1.0), Value::Float(1.001)]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn math_pow_zero_negative_is_domain() {
        assert_eq!(
            pow(&[Value::Float(0.0), Value::Float(-1.0)]),
            Err(MathError::Domain)
        );
    }

    #[test]
    fn overflow_is_range() {
        assert_eq!(map1(&float(1000.0), f64::exp), Err(MathError::Range));
    }
}
