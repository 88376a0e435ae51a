//! Values for the RPN machine
//!
//! Every operand on the stack or in a register is a [`Value`]. The set of
//! variants is closed: operators pattern-match on it and report a
//! [`MathError`] for combinations they do not support instead of guessing.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveTime};
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_integer::Integer;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};
use thiserror::Error;

/// A dynamically typed stack value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (the `_` register, an unset precision)
    #[default]
    Nil,
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Decimal(BigDecimal),
    Rational(BigRational),
    Complex(Complex64),
    /// Absolute point in time, local time zone
    Timestamp(DateTime<Local>),
    /// Time of day
    Time(NaiveTime),
    Str(String),
    /// Multiple results of one function, e.g. `frexp` or `polar`
    Tuple(Vec<Value>),
}

/// Failure of an underlying arithmetic or library operation.
///
/// These never reach the user directly: the machine wraps them with the
/// context of the operator that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("math domain error")]
    Domain,
    #[error("math range error")]
    Range,
    #[error("division by zero")]
    DivisionByZero,
    #[error("unsupported operand type(s) for {op}: '{left}' and '{right}'")]
    Unsupported {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("bad operand type for {op}: '{got}'")]
    BadOperand { op: &'static str, got: &'static str },
    #[error("must be real number, not {0}")]
    NotReal(&'static str),
    #[error("integer argument expected, got {0}")]
    NotIntegral(String),
    #[error("negative shift count")]
    NegativeShift,
    #[error("{0}")]
    Invalid(String),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Rational(_) => "fraction",
            Value::Complex(_) => "complex",
            Value::Timestamp(_) => "datetime",
            Value::Time(_) => "time",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
        }
    }

    pub fn int(n: impl Into<BigInt>) -> Self {
        Value::Int(n.into())
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Value::Complex(_))
    }

    /// Truthiness as used by logical negation
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => !n.is_zero(),
            Value::Float(x) => *x != 0.0,
            Value::Decimal(d) => !d.is_zero(),
            Value::Rational(r) => !r.is_zero(),
            Value::Complex(c) => !c.is_zero(),
            Value::Timestamp(_) | Value::Time(_) => true,
            Value::Str(s) => !s.is_empty(),
            Value::Tuple(items) => !items.is_empty(),
        }
    }

    /// Lossy conversion to a float, for real-domain math functions
    pub fn to_f64(&self) -> Result<f64, MathError> {
        let x = match self {
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Int(n) => n.to_f64().unwrap_or(f64::INFINITY),
            Value::Float(x) => return Ok(*x),
            Value::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Value::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            other => return Err(MathError::NotReal(other.type_name())),
        };
        if x.is_infinite() {
            return Err(MathError::Invalid(format!(
                "{} too large to convert to float",
                self.type_name()
            )));
        }
        Ok(x)
    }

    /// Exact conversion to an integer; fractional values are rejected
    pub fn to_bigint_exact(&self) -> Result<BigInt, MathError> {
        match self {
            Value::Bool(b) => Ok(BigInt::from(u8::from(*b))),
            Value::Int(n) => Ok(n.clone()),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => {
                BigInt::from_f64(*x).ok_or_else(|| MathError::NotIntegral(x.to_string()))
            }
            Value::Rational(r) if r.is_integer() => Ok(r.to_integer()),
            Value::Decimal(d) if d.is_integer() => Ok(decimal_trunc(d)),
            other => Err(MathError::NotIntegral(other.type_name().to_string())),
        }
    }

    /// Integer conversion truncating toward zero; strings are parsed
    pub fn to_bigint_trunc(&self) -> Result<BigInt, MathError> {
        match self {
            Value::Float(x) => {
                if x.is_nan() {
                    return Err(MathError::Invalid("cannot convert float NaN to integer".into()));
                }
                BigInt::from_f64(x.trunc()).ok_or_else(|| {
                    MathError::Invalid("cannot convert float infinity to integer".into())
                })
            }
            Value::Rational(r) => Ok(r.to_integer()),
            Value::Decimal(d) => Ok(decimal_trunc(d)),
            Value::Str(s) => s
                .trim()
                .replace('_', "")
                .parse::<BigInt>()
                .map_err(|_| MathError::Invalid(format!("invalid literal for int: '{}'", s))),
            other => other.to_bigint_exact(),
        }
    }

    /// Exact conversion to a rational number
    pub fn to_rational(&self) -> Result<BigRational, MathError> {
        match self {
            Value::Bool(_) | Value::Int(_) => {
                Ok(BigRational::from_integer(self.to_bigint_exact()?))
            }
            Value::Float(x) => BigRational::from_float(*x).ok_or_else(|| {
                MathError::Invalid(format!("cannot convert {} to fraction", x))
            }),
            Value::Decimal(d) => Ok(decimal_to_rational(d)),
            Value::Rational(r) => Ok(r.clone()),
            other => Err(MathError::NotReal(other.type_name())),
        }
    }

    /// Conversion to a complex number; reals get a zero imaginary part
    pub fn to_complex(&self) -> Result<Complex64, MathError> {
        match self {
            Value::Complex(c) => Ok(*c),
            other => Ok(Complex64::new(other.to_f64()?, 0.0)),
        }
    }
}

/// Integer part of a decimal, truncated toward zero
pub(crate) fn decimal_trunc(d: &BigDecimal) -> BigInt {
    let (digits, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        digits * pow10(scale.unsigned_abs())
    } else {
        digits / pow10(scale.unsigned_abs())
    }
}

/// Exact rational value of a decimal
pub(crate) fn decimal_to_rational(d: &BigDecimal) -> BigRational {
    let (digits, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        BigRational::from_integer(digits * pow10(scale.unsigned_abs()))
    } else {
        BigRational::new(digits, pow10(scale.unsigned_abs()))
    }
}

pub(crate) fn pow10(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10), exp as usize)
}

/// Round a rational to `digits` decimal places, ties to even, returning the
/// scaled integer `k` such that the rounded value is `k * 10^-digits`
pub(crate) fn round_scaled(r: &BigRational, digits: i64) -> BigInt {
    let scale = BigRational::from_integer(pow10(digits.unsigned_abs()));
    let scaled = if digits >= 0 { r * &scale } else { r / &scale };
    let floor = scaled.floor();
    let rem = &scaled - &floor;
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let mut rounded = floor.to_integer();
    if rem > half || (rem == half && rounded.is_odd()) {
        rounded += 1;
    }
    rounded
}

/// Round a rational to `digits` decimal places, ties to even
pub(crate) fn round_rational(r: &BigRational, digits: i64) -> BigRational {
    let rounded = round_scaled(r, digits);
    let scale = pow10(digits.unsigned_abs());
    if digits >= 0 {
        BigRational::new(rounded, scale)
    } else {
        BigRational::from_integer(rounded * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::int(3).is_truthy());
        assert!(!Value::str("").is_truthy());
    }

    #[test]
    fn exact_integer_rejects_fractions() {
        assert_eq!(Value::Float(4.0).to_bigint_exact().unwrap(), BigInt::from(4));
        assert!(Value::Float(4.5).to_bigint_exact().is_err());
    }

    #[test]
    fn truncating_integer_matches_int_semantics() {
        assert_eq!(Value::Float(-2.7).to_bigint_trunc().unwrap(), BigInt::from(-2));
        assert_eq!(Value::str(" 12 ").to_bigint_trunc().unwrap(), BigInt::from(12));
        assert!(Value::Float(f64::INFINITY).to_bigint_trunc().is_err());
    }

    #[test]
    fn decimal_is_exact_as_rational() {
        let d = BigDecimal::from_str("1.25").unwrap();
        assert_eq!(
            decimal_to_rational(&d),
            BigRational::new(BigInt::from(5), BigInt::from(4))
        );
        assert_eq!(decimal_trunc(&BigDecimal::from_str("-7.9").unwrap()), BigInt::from(-7));
    }

    #[test]
    fn rational_rounding_ties_to_even() {
        let r = BigRational::new(BigInt::from(5), BigInt::from(2));
        assert_eq!(round_rational(&r, 0), BigRational::from_integer(BigInt::from(2)));
        let r = BigRational::new(BigInt::from(1250), BigInt::from(1));
        assert_eq!(round_rational(&r, -2), BigRational::from_integer(BigInt::from(1200)));
    }

    #[test]
    fn complex_from_real() {
        assert_eq!(Value::int(2).to_complex().unwrap(), Complex64::new(2.0, 0.0));
        assert!(Value::str("x").to_complex().is_err());
    }
}
