//! Arithmetic, comparison and bitwise operators
//!
//! Binary arithmetic promotes both operands to the wider of their domains
//! along bool -> int -> fraction -> float -> complex. Decimals only mix with
//! bools, ints and other decimals.

use super::{binary, checked, checked_complex, unary};
use crate::value::{decimal_trunc, MathError, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

/// Operands of a binary operator brought to one numeric domain
enum Promoted {
    Int(BigInt, BigInt),
    Rational(BigRational, BigRational),
    Float(f64, f64),
    Decimal(BigDecimal, BigDecimal),
    Complex(Complex64, Complex64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Int,
    Rational,
    Float,
    Complex,
}

fn rank(v: &Value) -> Option<Rank> {
    match v {
        Value::Bool(_) | Value::Int(_) => Some(Rank::Int),
        Value::Rational(_) => Some(Rank::Rational),
        Value::Float(_) => Some(Rank::Float),
        Value::Complex(_) => Some(Rank::Complex),
        _ => None,
    }
}

fn decimal_operand(v: &Value) -> Option<BigDecimal> {
    match v {
        Value::Decimal(d) => Some(d.clone()),
        Value::Int(n) => Some(BigDecimal::new(n.clone(), 0)),
        Value::Bool(b) => Some(BigDecimal::new(BigInt::from(u8::from(*b)), 0)),
        _ => None,
    }
}

fn promote(op: &'static str, a: &Value, b: &Value) -> Result<Promoted, MathError> {
    let unsupported = || MathError::Unsupported {
        op,
        left: a.type_name(),
        right: b.type_name(),
    };
    if matches!(a, Value::Decimal(_)) || matches!(b, Value::Decimal(_)) {
        return match (decimal_operand(a), decimal_operand(b)) {
            (Some(x), Some(y)) => Ok(Promoted::Decimal(x, y)),
            _ => Err(unsupported()),
        };
    }
    let wider = match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.max(y),
        _ => return Err(unsupported()),
    };
    Ok(match wider {
        Rank::Int => Promoted::Int(a.to_bigint_exact()?, b.to_bigint_exact()?),
        Rank::Rational => Promoted::Rational(a.to_rational()?, b.to_rational()?),
        Rank::Float => Promoted::Float(a.to_f64()?, b.to_f64()?),
        Rank::Complex => Promoted::Complex(a.to_complex()?, b.to_complex()?),
    })
}

fn big_to_f64(n: &BigInt) -> Result<f64, MathError> {
    n.to_f64()
        .filter(|x| x.is_finite())
        .ok_or_else(|| MathError::Invalid("int too large to convert to float".into()))
}

pub(crate) fn add(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    if let (Value::Str(x), Value::Str(y)) = (a, b) {
        return Ok(Value::Str(format!("{}{}", x, y)));
    }
    Ok(match promote("+", a, b)? {
        Promoted::Int(x, y) => Value::Int(x + y),
        Promoted::Rational(x, y) => Value::Rational(x + y),
        Promoted::Float(x, y) => Value::Float(x + y),
        Promoted::Decimal(x, y) => Value::Decimal(x + y),
        Promoted::Complex(x, y) => Value::Complex(x + y),
    })
}

pub(crate) fn sub(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    Ok(match promote("-", a, b)? {
        Promoted::Int(x, y) => Value::Int(x - y),
        Promoted::Rational(x, y) => Value::Rational(x - y),
        Promoted::Float(x, y) => Value::Float(x - y),
        Promoted::Decimal(x, y) => Value::Decimal(x - y),
        Promoted::Complex(x, y) => Value::Complex(x - y),
    })
}

pub(crate) fn mul(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    match (a, b) {
        (Value::Str(s), n @ (Value::Int(_) | Value::Bool(_)))
        | (n @ (Value::Int(_) | Value::Bool(_)), Value::Str(s)) => {
            let times = n.to_bigint_exact()?;
            if times.is_negative() {
                return Ok(Value::str(""));
            }
            let times = times.to_usize().ok_or(MathError::Range)?;
            return Ok(Value::Str(s.repeat(times)));
        }
        _ => {}
    }
    Ok(match promote("*", a, b)? {
        Promoted::Int(x, y) => Value::Int(x * y),
        Promoted::Rational(x, y) => Value::Rational(x * y),
        Promoted::Float(x, y) => Value::Float(x * y),
        Promoted::Decimal(x, y) => Value::Decimal(x * y),
        Promoted::Complex(x, y) => Value::Complex(x * y),
    })
}

/// True division; integers divide to a float
pub(crate) fn div(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    Ok(match promote("/", a, b)? {
        Promoted::Int(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            let q = BigRational::new(x, y)
                .to_f64()
                .filter(|q| q.is_finite())
                .ok_or(MathError::Range)?;
            Value::Float(q)
        }
        Promoted::Rational(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            Value::Rational(x / y)
        }
        Promoted::Float(x, y) => {
            if y == 0.0 {
                return Err(MathError::DivisionByZero);
            }
            Value::Float(x / y)
        }
        Promoted::Decimal(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            Value::Decimal((x / y).with_prec(28))
        }
        Promoted::Complex(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            Value::Complex(x / y)
        }
    })
}

/// Modulo; the result takes the sign of the divisor, except for decimals
/// where it takes the sign of the dividend
pub(crate) fn rem(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    Ok(match promote("%", a, b)? {
        Promoted::Int(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            Value::Int(x.mod_floor(&y))
        }
        Promoted::Rational(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            let quotient = (&x / &y).floor();
            Value::Rational(x - y * quotient)
        }
        Promoted::Float(x, y) => {
            if y == 0.0 {
                return Err(MathError::DivisionByZero);
            }
            let mut r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r += y;
            } else if r == 0.0 {
                r = 0.0_f64.copysign(y);
            }
            Value::Float(r)
        }
        Promoted::Decimal(x, y) => {
            if y.is_zero() {
                return Err(MathError::DivisionByZero);
            }
            Value::Decimal(x % y)
        }
        Promoted::Complex(_, _) => {
            return Err(MathError::Unsupported {
                op: "%",
                left: a.type_name(),
                right: b.type_name(),
            })
        }
    })
}

pub(crate) fn pow(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    match promote("^", a, b)? {
        Promoted::Int(x, y) => int_pow(&x, &y),
        Promoted::Rational(x, y) => {
            if y.is_integer() {
                rational_pow(&x, &y.to_integer())
            } else {
                float_pow(ratio_to_f64(&x)?, ratio_to_f64(&y)?)
            }
        }
        Promoted::Float(x, y) => float_pow(x, y),
        Promoted::Decimal(x, y) => decimal_pow(&x, &y),
        Promoted::Complex(x, y) => complex_pow(x, y).map(Value::Complex),
    }
}

fn ratio_to_f64(r: &BigRational) -> Result<f64, MathError> {
    Value::Rational(r.clone()).to_f64()
}

fn int_pow(x: &BigInt, y: &BigInt) -> Result<Value, MathError> {
    if y.is_negative() {
        return float_pow(big_to_f64(x)?, big_to_f64(y)?);
    }
    let exp = y.to_u32().ok_or(MathError::Range)?;
    Ok(Value::Int(x.pow(exp)))
}

fn rational_pow(x: &BigRational, n: &BigInt) -> Result<Value, MathError> {
    let exp = n.abs().to_u32().ok_or(MathError::Range)?;
    let numer = x.numer().pow(exp);
    let denom = x.denom().pow(exp);
    if n.is_negative() {
        if numer.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Value::Rational(BigRational::new(denom, numer)))
    } else {
        Ok(Value::Rational(BigRational::new(numer, denom)))
    }
}

pub(crate) fn float_pow(x: f64, y: f64) -> Result<Value, MathError> {
    if x == 0.0 && y < 0.0 {
        return Err(MathError::DivisionByZero);
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        let z = complex_pow(Complex64::new(x, 0.0), Complex64::new(y, 0.0))?;
        return Ok(Value::Complex(z));
    }
    checked(&[x, y], x.powf(y)).map(Value::Float)
}

fn decimal_pow(x: &BigDecimal, y: &BigDecimal) -> Result<Value, MathError> {
    if !y.is_integer() {
        let (base, exp) = (Value::Decimal(x.clone()).to_f64()?, Value::Decimal(y.clone()).to_f64()?);
        if base < 0.0 {
            return Err(MathError::Domain);
        }
        let r = checked(&[base, exp], base.powf(exp))?;
        return BigDecimal::from_f64(r)
            .map(Value::Decimal)
            .ok_or(MathError::Range);
    }
    let n = decimal_trunc(y);
    let mut exp = n.abs().to_u32().ok_or(MathError::Range)?;
    let mut result = BigDecimal::one();
    let mut base = x.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &base;
        }
        exp >>= 1;
        if exp > 0 {
            base = &base * &base;
        }
    }
    if n.is_negative() {
        if result.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        result = (BigDecimal::one() / result).with_prec(28);
    }
    Ok(Value::Decimal(result))
}

pub(crate) fn complex_pow(x: Complex64, y: Complex64) -> Result<Complex64, MathError> {
    if x.is_zero() {
        if y.is_zero() {
            return Ok(Complex64::new(1.0, 0.0));
        }
        if y.re < 0.0 || y.im != 0.0 {
            return Err(MathError::DivisionByZero);
        }
        return Ok(Complex64::new(0.0, 0.0));
    }
    // Integral real exponents multiply out exactly
    if y.im == 0.0 && y.re.fract() == 0.0 && y.re.abs() <= f64::from(i32::MAX) {
        return checked_complex(&[x, y], x.powi(y.re as i32));
    }
    checked_complex(&[x, y], x.powc(y))
}

/// Equality across numeric domains; other kinds only equal their own kind
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::Time(x), Value::Time(y)) => x == y,
        (Value::Tuple(xs), Value::Tuple(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Complex(_), _) | (_, Value::Complex(_)) => {
            match (a.to_complex(), b.to_complex()) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            }
        }
        (Value::Float(x), _) | (_, Value::Float(x)) if !x.is_finite() => {
            match (a.to_f64(), b.to_f64()) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            }
        }
        _ => match (a.to_rational(), b.to_rational()) {
            (Ok(x), Ok(y)) => x == y,
            _ => false,
        },
    }
}

pub(crate) fn eq(args: &[Value]) -> Result<Value, MathError> {
    let (a, b) = binary(args)?;
    Ok(Value::Bool(values_equal(a, b)))
}

pub(crate) fn neg(args: &[Value]) -> Result<Value, MathError> {
    Ok(match unary(args)? {
        Value::Bool(b) => Value::Int(-BigInt::from(u8::from(*b))),
        Value::Int(n) => Value::Int(-n.clone()),
        Value::Float(x) => Value::Float(-x),
        Value::Decimal(d) => Value::Decimal(-d.clone()),
        Value::Rational(r) => Value::Rational(-r.clone()),
        Value::Complex(c) => Value::Complex(-c),
        other => {
            return Err(MathError::BadOperand {
                op: "unary -",
                got: other.type_name(),
            })
        }
    })
}

pub(crate) fn not(args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Bool(!unary(args)?.is_truthy()))
}

fn integer_operand(op: &'static str, v: &Value) -> Result<BigInt, MathError> {
    match v {
        Value::Bool(_) | Value::Int(_) => v.to_bigint_exact(),
        other => Err(MathError::BadOperand {
            op,
            got: other.type_name(),
        }),
    }
}

fn shift_operands(op: &'static str, args: &[Value]) -> Result<(BigInt, Option<usize>), MathError> {
    let (a, b) = binary(args)?;
    let x = integer_operand(op, a)?;
    let n = integer_operand(op, b)?;
    if n.is_negative() {
        return Err(MathError::NegativeShift);
    }
    Ok((x, n.to_usize()))
}

pub(crate) fn shl(args: &[Value]) -> Result<Value, MathError> {
    let (x, n) = shift_operands("«", args)?;
    if x.is_zero() {
        return Ok(Value::Int(x));
    }
    let n = n.ok_or(MathError::Range)?;
    Ok(Value::Int(x << n))
}

pub(crate) fn shr(args: &[Value]) -> Result<Value, MathError> {
    let (x, n) = shift_operands("»", args)?;
    Ok(Value::Int(match n {
        Some(n) => x >> n,
        None if x.is_negative() => BigInt::from(-1),
        None => BigInt::zero(),
    }))
}

pub(crate) fn invert(args: &[Value]) -> Result<Value, MathError> {
    let x = integer_operand("unary ~", unary(args)?)?;
    Ok(Value::Int(-(x + BigInt::one())))
}

pub(crate) fn infinity(_args: &[Value]) -> Result<Value, MathError> {
    Ok(Value::Float(f64::INFINITY))
}
