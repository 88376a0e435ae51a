//! Numeric input and output formats
//!
//! A format is selected by a one-character tag:
//!
//! ```text
//! i  int            arbitrary-size integer
//! f  float          double precision (default)
//! D  Decimal        arbitrary-precision decimal
//! d  fromtimestamp  seconds since the Unix epoch, local time
//! t  time           time of day, from hours
//! c  complex        complex number
//! F  Fraction       rational number
//! ```
//!
//! The input format parses number lexemes; the output format converts stack
//! values right before they are printed. Rounding (`k`) is applied after the
//! output conversion and never touches stored values.

use super::helpers::args_array;
use super::{Machine, MachineError};
use crate::value::{decimal_to_rational, pow10, round_rational, round_scaled, MathError, Value};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveTime, TimeZone};
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{FromPrimitive, ToPrimitive};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    Int,
    #[default]
    Float,
    Decimal,
    Timestamp,
    Time,
    Complex,
    Fraction,
}

/// All formats, ordered by tag
pub const FORMATS: [Format; 7] = [
    Format::Decimal,
    Format::Fraction,
    Format::Complex,
    Format::Timestamp,
    Format::Float,
    Format::Int,
    Format::Time,
];

const DECIMAL_PRECISION: u64 = 28;

/// Last microsecond of a day
const MAX_DAY_MICROS: u64 = 86_399_999_999;

fn invalid(kind: &str, text: &str) -> MathError {
    MathError::Invalid(format!("invalid literal for {}: '{}'", kind, text))
}

/// "1." and ".5" as "1.0" and "0.5"
fn complete_fraction(text: &str) -> String {
    let mut text = text.to_string();
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    if text.ends_with('.') {
        text.push('0');
    }
    text
}

fn parse_float(text: &str) -> Result<f64, MathError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| invalid("float", text))
}

fn parse_decimal(text: &str) -> Result<BigDecimal, MathError> {
    BigDecimal::from_str(&complete_fraction(text.trim())).map_err(|_| invalid("Decimal", text))
}

fn timestamp_from_seconds(seconds: f64) -> Result<DateTime<Local>, MathError> {
    let out_of_range = || MathError::Invalid(format!("timestamp out of range: {}", seconds));
    if !seconds.is_finite() {
        return Err(out_of_range());
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    let whole = whole.to_i64().ok_or_else(out_of_range)?;
    Local
        .timestamp_opt(whole, nanos)
        .single()
        .ok_or_else(out_of_range)
}

fn time_from_hours(hours: f64) -> Result<NaiveTime, MathError> {
    let out_of_range = || MathError::Invalid(format!("hour must be in 0..24, not {}", hours));
    if !(0.0..24.0).contains(&hours) {
        return Err(out_of_range());
    }
    // Just under 24 h may round up to midnight
    let micros = ((hours * 3_600_000_000.0).round() as u64).min(MAX_DAY_MICROS);
    let seconds = (micros / 1_000_000) as u32;
    let nanos = (micros % 1_000_000) as u32 * 1_000;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos).ok_or_else(out_of_range)
}

fn parse_clock(text: &str) -> Result<NaiveTime, MathError> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|_| invalid("time", text))
}

fn decimal_from_int(n: BigInt) -> BigDecimal {
    BigDecimal::new(n, 0)
}

impl Format {
    pub fn tag(self) -> char {
        match self {
            Format::Int => 'i',
            Format::Float => 'f',
            Format::Decimal => 'D',
            Format::Timestamp => 'd',
            Format::Time => 't',
            Format::Complex => 'c',
            Format::Fraction => 'F',
        }
    }

    pub fn from_tag(tag: &str) -> Option<Format> {
        FORMATS.into_iter().find(|f| {
            let mut chars = tag.chars();
            chars.next() == Some(f.tag()) && chars.next().is_none()
        })
    }

    /// Name of the converter, as shown by the help operators
    pub fn name(self) -> &'static str {
        match self {
            Format::Int => "int",
            Format::Float => "float",
            Format::Decimal => "Decimal",
            Format::Timestamp => "fromtimestamp",
            Format::Time => "time",
            Format::Complex => "complex",
            Format::Fraction => "Fraction",
        }
    }

    /// Parse number text; grouping underscores are ignored
    pub fn parse(self, text: &str) -> Result<Value, MathError> {
        let text = text.replace('_', "");
        let text = text.trim();
        match self {
            Format::Int => text
                .parse::<BigInt>()
                .map(Value::Int)
                .map_err(|_| invalid("int", text)),
            Format::Float => parse_float(text).map(Value::Float),
            Format::Decimal => parse_decimal(text).map(Value::Decimal),
            Format::Timestamp => timestamp_from_seconds(parse_float(text)?).map(Value::Timestamp),
            Format::Time => time_from_hours(parse_float(text)?).map(Value::Time),
            Format::Complex => Ok(Value::Complex(Complex64::new(parse_float(text)?, 0.0))),
            Format::Fraction => {
                Ok(Value::Rational(decimal_to_rational(&parse_decimal(text)?)))
            }
        }
    }

    /// Parse text held in a string value, accepting the printed forms
    fn convert_text(self, text: &str) -> Result<Value, MathError> {
        let text = text.trim();
        match self {
            Format::Complex => {
                let inner = text
                    .strip_prefix('(')
                    .and_then(|t| t.strip_suffix(')'))
                    .unwrap_or(text);
                Complex64::from_str(&inner.replace('j', "i"))
                    .map(Value::Complex)
                    .map_err(|_| invalid("complex", text))
            }
            Format::Fraction if text.contains('/') => BigRational::from_str(text)
                .map(Value::Rational)
                .map_err(|_| invalid("Fraction", text)),
            Format::Time if text.contains(':') => parse_clock(text).map(Value::Time),
            _ => self.parse(text),
        }
    }

    /// Convert a value for printing
    pub fn convert(self, value: &Value) -> Result<Value, MathError> {
        match value {
            Value::Tuple(items) => {
                return items
                    .iter()
                    .map(|v| self.convert(v))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            Value::Str(text) => return self.convert_text(text),
            _ => {}
        }
        match self {
            Format::Int => value.to_bigint_trunc().map(Value::Int),
            Format::Float => value.to_f64().map(Value::Float),
            Format::Decimal => match value {
                Value::Decimal(d) => Ok(Value::Decimal(d.clone())),
                Value::Bool(_) | Value::Int(_) => {
                    Ok(Value::Decimal(decimal_from_int(value.to_bigint_exact()?)))
                }
                Value::Float(x) => BigDecimal::from_f64(*x)
                    .map(Value::Decimal)
                    .ok_or_else(|| MathError::Invalid(format!("cannot convert {} to Decimal", x))),
                Value::Rational(r) => {
                    let numer = decimal_from_int(r.numer().clone());
                    let denom = decimal_from_int(r.denom().clone());
                    Ok(Value::Decimal((numer / denom).with_prec(DECIMAL_PRECISION)))
                }
                other => Err(MathError::NotReal(other.type_name())),
            },
            Format::Timestamp => match value {
                Value::Timestamp(t) => Ok(Value::Timestamp(*t)),
                other => timestamp_from_seconds(other.to_f64()?).map(Value::Timestamp),
            },
            Format::Time => match value {
                Value::Time(t) => Ok(Value::Time(*t)),
                Value::Timestamp(t) => Ok(Value::Time(t.time())),
                other => time_from_hours(other.to_f64()?).map(Value::Time),
            },
            Format::Complex => value.to_complex().map(Value::Complex),
            Format::Fraction => value.to_rational().map(Value::Rational),
        }
    }
}

fn round_float(x: f64, precision: i64) -> f64 {
    match BigRational::from_float(x) {
        Some(r) if x.is_finite() => round_rational(&r, precision).to_f64().unwrap_or(x),
        _ => x,
    }
}

/// Round a numeric value to `precision` decimal places, ties to even
///
/// Negative precision rounds to tens, hundreds and so on. Integers are only
/// touched by negative precision; non-numeric values pass through.
pub fn round(value: &Value, precision: i64) -> Value {
    match value {
        Value::Float(x) => Value::Float(round_float(*x, precision)),
        Value::Int(n) if precision < 0 => {
            let scaled = round_scaled(&BigRational::from_integer(n.clone()), precision);
            Value::Int(scaled * pow10(precision.unsigned_abs()))
        }
        Value::Decimal(d) => {
            let scaled = round_scaled(&decimal_to_rational(d), precision);
            Value::Decimal(BigDecimal::new(scaled, precision))
        }
        Value::Rational(r) => Value::Rational(round_rational(r, precision)),
        Value::Complex(c) => Value::Complex(Complex64::new(
            round_float(c.re, precision),
            round_float(c.im, precision),
        )),
        Value::Tuple(items) => Value::Tuple(items.iter().map(|v| round(v, precision)).collect()),
        other => other.clone(),
    }
}

fn format_from(value: &Value) -> Result<Format, MachineError> {
    match value {
        Value::Str(tag) => {
            Format::from_tag(tag).ok_or_else(|| MachineError::UnknownFormat(tag.clone()))
        }
        other => Err(MachineError::UnknownFormat(other.to_string())),
    }
}

impl Machine {
    /// `i`
    pub(crate) fn set_input_format(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [tag] = args_array(args)?;
        self.input_format = format_from(&tag)?;
        debug!(format = ?self.input_format, "input format");
        Ok(None)
    }

    /// `o`
    pub(crate) fn set_output_format(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [tag] = args_array(args)?;
        self.output_format = format_from(&tag)?;
        debug!(format = ?self.output_format, "output format");
        Ok(None)
    }

    /// `k`: nil clears the rounding
    pub(crate) fn set_precision(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [precision] = args_array(args)?;
        self.precision = match &precision {
            Value::Nil => None,
            other => Some(
                other
                    .to_bigint_trunc()
                    .ok()
                    .and_then(|n| n.to_i64())
                    .ok_or_else(|| MachineError::BadPrecision(other.to_string()))?,
            ),
        };
        debug!(precision = ?self.precision, "precision");
        Ok(None)
    }

    /// `I`
    pub(crate) fn load_input_format(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        Ok(Some(Value::Str(self.input_format.tag().to_string())))
    }

    /// `O`
    pub(crate) fn load_output_format(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        Ok(Some(Value::Str(self.output_format.tag().to_string())))
    }

    /// `K`
    pub(crate) fn load_precision(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        Ok(Some(self.precision.map(Value::int).unwrap_or(Value::Nil)))
    }
}
