//! Text rendering of stack values
//!
//! Floats print in their shortest round-trip form, switching to scientific
//! notation outside `1e-4 <= |x| < 1e16`, and always keep a fractional part
//! (`81.0`, not `81`), so integers and floats stay distinguishable in output.

use crate::value::Value;
use chrono::{DateTime, Local, NaiveTime, Timelike};
use num_complex::Complex64;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Rational(r) => write!(f, "{}", r),
            Value::Complex(c) => write!(f, "{}", format_complex(*c)),
            Value::Timestamp(t) => write!(f, "{}", format_timestamp(t)),
            Value::Time(t) => write!(f, "{}", format_time(t)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Shortest round-trip rendering of a float
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "8.1e1"
    let sci = format!("{:e}", x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.push_str(&"0".repeat(int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.push_str(&"0".repeat((-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        out.push_str(&format!("{:02}", exp.abs()));
    }
    out
}

/// Complex rendering: `(3+4j)`, or `2j` for a pure imaginary value
pub fn format_complex(c: Complex64) -> String {
    let part = |x: f64| {
        let s = format_float(x);
        match s.strip_suffix(".0") {
            Some(trimmed) => trimmed.to_string(),
            None => s,
        }
    };
    let imag = part(c.im);
    if c.re == 0.0 && c.re.is_sign_positive() {
        return format!("{}j", imag);
    }
    let sign = if c.im.is_sign_negative() && !c.im.is_nan() { "" } else { "+" };
    format!("({}{}{}j)", part(c.re), sign, imag)
}

pub fn format_timestamp(t: &DateTime<Local>) -> String {
    let micros = t.timestamp_subsec_micros();
    if micros == 0 {
        t.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", t.format("%Y-%m-%d %H:%M:%S"), micros)
    }
}

pub fn format_time(t: &NaiveTime) -> String {
    let micros = t.nanosecond() / 1_000;
    if micros == 0 {
        t.format("%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", t.format("%H:%M:%S"), micros)
    }
}
