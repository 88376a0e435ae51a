//! Operator and function tables
//!
//! Every callable the machine knows is registered here once, with its
//! declared arity, domain and whether it needs the machine itself:
//!
//! - `OPERATORS`: one-character symbols reachable directly from the grammar
//! - `FUNCTIONS` / `COMPLEX_FUNCTIONS`: named functions, reachable only by
//!   pushing the name and applying it with `$`
//!
//! Operators and functions that have a complex-domain variant are listed
//! again in the complex tables; the machine picks the variant at dispatch.

use crate::machine::{Machine, MachineError};
use crate::math::{arith, complex, real};
use crate::value::{MathError, Value};
use num_complex::Complex64;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Operation that needs the machine (stack, registers, formats)
pub type MachineFn = fn(&mut Machine, Vec<Value>) -> Result<Option<Value>, MachineError>;

/// Operation on operand values only
pub type PureFn = fn(&[Value]) -> Result<Value, MathError>;

#[derive(Clone, Copy)]
pub enum Operation {
    Machine(MachineFn),
    Pure(PureFn),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Real,
    Complex,
}

/// One registered operator or function
#[derive(Clone, Copy)]
pub struct Entry {
    pub name: &'static str,
    /// Number of operands popped: 0, 1 or 2
    pub arity: usize,
    pub domain: Domain,
    pub op: Operation,
    pub doc: &'static str,
}

impl Entry {
    pub fn requires_machine(&self) -> bool {
        matches!(self.op, Operation::Machine(_))
    }
}

fn machine(name: &'static str, arity: usize, op: MachineFn, doc: &'static str) -> Entry {
    Entry {
        name,
        arity,
        domain: Domain::Real,
        op: Operation::Machine(op),
        doc,
    }
}

fn pure(name: &'static str, arity: usize, op: PureFn, doc: &'static str) -> Entry {
    Entry {
        name,
        arity,
        domain: Domain::Real,
        op: Operation::Pure(op),
        doc,
    }
}

fn cplx(name: &'static str, arity: usize, op: PureFn, doc: &'static str) -> Entry {
    Entry {
        name,
        arity,
        domain: Domain::Complex,
        op: Operation::Pure(op),
        doc,
    }
}

fn by_symbol(entries: Vec<Entry>) -> BTreeMap<char, Entry> {
    entries
        .into_iter()
        .filter_map(|e| e.name.chars().next().map(|c| (c, e)))
        .collect()
}

fn by_name(entries: Vec<Entry>) -> BTreeMap<&'static str, Entry> {
    entries.into_iter().map(|e| (e.name, e)).collect()
}

pub static OPERATORS: Lazy<BTreeMap<char, Entry>> = Lazy::new(|| {
    by_symbol(vec![
        // Stack
        machine("p", 0, Machine::print_top, "Print the element on the top of the stack."),
        machine("P", 0, Machine::pop_print, "Pop and print element at top of stack."),
        machine("f", 0, Machine::print_stack, "Print all elements on the stack, top of the stack first."),
        machine("d", 0, Machine::dup, "Duplicate element at top of stack."),
        machine("r", 0, Machine::swap, "Swap two elements at top of stack."),
        machine("R", 1, Machine::rotate, "Rotate the entire stack by n."),
        machine("c", 0, Machine::clear, "Clear everything from the stack."),
        // Help
        machine("h", 0, Machine::help, "Print all possible commands."),
        machine("V", 0, Machine::verbose_help, "Print table of possible commands and abbreviated help."),
        machine("H", 1, Machine::help_for, "Show help for operator or math function with name."),
        // Registers
        machine("s", 2, Machine::store, "Store value into register name."),
        machine("l", 1, Machine::load, "Load register value into stack."),
        // Formats
        machine("i", 1, Machine::set_input_format, "Set input format."),
        machine("o", 1, Machine::set_output_format, "Set output format."),
        machine("k", 1, Machine::set_precision, "Set output rounding."),
        machine("I", 0, Machine::load_input_format, "Push input format to top of stack."),
        machine("O", 0, Machine::load_output_format, "Push output format to top of stack."),
        machine("K", 0, Machine::load_precision, "Push output rounding to top of stack."),
        // Arithmetic
        pure("+", 2, arith::add, "Same as a + b."),
        pure("-", 2, arith::sub, "Same as a - b."),
        pure("_", 1, arith::neg, "Same as -a."),
        pure("*", 2, arith::mul, "Same as a * b."),
        pure("/", 2, arith::div, "Same as a / b."),
        pure("%", 2, arith::rem, "Same as a % b."),
        pure("^", 2, arith::pow, "Same as a ** b."),
        // Logical
        pure("=", 2, arith::eq, "Same as a == b."),
        pure("!", 1, arith::not, "Same as not a."),
        // Bitwise
        pure("«", 2, arith::shl, "Same as a << b."),
        pure("»", 2, arith::shr, "Same as a >> b."),
        pure("~", 1, arith::invert, "Same as ~a."),
        // Symbols
        pure("∞", 0, arith::infinity, "Positive infinity."),
        pure("°", 1, real::degrees, "Convert angle x from radians to degrees."),
        // Shorthand
        pure("v", 1, real::sqrt, "Return the square root of x."),
        pure("j", 1, complex::imaginary, "complex(0, n) -- Same as 0+nj."),
    ])
});

/// Operators with a complex-domain variant
pub static COMPLEX_OPERATORS: Lazy<BTreeMap<char, Entry>> = Lazy::new(|| {
    by_symbol(vec![
        cplx("v", 1, complex::sqrt, "Return the square root of x."),
    ])
});

pub static FUNCTIONS: Lazy<BTreeMap<&'static str, Entry>> = Lazy::new(|| {
    by_name(vec![
        pure("acos", 1, |a| real::map1(a, f64::acos), "Return the arc cosine (measured in radians) of x."),
        pure("acosh", 1, |a| real::map1(a, f64::acosh), "Return the inverse hyperbolic cosine of x."),
        pure("asin", 1, |a| real::map1(a, f64::asin), "Return the arc sine (measured in radians) of x."),
        pure("asinh", 1, |a| real::map1(a, f64::asinh), "Return the inverse hyperbolic sine of x."),
        pure("atan", 1, |a| real::map1(a, f64::atan), "Return the arc tangent (measured in radians) of x."),
        pure("atan2", 2, |a| real::map2(a, f64::atan2), "Return the arc tangent (measured in radians) of y/x."),
        pure("atanh", 1, real::atanh, "Return the inverse hyperbolic tangent of x."),
        pure("ceil", 1, real::ceil, "Return the ceiling of x as an Integral."),
        pure("copysign", 2, |a| real::map2(a, f64::copysign), "Return a float with the magnitude of x but the sign of y."),
        pure("cos", 1, |a| real::map1(a, f64::cos), "Return the cosine of x (measured in radians)."),
        pure("cosh", 1, |a| real::map1(a, f64::cosh), "Return the hyperbolic cosine of x."),
        pure("degrees", 1, real::degrees, "Convert angle x from radians to degrees."),
        pure("e", 0, real::e, "Euler's number."),
        pure("erf", 1, |a| real::map1(a, libm::erf), "Error function at x."),
        pure("erfc", 1, |a| real::map1(a, libm::erfc), "Complementary error function at x."),
        pure("exp", 1, |a| real::map1(a, f64::exp), "Return e raised to the power of x."),
        pure("expm1", 1, |a| real::map1(a, f64::exp_m1), "Return exp(x)-1."),
        pure("fabs", 1, |a| real::map1(a, f64::abs), "Return the absolute value of the float x."),
        pure("factorial", 1, real::factorial, "Find x!."),
        pure("floor", 1, real::floor, "Return the floor of x as an Integral."),
        pure("fmod", 2, |a| real::map2(a, |x, y| x % y), "Return fmod(x, y), according to platform C."),
        pure("frexp", 1, real::frexp, "Return the mantissa and exponent of x, as pair (m, e)."),
        pure("fsum", 1, real::fsum, "Return an accurate floating point sum of values in the iterable seq."),
        pure("gamma", 1, real::gamma, "Gamma function at x."),
        pure("gcd", 2, real::gcd, "Greatest common divisor of x and y."),
        pure("hypot", 2, |a| real::map2(a, f64::hypot), "Return the Euclidean distance, sqrt(x*x + y*y)."),
        pure("inf", 0, real::inf, "Positive infinity."),
        pure("isclose", 2, real::isclose, "Determine whether two floating point numbers are close in value."),
        pure("isfinite", 1, |a| real::test1(a, f64::is_finite), "Return True if x is neither an infinity nor a NaN, and False otherwise."),
        pure("isinf", 1, |a| real::test1(a, f64::is_infinite), "Return True if x is a positive or negative infinity, and False otherwise."),
        pure("isnan", 1, |a| real::test1(a, f64::is_nan), "Return True if x is a NaN (not a number), and False otherwise."),
        pure("ldexp", 2, real::ldexp, "Return x * (2**i)."),
        pure("lgamma", 1, real::lgamma, "Natural logarithm of absolute value of Gamma function at x."),
        pure("log", 1, |a| real::log_with(a, f64::ln), "Return the natural logarithm of x."),
        pure("log10", 1, |a| real::log_with(a, f64::log10), "Return the base 10 logarithm of x."),
        pure("log1p", 1, real::log1p, "Return the natural logarithm of 1+x (base e)."),
        pure("log2", 1, |a| real::log_with(a, f64::log2), "Return the base 2 logarithm of x."),
        pure("modf", 1, real::modf, "Return the fractional and integer parts of x."),
        pure("nan", 0, real::nan, "Not a number."),
        pure("pi", 0, real::pi, "The ratio of a circle's circumference to its diameter."),
        pure("pow", 2, real::pow, "Return x**y (x to the power of y)."),
        pure("radians", 1, |a| real::map1(a, f64::to_radians), "Convert angle x from degrees to radians."),
        pure("sin", 1, |a| real::map1(a, f64::sin), "Return the sine of x (measured in radians)."),
        pure("sinh", 1, |a| real::map1(a, f64::sinh), "Return the hyperbolic sine of x."),
        pure("sqrt", 1, real::sqrt, "Return the square root of x."),
        pure("tan", 1, |a| real::map1(a, f64::tan), "Return the tangent of x (measured in radians)."),
        pure("tanh", 1, |a| real::map1(a, f64::tanh), "Return the hyperbolic tangent of x."),
        pure("trunc", 1, real::trunc, "Truncates x to the nearest Integral toward 0."),
        pure("abs", 1, real::abs, "Return the absolute value of the argument."),
    ])
});

pub static COMPLEX_FUNCTIONS: Lazy<BTreeMap<&'static str, Entry>> = Lazy::new(|| {
    by_name(vec![
        cplx("acos", 1, |a| complex::map1(a, Complex64::acos), "Return the arc cosine of z."),
        cplx("acosh", 1, |a| complex::map1(a, Complex64::acosh), "Return the inverse hyperbolic cosine of z."),
        cplx("asin", 1, |a| complex::map1(a, Complex64::asin), "Return the arc sine of z."),
        cplx("asinh", 1, |a| complex::map1(a, Complex64::asinh), "Return the inverse hyperbolic sine of z."),
        cplx("atan", 1, complex::atan, "Return the arc tangent of z."),
        cplx("atanh", 1, complex::atanh, "Return the inverse hyperbolic tangent of z."),
        cplx("cos", 1, |a| complex::map1(a, Complex64::cos), "Return the cosine of z."),
        cplx("cosh", 1, |a| complex::map1(a, Complex64::cosh), "Return the hyperbolic cosine of z."),
        cplx("e", 0, real::e, "Euler's number."),
        cplx("exp", 1, |a| complex::map1(a, Complex64::exp), "Return the exponential value e**z."),
        cplx("isclose", 2, complex::isclose, "Determine whether two complex numbers are close in value."),
        cplx("isfinite", 1, |a| complex::test1(a, |z| z.is_finite()), "Return True if both the real and imaginary parts of z are finite, else False."),
        cplx("isinf", 1, |a| complex::test1(a, |z| z.is_infinite()), "Checks if the real or imaginary part of z is infinite."),
        cplx("isnan", 1, |a| complex::test1(a, |z| z.is_nan()), "Checks if the real or imaginary part of z not a number (NaN)."),
        cplx("log", 1, complex::log, "Return the natural logarithm of z."),
        cplx("log10", 1, complex::log10, "Return the base-10 logarithm of z."),
        cplx("phase", 1, complex::phase, "Return argument, also known as the phase angle, of a complex."),
        cplx("pi", 0, real::pi, "The ratio of a circle's circumference to its diameter."),
        cplx("polar", 1, complex::polar, "Convert a complex from rectangular coordinates to polar coordinates."),
        cplx("rect", 2, complex::rect, "Convert from polar coordinates to rectangular coordinates."),
        cplx("sin", 1, |a| complex::map1(a, Complex64::sin), "Return the sine of z."),
        cplx("sinh", 1, |a| complex::map1(a, Complex64::sinh), "Return the hyperbolic sine of z."),
        cplx("sqrt", 1, complex::sqrt, "Return the square root of z."),
        cplx("tan", 1, |a| complex::map1(a, Complex64::tan), "Return the tangent of z."),
        cplx("tanh", 1, |a| complex::map1(a, Complex64::tanh), "Return the hyperbolic tangent of z."),
    ])
});

/// The `$` operation: pop a function name and apply the function
pub static APPLY: Lazy<Entry> = Lazy::new(|| {
    machine("$", 1, Machine::apply, "Pop a function name and apply that function.")
});

pub fn is_operator(c: char) -> bool {
    OPERATORS.contains_key(&c)
}

/// Operator symbols in sorted order
pub fn operator_keys() -> impl Iterator<Item = char> {
    OPERATORS.keys().copied()
}

/// Names of all functions, real and complex, sorted and deduplicated
pub fn function_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = FUNCTIONS
        .keys()
        .chain(COMPLEX_FUNCTIONS.keys())
        .copied()
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}
