//! rpn - Reverse Polish Notation calculator
//!
//! # Overview
//!
//! rpn reads lines of whitespace-separated lexemes and evaluates them on an
//! operand stack. Numbers and strings push themselves; operators pop their
//! operands, run, and push their result.
//!
//! # Core Concepts
//!
//! ## Stack Discipline
//!
//! ```text
//! 3 4 +        # Stack: [7.0]
//! 9 2 ^        # 9 ^ 2, operands keep their order -> [81.0]
//! 1 2 r        # swap -> [2.0, 1.0]
//! 3.5 p        # prints 3.5
//! ```
//!
//! ## Named Functions
//!
//! Functions are not part of the grammar. Push the name as a string, then
//! apply it with `$`:
//!
//! ```text
//! 2 'sqrt' $   # [1.4142135623730951]
//! 'pi' $       # [3.141592653589793]
//! ```
//!
//! ## Registers and Formats
//!
//! ```text
//! 5 'x' s      # store 5 in the variable x
//! 'x' l        # load it back
//! 'c' o        # print as complex numbers
//! 4 _ v p      # prints 2j
//! ```
//!
//! # Example
//!
//! ```rust
//! use rpn::{Machine, Value};
//!
//! let mut machine = Machine::new();
//! machine.eval_line("3 4 + p").unwrap();
//! assert_eq!(machine.stack(), &[Value::Float(7.0)]);
//! assert_eq!(machine.take_output(), vec!["7.0"]);
//! ```

pub mod config;
pub mod display;
pub mod lexer;
pub mod machine;
pub(crate) mod math;
pub mod namespace;
pub mod selection;
pub mod value;

// Re-export commonly used items
pub use config::Config;
pub use lexer::{lex, lex_all, LexError, Lexeme, LexemeKind};
pub use machine::{Format, Machine, MachineError, Register};
pub use namespace::{Domain, Entry, Operation};
pub use selection::{MemorySelection, Selection, SelectionError, XclipSelection};
pub use value::{MathError, Value};

/// Convenience function to evaluate one line on a fresh machine
///
/// Returns the printed lines.
pub fn eval(line: &str) -> Result<Vec<String>, String> {
    let mut machine = Machine::new();
    machine.eval_line(line).map_err(|e| e.to_string())?;
    Ok(machine.take_output())
}
