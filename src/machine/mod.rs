//! Stack machine for the RPN calculator
//!
//! The machine consumes lexemes one at a time:
//! - Numbers are converted with the active input format and pushed
//! - Strings are pushed verbatim
//! - Operators and `$` resolve to a namespace [`Entry`] and are applied
//!
//! # Applying an entry
//!
//! Every entry declares its arity. Applying it pops exactly that many values
//! in one step (nothing is popped when the stack is too shallow), hands them
//! over bottom-first so `9 2 ^` is `9 ^ 2`, and pushes the result, if any.
//! Machine-bound entries (stack, register, format and help operators) get the
//! machine itself; pure entries only see their operands and report a
//! [`MathError`], which is wrapped here with the name of the entry.
//!
//! The machine never writes to the process streams. Printed values collect in
//! an output buffer and help text in a diagnostic buffer; the caller drains
//! both with [`Machine::take_output`] and [`Machine::take_diagnostics`].

mod format;
mod help;
mod helpers;
mod registers;
mod stack;
mod tests;

pub use format::{round, Format, FORMATS};
pub use registers::{name_shape, NameShape, Register};

use crate::config::Config;
use crate::lexer::{self, LexError, Lexeme, LexemeKind};
use crate::namespace::{
    Entry, Operation, APPLY, COMPLEX_FUNCTIONS, COMPLEX_OPERATORS, FUNCTIONS, OPERATORS,
};
use crate::selection::{Selection, SelectionError, XclipSelection};
use crate::value::{MathError, Value};
use helpers::args_array;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum MachineError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("Less than {required} element(s) on stack")]
    StackUnderflow { required: usize },
    #[error("No such register '{0}'")]
    UnknownRegister(String),
    #[error("No such format '{0}'")]
    UnknownFormat(String),
    #[error("No such name '{0}'")]
    UnknownName(String),
    #[error("Attempting to assign {value} to constant register '{name}'")]
    ConstantReassignment { name: String, value: Value },
    #[error("Cannot convert {text}")]
    Conversion { text: String, cause: MathError },
    #[error("Name invalid name {0}")]
    InvalidName(String),
    #[error("Bad precision {0}")]
    BadPrecision(String),
    #[error("{0}")]
    Selection(#[from] SelectionError),
    #[error("{context}")]
    Internal { context: String, cause: MathError },
}

impl MachineError {
    /// User-facing message; wrapped causes are only shown when verbose
    pub fn render(&self, verbose: bool) -> String {
        match self {
            MachineError::Conversion { cause, .. } | MachineError::Internal { cause, .. }
                if verbose =>
            {
                format!("{}: {}", self, cause)
            }
            _ => self.to_string(),
        }
    }
}

/// The RPN machine: operand stack, registers and format settings
pub struct Machine {
    pub(crate) stack: Vec<Value>,
    pub(crate) registers: HashMap<String, Register>,
    pub(crate) input_format: Format,
    pub(crate) output_format: Format,
    /// Output rounding; `None` prints values unrounded
    pub(crate) precision: Option<i64>,
    pub(crate) verbose: bool,
    /// Backend for the `+` and `*` registers
    pub(crate) selection: Box<dyn Selection>,
    pub(crate) output: Vec<String>,
    pub(crate) diagnostics: Vec<String>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            stack: Vec::new(),
            registers: HashMap::new(),
            input_format: Format::default(),
            output_format: Format::default(),
            precision: None,
            verbose: false,
            selection: Box::new(XclipSelection),
            output: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Machine with formats, precision and verbosity taken from `config`
    pub fn with_config(config: &Config) -> Self {
        Machine {
            input_format: config.input_format,
            output_format: config.output_format,
            precision: config.precision,
            verbose: config.verbose,
            ..Self::new()
        }
    }

    /// Replace the selection backend
    pub fn with_selection(mut self, selection: impl Selection + 'static) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Lex a line and feed its lexemes in order
    ///
    /// The first error, from the lexer or from evaluation, aborts the rest
    /// of the line. Whatever was done before it stays done.
    pub fn eval_line(&mut self, line: &str) -> Result<(), MachineError> {
        for lexeme in lexer::lex(line) {
            let lexeme = lexeme?;
            if lexeme.is_feedable() {
                self.feed(&lexeme)?;
            }
        }
        Ok(())
    }

    /// Push or apply one lexeme
    pub fn feed(&mut self, lexeme: &Lexeme) -> Result<(), MachineError> {
        trace!(lexeme = %lexeme.text, "feed");
        match &lexeme.kind {
            LexemeKind::Number(text) => {
                let value = self.to_internal(text)?;
                self.stack.push(value);
                Ok(())
            }
            LexemeKind::Str(content) => {
                self.stack.push(Value::Str(content.clone()));
                Ok(())
            }
            LexemeKind::Operator(symbol) => {
                let entry = self.resolve_operator(*symbol)?;
                self.apply_callable(&entry)
            }
            LexemeKind::Apply => self.apply_callable(&APPLY),
            LexemeKind::Space => Ok(()),
        }
    }

    /// Pop the entry's operands, run it and push its result
    pub fn apply_callable(&mut self, entry: &Entry) -> Result<(), MachineError> {
        let args = self.pop_args(entry.arity)?;
        debug!(name = entry.name, arity = entry.arity, domain = ?entry.domain, "apply");
        let result = match entry.op {
            Operation::Machine(f) => f(self, args)?,
            Operation::Pure(f) => Some(f(&args).map_err(|cause| MachineError::Internal {
                context: format!("Cannot apply {}", entry.name),
                cause,
            })?),
        };
        if let Some(value) = result {
            self.stack.push(value);
        }
        Ok(())
    }

    /// Entry an operator symbol dispatches to in the current state
    pub fn resolve_operator(&self, symbol: char) -> Result<Entry, MachineError> {
        let entry = OPERATORS
            .get(&symbol)
            .copied()
            .ok_or_else(|| MachineError::UnknownName(symbol.to_string()))?;
        Ok(self.prefer_complex(COMPLEX_OPERATORS.get(&symbol), entry))
    }

    /// Entry a function name dispatches to in the current state
    pub fn resolve_function(&self, name: &str) -> Result<Entry, MachineError> {
        let variant = COMPLEX_FUNCTIONS.get(name);
        match FUNCTIONS.get(name) {
            Some(entry) => Ok(self.prefer_complex(variant, *entry)),
            None => variant
                .copied()
                .ok_or_else(|| MachineError::UnknownName(name.to_string())),
        }
    }

    /// The complex variant wins when output is complex or an operand is
    fn prefer_complex(&self, variant: Option<&Entry>, entry: Entry) -> Entry {
        match variant {
            Some(variant)
                if self.output_format == Format::Complex
                    || self.stack.iter().rev().take(variant.arity).any(Value::is_complex) =>
            {
                *variant
            }
            _ => entry,
        }
    }

    /// Arity the lexeme would use if fed now; `None` for pushed lexemes
    pub fn arity_of(&self, lexeme: &Lexeme) -> Option<usize> {
        match lexeme.kind {
            LexemeKind::Operator(symbol) => self.resolve_operator(symbol).ok().map(|e| e.arity),
            LexemeKind::Apply => Some(APPLY.arity),
            LexemeKind::Number(_) | LexemeKind::Str(_) | LexemeKind::Space => None,
        }
    }

    /// `$`: pop a function name and apply the function
    pub(crate) fn apply(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [name] = args_array(args)?;
        let key = match &name {
            Value::Str(s) => s.clone(),
            other => return Err(MachineError::UnknownName(other.to_string())),
        };
        let entry = self.resolve_function(&key)?;
        if let Err(e) = self.apply_callable(&entry) {
            if matches!(e, MachineError::StackUnderflow { .. }) {
                self.stack.push(name);
            }
            return Err(e);
        }
        Ok(None)
    }

    /// Stack contents, bottom first
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.get(name)
    }

    pub fn input_format(&self) -> Format {
        self.input_format
    }

    pub fn output_format(&self) -> Format {
        self.output_format
    }

    pub fn precision(&self) -> Option<i64> {
        self.precision
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Drain the printed values
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Drain the help and diagnostic text
    pub fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }
}
