//! Named registers
//!
//! The shape of a register name decides what it holds:
//!
//! | name        | kind        | `s` (store)               | `l` (load)              |
//! |-------------|-------------|---------------------------|-------------------------|
//! | `_`         | discard     | dropped                   | pushes None             |
//! | `+`, `*`    | selection   | written to the clipboard  | read from the clipboard |
//! | `ABC`       | constant    | first store only          | copies the value        |
//! | `abc`       | variable    | overwrites                | copies the value        |
//! | anything else (`Abc`, `aBc`, `1`) | accumulator | appends | pops the last value |
//!
//! Upper and lower case follow the Unicode case properties: a name is
//! all-uppercase when it has at least one cased character and no lowercase
//! one, and all-lowercase the other way round.

use super::helpers::args_array;
use super::{Machine, MachineError};
use crate::selection::selection_for;
use crate::value::Value;
use tracing::{debug, warn};

/// Storage behind one register name
#[derive(Debug, Clone, PartialEq)]
pub enum Register {
    Constant(Value),
    Variable(Value),
    Accumulator(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameShape {
    Discard,
    Selection(&'static str),
    Constant,
    Variable,
    Accumulator,
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

pub fn name_shape(name: &str) -> NameShape {
    if name == "_" {
        return NameShape::Discard;
    }
    if let Some(selection) = selection_for(name) {
        return NameShape::Selection(selection);
    }
    let cased = name.chars().any(is_cased);
    if cased && !name.chars().any(char::is_lowercase) {
        NameShape::Constant
    } else if cased && !name.chars().any(char::is_uppercase) {
        NameShape::Variable
    } else {
        NameShape::Accumulator
    }
}

impl Machine {
    /// `s`: operands are the value, then the name
    pub(crate) fn store(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [value, name] = args_array(args)?;
        let name = match name {
            Value::Str(s) if !s.is_empty() => s,
            Value::Str(s) => return Err(MachineError::InvalidName(format!("'{}'", s))),
            other => return Err(MachineError::InvalidName(other.to_string())),
        };
        let shape = name_shape(&name);
        debug!(register = %name, ?shape, "store");
        match shape {
            NameShape::Discard => {}
            NameShape::Selection(selection) => {
                if let Err(e) = self.selection.store(selection, &value.to_string()) {
                    warn!(selection, error = %e, "selection store failed");
                    return Err(e.into());
                }
            }
            NameShape::Constant => {
                if self.registers.contains_key(&name) {
                    self.stack.push(value.clone());
                    return Err(MachineError::ConstantReassignment { name, value });
                }
                self.registers.insert(name, Register::Constant(value));
            }
            NameShape::Variable => {
                self.registers.insert(name, Register::Variable(value));
            }
            NameShape::Accumulator => match self.registers.get_mut(&name) {
                Some(Register::Accumulator(items)) => items.push(value),
                _ => {
                    self.registers.insert(name, Register::Accumulator(vec![value]));
                }
            },
        }
        Ok(None)
    }

    /// `l`
    pub(crate) fn load(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [name] = args_array(args)?;
        let name = match name {
            Value::Str(s) => s,
            other => return Err(MachineError::UnknownRegister(other.to_string())),
        };
        let missing = || MachineError::UnknownRegister(name.clone());
        let value = match name_shape(&name) {
            NameShape::Discard => Value::Nil,
            NameShape::Selection(selection) => match self.selection.load(selection) {
                Ok(text) => Value::Str(text),
                Err(e) => {
                    warn!(selection, error = %e, "selection load failed");
                    return Err(e.into());
                }
            },
            NameShape::Accumulator => match self.registers.get_mut(&name) {
                Some(Register::Accumulator(items)) => items.pop().ok_or_else(missing)?,
                _ => return Err(missing()),
            },
            NameShape::Constant | NameShape::Variable => match self.registers.get(&name) {
                Some(Register::Constant(v)) | Some(Register::Variable(v)) => v.clone(),
                _ => return Err(missing()),
            },
        };
        Ok(Some(value))
    }
}
