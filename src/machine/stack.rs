use super::helpers::args_array;
use super::{Machine, MachineError};
use crate::value::Value;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

fn underflow(required: usize) -> MachineError {
    MachineError::StackUnderflow { required }
}

impl Machine {
    /// `p`
    pub(crate) fn print_top(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let top = self.stack.last().ok_or_else(|| underflow(1))?;
        let lines = self.render_values([top])?;
        self.output.extend(lines);
        Ok(None)
    }

    /// `P`: the value is only removed once it printed
    pub(crate) fn pop_print(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let top = self.stack.last().ok_or_else(|| underflow(1))?;
        let lines = self.render_values([top])?;
        self.stack.pop();
        self.output.extend(lines);
        Ok(None)
    }

    /// `f`: top of the stack first
    pub(crate) fn print_stack(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let lines = self.render_values(self.stack.iter().rev())?;
        self.output.extend(lines);
        Ok(None)
    }

    /// `d`
    pub(crate) fn dup(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let top = self.stack.last().cloned().ok_or_else(|| underflow(1))?;
        Ok(Some(top))
    }

    /// `r`
    pub(crate) fn swap(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let len = self.stack.len();
        if len < 2 {
            return Err(underflow(2));
        }
        self.stack.swap(len - 1, len - 2);
        Ok(None)
    }

    /// `R`: rotate toward the top; `1 R` moves the top value to the bottom
    pub(crate) fn rotate(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [n] = args_array(args)?;
        let n = n.to_bigint_trunc().map_err(|cause| MachineError::Internal {
            context: format!("Cannot rotate stack by {}", n),
            cause,
        })?;
        if self.stack.is_empty() {
            return Ok(None);
        }
        let len = BigInt::from(self.stack.len());
        let k = n.mod_floor(&len).to_usize().unwrap_or(0);
        self.stack.rotate_right(k);
        Ok(None)
    }

    /// `c`
    pub(crate) fn clear(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        self.stack.clear();
        Ok(None)
    }
}
