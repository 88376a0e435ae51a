use super::{format, Machine, MachineError};
use crate::value::Value;

/// Operands of a machine-bound entry as a fixed-size array
pub(crate) fn args_array<const N: usize>(args: Vec<Value>) -> Result<[Value; N], MachineError> {
    args.try_into()
        .map_err(|_: Vec<Value>| MachineError::StackUnderflow { required: N })
}

impl Machine {
    /// Pop `n` values in one step, returned bottom first
    pub(crate) fn pop_args(&mut self, n: usize) -> Result<Vec<Value>, MachineError> {
        if self.stack.len() < n {
            return Err(MachineError::StackUnderflow { required: n });
        }
        let at = self.stack.len() - n;
        Ok(self.stack.split_off(at))
    }

    /// Convert number text with the input format
    pub(crate) fn to_internal(&self, text: &str) -> Result<Value, MachineError> {
        self.input_format
            .parse(text)
            .map_err(|cause| MachineError::Conversion {
                text: text.to_string(),
                cause,
            })
    }

    /// Convert a value with the output format, then round it
    pub(crate) fn to_output(&self, value: &Value) -> Result<Value, MachineError> {
        let converted =
            self.output_format
                .convert(value)
                .map_err(|cause| MachineError::Conversion {
                    text: value.to_string(),
                    cause,
                })?;
        Ok(match self.precision {
            Some(precision) => format::round(&converted, precision),
            None => converted,
        })
    }

    /// Printable lines for values, in the order given
    pub(crate) fn render_values<'a>(
        &self,
        values: impl IntoIterator<Item = &'a Value>,
    ) -> Result<Vec<String>, MachineError> {
        values
            .into_iter()
            .map(|v| self.to_output(v).map(|v| v.to_string()))
            .collect()
    }
}
