use super::helpers::args_array;
use super::{Machine, MachineError, FORMATS};
use crate::namespace::{function_names, Entry, COMPLEX_FUNCTIONS, FUNCTIONS, OPERATORS};
use crate::value::Value;

/// Real entry first, as the real table shadows the complex one by name
fn function_entry(name: &str) -> Option<&'static Entry> {
    FUNCTIONS.get(name).or_else(|| COMPLEX_FUNCTIONS.get(name))
}

impl Machine {
    /// `h`
    pub(crate) fn help(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let operators: Vec<String> = OPERATORS.keys().map(char::to_string).collect();
        let formats: Vec<String> = FORMATS.iter().map(|f| f.tag().to_string()).collect();
        self.diagnostics.extend([
            format!("functions: {}", function_names().join(" ")),
            format!("operators: {}", operators.join(" ")),
            format!("formats: {}", formats.join(" ")),
        ]);
        Ok(None)
    }

    /// `V`
    pub(crate) fn verbose_help(&mut self, _args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        self.diagnostics.push("functions:".to_string());
        for name in function_names() {
            if let Some(entry) = function_entry(name) {
                self.diagnostics.push(format!("{}: {}", name, entry.doc));
            }
        }
        self.diagnostics.push(String::new());
        self.diagnostics.push("operators:".to_string());
        for (symbol, entry) in OPERATORS.iter() {
            self.diagnostics.push(format!("{}: {}", symbol, entry.doc));
        }
        self.diagnostics.push(String::new());
        self.diagnostics.push("formats:".to_string());
        for format in FORMATS {
            self.diagnostics
                .push(format!("{}: {}", format.tag(), format.name()));
        }
        Ok(None)
    }

    /// `H`: operators are searched before functions
    pub(crate) fn help_for(&mut self, args: Vec<Value>) -> Result<Option<Value>, MachineError> {
        let [name] = args_array(args)?;
        let name = match name {
            Value::Str(s) => s,
            other => other.to_string(),
        };
        let mut chars = name.chars();
        let operator = match (chars.next(), chars.next()) {
            (Some(symbol), None) => OPERATORS.get(&symbol),
            _ => None,
        };
        let entry = operator
            .or_else(|| function_entry(&name))
            .ok_or_else(|| MachineError::UnknownName(name.clone()))?;
        self.diagnostics.push(format!("{}: {}", name, entry.doc));
        self.diagnostics
            .push(format!("takes {} operand(s)", entry.arity));
        Ok(None)
    }
}
