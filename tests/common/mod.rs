//! Common test utilities for rpn integration tests

pub use rpn::{lex_all, LexemeKind, Machine, MachineError, MemorySelection, Value};

/// Fresh machine with an in-memory clipboard
pub fn machine() -> Machine {
    Machine::new().with_selection(MemorySelection::new())
}

/// Helper to evaluate one line and return the printed lines
pub fn eval(input: &str) -> Result<Vec<String>, String> {
    let mut m = machine();
    m.eval_line(input).map_err(|e| e.to_string())?;
    Ok(m.take_output())
}

/// Helper to evaluate one line and return the stack, bottom first
#[allow(dead_code)]
pub fn stack_after(input: &str) -> Result<Vec<Value>, String> {
    let mut m = machine();
    m.eval_line(input).map_err(|e| e.to_string())?;
    Ok(m.stack().to_vec())
}

/// Helper to evaluate one line and return the error message
#[allow(dead_code)]
pub fn eval_err(input: &str) -> String {
    let mut m = machine();
    match m.eval_line(input) {
        Ok(()) => panic!("expected {:?} to fail", input),
        Err(e) => e.to_string(),
    }
}
