//! Clipboard-like selections reachable through the `+` and `*` registers
//!
//! Register `+` maps to the X clipboard selection and `*` to the primary
//! selection. The default backend shells out to `xclip`.

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Register names that alias a selection, with the selection they name
pub const SELECTIONS: &[(&str, &str)] = &[("+", "clipboard"), ("*", "primary")];

/// Selection for a register name, if the name is a selection alias
pub fn selection_for(name: &str) -> Option<&'static str> {
    SELECTIONS
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, selection)| *selection)
}

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Cannot run {program}: {source}")]
    Spawn {
        program: &'static str,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed {
        program: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("Selection {0} is empty")]
    Empty(String),
}

/// External store keyed by selection name
pub trait Selection {
    fn load(&mut self, selection: &str) -> Result<String, SelectionError>;
    fn store(&mut self, selection: &str, data: &str) -> Result<(), SelectionError>;
}

/// Selections through the `xclip` binary
#[derive(Debug, Default)]
pub struct XclipSelection;

const XCLIP: &str = "xclip";

impl Selection for XclipSelection {
    fn load(&mut self, selection: &str) -> Result<String, SelectionError> {
        let output = Command::new(XCLIP)
            .args(["-selection", selection, "-o"])
            .stderr(Stdio::null())
            .output()
            .map_err(|source| SelectionError::Spawn {
                program: XCLIP,
                source,
            })?;
        if !output.status.success() {
            return Err(SelectionError::Failed {
                program: XCLIP,
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn store(&mut self, selection: &str, data: &str) -> Result<(), SelectionError> {
        let spawn_err = |source| SelectionError::Spawn {
            program: XCLIP,
            source,
        };
        let mut child = Command::new(XCLIP)
            .args(["-selection", selection])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_err)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data.as_bytes()).map_err(spawn_err)?;
        }
        let status = child.wait().map_err(spawn_err)?;
        if !status.success() {
            return Err(SelectionError::Failed {
                program: XCLIP,
                status,
            });
        }
        Ok(())
    }
}

/// In-process selections, for tests and headless use
#[derive(Debug, Default)]
pub struct MemorySelection {
    contents: HashMap<String, String>,
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selection for MemorySelection {
    fn load(&mut self, selection: &str) -> Result<String, SelectionError> {
        self.contents
            .get(selection)
            .cloned()
            .ok_or_else(|| SelectionError::Empty(selection.to_string()))
    }

    fn store(&mut self, selection: &str, data: &str) -> Result<(), SelectionError> {
        self.contents.insert(selection.to_string(), data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(selection_for("+"), Some("clipboard"));
        assert_eq!(selection_for("*"), Some("primary"));
        assert_eq!(selection_for("x"), None);
    }

    #[test]
    fn memory_round_trip() {
        let mut sel = MemorySelection::new();
        assert!(sel.load("clipboard").is_err());
        sel.store("clipboard", "42").unwrap();
        assert_eq!(sel.load("clipboard").unwrap(), "42");
    }
}
