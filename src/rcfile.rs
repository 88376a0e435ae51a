use crate::terminal::{execute_line, strip_comment};
use rpn::Machine;
use std::fs;
use std::path::Path;

/// Evaluate the startup file, if there is one
///
/// Failing lines are reported as warnings and do not stop the rest.
pub(crate) fn load_rc(machine: &mut Machine, path: &Path) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (line_num, line) in content.lines().enumerate() {
        let line = strip_comment(line);
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = execute_line(machine, line) {
            eprintln!("Warning: {} line {}: {}", path.display(), line_num + 1, e);
        }
    }
}
