use crate::terminal::execute_line;
use rpn::namespace::function_names;
use rpn::{Config, Machine};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper, Result as RlResult};
use std::borrow::Cow;

/// Helper for rustyline: function name completion and a stack hint
struct RpnHelper {
    functions: Vec<&'static str>,
    /// Stack rendered top first, refreshed before every prompt
    stack: Vec<String>,
}

impl Helper for RpnHelper {}

impl Completer for RpnHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        // Only inside an open string: function names are applied as 'name' $
        if head.matches('\'').count() % 2 == 0 {
            return Ok((pos, Vec::new()));
        }
        let start = head.rfind('\'').map(|i| i + 1).unwrap_or(0);
        let prefix = &head[start..];

        let pairs: Vec<Pair> = self
            .functions
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{}'", name),
            })
            .collect();

        Ok((start, pairs))
    }
}

impl Hinter for RpnHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if self.stack.is_empty() || pos < line.len() {
            return None;
        }
        Some(format!("\n {}", self.stack.join(", ")))
    }
}

impl Highlighter for RpnHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Dim the stack hint
        Cow::Owned(format!("\x1b[90m{}\x1b[0m", hint))
    }
}

impl Validator for RpnHelper {}

/// Read lines interactively until end of input
pub(crate) fn run_repl(machine: &mut Machine, config: &Config) -> RlResult<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(RpnHelper {
        functions: function_names(),
        stack: Vec::new(),
    }));

    if let Some(ref path) = config.history_file {
        let _ = rl.load_history(path);
    }

    loop {
        if let Some(helper) = rl.helper_mut() {
            helper.stack = machine.stack().iter().rev().map(|v| v.to_string()).collect();
        }

        match rl.readline(&config.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                if let Err(e) = execute_line(machine, &line) {
                    eprintln!("{}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C drops the current line only
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = config.history_file {
        let _ = rl.save_history(path);
    }

    Ok(())
}
