use rpn::Machine;

/// Evaluate one line, then print what it produced
///
/// Output produced before an error is printed before the error message,
/// which is returned rendered for the machine's verbosity.
pub(crate) fn execute_line(machine: &mut Machine, input: &str) -> Result<(), String> {
    let result = machine.eval_line(input);
    flush(machine);
    result.map_err(|e| e.render(machine.is_verbose()))
}

/// Print buffered values to stdout and diagnostics to stderr
pub(crate) fn flush(machine: &mut Machine) {
    for line in machine.take_output() {
        println!("{}", line);
    }
    for line in machine.take_diagnostics() {
        eprintln!("{}", line);
    }
}

/// Cut a `#` comment that is not inside a string
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    let mut chars = line.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                // `\'` inside quotes, `\x` shorthand outside
                if !in_quote || line[i + 1..].starts_with('\'') {
                    chars.next();
                }
            }
            '\'' => in_quote = !in_quote,
            '#' if !in_quote => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Python-style quoted form of lexeme text, for the dump mode
pub(crate) fn repr(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_outside_strings() {
        assert_eq!(strip_comment("1 2 + # add"), "1 2 + ");
        assert_eq!(strip_comment("'a#b' p"), "'a#b' p");
        assert_eq!(strip_comment("'it\\'s' # x"), "'it\\'s' ");
        assert_eq!(strip_comment("\\# p"), "\\# p");
        assert_eq!(strip_comment("# only"), "");
    }

    #[test]
    fn repr_quoting() {
        assert_eq!(repr("3"), "'3'");
        assert_eq!(repr(" "), "' '");
        assert_eq!(repr("'x'"), "\"'x'\"");
        assert_eq!(repr("\\y"), "'\\\\y'");
    }
}
