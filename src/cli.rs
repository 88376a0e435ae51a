use crate::rcfile::load_rc;
use crate::repl::run_repl;
use crate::terminal::{execute_line, repr, strip_comment};
use rpn::lexer::{self, grammar, GRAMMAR_DOC};
use rpn::{Config, Machine};
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the invocation does with its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Execute,
    Grammar,
    RawGrammar,
    Dump,
}

/// Parsed command-line arguments
#[derive(Debug)]
pub(crate) struct CliArgs {
    pub(crate) verbose: bool,
    /// Prompt given with `-p`
    pub(crate) prompt: Option<String>,
    pub(crate) interactive: bool,
    pub(crate) norc: bool,
    pub(crate) expressions: Option<Vec<String>>,
    pub(crate) files: Vec<String>,
    pub(crate) action: Action,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) error: Option<String>,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs {
        verbose: false,
        prompt: None,
        interactive: false,
        norc: false,
        expressions: None,
        files: Vec::new(),
        action: Action::Execute,
        help: false,
        version: false,
        error: None,
    };

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-v" | "--verbose" => {
                cli.verbose = true;
            }
            "-p" | "--prompt" => {
                cli.interactive = true;
                if let Some(prompt) = args.get(i + 1).filter(|a| !a.starts_with('-')) {
                    cli.prompt = Some(prompt.clone());
                    i += 1;
                }
            }
            "--norc" => {
                cli.norc = true;
            }
            "-e" | "--expression" => {
                // Everything after -e is one expression per argument
                cli.expressions = Some(args[i + 1..].to_vec());
                break;
            }
            "-g" | "--grammar" => {
                cli.action = Action::Grammar;
            }
            "-G" | "--raw-grammar" => {
                cli.action = Action::RawGrammar;
            }
            "-D" | "--dump" => {
                cli.action = Action::Dump;
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            flag if flag.starts_with('-') && flag != "-" => {
                cli.error = Some(format!("unrecognized argument: {}", flag));
            }
            path => {
                cli.files.push(path.to_string());
            }
        }
        i += 1;
    }

    if cli.interactive && cli.expressions.is_some() {
        cli.error = Some("-p and -e cannot be used together".to_string());
    }

    cli
}

pub(crate) fn print_help() {
    println!(
        r#"rpn-{} - Reverse Polish Notation calculator

USAGE:
    rpn [-v] [-p [PROMPT]] [--norc] [-e EXPR...] [-g | -G | -D] [FILE...]

OPTIONS:
    -v, --verbose           Show the cause of evaluation errors
    -p, --prompt [PROMPT]   Read interactively, with PROMPT (default "> ")
        --norc              Do not evaluate the startup file
    -e, --expression EXPR...
                            Evaluate each remaining argument as one line
    -g, --grammar           Print the grammar
    -G, --raw-grammar       Print the grammar as a regular expression
    -D, --dump              Print lexemes, grammar groups and arity per line
    -h, --help              Show this help message
    -V, --version           Show version

Without -e or FILE, lines are read from stdin; interactively when stdin and
stdout are terminals or -p is given.

SYNTAX:
    1_200 3.5 .5            Numbers, pushed with the input format
    'text' \x               Strings, pushed as they are
    +                       Operators apply to the top of the stack
    'sqrt' $                Apply a named function

Type h for all operators, functions and formats, V for their docs, and
'name' H for help on one of them.

ENVIRONMENT:
    RPN_VERBOSE RPN_PROMPT RPN_HISTORY RPN_RC
    RPN_IFMT RPN_OFMT RPN_PRECISION
    RPN_LOG                 Diagnostic log filter (default "warn")

STARTUP:
    ~/.rpnrc                Evaluated before interactive input"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("rpn-{}", VERSION);
}

/// Lines of input: `-e` arguments, files, or stdin
enum Source {
    Expressions(Vec<String>),
    Files(Vec<String>),
    Stdin,
}

impl Source {
    fn of(cli: &CliArgs) -> Source {
        match (&cli.expressions, cli.files.is_empty()) {
            (Some(expressions), _) => Source::Expressions(expressions.clone()),
            (None, false) => Source::Files(cli.files.clone()),
            (None, true) => Source::Stdin,
        }
    }
}

pub(crate) fn run(cli: CliArgs) -> ExitCode {
    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }
    if let Some(error) = cli.error {
        eprintln!("rpn: {}", error);
        return ExitCode::FAILURE;
    }

    let mut config = Config::from_env();
    config.verbose |= cli.verbose;
    if let Some(prompt) = &cli.prompt {
        config.prompt = prompt.clone();
    }
    if cli.norc {
        config.rc_file = None;
    }

    match cli.action {
        Action::Grammar => {
            println!("{}", GRAMMAR_DOC);
            ExitCode::SUCCESS
        }
        Action::RawGrammar => {
            println!("{}", grammar());
            ExitCode::SUCCESS
        }
        Action::Dump => dump(Source::of(&cli)),
        Action::Execute => execute(Source::of(&cli), &config, cli.interactive),
    }
}

/// Evaluate every line of the source on one machine
fn execute(source: Source, config: &Config, prompt: bool) -> ExitCode {
    let mut machine = Machine::with_config(config);
    match source {
        Source::Expressions(lines) => {
            for line in lines {
                report(execute_line(&mut machine, &line), None);
            }
            ExitCode::SUCCESS
        }
        Source::Files(paths) => execute_files(&mut machine, &paths),
        Source::Stdin => {
            if prompt || (io::stdin().is_terminal() && io::stdout().is_terminal()) {
                if let Some(path) = &config.rc_file {
                    load_rc(&mut machine, path);
                }
                match run_repl(&mut machine, config) {
                    Ok(()) => ExitCode::SUCCESS,
                    Err(e) => {
                        eprintln!("REPL error: {}", e);
                        ExitCode::FAILURE
                    }
                }
            } else {
                for line in io::stdin().lock().lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            eprintln!("Error reading stdin: {}", e);
                            return ExitCode::FAILURE;
                        }
                    };
                    report(execute_line(&mut machine, &line), None);
                }
                ExitCode::SUCCESS
            }
        }
    }
}

fn execute_files(machine: &mut Machine, paths: &[String]) -> ExitCode {
    for path in paths {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        };
        for (line_num, line) in content.lines().enumerate() {
            let line = strip_comment(line);
            if line.trim().is_empty() {
                continue;
            }
            report(execute_line(machine, line), Some((path.as_str(), line_num + 1)));
        }
    }
    ExitCode::SUCCESS
}

/// Print a line's error; the session goes on
fn report(result: Result<(), String>, location: Option<(&str, usize)>) {
    if let Err(e) = result {
        match location {
            Some((path, line_num)) => eprintln!("{} line {}: {}", path, line_num, e),
            None => eprintln!("{}", e),
        }
    }
}

/// Print the lexemes of every line with their groups and arity
fn dump(source: Source) -> ExitCode {
    let lines: Vec<String> = match source {
        Source::Expressions(lines) => lines,
        Source::Files(paths) => {
            let mut lines = Vec::new();
            for path in paths {
                match fs::read_to_string(&path) {
                    Ok(content) => lines.extend(content.lines().map(str::to_string)),
                    Err(e) => {
                        eprintln!("Error reading {}: {}", path, e);
                        return ExitCode::FAILURE;
                    }
                }
            }
            lines
        }
        Source::Stdin => match io::stdin().lock().lines().collect() {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let machine = Machine::new();
    println!("[groups]\t<repr(repr)>\t<arity>");
    for line in &lines {
        for lexeme in lexer::lex(line) {
            match lexeme {
                Ok(lexeme) => {
                    let arity = machine
                        .arity_of(&lexeme)
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "None".to_string());
                    println!(
                        "{}\t{}\t{}",
                        lexeme.groups().join("\t"),
                        repr(&lexeme.text),
                        arity
                    );
                }
                Err(e) => {
                    eprintln!("{}", e);
                    break;
                }
            }
        }
    }
    ExitCode::SUCCESS
}
