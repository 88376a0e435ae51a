//! Tokenization for the RPN regular grammar
//!
//! A line is split into lexemes by repeatedly matching, at the current
//! position, one of (in priority order): a number, a string, an operator,
//! the apply sign `$`, or a run of whitespace. Lexing stops at the first
//! position where nothing matches; the unconsumed rest of the line is the
//! error.

use crate::namespace;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1, take_while_m_n},
    character::complete::{anychar, char, digit0, digit1, satisfy},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use std::iter::FusedIterator;
use thiserror::Error;

/// What a lexeme matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexemeKind {
    /// Number text, grouping underscores included
    Number(String),
    /// String content; `\'` escapes are kept as written
    Str(String),
    /// One operator symbol
    Operator(char),
    /// `$`
    Apply,
    /// Run of whitespace
    Space,
}

/// One matched lexeme with the raw text it was matched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Couldn't lex {0}")]
    Unlexable(String),
}

impl Lexeme {
    /// True when no further input could extend this lexeme
    pub fn is_immediate(&self) -> bool {
        matches!(
            self.kind,
            LexemeKind::Operator(_) | LexemeKind::Apply | LexemeKind::Space
        )
    }

    pub fn is_feedable(&self) -> bool {
        !matches!(self.kind, LexemeKind::Space)
    }

    /// True for lexemes that push a value rather than apply something
    pub fn is_stackable(&self) -> bool {
        matches!(self.kind, LexemeKind::Number(_) | LexemeKind::Str(_))
    }

    /// Names of the grammar groups this lexeme matched
    pub fn groups(&self) -> Vec<&'static str> {
        let group = match self.kind {
            LexemeKind::Number(_) => "number",
            LexemeKind::Str(_) => "str",
            LexemeKind::Operator(_) => "operator",
            LexemeKind::Apply => "apply",
            LexemeKind::Space => "space",
        };
        if self.is_immediate() {
            vec![group, "immediate"]
        } else {
            vec![group]
        }
    }
}

fn three_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 3, |c: char| c.is_ascii_digit())(input)
}

/// Integral part: `1`, `1234`, `1_200`, `12_345_678`
fn integral(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        digit1,
        many0(tuple((char('_'), three_digits, digit0))),
    ))(input)
}

/// Fractional part written in groups: `200_200`, `123_45`
fn grouped_fraction(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        three_digits,
        many0(preceded(char('_'), three_digits)),
        opt(preceded(
            char('_'),
            take_while_m_n(1, 2, |c: char| c.is_ascii_digit()),
        )),
    )))(input)
}

/// Fractional part: the longer of plain digits and grouped digits
fn fractional(input: &str) -> IResult<&str, &str> {
    match (digit1(input), grouped_fraction(input)) {
        (Ok(plain), Ok(grouped)) => {
            if grouped.1.len() > plain.1.len() {
                Ok(grouped)
            } else {
                Ok(plain)
            }
        }
        (Ok(found), Err(_)) | (Err(_), Ok(found)) => Ok(found),
        (Err(e), Err(_)) => Err(e),
    }
}

/// Number: `1`, `1_200`, `1.`, `1.5`, `.5`, `0.200_2`
fn number(input: &str) -> IResult<&str, LexemeKind> {
    map(
        alt((
            recognize(pair(integral, opt(pair(char('.'), opt(fractional))))),
            recognize(pair(char('.'), fractional)),
        )),
        |s: &str| LexemeKind::Number(s.to_string()),
    )(input)
}

/// Quoted string: `'...'` where only `\'` escapes, kept verbatim
fn quoted_string(input: &str) -> IResult<&str, LexemeKind> {
    map(
        delimited(
            char('\''),
            recognize(many0(alt((tag("\\'"), is_not("'\\"), tag("\\"))))),
            char('\''),
        ),
        |s: &str| LexemeKind::Str(s.to_string()),
    )(input)
}

/// Shorthand string: a backslash and exactly one character
fn short_string(input: &str) -> IResult<&str, LexemeKind> {
    map(preceded(char('\\'), anychar), |c| {
        LexemeKind::Str(c.to_string())
    })(input)
}

fn operator(input: &str) -> IResult<&str, LexemeKind> {
    map(satisfy(namespace::is_operator), LexemeKind::Operator)(input)
}

fn apply(input: &str) -> IResult<&str, LexemeKind> {
    map(char('$'), |_| LexemeKind::Apply)(input)
}

fn space(input: &str) -> IResult<&str, LexemeKind> {
    map(take_while1(char::is_whitespace), |_| LexemeKind::Space)(input)
}

fn lexeme(input: &str) -> IResult<&str, LexemeKind> {
    alt((number, quoted_string, short_string, operator, apply, space))(input)
}

/// Lazy iterator over the lexemes of one line
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct Lexemes<'a> {
    rest: &'a str,
    failed: bool,
}

impl<'a> Iterator for Lexemes<'a> {
    type Item = Result<Lexeme, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match lexeme(self.rest) {
            Ok((rest, kind)) => {
                let text = &self.rest[..self.rest.len() - rest.len()];
                self.rest = rest;
                Some(Ok(Lexeme {
                    kind,
                    text: text.to_string(),
                }))
            }
            Err(_) => {
                self.failed = true;
                Some(Err(LexError::Unlexable(self.rest.trim_end().to_string())))
            }
        }
    }
}

impl FusedIterator for Lexemes<'_> {}

/// Lex a line lazily
pub fn lex(line: &str) -> Lexemes<'_> {
    Lexemes {
        rest: line,
        failed: false,
    }
}

/// Lex a whole line, failing if any of it cannot be lexed
pub fn lex_all(line: &str) -> Result<Vec<Lexeme>, LexError> {
    lex(line).collect()
}

/// Human-readable grammar
pub const GRAMMAR_DOC: &str = r#"lexeme     := number | str | immediate
immediate  := operator | apply | space

number     := integral ( '.' fractional? )?
            | '.' fractional
integral   := digit+ ( '_' digit{3} digit* )*
fractional := digit+
            | digit{3} ( '_' digit{3} )* ( '_' digit{1,2} )?

str        := "'" ( "\'" | any character but "'" )* "'"
            | '\' any character

operator   := one of the operator symbols (see `h`)
apply      := '$'
space      := whitespace+"#;

/// The grammar as a regular expression, built from the live operator table
pub fn grammar() -> String {
    let operators: Vec<String> = namespace::operator_keys()
        .map(|c| {
            if "\\^$.|?*+()[]{}-/#".contains(c) {
                format!("\\{}", c)
            } else {
                c.to_string()
            }
        })
        .collect();
    let integral = r"\d+(?:_\d{3}\d*)*";
    let fractional = r"(?:\d+|\d{3}(?:_\d{3})*(?:_\d{1,2})?)";
    format!(
        concat!(
            r"(?<number>{integral}(?:\.{fractional}?)?|\.{fractional})",
            r"|(?<str>'(?<__str__>(?:\\'|\\(?!')|[^'\\])*)'|\\(?<__str__>.))",
            r"|(?<immediate>(?<operator>{operators})|(?<apply>\$)|(?<space>\s+))",
        ),
        integral = integral,
        fractional = fractional,
        operators = operators.join("|"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<LexemeKind> {
        lex_all(line)
            .unwrap()
            .into_iter()
            .map(|l| l.kind)
            .collect()
    }

    fn number(text: &str) -> LexemeKind {
        LexemeKind::Number(text.to_string())
    }

    fn string(text: &str) -> LexemeKind {
        LexemeKind::Str(text.to_string())
    }

    #[test]
    fn lex_simple_expression() {
        assert_eq!(
            kinds("3 4 +"),
            vec![
                number("3"),
                LexemeKind::Space,
                number("4"),
                LexemeKind::Space,
                LexemeKind::Operator('+'),
            ]
        );
    }

    #[test]
    fn lex_adjacent_operators() {
        assert_eq!(
            kinds("3 4+p"),
            vec![
                number("3"),
                LexemeKind::Space,
                number("4"),
                LexemeKind::Operator('+'),
                LexemeKind::Operator('p'),
            ]
        );
    }

    #[test]
    fn lex_grouped_number() {
        assert_eq!(kinds("1_200"), vec![number("1_200")]);
        assert_eq!(kinds("12_345_678"), vec![number("12_345_678")]);
    }

    #[test]
    fn lex_short_group_splits() {
        assert_eq!(
            kinds("1_20"),
            vec![number("1"), LexemeKind::Operator('_'), number("20")]
        );
    }

    #[test]
    fn lex_fraction_forms() {
        assert_eq!(kinds("1."), vec![number("1.")]);
        assert_eq!(kinds(".5"), vec![number(".5")]);
        assert_eq!(kinds("0.200_200"), vec![number("0.200_200")]);
        assert_eq!(kinds("0.123_45"), vec![number("0.123_45")]);
    }

    #[test]
    fn lone_dot_does_not_lex() {
        assert_eq!(
            lex_all(". 1"),
            Err(LexError::Unlexable(". 1".to_string()))
        );
    }

    #[test]
    fn even_backslashes_kept_verbatim() {
        assert_eq!(kinds(r"'\\\\foo'"), vec![string(r"\\\\foo")]);
    }

    #[test]
    fn odd_backslashes_kept_verbatim() {
        assert_eq!(kinds(r"'\''"), vec![string(r"\'")]);
        assert_eq!(kinds(r"'\\\''"), vec![string(r"\\\'")]);
    }

    #[test]
    fn incomplete_escape_is_error() {
        let err = lex_all(r"'\'").unwrap_err();
        assert_eq!(err.to_string(), r"Couldn't lex '\'");
    }

    #[test]
    fn unterminated_string_is_error() {
        let err = lex_all(r"'\f").unwrap_err();
        assert_eq!(err, LexError::Unlexable(r"'\f".to_string()));
    }

    #[test]
    fn shorthand_string() {
        assert_eq!(
            kinds(r"\A s"),
            vec![string("A"), LexemeKind::Space, LexemeKind::Operator('s')]
        );
        assert!(lex_all("\\").is_err());
    }

    #[test]
    fn apply_and_space_collapse() {
        assert_eq!(
            kinds("'sin' \t $"),
            vec![string("sin"), LexemeKind::Space, LexemeKind::Apply]
        );
    }

    #[test]
    fn lexemes_before_error_are_yielded() {
        let lexemes: Vec<_> = lex("1 2 ?? 3").collect();
        assert_eq!(lexemes.len(), 5);
        assert!(lexemes[..4].iter().all(|l| l.is_ok()));
        assert_eq!(
            lexemes[4],
            Err(LexError::Unlexable("?? 3".to_string()))
        );
    }

    #[test]
    fn error_suffix_is_trimmed() {
        assert_eq!(
            lex_all("1 ?  "),
            Err(LexError::Unlexable("?".to_string()))
        );
    }

    #[test]
    fn classification() {
        let lexemes = lex_all("1 + $").unwrap();
        assert!(lexemes[0].is_stackable());
        assert!(!lexemes[0].is_immediate());
        assert!(!lexemes[1].is_feedable());
        assert!(lexemes[1].is_immediate());
        assert!(lexemes[2].is_immediate());
        assert!(!lexemes[2].is_stackable());
        assert_eq!(lexemes[2].groups(), vec!["operator", "immediate"]);
        assert_eq!(lexemes[0].groups(), vec!["number"]);
    }

    #[test]
    fn raw_text_is_recorded() {
        let lexemes = lex_all("'a b'  1_000").unwrap();
        assert_eq!(lexemes[0].text, "'a b'");
        assert_eq!(lexemes[1].text, "  ");
        assert_eq!(lexemes[2].text, "1_000");
    }

    #[test]
    fn grammar_string_rule_matches_lexer() {
        let g = grammar();
        assert!(g.contains(r"(?:\\'|\\(?!')|[^'\\])*"));
        assert!(!g.contains(r"(?:\\'|[^'])*"));
    }

    #[test]
    fn grammar_lists_operators() {
        let g = grammar();
        assert!(g.contains("(?<apply>\\$)"));
        assert!(g.contains("\\+"));
        assert!(g.contains('∞'));
    }
}
