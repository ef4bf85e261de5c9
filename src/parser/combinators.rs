use std::path::PathBuf;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt},
    sequence::{delimited, preceded},
    IResult,
    Parser,
};

use super::ast::{Arg, Link, Statement, STDERR, STDIN, STDOUT};

// ── Low-level nom parsers ──────────────────────────────────────────────────

pub fn parse_quoted_string(input: &str) -> IResult<&str, String> {
    let (input, content) = delimited(char('"'), opt(is_not("\"")), char('"')).parse(input)?;
    Ok((input, content.unwrap_or_default().to_string()))
}

pub fn parse_unquoted_string(input: &str) -> IResult<&str, String> {
    // Stop at whitespace, quotes, AND the operator / redirect characters ; & | > <
    let (input, content) = is_not(" \t\r\n\";|&><")(input)?;
    Ok((input, content.to_string()))
}

/// `$NAME`: an argument read from the environment directory.
fn parse_env_arg(input: &str) -> IResult<&str, Arg> {
    let (input, name) = preceded(char('$'), parse_unquoted_string).parse(input)?;
    Ok((input, Arg::env(&name)))
}

pub fn parse_arg(input: &str) -> IResult<&str, Arg> {
    alt((
        map(parse_quoted_string, |s| Arg::plain(&s)),
        parse_env_arg,
        map(parse_unquoted_string, |s| Arg::plain(&s)),
    ))
    .parse(input)
}

fn parse_word(input: &str) -> IResult<&str, String> {
    alt((parse_quoted_string, parse_unquoted_string)).parse(input)
}

// ── Redirect parsing ──────────────────────────────────────────────────────

/// Parse a redirect operator (`2>`, `>` or `<`) followed by a filename.
/// Returns the stream slot it targets.
fn parse_redirect(input: &str) -> IResult<&str, (usize, PathBuf)> {
    let (input, _) = multispace0(input)?;
    let (input, slot) = alt((
        map(tag("2>"), |_| STDERR),
        map(char('>'), |_| STDOUT),
        map(char('<'), |_| STDIN),
    ))
    .parse(input)?;
    let (input, _) = multispace0(input)?;
    let (input, file) = parse_word(input)?;
    Ok((input, (slot, PathBuf::from(file))))
}

// ── Single statement (with redirects) ─────────────────────────────────────

pub fn parse_statement(input: &str) -> IResult<&str, Statement> {
    let (mut rest, _) = multispace0(input)?;

    let (after_name, name) = parse_arg(rest)?;
    rest = after_name;

    let mut stmt = Statement::new(vec![name]);

    // Arguments and redirects interleave until an operator or end-of-input.
    loop {
        if let Ok((after_redir, (slot, file))) = parse_redirect(rest) {
            stmt.redirects[slot] = Some(file);
            rest = after_redir;
            continue;
        }

        if let Ok((after_arg, arg)) = preceded(multispace1, parse_arg).parse(rest) {
            stmt.raw_args.push(arg);
            rest = after_arg;
            continue;
        }

        break;
    }

    let (rest, _) = multispace0(rest)?;

    Ok((rest, stmt))
}

// ── Operator parsing ──────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Link(Link),
    Background,
    Sequence,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Link(Link::Pipe) => "|",
            Operator::Link(Link::And) => "&&",
            Operator::Link(Link::Or) => "||",
            Operator::Link(Link::None) | Operator::Sequence => ";",
            Operator::Background => "&",
        }
    }
}

/// Parse an optional operator following a statement.
pub fn parse_operator(input: &str) -> IResult<&str, Option<Operator>> {
    let (input, _) = multispace0(input)?;
    opt(alt((
        // Two-character operators must come before single-character ones.
        map(tag("||"), |_| Operator::Link(Link::Or)),
        map(tag("&&"), |_| Operator::Link(Link::And)),
        map(char('|'), |_| Operator::Link(Link::Pipe)),
        map(char('&'), |_| Operator::Background),
        map(char(';'), |_| Operator::Sequence),
    )))
    .parse(input)
}
