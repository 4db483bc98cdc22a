//! Syntax construction.
//!
//! [`SyntaxBuilder`] is the parser stack: the grammar hands it atoms and
//! list boundaries and it assembles the tree through the runtime's `add`
//! generic. [`read`] drives a builder from source text.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{map, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::pair,
    IResult, Parser,
};

use crate::data::syntax::{Syntax, SyntaxList};
use crate::error::EllError;
use crate::runtime::generic::GenericId;
use crate::runtime::Runtime;
use crate::send;
use crate::EllResult;

pub struct SyntaxBuilder<'rt> {
    rt: &'rt Runtime,
    add: GenericId,
    root: SyntaxList,
    stack: Vec<SyntaxList>,
}

impl<'rt> SyntaxBuilder<'rt> {
    pub fn new(rt: &'rt Runtime) -> EllResult<Self> {
        Ok(Self {
            rt,
            add: rt.core()?.generics.add,
            root: SyntaxList::new(),
            stack: Vec::new(),
        })
    }

    /// Number of lists currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn current(&self) -> &SyntaxList {
        self.stack.last().unwrap_or(&self.root)
    }

    fn add(&self, stx: Syntax) -> EllResult<()> {
        send!(self.rt, self.add, self.current().clone(), stx)?;
        Ok(())
    }

    pub fn add_symbol(&mut self, name: &str) -> EllResult<()> {
        self.add(Syntax::symbol(name))
    }

    pub fn add_string(&mut self, text: &str) -> EllResult<()> {
        self.add(Syntax::string(text))
    }

    /// Opens a new list inside the current one.
    pub fn push(&mut self) -> EllResult<()> {
        let list = SyntaxList::new();
        self.add(Syntax::List(list.clone()))?;
        self.stack.push(list);
        Ok(())
    }

    /// Closes the innermost open list.
    pub fn pop(&mut self) -> EllResult<()> {
        match self.stack.pop() {
            Some(_) => Ok(()),
            None => Err(EllError::Read {
                line: 0,
                column: 0,
                message: "close parenthesis without matching open",
            }),
        }
    }

    pub fn finish(self) -> EllResult<SyntaxList> {
        if !self.stack.is_empty() {
            return Err(EllError::Read {
                line: 0,
                column: 0,
                message: "unclosed list at end of input",
            });
        }
        Ok(self.root)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Str(String),
    Atom(&'a str),
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';')
}

/// Whitespace and `;` line comments.
fn skip_atmosphere(input: &str) -> IResult<&str, ()> {
    let comment = recognize(pair(char(';'), take_while(|c: char| c != '\n')));
    value((), many0(alt((multispace1, comment)))).parse(input)
}

/// A string literal, with `\"`, `\\`, `\n` and `\t` resolved.
fn string_literal(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('"').parse(input)?;
    let mut text = String::new();

    loop {
        let (after, chunk) = take_while(|c: char| c != '"' && c != '\\').parse(rest)?;
        text.push_str(chunk);

        let mut chars = after.chars();
        match chars.next() {
            Some('"') => return Ok((chars.as_str(), text)),
            Some('\\') => {
                let resolved = match chars.next() {
                    Some('"') => '"',
                    Some('\\') => '\\',
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some(_) => {
                        return Err(nom::Err::Failure(Error::new(after, ErrorKind::Escaped)))
                    }
                    None => return Err(nom::Err::Failure(Error::new(input, ErrorKind::Eof))),
                };
                text.push(resolved);
                rest = chars.as_str();
            }
            _ => return Err(nom::Err::Failure(Error::new(input, ErrorKind::Eof))),
        }
    }
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
        map(string_literal, Token::Str),
        map(take_while1(|c: char| !is_delimiter(c)), Token::Atom),
    ))
    .parse(input)
}

/// Line and column (both from 1) of the start of `rest` within `source`.
fn position(source: &str, rest: &str) -> (u32, u32) {
    let consumed = &source[..source.len() - rest.len()];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;
    (line as u32, column as u32)
}

fn read_error(source: &str, rest: &str, message: &'static str) -> EllError {
    let (line, column) = position(source, rest);
    EllError::Read {
        line,
        column,
        message,
    }
}

fn syntax_error(source: &str, err: nom::Err<Error<&str>>) -> EllError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let message = match e.code {
                ErrorKind::Escaped => "unknown string escape",
                ErrorKind::Eof => "unterminated string",
                _ => "unexpected input",
            };
            read_error(source, e.input, message)
        }
        nom::Err::Incomplete(_) => read_error(source, "", "unexpected end of input"),
    }
}

/// Reads every form in `source` into one root list.
///
/// Bare atoms, including numerals, become symbols named by their source
/// text. Only `"..."` literals produce anything else.
pub fn read(rt: &Runtime, source: &str) -> EllResult<SyntaxList> {
    let mut builder = SyntaxBuilder::new(rt)?;
    let mut open = Vec::new();
    let mut rest = source;

    loop {
        let (after, ()) = skip_atmosphere(rest).map_err(|e| syntax_error(source, e))?;
        rest = after;
        if rest.is_empty() {
            break;
        }

        let (after, tok) = token(rest).map_err(|e| syntax_error(source, e))?;
        match tok {
            Token::Open => {
                open.push(rest);
                builder.push()?;
            }
            Token::Close => {
                if builder.depth() == 0 {
                    return Err(read_error(
                        source,
                        rest,
                        "close parenthesis without matching open",
                    ));
                }
                open.pop();
                builder.pop()?;
            }
            Token::Str(text) => builder.add_string(&text)?,
            Token::Atom(atom) => builder.add_symbol(atom)?,
        }
        rest = after;
    }

    if let Some(start) = open.last() {
        return Err(read_error(source, start, "unclosed list at end of input"));
    }

    log::debug!("read {} top-level forms", builder.current().len());
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::symbol::intern;

    fn boot() -> Runtime {
        Runtime::boot().unwrap()
    }

    #[test]
    fn builder_assembles_nested_lists() {
        let rt = boot();
        let mut b = SyntaxBuilder::new(&rt).unwrap();
        b.push().unwrap();
        b.add_symbol("f").unwrap();
        b.push().unwrap();
        b.add_string("s").unwrap();
        b.pop().unwrap();
        b.pop().unwrap();
        b.add_symbol("x").unwrap();

        let root = b.finish().unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root.to_string(), "((f (\"s\" ) ) x )");
    }

    #[test]
    fn builder_rejects_unbalanced_use() {
        let rt = boot();
        let mut b = SyntaxBuilder::new(&rt).unwrap();
        assert!(matches!(b.pop(), Err(EllError::Read { .. })));

        b.push().unwrap();
        assert!(matches!(b.finish(), Err(EllError::Read { .. })));
    }

    #[test]
    fn builder_needs_a_bootstrapped_runtime() {
        let rt = Runtime::new();
        assert!(matches!(SyntaxBuilder::new(&rt), Err(EllError::Boot(_))));
    }

    #[test]
    fn atoms_are_symbols() {
        let rt = boot();
        let root = read(&rt, "foo 10 key: &rest:").unwrap();
        let names: Vec<_> = root
            .elements()
            .iter()
            .map(|stx| stx.as_symbol().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![intern("foo"), intern("10"), intern("key:"), intern("&rest:")]
        );
    }

    #[test]
    fn strings_comments_and_nesting() {
        let rt = boot();
        let root = read(&rt, "; comment\n(f \"a \\\"b\\\"\" (g)) ; trailing\n").unwrap();
        assert_eq!(root.len(), 1);

        let form = root.first().unwrap();
        let form = form.as_list().unwrap();
        assert_eq!(form.len(), 3);
        match form.second().unwrap() {
            Syntax::String(s) => assert_eq!(&*s, "a \"b\""),
            other => panic!("expected string, got {}", other),
        }
        assert!(form.third().unwrap().is_list());
    }

    #[test]
    fn atoms_stop_at_delimiters() {
        let rt = boot();
        let root = read(&rt, "(a(b)c\"d\")").unwrap();
        assert_eq!(root.to_string(), "((a (b ) c \"d\" ) )");
    }

    #[test]
    fn read_errors_carry_positions() {
        let rt = boot();

        assert_eq!(
            read(&rt, "(a\n  (b)").unwrap_err(),
            EllError::Read {
                line: 1,
                column: 1,
                message: "unclosed list at end of input",
            }
        );
        assert_eq!(
            read(&rt, "a\n b)").unwrap_err(),
            EllError::Read {
                line: 2,
                column: 3,
                message: "close parenthesis without matching open",
            }
        );
        assert!(matches!(
            read(&rt, "(f \"abc").unwrap_err(),
            EllError::Read { line: 1, column: 4, .. }
        ));
    }

    #[test]
    fn string_escapes() {
        let rt = boot();
        let root = read(&rt, r#""a\tb\\c\n" "#).unwrap();
        match root.first().unwrap() {
            Syntax::String(s) => assert_eq!(&*s, "a\tb\\c\n"),
            other => panic!("expected string, got {}", other),
        }

        assert_eq!(
            read(&rt, "\n  \"a\\qb\"").unwrap_err(),
            EllError::Read {
                line: 2,
                column: 5,
                message: "unknown string escape",
            }
        );
    }

    #[test]
    fn numerals_and_markers_keep_their_source_text() {
        let rt = boot();
        let root = read(&rt, "(f 1.50 -0 &all-keys:)").unwrap();
        assert_eq!(root.to_string(), "((f 1.50 -0 &all-keys: ) )");
    }

    #[test]
    fn empty_source_reads_empty_root() {
        let rt = boot();
        assert!(read(&rt, "  ; nothing\n").unwrap().is_empty());
    }
}
