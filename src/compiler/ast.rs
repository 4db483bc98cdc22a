//! Canonical AST.
//!
//! The fixed vocabulary every syntax tree is normalized into. The backend
//! consumes a sequence of these in program order.

use std::io::Write;

use indexmap::IndexMap;
use pretty::{BoxAllocator, DocAllocator, DocBuilder};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::data::symbol::Symbol;

/// The language is a Lisp-2: one name may denote a variable and a function
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Variable,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub symbol: Symbol,
    pub ns: Namespace,
}

impl Identifier {
    pub fn new(symbol: Symbol, ns: Namespace) -> Self {
        Self { symbol, ns }
    }

    pub fn variable(symbol: Symbol) -> Self {
        Self::new(symbol, Namespace::Variable)
    }

    pub fn function(symbol: Symbol) -> Self {
        Self::new(symbol, Namespace::Function)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Ref(Identifier),
    Def(Identifier, Box<Ast>),
    Set(Identifier, Box<Ast>),
    Cond {
        test: Box<Ast>,
        consequent: Box<Ast>,
        alternative: Box<Ast>,
    },
    Seq(Vec<Ast>),
    App(Box<Ast>, Args),
    Lam(Box<Params>, Box<Ast>),
}

/// Dissected call arguments. Keywords are stored without their colon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    pub pos: Vec<Ast>,
    pub key: IndexMap<Symbol, Ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub id: Identifier,
    /// Default value, normalized when the parameter list is dissected.
    pub init: Option<Ast>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    pub req: Vec<Param>,
    pub opt: Vec<Param>,
    pub key: Vec<Param>,
    pub rest: Option<Param>,
    pub all_keys: Option<Param>,
}

impl Ast {
    pub fn var_ref(symbol: Symbol) -> Self {
        Ast::Ref(Identifier::variable(symbol))
    }

    pub fn fun_ref(symbol: Symbol) -> Self {
        Ast::Ref(Identifier::function(symbol))
    }
}

fn fg(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec
}

fn kw(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));
    spec.set_bold(true);
    spec
}

/// `(head part part ...)`, breaking between parts when too wide.
fn form<'a, D>(
    allocator: &'a D,
    head: &'static str,
    parts: Vec<DocBuilder<'a, D, ColorSpec>>,
) -> DocBuilder<'a, D, ColorSpec>
where
    D: DocAllocator<'a, ColorSpec>,
    D::Doc: Clone,
{
    let head = allocator.text(head).annotate(fg(Color::Green));
    allocator
        .intersperse(std::iter::once(head).chain(parts), allocator.line())
        .nest(1)
        .group()
        .parens()
        .align()
}

impl Identifier {
    pub fn pretty<'a, D>(&self, allocator: &'a D) -> DocBuilder<'a, D, ColorSpec>
    where
        D: DocAllocator<'a, ColorSpec>,
        D::Doc: Clone,
    {
        allocator
            .text(self.symbol.name())
            .annotate(kw(Color::Blue))
    }
}

impl Param {
    pub fn pretty<'a, D>(&self, allocator: &'a D) -> DocBuilder<'a, D, ColorSpec>
    where
        D: DocAllocator<'a, ColorSpec>,
        D::Doc: Clone,
    {
        match &self.init {
            None => self.id.pretty(allocator),
            Some(init) => self
                .id
                .pretty(allocator)
                .append(allocator.space())
                .append(init.pretty(allocator))
                .parens(),
        }
    }
}

impl Params {
    pub fn pretty<'a, D>(&self, allocator: &'a D) -> DocBuilder<'a, D, ColorSpec>
    where
        D: DocAllocator<'a, ColorSpec>,
        D::Doc: Clone,
    {
        let mut parts = Vec::new();
        let marker = |name: &'static str| allocator.text(name).annotate(fg(Color::Magenta));

        parts.extend(self.req.iter().map(|p| p.pretty(allocator)));

        if !self.opt.is_empty() {
            parts.push(marker("&optional:"));
            parts.extend(self.opt.iter().map(|p| p.pretty(allocator)));
        }

        if !self.key.is_empty() {
            parts.push(marker("&key:"));
            parts.extend(self.key.iter().map(|p| p.pretty(allocator)));
        }

        if let Some(rest) = &self.rest {
            parts.push(marker("&rest:"));
            parts.push(rest.pretty(allocator));
        }

        if let Some(all_keys) = &self.all_keys {
            parts.push(marker("&all-keys:"));
            parts.push(all_keys.pretty(allocator));
        }

        allocator
            .intersperse(parts, allocator.space())
            .parens()
            .group()
    }
}

impl Ast {
    pub fn pretty<'a, D>(&self, allocator: &'a D) -> DocBuilder<'a, D, ColorSpec>
    where
        D: DocAllocator<'a, ColorSpec>,
        D::Doc: Clone,
    {
        match self {
            Self::Ref(id) => {
                let head = match id.ns {
                    Namespace::Variable => "ref",
                    Namespace::Function => "fref",
                };
                form(allocator, head, vec![id.pretty(allocator)])
            }

            Self::Def(id, value) => {
                let head = match id.ns {
                    Namespace::Variable => "def",
                    Namespace::Function => "fdef",
                };
                form(allocator, head, vec![id.pretty(allocator), value.pretty(allocator)])
            }

            Self::Set(id, value) => {
                let head = match id.ns {
                    Namespace::Variable => "set",
                    Namespace::Function => "fset",
                };
                form(allocator, head, vec![id.pretty(allocator), value.pretty(allocator)])
            }

            Self::Cond {
                test,
                consequent,
                alternative,
            } => form(
                allocator,
                "if",
                vec![
                    test.pretty(allocator),
                    consequent.pretty(allocator),
                    alternative.pretty(allocator),
                ],
            ),

            Self::Seq(exprs) => form(
                allocator,
                "seq",
                exprs.iter().map(|expr| expr.pretty(allocator)).collect(),
            ),

            Self::App(op, args) => {
                let mut parts = vec![op.pretty(allocator)];
                parts.extend(args.pos.iter().map(|arg| arg.pretty(allocator)));
                for (key, value) in args.key.iter() {
                    parts.push(
                        allocator
                            .text(format!("{}:", key))
                            .annotate(fg(Color::Cyan))
                            .append(allocator.space())
                            .append(value.pretty(allocator)),
                    );
                }
                form(allocator, "app", parts)
            }

            Self::Lam(params, body) => form(
                allocator,
                "lambda",
                vec![params.pretty(allocator), body.pretty(allocator)],
            ),
        }
    }

    pub fn pretty_print(&self, width: usize, out: impl WriteColor) -> std::io::Result<()> {
        let allocator = BoxAllocator;

        self.pretty(&allocator).1.render_colored(width, out)?;

        Ok(())
    }

    /// One rendered node per line, as handed to the backend.
    pub fn emit(&self, width: usize, mut out: impl WriteColor) -> std::io::Result<()> {
        self.pretty_print(width, &mut out)?;
        writeln!(out)
    }
}

impl std::fmt::Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut vec = Vec::new();
        let mut out = termcolor::NoColor::new(&mut vec);
        match self.pretty_print(80, &mut out) {
            Ok(_) => f.write_str(std::str::from_utf8(&vec).map_err(|_| std::fmt::Error)?),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::symbol::intern;

    #[test]
    fn identifiers_differ_by_namespace() {
        let f = intern("f");
        assert_eq!(Identifier::variable(f), Identifier::variable(f));
        assert_ne!(Identifier::variable(f), Identifier::function(f));
        assert_ne!(Identifier::variable(f), Identifier::variable(intern("g")));
    }

    #[test]
    fn keyword_order_does_not_matter() {
        let mut a = Args::default();
        a.key.insert(intern("x"), Ast::var_ref(intern("1")));
        a.key.insert(intern("y"), Ast::var_ref(intern("2")));

        let mut b = Args::default();
        b.key.insert(intern("y"), Ast::var_ref(intern("2")));
        b.key.insert(intern("x"), Ast::var_ref(intern("1")));

        assert_eq!(a, b);
    }

    #[test]
    fn renders_on_one_line_when_short() {
        let mut args = Args::default();
        args.pos.push(Ast::var_ref(intern("x")));
        args.key.insert(intern("k"), Ast::var_ref(intern("v")));
        let app = Ast::App(Box::new(Ast::fun_ref(intern("f"))), args);
        assert_eq!(app.to_string(), "(app (fref f) (ref x) k: (ref v))");

        let def = Ast::Def(Identifier::function(intern("g")), Box::new(Ast::Seq(vec![])));
        assert_eq!(def.to_string(), "(fdef g (seq))");
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn emit_ends_the_line_and_reports_write_errors() {
        let node = Ast::var_ref(intern("x"));

        let mut vec = Vec::new();
        node.emit(80, termcolor::NoColor::new(&mut vec)).unwrap();
        assert_eq!(vec, b"(ref x)\n");

        assert!(node.emit(80, termcolor::NoColor::new(Closed)).is_err());
    }

    #[test]
    fn renders_parameter_groups() {
        let params = Params {
            req: vec![Param {
                id: Identifier::variable(intern("a")),
                init: None,
            }],
            opt: vec![Param {
                id: Identifier::variable(intern("b")),
                init: Some(Ast::var_ref(intern("10"))),
            }],
            key: vec![],
            rest: Some(Param {
                id: Identifier::variable(intern("r")),
                init: None,
            }),
            all_keys: None,
        };
        let lam = Ast::Lam(Box::new(params), Box::new(Ast::var_ref(intern("a"))));
        assert_eq!(
            lam.to_string(),
            "(lambda (a &optional: (b (ref 10)) &rest: r) (ref a))"
        );
    }
}
