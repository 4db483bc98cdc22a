//! Syntax objects.
//!
//! The parse tree handed to the normalizer. Lists grow by appending while the
//! tree is being built and are only read afterwards. A list is shared by
//! reference: the builder keeps a handle to the list it is filling while the
//! parent already holds it as an element.

use std::cell::RefCell;
use std::rc::Rc;

use super::number::Number;
use super::symbol::{intern, HygieneContext, Symbol};
use crate::error::{Arity, EllError};
use crate::EllResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxSymbol {
    pub symbol: Symbol,
    pub context: Option<HygieneContext>,
}

#[derive(Debug, Clone)]
pub enum Syntax {
    Symbol(SyntaxSymbol),
    String(Rc<str>),
    Number(Number),
    List(SyntaxList),
}

impl Syntax {
    pub fn symbol(name: &str) -> Self {
        Syntax::Symbol(SyntaxSymbol {
            symbol: intern(name),
            context: None,
        })
    }

    pub fn symbol_in(name: &str, context: HygieneContext) -> Self {
        Syntax::Symbol(SyntaxSymbol {
            symbol: intern(name),
            context: Some(context),
        })
    }

    pub fn string(text: &str) -> Self {
        Syntax::String(text.into())
    }

    pub fn number(n: impl Into<Number>) -> Self {
        Syntax::Number(n.into())
    }

    pub fn list(elts: Vec<Syntax>) -> Self {
        Syntax::List(SyntaxList::from_vec(elts))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Syntax::Symbol(_) => "syntax symbol",
            Syntax::String(_) => "syntax string",
            Syntax::Number(_) => "syntax number",
            Syntax::List(_) => "syntax list",
        }
    }

    pub fn as_symbol(&self) -> EllResult<Symbol> {
        match self {
            Syntax::Symbol(sym) => Ok(sym.symbol),
            _ => Err(EllError::identity("syntax symbol", self.describe())),
        }
    }

    pub fn as_list(&self) -> EllResult<&SyntaxList> {
        match self {
            Syntax::List(list) => Ok(list),
            _ => Err(EllError::identity("syntax list", self.describe())),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Syntax::List(_))
    }

    pub(crate) fn describe(&self) -> String {
        format!("{} {}", self.kind(), self)
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Syntax::Symbol(sym) => write!(f, "{}", sym.symbol),
            Syntax::String(s) => write!(f, "{:?}", s),
            Syntax::Number(n) => write!(f, "{}", n),
            Syntax::List(list) => write!(f, "{}", list),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntaxList(Rc<RefCell<Vec<Syntax>>>);

impl SyntaxList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(elts: Vec<Syntax>) -> Self {
        Self(Rc::new(RefCell::new(elts)))
    }

    pub fn push(&self, elt: Syntax) {
        self.0.borrow_mut().push(elt);
    }

    /// Appends `elt` and hands the list back, for chained construction.
    pub fn add(self, elt: Syntax) -> Self {
        self.push(elt);
        self
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &SyntaxList) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The `index`th element, or a shape error if the list is too short.
    pub fn nth(&self, index: usize) -> EllResult<Syntax> {
        self.assert_len_min(index + 1)?;
        Ok(self.0.borrow()[index].clone())
    }

    pub fn first(&self) -> EllResult<Syntax> {
        self.nth(0)
    }

    pub fn second(&self) -> EllResult<Syntax> {
        self.nth(1)
    }

    pub fn third(&self) -> EllResult<Syntax> {
        self.nth(2)
    }

    pub fn fourth(&self) -> EllResult<Syntax> {
        self.nth(3)
    }

    /// Elements from `start` on; empty if `start` is past the end.
    pub fn tail(&self, start: usize) -> Vec<Syntax> {
        self.0.borrow().iter().skip(start).cloned().collect()
    }

    pub fn elements(&self) -> Vec<Syntax> {
        self.tail(0)
    }

    pub fn assert_len(&self, len: usize) -> EllResult<()> {
        self.assert_arity(Arity::Exactly(len))
    }

    pub fn assert_len_min(&self, len: usize) -> EllResult<()> {
        self.assert_arity(Arity::AtLeast(len))
    }

    fn assert_arity(&self, expected: Arity) -> EllResult<()> {
        let found = self.len();
        if expected.admits(found) {
            Ok(())
        } else {
            Err(EllError::Shape {
                form: self.to_string(),
                expected,
                found,
            })
        }
    }
}

impl std::fmt::Display for SyntaxList {
    /// `(a b c )`: every element is followed by a space.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for elt in self.0.borrow().iter() {
            write!(f, "{} ", elt)?;
        }
        f.write_str(")")
    }
}
