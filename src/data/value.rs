use std::rc::Rc;

use super::number::Number;
use super::symbol::Symbol;
use super::syntax::{Syntax, SyntaxList};
use crate::error::EllError;
use crate::runtime::class::{ClassId, WrapperId};
use crate::runtime::closure::Closure;
use crate::runtime::generic::GenericId;
use crate::EllResult;

/// Anything the runtime can pass around, dispatch on and call.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Symbol(Symbol),
    Str(Rc<str>),
    Number(Number),
    Syntax(Syntax),
    Closure(Rc<Closure>),
    Class(ClassId),
    Generic(GenericId),
    Instance(Rc<Instance>),
}

/// An object of a user-defined class. Its class is only reachable through
/// its wrapper.
#[derive(Debug)]
pub struct Instance {
    pub wrapper: WrapperId,
    pub payload: Value,
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(s.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Symbol(_) => "symbol",
            Value::Str(_) => "string",
            Value::Number(_) => "number",
            Value::Syntax(stx) => stx.kind(),
            Value::Closure(_) => "closure",
            Value::Class(_) => "class",
            Value::Generic(_) => "generic function",
            Value::Instance(_) => "instance",
        }
    }

    pub fn into_syntax(self) -> EllResult<Syntax> {
        match self {
            Value::Syntax(stx) => Ok(stx),
            other => Err(EllError::identity("syntax object", other.kind())),
        }
    }

    pub fn as_syntax_list(&self) -> EllResult<&SyntaxList> {
        match self {
            Value::Syntax(Syntax::List(list)) => Ok(list),
            other => Err(EllError::identity("syntax list", other.kind())),
        }
    }

    pub fn as_str(&self) -> EllResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(EllError::identity("string", other.kind())),
        }
    }

    pub fn as_symbol(&self) -> EllResult<Symbol> {
        match self {
            Value::Symbol(sym) => Ok(*sym),
            other => Err(EllError::identity("symbol", other.kind())),
        }
    }
}

impl From<Syntax> for Value {
    fn from(stx: Syntax) -> Self {
        Value::Syntax(stx)
    }
}

impl From<SyntaxList> for Value {
    fn from(list: SyntaxList) -> Self {
        Value::Syntax(Syntax::List(list))
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Closure> for Value {
    fn from(clo: Closure) -> Self {
        Value::Closure(Rc::new(clo))
    }
}
