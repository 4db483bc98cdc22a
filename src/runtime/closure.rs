//! Closures and the calling convention.
//!
//! Every callable is a code pointer plus an environment value. Code receives
//! the closure itself, the positional and keyword argument counts, and a flat
//! argument array laid out as
//!
//! ```text
//! [pos0, pos1, ..., posN-1, key0, val0, key1, val1, ...]
//! ```
//!
//! Nothing at this layer checks arity; code that cares calls [`check_npos`]
//! in its prologue.

use super::Runtime;
use crate::data::symbol::Symbol;
use crate::data::value::Value;
use crate::error::CallError;
use crate::EllResult;

pub type Code = fn(&Runtime, &Closure, usize, usize, &[Value]) -> EllResult<Value>;

pub struct Closure {
    pub code: Code,
    pub env: Value,
}

impl Closure {
    pub fn new(code: Code, env: Value) -> Self {
        Self { code, env }
    }
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<closure {:p}>", self)
    }
}

pub trait Callable {
    fn invoke(&self, rt: &Runtime, npos: usize, nkey: usize, args: &[Value]) -> EllResult<Value>;
}

impl Callable for Closure {
    fn invoke(&self, rt: &Runtime, npos: usize, nkey: usize, args: &[Value]) -> EllResult<Value> {
        (self.code)(rt, self, npos, nkey, args)
    }
}

pub fn check_npos(formal: usize, actual: usize) -> EllResult<()> {
    if formal != actual {
        return Err(CallError::WrongArgumentCount {
            expected: formal,
            found: actual,
        }
        .into());
    }
    Ok(())
}

/// The counts must describe `args`: `npos` values then `nkey` pairs.
pub fn check_layout(npos: usize, nkey: usize, args: &[Value]) -> EllResult<()> {
    let expected = npos + 2 * nkey;
    if expected != args.len() {
        return Err(CallError::WrongArgumentCount {
            expected,
            found: args.len(),
        }
        .into());
    }
    Ok(())
}

/// Lays out positional and keyword arguments in calling-convention order.
pub fn flatten_args(positional: &[Value], keywords: &[(Symbol, Value)]) -> Vec<Value> {
    let mut args = Vec::with_capacity(positional.len() + 2 * keywords.len());
    args.extend(positional.iter().cloned());
    for (key, val) in keywords {
        args.push(Value::Symbol(*key));
        args.push(val.clone());
    }
    args
}

/// The keyword half of a flat argument array.
pub fn keyword_args(npos: usize, nkey: usize, args: &[Value]) -> impl Iterator<Item = (&Value, &Value)> {
    args.get(npos..npos + 2 * nkey)
        .unwrap_or_default()
        .chunks_exact(2)
        .map(|pair| (&pair[0], &pair[1]))
}
