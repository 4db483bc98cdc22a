//! Front end: normalization of syntax objects into the canonical AST.

pub mod ast;
pub mod dissect;
pub mod normalize;

pub use ast::{Args, Ast, Identifier, Namespace, Param, Params};
pub use normalize::Normalizer;
