//! ELL front end and object runtime.
//!
//! Source text is read into syntax objects, which the normalizer turns into
//! canonical AST nodes. Syntax lists are accessed through generic functions
//! dispatched by the runtime, so the front end runs on the same object
//! system it compiles for.

pub mod compiler;
pub mod data;
pub mod error;
pub mod options;
pub mod reader;
pub mod runtime;

pub mod prelude {
    pub use super::EllResult;
    pub use crate::compiler::{Args, Ast, Identifier, Namespace, Normalizer, Param, Params};
    pub use crate::data::{number::*, symbol::*, syntax::*, value::*};
    pub use crate::error::*;
    pub use crate::reader::{read, SyntaxBuilder};
    pub use crate::runtime::closure::{Callable, Closure};
    pub use crate::runtime::{Dispatch, HasClass, Runtime};
}

pub type EllResult<T> = Result<T, error::EllError>;
