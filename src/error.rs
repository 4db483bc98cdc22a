use crate::data::symbol::Symbol;

/// Length requirement of a syntax list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn admits(&self, len: usize) -> bool {
        match *self {
            Arity::Exactly(n) => len == n,
            Arity::AtLeast(n) => len >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    NotCallable(String),
    WrongArgumentCount { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dissection {
    /// `key:` was the last argument.
    MissingKeywordValue(Symbol),
    MultipleRest,
    MultipleAllKeys,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EllError {
    /// A syntax list has the wrong number of elements.
    Shape {
        form: String,
        expected: Arity,
        found: usize,
    },
    /// A value of one kind was found where another was required.
    Identity { expected: &'static str, found: String },
    /// No method of `generic` is applicable to arguments of `classes`.
    Dispatch { generic: Symbol, classes: Vec<Symbol> },
    Call(CallError),
    Dissection(Dissection),
    Read {
        line: u32,
        column: u32,
        message: &'static str,
    },
    Boot(&'static str),
}

impl EllError {
    pub fn identity(expected: &'static str, found: impl std::fmt::Display) -> Self {
        EllError::Identity {
            expected,
            found: found.to_string(),
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, EllError::Shape { .. })
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, EllError::Identity { .. })
    }

    pub fn is_dispatch(&self) -> bool {
        matches!(self, EllError::Dispatch { .. })
    }

    pub fn is_call(&self) -> bool {
        matches!(self, EllError::Call(_))
    }

    pub fn is_dissection(&self) -> bool {
        matches!(self, EllError::Dissection(_))
    }
}

impl From<CallError> for EllError {
    fn from(err: CallError) -> Self {
        EllError::Call(err)
    }
}

impl From<Dissection> for EllError {
    fn from(err: Dissection) -> Self {
        EllError::Dissection(err)
    }
}

impl std::fmt::Display for EllError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EllError::Shape {
                form,
                expected,
                found,
            } => write!(
                f,
                "list length assertion failed: expected {} elements, found {} in {}",
                expected, found, form
            ),
            EllError::Identity { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            EllError::Dispatch { generic, classes } => {
                write!(f, "message not understood: {} (", generic)?;
                for (i, class) in classes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", class)?;
                }
                f.write_str(")")
            }
            EllError::Call(CallError::NotCallable(found)) => {
                write!(f, "not a closure: {}", found)
            }
            EllError::Call(CallError::WrongArgumentCount { expected, found }) => write!(
                f,
                "wrong number of arguments: expected {}, got {}",
                expected, found
            ),
            EllError::Dissection(Dissection::MissingKeywordValue(key)) => {
                write!(f, "missing value for keyword argument {}", key)
            }
            EllError::Dissection(Dissection::MultipleRest) => {
                f.write_str("more than one rest parameter")
            }
            EllError::Dissection(Dissection::MultipleAllKeys) => {
                f.write_str("more than one all-keys parameter")
            }
            EllError::Read {
                line,
                column,
                message,
            } => write!(f, "{}:{}: {}", line, column, message),
            EllError::Boot(message) => write!(f, "runtime: {}", message),
        }
    }
}

impl std::error::Error for EllError {}
