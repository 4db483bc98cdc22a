#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Fixnum(i64),
    Flonum(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Fixnum(n) => write!(f, "{}", n),
            Number::Flonum(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Fixnum(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Fixnum(n as i64)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Flonum(x)
    }
}
