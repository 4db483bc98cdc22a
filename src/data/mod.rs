pub mod number;
pub mod symbol;
pub mod syntax;
pub mod value;
