use crate::data::symbol::Symbol;

/// Index of a class in the runtime's class table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// Index of a wrapper in the runtime's wrapper table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapperId(pub u32);

#[derive(Debug, Clone)]
pub struct Class {
    pub name: Symbol,
    /// Direct superclasses. Must stay acyclic; nothing checks it.
    pub supers: Vec<ClassId>,
    pub wrapper: WrapperId,
}

/// One per class. Instances point at the wrapper, never at the class, so
/// comparing wrappers is the fast class-identity test.
#[derive(Debug, Clone, Copy)]
pub struct Wrapper {
    pub class: ClassId,
}
