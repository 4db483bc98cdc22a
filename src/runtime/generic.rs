use std::rc::Rc;

use super::class::ClassId;
use super::closure::Closure;
use crate::data::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericId(pub u32);

#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub closure: Rc<Closure>,
    /// One class per dispatched argument, starting with the receiver.
    pub specializers: Vec<ClassId>,
}

/// Methods are kept in registration order and dispatch picks the first
/// applicable one. There is no specificity sort.
#[derive(Debug, Clone)]
pub struct GenericFunction {
    pub name: Symbol,
    pub methods: Vec<MethodEntry>,
}

impl GenericFunction {
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            methods: Vec::new(),
        }
    }
}
