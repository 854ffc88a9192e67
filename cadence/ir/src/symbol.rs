use crate::{Id, Type};
use cadence_idx::impl_index;
use cadence_utils::GetName;

/// Index of a [Symbol] within its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymIdx(u32);
impl_index!(SymIdx);

/// A named, typed value of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: Id,
    pub typ: Type,
    /// Refers to another value and needs no storage of its own.
    pub alias: bool,
    /// A parameter of the enclosing function.
    pub param: bool,
}

impl Symbol {
    pub fn new<S: Into<Id>>(name: S, typ: Type) -> Self {
        Symbol {
            name: name.into(),
            typ,
            alias: false,
            param: false,
        }
    }

    pub fn with_alias(mut self) -> Self {
        self.alias = true;
        self
    }

    pub fn with_param(mut self) -> Self {
        self.param = true;
        self
    }
}

impl GetName for Symbol {
    fn name(&self) -> Id {
        self.name
    }
}
