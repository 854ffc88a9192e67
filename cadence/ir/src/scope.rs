use crate::{Block, BlockIdx, Id, OpGraph, ScopeKind, SymIdx, Symbol};
use cadence_idx::{IndexedMap, impl_index};
use cadence_utils::GetName;

/// Index of a [Scope] within the [Context](crate::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeIdx(u32);
impl_index!(ScopeIdx);

/// Index of a region within its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionIdx(u32);
impl_index!(RegionIdx);

/// How a call into a scope is implemented in hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalleeKind {
    /// `rd` of a queue.
    QueueRead,
    /// `wr` of a queue.
    QueueWrite,
    /// `rd` of a port.
    PortRead,
    /// `wr` of a port.
    PortWrite,
    /// Any other method of a port or queue.
    PortOther,
    /// An ordinary function or method, implemented as a sub-module.
    Routine,
}

/// A function, method, class or module of the program.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Fully qualified name.
    pub name: Id,
    /// Name as written in the source program.
    pub orig_name: Id,
    pub kind: ScopeKind,
    pub parent: Option<ScopeIdx>,
    pub symbols: IndexedMap<SymIdx, Symbol>,
    pub blocks: IndexedMap<BlockIdx, Block>,
    /// Operation graphs of the structural regions of this scope.
    pub regions: IndexedMap<RegionIdx, OpGraph>,
}

impl Scope {
    pub fn new<S: Into<Id>>(name: S, kind: ScopeKind) -> Self {
        let name = name.into();
        Scope {
            name,
            orig_name: name,
            kind,
            parent: None,
            symbols: IndexedMap::new(),
            blocks: IndexedMap::new(),
            regions: IndexedMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: ScopeIdx) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_orig_name<S: Into<Id>>(mut self, orig_name: S) -> Self {
        self.orig_name = orig_name.into();
        self
    }

    pub fn is_testbench(&self) -> bool {
        self.kind == ScopeKind::Testbench
    }

    pub fn find_symbol(&self, name: Id) -> Option<SymIdx> {
        self.symbols
            .iter()
            .find(|(_, sym)| sym.name == name)
            .map(|(idx, _)| idx)
    }

    pub fn find_block(&self, name: Id) -> Option<BlockIdx> {
        self.blocks
            .iter()
            .find(|(_, b)| b.name == name)
            .map(|(idx, _)| idx)
    }

    pub fn find_region(&self, name: Id) -> Option<RegionIdx> {
        self.regions
            .iter()
            .find(|(_, r)| r.name() == name)
            .map(|(idx, _)| idx)
    }
}

impl GetName for Scope {
    fn name(&self) -> Id {
        self.name
    }
}
