//! An IR context. This is the top-level object handed to the scheduler and
//! holds every scope of the program.
use crate::{CalleeKind, Id, Scope, ScopeIdx, ScopeKind};
use cadence_idx::IndexedMap;

/// The IR of an entire program, with all names resolved.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub scopes: IndexedMap<ScopeIdx, Scope>,
    /// Top-level scope of the program.
    pub entry: Option<ScopeIdx>,
}

impl Context {
    pub fn add_scope(&mut self, scope: Scope) -> ScopeIdx {
        self.scopes.push(scope)
    }

    pub fn find_scope(&self, name: Id) -> Option<ScopeIdx> {
        self.scopes
            .iter()
            .find(|(_, s)| s.name == name)
            .map(|(idx, _)| idx)
    }

    /// Classify a call target by the kind of the callee, the kind of its
    /// enclosing scope and its source name.
    pub fn callee_kind(&self, callee: ScopeIdx) -> CalleeKind {
        let scope = &self.scopes[callee];
        if scope.kind != ScopeKind::Method {
            return CalleeKind::Routine;
        }
        let parent_kind = scope.parent.map(|p| self.scopes[p].kind);
        match (parent_kind, scope.orig_name.as_str()) {
            (Some(ScopeKind::QueueClass), "rd") => CalleeKind::QueueRead,
            (Some(ScopeKind::QueueClass), "wr") => CalleeKind::QueueWrite,
            (Some(ScopeKind::PortClass), "rd") => CalleeKind::PortRead,
            (Some(ScopeKind::PortClass), "wr") => CalleeKind::PortWrite,
            (Some(ScopeKind::QueueClass | ScopeKind::PortClass), _) => {
                CalleeKind::PortOther
            }
            _ => CalleeKind::Routine,
        }
    }
}
