//! IR Builder. Provides convenience methods to add symbols, blocks, regions
//! and graph nodes to a scope.
use crate::{
    Block, BlockIdx, EdgeKind, Id, NodeIdx, NodeTag, OpGraph, OpNode,
    RegionIdx, SchedulingMode, Scope, Stm, StmKind, SymIdx, Symbol, Type,
};
use cadence_utils::{CadenceResult, Error};

/// IR builder.
/// Uses internal references to the scope to construct and validate
/// constructs when needed.
pub struct Builder<'a> {
    /// Scope for this builder.
    pub scope: &'a mut Scope,
}

impl<'a> Builder<'a> {
    pub fn new(scope: &'a mut Scope) -> Self {
        Builder { scope }
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymIdx {
        self.scope.symbols.push(symbol)
    }

    /// Shorthand for a plain symbol without flags.
    pub fn add_var<S: Into<Id>>(&mut self, name: S, typ: Type) -> SymIdx {
        self.add_symbol(Symbol::new(name, typ))
    }

    pub fn add_block<S: Into<Id>>(
        &mut self,
        name: S,
        mode: SchedulingMode,
    ) -> BlockIdx {
        self.scope.blocks.push(Block {
            name: name.into(),
            mode,
        })
    }

    /// Add a region nested in `parent`, or an outermost region when `parent`
    /// is `None`.
    pub fn add_region<S: Into<Id>>(
        &mut self,
        name: S,
        parent: Option<RegionIdx>,
    ) -> RegionIdx {
        let idx = self.scope.regions.push(OpGraph::new(name.into(), parent));
        if let Some(p) = parent {
            self.scope.regions[p].add_child(idx);
        }
        idx
    }

    /// Add a statement node. Its program-order index is the number of nodes
    /// already in the region.
    pub fn add_stm(
        &mut self,
        region: RegionIdx,
        block: BlockIdx,
        kind: StmKind,
    ) -> NodeIdx {
        let graph = &mut self.scope.regions[region];
        let stm_index = graph.node_count() as u32;
        graph.add_node(OpNode {
            tag: NodeTag::Stm(Stm::new(kind, block)),
            stm_index,
        })
    }

    /// Add a node standing for the nested region `child`.
    pub fn add_nested(
        &mut self,
        region: RegionIdx,
        child: RegionIdx,
    ) -> CadenceResult<NodeIdx> {
        if self.scope.regions[child].parent() != Some(region) {
            return Err(Error::malformed_structure(format!(
                "region `{}` is not nested in `{}`",
                self.scope.regions[child].name(),
                self.scope.regions[region].name()
            )));
        }
        let graph = &mut self.scope.regions[region];
        let stm_index = graph.node_count() as u32;
        Ok(graph.add_node(OpNode {
            tag: NodeTag::Region(child),
            stm_index,
        }))
    }

    pub fn add_edge(
        &mut self,
        region: RegionIdx,
        from: NodeIdx,
        to: NodeIdx,
        kind: EdgeKind,
    ) {
        self.scope.regions[region].add_edge(from, to, kind);
    }
}
