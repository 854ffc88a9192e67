//! Operation graphs of structural regions.
use crate::{EdgeKind, Id, RegionIdx, Stm};
use cadence_idx::{IndexRef, impl_index};
use itertools::Itertools;
use petgraph::{
    Direction,
    algo,
    graph::{DiGraph, NodeIndex},
    visit::{EdgeFiltered, EdgeRef},
};

/// Index of a node within its [OpGraph]. Nodes are never removed so indices
/// stay valid for the lifetime of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);
impl_index!(NodeIdx);

impl From<NodeIndex> for NodeIdx {
    fn from(idx: NodeIndex) -> Self {
        NodeIdx::new(idx.index())
    }
}

impl From<NodeIdx> for NodeIndex {
    fn from(idx: NodeIdx) -> Self {
        NodeIndex::new(idx.index())
    }
}

/// What a node of an operation graph stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTag {
    Stm(Stm),
    /// A nested region, scheduled as a single unit.
    Region(RegionIdx),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpNode {
    pub tag: NodeTag,
    /// Position in program order, used to break ties.
    pub stm_index: u32,
}

/// The operation graph of one structural region.
///
/// Edges carry an [EdgeKind]. `Back` edges record loop-carried order and are
/// ignored by every `*_without_back` query; with them removed the graph is
/// expected to be a DAG.
#[derive(Debug, Clone)]
pub struct OpGraph {
    name: Id,
    parent: Option<RegionIdx>,
    children: Vec<RegionIdx>,
    graph: DiGraph<OpNode, EdgeKind>,
}

impl OpGraph {
    pub fn new(name: Id, parent: Option<RegionIdx>) -> Self {
        OpGraph {
            name,
            parent,
            children: Vec::new(),
            graph: DiGraph::new(),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// The enclosing region.
    pub fn parent(&self) -> Option<RegionIdx> {
        self.parent
    }

    /// Regions directly nested in this one.
    pub fn children(&self) -> &[RegionIdx] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: RegionIdx) {
        self.children.push(child);
    }

    pub fn add_node(&mut self, node: OpNode) -> NodeIdx {
        self.graph.add_node(node).into()
    }

    pub fn add_edge(&mut self, from: NodeIdx, to: NodeIdx, kind: EdgeKind) {
        self.graph.add_edge(from.into(), to.into(), kind);
    }

    pub fn node(&self, idx: NodeIdx) -> &OpNode {
        &self.graph[NodeIndex::from(idx)]
    }

    pub fn get_node(&self, idx: NodeIdx) -> Option<&OpNode> {
        self.graph.node_weight(idx.into())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.graph.node_indices().map(NodeIdx::from)
    }

    /// All edges as `(from, to, kind)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIdx, NodeIdx, EdgeKind)> + '_ {
        self.graph.edge_references().map(|e| {
            (e.source().into(), e.target().into(), *e.weight())
        })
    }

    /// Nodes without a non-back predecessor.
    pub fn sources(&self) -> Vec<NodeIdx> {
        self.nodes()
            .filter(|n| self.preds_without_back(*n).is_empty())
            .collect()
    }

    fn neighbors_without_back(
        &self,
        idx: NodeIdx,
        dir: Direction,
        kind: Option<EdgeKind>,
    ) -> Vec<NodeIdx> {
        self.graph
            .edges_directed(idx.into(), dir)
            .filter(|e| *e.weight() != EdgeKind::Back)
            .filter(|e| kind.is_none_or(|k| *e.weight() == k))
            .map(|e| match dir {
                Direction::Incoming => NodeIdx::from(e.source()),
                Direction::Outgoing => NodeIdx::from(e.target()),
            })
            .sorted()
            .dedup()
            .collect()
    }

    /// Distinct predecessors over non-back edges, in index order.
    pub fn preds_without_back(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        self.neighbors_without_back(idx, Direction::Incoming, None)
    }

    /// Distinct successors over non-back edges, in index order.
    pub fn succs_without_back(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        self.neighbors_without_back(idx, Direction::Outgoing, None)
    }

    /// Predecessors reached through an edge of the given kind. Asking for
    /// `Back` yields nothing.
    pub fn preds_of_kind_without_back(
        &self,
        idx: NodeIdx,
        kind: EdgeKind,
    ) -> Vec<NodeIdx> {
        self.neighbors_without_back(idx, Direction::Incoming, Some(kind))
    }

    pub fn has_cycle_without_back(&self) -> bool {
        let forward =
            EdgeFiltered::from_fn(&self.graph, |e| *e.weight() != EdgeKind::Back);
        algo::is_cyclic_directed(&forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockIdx, Expr, StmKind};

    fn stm_node(i: u32) -> OpNode {
        OpNode {
            tag: NodeTag::Stm(Stm::new(
                StmKind::Expr(Expr::int(i as i64)),
                BlockIdx::new(0),
            )),
            stm_index: i,
        }
    }

    fn diamond() -> (OpGraph, Vec<NodeIdx>) {
        let mut g = OpGraph::new(Id::new("r"), None);
        let n: Vec<_> = (0..4).map(|i| g.add_node(stm_node(i))).collect();
        g.add_edge(n[0], n[1], EdgeKind::DefUse);
        g.add_edge(n[0], n[2], EdgeKind::Anti);
        g.add_edge(n[1], n[3], EdgeKind::Seq);
        g.add_edge(n[2], n[3], EdgeKind::DefUse);
        g.add_edge(n[3], n[0], EdgeKind::Back);
        (g, n)
    }

    #[test]
    fn back_edges_are_invisible() {
        let (g, n) = diamond();
        assert_eq!(g.sources(), vec![n[0]]);
        assert!(g.preds_without_back(n[0]).is_empty());
        assert!(g.succs_without_back(n[3]).is_empty());
        assert!(!g.has_cycle_without_back());
    }

    #[test]
    fn preds_filter_by_kind() {
        let (g, n) = diamond();
        assert_eq!(g.preds_without_back(n[3]), vec![n[1], n[2]]);
        assert_eq!(g.preds_of_kind_without_back(n[3], EdgeKind::Seq), vec![n[1]]);
        assert!(g.preds_of_kind_without_back(n[2], EdgeKind::DefUse).is_empty());
        assert!(g.preds_of_kind_without_back(n[3], EdgeKind::Back).is_empty());
    }

    #[test]
    fn parallel_edges_are_deduplicated() {
        let (mut g, n) = diamond();
        g.add_edge(n[0], n[1], EdgeKind::Seq);
        assert_eq!(g.succs_without_back(n[0]), vec![n[1], n[2]]);
    }

    #[test]
    fn forward_cycle_is_detected() {
        let (mut g, n) = diamond();
        g.add_edge(n[3], n[1], EdgeKind::Seq);
        assert!(g.has_cycle_without_back());
    }
}
