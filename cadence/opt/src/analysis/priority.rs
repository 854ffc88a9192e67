use cadence_idx::SecondaryMap;
use cadence_ir::{NodeIdx, OpGraph};
use cadence_utils::{CadenceResult, Error};
use itertools::Itertools;
use std::collections::VecDeque;

/// Priority of a node that no path has reached yet.
pub const UNSET_PRIORITY: i64 = -1;

/// Scheduling priorities of the nodes of one operation graph.
///
/// The priority of a node is the length of the longest forward path from a
/// source to it, so along every non-back edge the priority strictly
/// increases. Priorities only order the list scheduler's waves; they are not
/// constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityMap {
    prio: SecondaryMap<NodeIdx, i64>,
}

impl PriorityMap {
    pub fn compute(graph: &OpGraph) -> CadenceResult<Self> {
        if graph.has_cycle_without_back() {
            return Err(Error::malformed_structure(format!(
                "region `{}` has a cycle that is not closed by a back edge",
                graph.name()
            )));
        }

        let mut prio = SecondaryMap::new_with_default(UNSET_PRIORITY);
        let mut worklist = VecDeque::from([(graph.sources(), 0)]);
        while let Some((nodes, p)) = worklist.pop_front() {
            let mut succs = Vec::new();
            for n in nodes {
                if p > *prio.get(n) {
                    log::debug!("priority of node {n} in `{}` raised to {p}", graph.name());
                    prio.insert(n, p);
                    succs.extend(graph.succs_without_back(n));
                }
            }
            if !succs.is_empty() {
                worklist.push_back((succs.into_iter().unique().collect(), p + 1));
            }
        }
        Ok(PriorityMap { prio })
    }

    pub fn get(&self, node: NodeIdx) -> i64 {
        *self.prio.get(node)
    }

    /// Nodes holding the smallest priority assigned. These are the first
    /// nodes handed to the list scheduler.
    pub fn highest_priority_nodes(&self, graph: &OpGraph) -> Vec<NodeIdx> {
        let Some(min) = graph
            .nodes()
            .map(|n| self.get(n))
            .filter(|p| *p != UNSET_PRIORITY)
            .min()
        else {
            return Vec::new();
        };
        graph.nodes().filter(|n| self.get(*n) == min).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_idx::IndexRef;
    use cadence_ir::{BlockIdx, EdgeKind, Expr, Id, NodeTag, OpNode, Stm, StmKind};

    fn graph(nodes: usize, edges: &[(usize, usize, EdgeKind)]) -> OpGraph {
        let mut g = OpGraph::new(Id::new("r"), None);
        for i in 0..nodes {
            g.add_node(OpNode {
                tag: NodeTag::Stm(Stm::new(
                    StmKind::Expr(Expr::int(i as i64)),
                    BlockIdx::new(0),
                )),
                stm_index: i as u32,
            });
        }
        for (from, to, kind) in edges {
            g.add_edge(NodeIdx::new(*from), NodeIdx::new(*to), *kind);
        }
        g
    }

    fn prios(g: &OpGraph) -> Vec<i64> {
        let map = PriorityMap::compute(g).unwrap();
        g.nodes().map(|n| map.get(n)).collect()
    }

    #[test]
    fn longest_path_wins() {
        use EdgeKind::*;
        // 0 -> 1 -> 2 -> 3 and a shortcut 0 -> 3.
        let g = graph(4, &[(0, 1, DefUse), (1, 2, Seq), (2, 3, DefUse), (0, 3, Anti)]);
        assert_eq!(prios(&g), vec![0, 1, 2, 3]);
    }

    #[test]
    fn back_edges_are_ignored() {
        use EdgeKind::*;
        let g = graph(3, &[(0, 1, DefUse), (1, 2, DefUse), (2, 0, Back)]);
        assert_eq!(prios(&g), vec![0, 1, 2]);
    }

    #[test]
    fn forward_cycle_is_malformed() {
        use EdgeKind::*;
        let g = graph(2, &[(0, 1, DefUse), (1, 0, Seq)]);
        assert!(PriorityMap::compute(&g).is_err());
    }

    #[test]
    fn sources_are_the_first_wave() {
        use EdgeKind::*;
        let g = graph(4, &[(0, 3, DefUse), (1, 3, DefUse), (2, 3, DefUse)]);
        let map = PriorityMap::compute(&g).unwrap();
        let first: Vec<_> = map
            .highest_priority_nodes(&g)
            .into_iter()
            .map(|n| n.index())
            .collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert!(map.highest_priority_nodes(&graph(0, &[])).is_empty());
    }
}
