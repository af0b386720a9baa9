// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Loop detection, and the choice of the branch to open in a loop.

use std::collections::HashSet;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::config::CycleBreakPolicy;

use super::{Branch, Network};

/// A closed path through the network.
///
/// `branches[i]` connects `nodes[i]` to `nodes[i + 1]`, and the last branch
/// closes the loop back to `nodes[0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cycle {
    pub nodes: Vec<String>,
    pub branches: Vec<Branch>,
}

impl Cycle {
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Parallel branches between the same two buses form loops of length
    /// two.  Only longer loops break radiality in a way that needs fixing.
    pub fn is_parallel(&self) -> bool {
        self.len() < 3
    }
}

/// Loop queries.
impl Network {
    /// Returns a cycle basis of the network.
    ///
    /// There is one cycle per branch outside the breadth-first spanning
    /// forest, made of that branch and the tree paths from its two ends to
    /// their nearest common ancestor.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let tree_edges = self
            .levels
            .parent
            .values()
            .map(|(_, edge)| *edge)
            .collect::<HashSet<_>>();

        self.graph
            .edge_indices()
            .filter(|edge| !tree_edges.contains(edge))
            .filter_map(|edge| self.fundamental_cycle(edge))
            .collect()
    }

    /// Picks the branch to remove from a loop.
    ///
    /// With [`CycleBreakPolicy::LongestSinglePhase`], this is the middle
    /// branch of the longest run of consecutive single-phase branches, ties
    /// going to the run with the larger total length.  Loops without
    /// single-phase branches, and the [`CycleBreakPolicy::FarthestFromSource`]
    /// policy, pick the branch whose nearer end is deepest, ties going to the
    /// one whose farther end is deepest.
    pub fn middle_single_phase<'a>(
        &self,
        cycle: &'a Cycle,
        policy: CycleBreakPolicy,
    ) -> Option<&'a Branch> {
        if policy == CycleBreakPolicy::LongestSinglePhase {
            if let Some(branch) = longest_single_phase_middle(cycle) {
                return Some(branch);
            }
        }
        self.farthest_from_source(cycle)
    }

    fn fundamental_cycle(&self, edge: EdgeIndex) -> Option<Cycle> {
        let (u, v) = self.graph.edge_endpoints(edge)?;

        let up_u = self.path_to_root(u);
        let up_v = self.path_to_root(v);
        let on_v = up_v.iter().map(|(n, _)| *n).collect::<HashSet<_>>();
        let lca_pos_u = up_u.iter().position(|(n, _)| on_v.contains(n))?;
        let lca = up_u[lca_pos_u].0;
        let lca_pos_v = up_v.iter().position(|(n, _)| *n == lca)?;

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        // u up to the common ancestor
        for (node, parent_edge) in &up_u[..lca_pos_u] {
            nodes.push(*node);
            edges.push((*parent_edge)?);
        }
        nodes.push(lca);
        // and down to v
        for (node, parent_edge) in up_v[..lca_pos_v].iter().rev() {
            edges.push((*parent_edge)?);
            nodes.push(*node);
        }
        edges.push(edge);

        Some(Cycle {
            nodes: nodes
                .into_iter()
                .map(|n| self.bus_name(n).to_string())
                .collect(),
            branches: edges.into_iter().map(|e| self.graph[e].clone()).collect(),
        })
    }

    /// The bus and the tree path from it to the root of its component, each
    /// bus paired with the edge to its parent.
    fn path_to_root(&self, start: NodeIndex) -> Vec<(NodeIndex, Option<EdgeIndex>)> {
        let mut path = Vec::new();
        let mut current = start;
        loop {
            match self.levels.parent.get(&current) {
                Some((parent, edge)) => {
                    path.push((current, Some(*edge)));
                    current = *parent;
                }
                None => {
                    path.push((current, None));
                    return path;
                }
            }
        }
    }

    fn farthest_from_source<'a>(&self, cycle: &'a Cycle) -> Option<&'a Branch> {
        let n = cycle.nodes.len();
        let mut best: Option<((usize, usize), &Branch)> = None;
        for (i, branch) in cycle.branches.iter().enumerate() {
            let a = self.index(&cycle.nodes[i]).map(|x| self.level(x)).ok()?;
            let b = self
                .index(&cycle.nodes[(i + 1) % n])
                .map(|x| self.level(x))
                .ok()?;
            let key = (a.min(b), a.max(b));
            if best.map_or(true, |(best_key, _)| key > best_key) {
                best = Some((key, branch));
            }
        }
        best.map(|(_, branch)| branch)
    }
}

fn longest_single_phase_middle(cycle: &Cycle) -> Option<&Branch> {
    let n = cycle.len();
    let single = cycle
        .branches
        .iter()
        .map(Branch::is_single_phase)
        .collect::<Vec<_>>();
    if !single.iter().any(|s| *s) {
        return None;
    }

    // runs as (start, length), scanning from a run boundary so that a run
    // that wraps around the end of the list is seen whole
    let start = (0..n).find(|i| !single[*i]).map_or(0, |i| (i + 1) % n);
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for step in 0..n {
        let i = (start + step) % n;
        if !single[i] {
            runs.extend(current.take());
        } else if let Some((_, len)) = current.as_mut() {
            *len += 1;
        } else {
            current = Some((i, 1));
        }
    }
    runs.extend(current);

    let run_length = |(s, len): (usize, usize)| -> f64 {
        (0..len)
            .filter_map(|k| cycle.branches[(s + k) % n].length)
            .sum()
    };
    let mut best: Option<(usize, usize)> = None;
    for run in runs {
        let better = match best {
            None => true,
            Some(b) => run.1 > b.1 || (run.1 == b.1 && run_length(run) > run_length(b)),
        };
        if better {
            best = Some(run);
        }
    }
    let (s, len) = best?;
    cycle.branches.get((s + (len - 1) / 2) % n)
}
