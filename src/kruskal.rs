//! Kruskal edge selection
//!
//! The acceptance loop is shared by every Kruskal flavour in
//! [crate::maze_generator]; they differ only in the order in which candidate
//! edges are offered.

use tracing::{debug, warn};

use crate::disjoint_set::DisjointSet;
use crate::error::Result;
use crate::metrics::MetricsObserver;

/// Undirected edge between two elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    /// Only set by weighted selection
    pub weight: Option<u32>,
}

impl Edge {
    pub fn new(u: usize, v: usize) -> Self {
        Self { u, v, weight: None }
    }

    pub fn weighted(u: usize, v: usize, weight: u32) -> Self {
        Self {
            u,
            v,
            weight: Some(weight),
        }
    }

    /// Endpoints with the smaller index first
    pub fn endpoints(&self) -> (usize, usize) {
        if self.u <= self.v {
            (self.u, self.v)
        } else {
            (self.v, self.u)
        }
    }
}

/// Scan `candidates` in order and keep every edge that joins two different
/// components of `sets`, until `target` edges are kept or the candidates run
/// out.
pub(crate) fn select_edges<I>(
    sets: &mut DisjointSet,
    candidates: I,
    target: usize,
    observer: &mut dyn MetricsObserver,
) -> Result<Vec<Edge>>
where
    I: IntoIterator<Item = Edge>,
{
    let mut accepted = Vec::with_capacity(target);
    if target == 0 {
        return Ok(accepted);
    }

    for edge in candidates {
        observer.edge_processed();
        observer.union_find_op();
        if sets.same_set(edge.u, edge.v)? {
            continue;
        }
        observer.union_find_op();
        sets.union(edge.u, edge.v)?;
        accepted.push(edge);
        if accepted.len() == target {
            break;
        }
    }

    if accepted.len() < target {
        warn!(
            accepted = accepted.len(),
            target,
            components = sets.component_count(),
            "candidate edges ran out, result is a forest"
        );
    }
    debug!(
        accepted = accepted.len(),
        components = sets.component_count(),
        "edge selection done"
    );
    Ok(accepted)
}

/// Graph stored as a plain edge list
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    vertices: usize,
    edges: Vec<Edge>,
}

/// Result of [WeightedGraph::kruskal_mst]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimumSpanningTree {
    pub edges: Vec<Edge>,
    pub total_weight: u64,
}

impl WeightedGraph {
    pub fn new(vertices: usize) -> Self {
        Self {
            vertices,
            edges: Vec::new(),
        }
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn add_edge(&mut self, u: usize, v: usize, weight: u32) {
        self.edges.push(Edge::weighted(u, v, weight));
    }

    /// Minimum spanning forest by Kruskal's algorithm.
    ///
    /// Edges are sorted stably by weight, so equal weights keep insertion
    /// order. Fails with [crate::MazeError::OutOfRange] if an edge names a
    /// vertex outside `0..vertices`.
    pub fn kruskal_mst(&self, observer: &mut dyn MetricsObserver) -> Result<MinimumSpanningTree> {
        let mut sorted = self.edges.clone();
        sorted.sort_by_key(|e| e.weight.unwrap_or(0));

        let mut sets = DisjointSet::new(self.vertices);
        let edges = select_edges(
            &mut sets,
            sorted,
            self.vertices.saturating_sub(1),
            observer,
        )?;
        let total_weight = edges.iter().map(|e| u64::from(e.weight.unwrap_or(0))).sum();
        Ok(MinimumSpanningTree {
            edges,
            total_weight,
        })
    }
}
