//! Maze generation
//!
//! A maze over an `n×n` cell grid is produced as a list of accepted edges
//! between cell indices `row * n + col`. Every algorithm here yields a
//! spanning tree, i.e. a perfect maze; [crate::Grid::render] turns it into
//! characters.

use std::fmt;
use std::str::FromStr;

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::disjoint_set::DisjointSet;
use crate::error::{MazeError, Result};
use crate::kruskal::{select_edges, Edge};
use crate::metrics::{MetricsObserver, NoMetrics};

/// Order in which Kruskal offers candidate edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSelectionPolicy {
    /// Shuffle the whole candidate list uniformly
    FullShuffle,
    /// Draw a random weight per edge and sort by it
    WeightSorted,
    /// Visit cells in random order, shuffling only each cell's right and
    /// bottom edge.
    ///
    /// Still yields a spanning tree, since every candidate is offered
    /// exactly once, but mazes are not distributed like [Self::FullShuffle]
    /// ones. Not a drop-in replacement.
    LocalShuffle,
}

/// Generation algorithm, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Randomized Kruskal with [EdgeSelectionPolicy::FullShuffle]
    Kruskal,
    /// Randomized Kruskal with [EdgeSelectionPolicy::LocalShuffle]
    KruskalOptimized,
    /// Kruskal minimum spanning tree over random weights
    KruskalWeighted,
    /// Depth-first carving from the top left cell
    Backtracker,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Kruskal,
        Algorithm::KruskalOptimized,
        Algorithm::KruskalWeighted,
        Algorithm::Backtracker,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Kruskal => "kruskal",
            Algorithm::KruskalOptimized => "kruskal_optimized",
            Algorithm::KruskalWeighted => "kruskal_weighted",
            Algorithm::Backtracker => "backtracker",
        }
    }

    /// Edge ordering, or `None` for algorithms that are not Kruskal based
    pub fn policy(&self) -> Option<EdgeSelectionPolicy> {
        match self {
            Algorithm::Kruskal => Some(EdgeSelectionPolicy::FullShuffle),
            Algorithm::KruskalOptimized => Some(EdgeSelectionPolicy::LocalShuffle),
            Algorithm::KruskalWeighted => Some(EdgeSelectionPolicy::WeightSorted),
            Algorithm::Backtracker => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or(MazeError::UnknownAlgorithm(s))
    }
}

/// Perfect maze as accepted edges over `size * size` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    /// Cells per side
    pub size: usize,
    /// Accepted edges in acceptance order
    pub edges: Vec<Edge>,
    /// Components left in the disjoint set after generation
    pub components: usize,
}

impl SpanningTree {
    /// Build undirected graph of the accepted edges
    pub fn to_graph(&self) -> UnGraph<(), ()> {
        let cells = self.size * self.size;
        let mut graph = UnGraph::with_capacity(cells, self.edges.len());
        for _ in 0..cells {
            graph.add_node(());
        }
        graph.extend_with_edges(self.edges.iter().map(|e| (e.u as u32, e.v as u32)));
        graph
    }

    /// Check that the edges join adjacent cells and form a spanning tree.
    ///
    /// A connected graph on `V` nodes with `V - 1` edges has no cycles, so
    /// edge count plus connectivity is enough.
    pub fn verify(&self) -> bool {
        let cells = self.size * self.size;
        if cells == 0 || self.edges.len() != cells - 1 {
            return false;
        }
        if !self.edges.iter().all(|e| are_adjacent(self.size, e.u, e.v)) {
            return false;
        }
        connected_components(&self.to_graph()) == 1
    }
}

/// Whether cells `u` and `v` of an `n×n` grid are orthogonal neighbors
pub fn are_adjacent(n: usize, u: usize, v: usize) -> bool {
    let cells = n * n;
    if u >= cells || v >= cells {
        return false;
    }
    let (a, b) = if u < v { (u, v) } else { (v, u) };
    (b - a == 1 && a % n != n - 1) || b - a == n
}

/// Every right and bottom neighbor edge of an `n×n` grid, row by row.
///
/// There are `2n(n-1)` of them. Fails with [MazeError::InvalidDimension]
/// for `n == 0` or a grid too large to index.
pub fn candidate_edges(n: usize) -> Result<Vec<Edge>> {
    let cells = cell_count(n)?;
    let mut edges = Vec::with_capacity(2 * (cells - n));
    for cell in 0..cells {
        edges.extend(local_edges(n, cell));
    }
    Ok(edges)
}

/// Right and bottom edges of one cell
fn local_edges(n: usize, cell: usize) -> impl Iterator<Item = Edge> {
    let (row, col) = (cell / n, cell % n);
    let right = (col + 1 < n).then(|| Edge::new(cell, cell + 1));
    let bottom = (row + 1 < n).then(|| Edge::new(cell, cell + n));
    right.into_iter().chain(bottom)
}

/// Number of cells in an `n×n` maze
fn cell_count(n: usize) -> Result<usize> {
    if n < 1 {
        return Err(MazeError::InvalidDimension(n));
    }
    n.checked_mul(n)
        .filter(|cells| cells.checked_mul(4).is_some())
        .ok_or(MazeError::InvalidDimension(n))
}

/// Seeded maze generator.
///
/// Owns its random generator, so runs with equal seeds are reproducible and
/// independent generators can be used from different threads.
pub struct MazeGenerator {
    random: StdRng,
    seed: Option<u64>,
}

impl MazeGenerator {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

    /// New generator; `None` seeds from system entropy
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
            seed,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generate a perfect `n×n` maze
    ///
    /// # Examples
    /// ```
    /// use spanning_mazes::{Algorithm, MazeGenerator};
    ///
    /// let mut gen = MazeGenerator::new(Some(42));
    /// let tree = gen.generate(4, Algorithm::Kruskal).unwrap();
    /// assert_eq!(tree.edges.len(), 15);
    /// assert!(tree.verify());
    /// ```
    pub fn generate(&mut self, n: usize, algorithm: Algorithm) -> Result<SpanningTree> {
        self.generate_observed(n, algorithm, &mut NoMetrics)
    }

    /// Same as [Self::generate], reporting progress to `observer`
    pub fn generate_observed(
        &mut self,
        n: usize,
        algorithm: Algorithm,
        observer: &mut dyn MetricsObserver,
    ) -> Result<SpanningTree> {
        let cells = cell_count(n)?;
        observer.started(n, algorithm.name(), self.seed);
        debug!(size = n, %algorithm, seed = ?self.seed, "generating maze");
        if n == 1 {
            warn!(%algorithm, "single cell maze has no edges");
        }

        let tree = match algorithm.policy() {
            Some(policy) => self.kruskal(n, cells, policy, observer)?,
            None => self.backtracker(n, cells, observer),
        };

        info!(
            size = n,
            %algorithm,
            edges = tree.edges.len(),
            "maze generated"
        );
        Ok(tree)
    }

    /// Randomized Kruskal, with candidates ordered by `policy`
    fn kruskal(
        &mut self,
        n: usize,
        cells: usize,
        policy: EdgeSelectionPolicy,
        observer: &mut dyn MetricsObserver,
    ) -> Result<SpanningTree> {
        let mut sets = DisjointSet::new(cells);
        let target = cells - 1;

        let edges = match policy {
            EdgeSelectionPolicy::FullShuffle => {
                let mut candidates = candidate_edges(n)?;
                candidates.shuffle(&mut self.random);
                select_edges(&mut sets, candidates, target, observer)?
            }
            EdgeSelectionPolicy::WeightSorted => {
                let mut candidates: Vec<Edge> = candidate_edges(n)?
                    .into_iter()
                    .map(|e| Edge::weighted(e.u, e.v, self.random.gen()))
                    .collect();
                candidates.sort_by_key(|e| e.weight);
                select_edges(&mut sets, candidates, target, observer)?
            }
            EdgeSelectionPolicy::LocalShuffle => {
                let mut order: Vec<usize> = (0..cells).collect();
                order.shuffle(&mut self.random);
                let random = &mut self.random;
                let candidates = order.into_iter().flat_map(move |cell| {
                    let mut local: Vec<Edge> = local_edges(n, cell).collect();
                    local.shuffle(&mut *random);
                    local
                });
                select_edges(&mut sets, candidates, target, observer)?
            }
        };

        Ok(SpanningTree {
            size: n,
            edges,
            components: sets.component_count(),
        })
    }

    /// Depth-first carving with an explicit stack.
    ///
    /// Each frame holds a cell and its not yet tried neighbors in random
    /// order.
    fn backtracker(
        &mut self,
        n: usize,
        cells: usize,
        observer: &mut dyn MetricsObserver,
    ) -> SpanningTree {
        let mut visited = vec![false; cells];
        let mut edges = Vec::with_capacity(cells - 1);

        visited[0] = true;
        let mut stack = vec![(0, self.shuffled_neighbors(n, 0))];

        while let Some((cell, neighbors)) = stack.last_mut() {
            let cell = *cell;
            let next = loop {
                match neighbors.pop() {
                    Some(c) if visited[c] => continue,
                    other => break other,
                }
            };

            match next {
                Some(next) => {
                    observer.edge_processed();
                    visited[next] = true;
                    edges.push(Edge::new(cell, next));
                    let neighbors = self.shuffled_neighbors(n, next);
                    stack.push((next, neighbors));
                }
                None => {
                    observer.backtrack();
                    stack.pop();
                }
            }
        }

        SpanningTree {
            size: n,
            edges,
            components: 1,
        }
    }

    fn shuffled_neighbors(&mut self, n: usize, cell: usize) -> Vec<usize> {
        let (row, col) = ((cell / n) as isize, (cell % n) as isize);
        let mut neighbors: Vec<usize> = Self::DIRECTIONS
            .iter()
            .map(|(dy, dx)| (row + dy, col + dx))
            .filter(|&(y, x)| y >= 0 && x >= 0 && (y as usize) < n && (x as usize) < n)
            .map(|(y, x)| y as usize * n + x as usize)
            .collect();
        neighbors.shuffle(&mut self.random);
        neighbors
    }
}
