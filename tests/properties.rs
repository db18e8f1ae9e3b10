//! Property-based tests for maze generation and solving
//!
//! Uses proptest to check the invariants that must hold for every size and
//! seed: union-find bookkeeping, spanning trees, shortest paths and the
//! render/extract round trip.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use spanning_mazes::{
    Algorithm, DisjointSet, Grid, Maze, MazeGenerator, Point, SolveOutcome, SolverKind,
};

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

/// Shortest distance by breadth-first search over open squares
fn bfs_distance(grid: &Grid, start: Point, goal: Point) -> Option<usize> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0)]);
    while let Some((p, d)) = queue.pop_front() {
        if p == goal {
            return Some(d);
        }
        for q in grid.neighbors(p) {
            if seen.insert(q) {
                queue.push_back((q, d + 1));
            }
        }
    }
    None
}

/// Cells reachable from cell 0 using only `edges`
fn reachable_cells(cells: usize, edges: &[(usize, usize)]) -> usize {
    let mut adjacent = vec![Vec::new(); cells];
    for &(u, v) in edges {
        adjacent[u].push(v);
        adjacent[v].push(u);
    }
    let mut seen = vec![false; cells];
    seen[0] = true;
    let mut queue = VecDeque::from([0]);
    let mut count = 1;
    while let Some(u) = queue.pop_front() {
        for &v in &adjacent[u] {
            if !seen[v] {
                seen[v] = true;
                count += 1;
                queue.push_back(v);
            }
        }
    }
    count
}

/// Property: after a successful union both elements share a root, and a
/// repeated union is rejected without touching the component count
#[test]
fn prop_union_joins_sets() {
    proptest!(|(
        n in 1usize..60,
        pairs in prop::collection::vec((0usize..60, 0usize..60), 0..120)
    )| {
        let mut ds = DisjointSet::new(n);
        let mut merged = Vec::new();
        for (x, y) in pairs {
            let (x, y) = (x % n, y % n);
            let before = ds.component_count();
            let joined = ds.union(x, y).unwrap();
            let after = ds.component_count();
            if joined {
                prop_assert_eq!(after, before - 1);
                merged.push((x, y));
            } else {
                prop_assert_eq!(after, before);
            }
            prop_assert!(!ds.union(x, y).unwrap());
            prop_assert_eq!(ds.component_count(), after);
        }
        for (x, y) in merged {
            prop_assert!(ds.same_set(x, y).unwrap());
            let root = ds.find(x).unwrap();
            prop_assert_eq!(ds.find(root).unwrap(), root);
        }
        let roots: HashSet<usize> = (0..n).map(|i| ds.find(i).unwrap()).collect();
        prop_assert_eq!(roots.len(), ds.component_count());
    });
}

/// Property: every algorithm yields n²-1 edges that connect all cells
#[test]
fn prop_generation_is_spanning_tree() {
    proptest!(|(n in 1usize..25, seed in any::<u64>(), algorithm in algorithm())| {
        let tree = MazeGenerator::new(Some(seed)).generate(n, algorithm).unwrap();
        prop_assert_eq!(tree.edges.len(), n * n - 1);
        prop_assert_eq!(tree.components, 1);

        let pairs: Vec<(usize, usize)> = tree.edges.iter().map(|e| e.endpoints()).collect();
        prop_assert_eq!(reachable_cells(n * n, &pairs), n * n);
        prop_assert!(tree.verify());
    });
}

/// Property: the same seed gives the same edges and the same grid
#[test]
fn prop_seed_is_deterministic() {
    proptest!(|(n in 1usize..20, seed in any::<u64>(), algorithm in algorithm())| {
        let a = MazeGenerator::new(Some(seed)).generate(n, algorithm).unwrap();
        let b = MazeGenerator::new(Some(seed)).generate(n, algorithm).unwrap();
        prop_assert_eq!(&a.edges, &b.edges);
        prop_assert_eq!(Grid::render(&a).unwrap(), Grid::render(&b).unwrap());
    });
}

/// Property: A* finds paths exactly as long as breadth-first search
#[test]
fn prop_astar_is_shortest() {
    proptest!(|(n in 1usize..20, seed in any::<u64>(), algorithm in algorithm())| {
        let tree = MazeGenerator::new(Some(seed)).generate(n, algorithm).unwrap();
        let maze = Maze::from_grid(Grid::render(&tree).unwrap()).unwrap();
        let expected = bfs_distance(maze.grid(), maze.start(), maze.goal());

        match maze.solve(SolverKind::AStar).unwrap() {
            SolveOutcome::Solved(solution) => {
                prop_assert_eq!(Some(solution.steps()), expected);
            }
            SolveOutcome::NoPathFound => {
                prop_assert!(false, "perfect maze without path");
            }
        }
    });
}

/// Property: DFS paths are contiguous, stay on open squares and never
/// repeat, also on grids with loops and blocked regions
#[test]
fn prop_dfs_path_is_valid() {
    proptest!(|(
        rows in prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.7), 8), 8)
    )| {
        let text = rows
            .iter()
            .map(|row| row.iter().map(|&open| if open { '.' } else { '#' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        let grid = Grid::parse(&text).unwrap();
        let (start, goal) = (Point::new(0, 0), Point::new(7, 7));
        prop_assume!(grid.is_open(start) && grid.is_open(goal));

        let maze = Maze::new(grid.clone(), start, goal).unwrap();
        let expected = bfs_distance(&grid, start, goal);
        let dfs = maze.solve(SolverKind::Dfs).unwrap();
        let astar = maze.solve(SolverKind::AStar).unwrap();

        match (dfs, astar) {
            (SolveOutcome::Solved(dfs), SolveOutcome::Solved(astar)) => {
                prop_assert_eq!(Some(astar.steps()), expected);
                prop_assert!(dfs.steps() >= astar.steps());
                prop_assert_eq!(dfs.path.first(), Some(&start));
                prop_assert_eq!(dfs.path.last(), Some(&goal));
                for w in dfs.path.windows(2) {
                    prop_assert_eq!(w[0].distance(&w[1]), 1);
                }
                prop_assert!(dfs.path.iter().all(|p| grid.is_open(*p)));
                let unique: HashSet<&Point> = dfs.path.iter().collect();
                prop_assert_eq!(unique.len(), dfs.path.len());
            }
            (SolveOutcome::NoPathFound, SolveOutcome::NoPathFound) => {
                prop_assert_eq!(expected, None);
            }
            _ => {
                prop_assert!(false, "solvers disagree on reachability");
            }
        }
    });
}

/// Property: extracting edges from a rendered maze gives back the tree
#[test]
fn prop_render_extract_round_trip() {
    proptest!(|(n in 1usize..20, seed in any::<u64>(), algorithm in algorithm())| {
        let tree = MazeGenerator::new(Some(seed)).generate(n, algorithm).unwrap();
        let grid = Grid::render(&tree).unwrap();
        let original: HashSet<(usize, usize)> = tree.edges.iter().map(|e| e.endpoints()).collect();
        let extracted: HashSet<(usize, usize)> = grid
            .extract_edges()
            .unwrap()
            .iter()
            .map(|e| e.endpoints())
            .collect();
        prop_assert_eq!(original, extracted);
    });
}
