//! Generate perfect mazes and find a way through them
//!
//! Mazes are spanning trees of a square cell grid, built with randomized
//! Kruskal over a union-find ([MazeGenerator]), drawn as a character
//! [Grid], and solved either by depth-first backtracking or by A*.
//!
//! # Examples
//! ## Generate and solve
//! ```
//! use spanning_mazes::{Algorithm, Grid, Maze, MazeGenerator, SolveOutcome, SolverKind};
//!
//! let tree = MazeGenerator::new(Some(42)).generate(4, Algorithm::Kruskal).unwrap();
//! let grid = Grid::render(&tree).unwrap();
//! assert_eq!(grid.height(), 9);
//!
//! let maze = Maze::from_grid(grid).unwrap();
//! match maze.solve(SolverKind::AStar).unwrap() {
//!     SolveOutcome::Solved(solution) => solution.print_report(),
//!     SolveOutcome::NoPathFound => unreachable!("perfect mazes are connected"),
//! }
//! ```
//!
//! ## Solve a hand drawn maze
//! ```
//! use spanning_mazes::{Maze, SolverKind};
//!
//! let text = [
//!     "#.#####",
//!     "#.....#",
//!     "#.###.#",
//!     "#.#...#",
//!     "#.#.#.#",
//!     "#...#.#",
//!     "#####.#",
//! ]
//! .join("\n");
//! let maze = Maze::parse(&text).unwrap();
//! let solution = maze.solve(SolverKind::AStar).unwrap().solution().unwrap();
//! assert_eq!(solution.steps(), 10);
//! println!("{}", solution.annotated);
//! ```

pub mod disjoint_set;
pub mod error;
pub mod grid;
pub mod kruskal;
pub mod maze_generator;
pub mod metrics;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

pub use disjoint_set::DisjointSet;
pub use error::{MazeError, Result};
pub use grid::{Grid, Point};
pub use kruskal::{Edge, MinimumSpanningTree, WeightedGraph};
pub use maze_generator::{Algorithm, EdgeSelectionPolicy, MazeGenerator, SpanningTree};
pub use metrics::{MetricsObserver, MetricsRecorder, NoMetrics};

/// Search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    /// Exhaustive depth-first backtracking; finds some path
    Dfs,
    /// A* with Manhattan distance; finds a shortest path
    AStar,
}

impl SolverKind {
    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::Dfs => "dfs",
            SolverKind::AStar => "astar",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dfs" => Ok(SolverKind::Dfs),
            "astar" | "a*" => Ok(SolverKind::AStar),
            other => Err(MazeError::UnknownSolver(other.to_string())),
        }
    }
}

/// Grid together with where to start and where to go
#[derive(Debug, Clone)]
pub struct Maze {
    /// Solvers never change this; annotations go to a copy
    grid: Grid,
    start: Point,
    goal: Point,
    /// Maximum number of squares a solver may expand
    step_budget: Option<usize>,
}

/// Path found by a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeSolution {
    /// Which solver found it
    pub solver: SolverKind,
    /// Squares from start to goal, both included
    pub path: Vec<Point>,
    /// Copy of the grid with explored squares `*`, path `o`, ends `S`/`E`
    pub annotated: Grid,
    /// Number of squares the solver expanded
    pub explored: usize,
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(MazeSolution),
    /// Start and goal are not connected
    NoPathFound,
}

impl SolveOutcome {
    pub fn solution(self) -> Option<MazeSolution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::NoPathFound => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}

/// Caps the number of expanded squares
struct Budget {
    limit: Option<usize>,
    used: usize,
}

impl Budget {
    fn spend(&mut self) -> Result<()> {
        if let Some(limit) = self.limit {
            if self.used >= limit {
                return Err(MazeError::StepBudgetExceeded(limit));
            }
        }
        self.used += 1;
        Ok(())
    }
}

impl Maze {
    /// Set up a maze between `start` and `goal`.
    ///
    /// Returns [MazeError::InvalidEndpoint] if either end is a wall or
    /// outside the grid.
    pub fn new(grid: Grid, start: Point, goal: Point) -> Result<Self> {
        for p in [start, goal] {
            if !grid.is_open(p) {
                return Err(MazeError::InvalidEndpoint { y: p.y, x: p.x });
            }
        }
        Ok(Maze {
            grid,
            start,
            goal,
            step_budget: None,
        })
    }

    /// Maze from the fixed entrance to the fixed exit of `grid`
    pub fn from_grid(grid: Grid) -> Result<Self> {
        let (start, goal) = (grid.entrance(), grid.exit());
        Self::new(grid, start, goal)
    }

    /// Parse maze representation from string, see [Grid::parse]
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_grid(Grid::parse(text)?)
    }

    /// Give up with [MazeError::StepBudgetExceeded] after expanding
    /// `budget` squares
    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = Some(budget);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Solve maze with the chosen strategy
    pub fn solve(&self, kind: SolverKind) -> Result<SolveOutcome> {
        self.solve_observed(kind, &mut NoMetrics)
    }

    /// Same as [Self::solve], reporting progress to `observer`
    pub fn solve_observed(
        &self,
        kind: SolverKind,
        observer: &mut dyn MetricsObserver,
    ) -> Result<SolveOutcome> {
        let size = self.grid.cell_size().unwrap_or(self.grid.height());
        observer.started(size, kind.name(), None);
        debug!(solver = %kind, start = ?self.start, goal = ?self.goal, "solving maze");

        let outcome = match kind {
            SolverKind::Dfs => self.solve_dfs(observer)?,
            SolverKind::AStar => self.solve_astar(observer)?,
        };

        match &outcome {
            SolveOutcome::Solved(solution) => {
                observer.path_found(solution.path.len());
                info!(
                    solver = %kind,
                    steps = solution.steps(),
                    explored = solution.explored,
                    "path found"
                );
            }
            SolveOutcome::NoPathFound => {
                warn!(solver = %kind, start = ?self.start, goal = ?self.goal, "no path found")
            }
        }
        Ok(outcome)
    }

    /// Depth-first backtracking search.
    ///
    /// Each stack frame is a square and its remaining neighbors, so the
    /// stack itself is the current path. Squares are never visited twice,
    /// which keeps the search finite on grids with loops.
    pub fn solve_dfs(&self, observer: &mut dyn MetricsObserver) -> Result<SolveOutcome> {
        let mut budget = self.budget();
        let mut visited = vec![false; self.grid.height() * self.grid.width()];

        budget.spend()?;
        observer.node_explored();
        visited[self.index(self.start)] = true;
        let mut stack = vec![(self.start, self.grid.neighbors(self.start))];

        while let Some((square, neighbors)) = stack.last_mut() {
            if *square == self.goal {
                let path: Vec<Point> = stack.iter().map(|(p, _)| *p).collect();
                let solution = self.solution(SolverKind::Dfs, path, &visited, budget.used);
                return Ok(SolveOutcome::Solved(solution));
            }

            match neighbors.find(|q| !visited[self.index(*q)]) {
                Some(next) => {
                    budget.spend()?;
                    observer.node_explored();
                    visited[self.index(next)] = true;
                    stack.push((next, self.grid.neighbors(next)));
                }
                None => {
                    observer.backtrack();
                    stack.pop();
                }
            }
        }

        Ok(SolveOutcome::NoPathFound)
    }

    /// A* search with Manhattan distance as heuristic.
    ///
    /// Moves cost 1, so the heuristic is consistent and the first time the
    /// goal leaves the frontier its path is a shortest one. Frontier ties
    /// on `f` go to the lower `g`, then to the smaller point.
    pub fn solve_astar(&self, observer: &mut dyn MetricsObserver) -> Result<SolveOutcome> {
        let mut budget = self.budget();
        let squares = self.grid.height() * self.grid.width();
        let mut best = vec![usize::MAX; squares];
        let mut parent: Vec<Option<Point>> = vec![None; squares];
        let mut closed = vec![false; squares];

        let mut frontier = BinaryHeap::new();
        best[self.index(self.start)] = 0;
        frontier.push(Reverse((self.start.distance(&self.goal), 0, self.start)));

        while let Some(Reverse((_, cost, current))) = frontier.pop() {
            if cost > best[self.index(current)] {
                // Superseded by a cheaper entry
                continue;
            }
            budget.spend()?;
            observer.node_explored();

            if current == self.goal {
                let mut path = vec![current];
                let mut p = current;
                while let Some(prev) = parent[self.index(p)] {
                    path.push(prev);
                    p = prev;
                }
                path.reverse();
                let solution = self.solution(SolverKind::AStar, path, &closed, budget.used);
                return Ok(SolveOutcome::Solved(solution));
            }
            closed[self.index(current)] = true;

            for next in self.grid.neighbors(current) {
                let tentative = cost + 1;
                let i = self.index(next);
                if tentative < best[i] {
                    best[i] = tentative;
                    parent[i] = Some(current);
                    frontier.push(Reverse((
                        tentative + next.distance(&self.goal),
                        tentative,
                        next,
                    )));
                }
            }
        }

        Ok(SolveOutcome::NoPathFound)
    }

    fn budget(&self) -> Budget {
        Budget {
            limit: self.step_budget,
            used: 0,
        }
    }

    fn index(&self, p: Point) -> usize {
        p.y * self.grid.width() + p.x
    }

    fn solution(
        &self,
        solver: SolverKind,
        path: Vec<Point>,
        explored: &[bool],
        expanded: usize,
    ) -> MazeSolution {
        MazeSolution {
            solver,
            annotated: self.annotate(&path, explored),
            path,
            explored: expanded,
        }
    }

    /// Copy of the grid with explored passages, path and both ends marked
    fn annotate(&self, path: &[Point], explored: &[bool]) -> Grid {
        let mut grid = self.grid.clone();
        let width = grid.width();
        for (i, _) in explored.iter().enumerate().filter(|&(_, &e)| e) {
            let p = Point::new(i / width, i % width);
            if grid.get(p) == Some(Grid::S_PASSAGE) {
                grid.set(p, Grid::S_EXPLORED);
            }
        }
        for &p in path {
            grid.set(p, Grid::S_PATH);
        }
        grid.set(self.start, Grid::S_START);
        grid.set(self.goal, Grid::S_END);
        grid
    }
}

impl MazeSolution {
    /// Moves from start to goal
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Print report
    pub fn print_report(&self) {
        match self.solver {
            SolverKind::AStar => println!(
                "The shortest path is {} steps ({} squares explored).",
                self.steps(),
                self.explored
            ),
            SolverKind::Dfs => println!(
                "Found a path of {} steps ({} squares explored).",
                self.steps(),
                self.explored
            ),
        }
    }
}
