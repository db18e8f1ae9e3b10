//! Character grid of walls and passages

use std::fmt;

use itertools::Itertools;

use crate::error::{MazeError, Result};
use crate::kruskal::Edge;
use crate::maze_generator::{are_adjacent, SpanningTree};

/// Location in the grid
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct Point {
    pub y: usize,
    pub x: usize,
}

impl Point {
    pub fn new(y: usize, x: usize) -> Self {
        Self { y, x }
    }

    /// Manhattan distance
    pub fn distance(&self, other: &Point) -> usize {
        self.y.abs_diff(other.y) + self.x.abs_diff(other.x)
    }
}

/// Rendered maze.
///
/// For an `n×n` maze the grid is `(2n+1)×(2n+1)`; cell `(r, c)` sits at
/// `(2r+1, 2c+1)` and the squares between cells are walls unless the
/// cells are joined.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Grid {
    squares: Vec<Vec<char>>,
}

impl Grid {
    pub const S_WALL: char = '#';
    pub const S_PASSAGE: char = '.';
    pub const S_START: char = 'S';
    pub const S_END: char = 'E';
    pub const S_PATH: char = 'o';
    pub const S_EXPLORED: char = '*';

    const ALPHABET: [char; 6] = [
        Self::S_WALL,
        Self::S_PASSAGE,
        Self::S_START,
        Self::S_END,
        Self::S_PATH,
        Self::S_EXPLORED,
    ];

    /// Row, column steps to orthogonal neighbors, in search order
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (-1, 0), (0, -1)];

    /// Render a generated maze
    pub fn render(tree: &SpanningTree) -> Result<Self> {
        Self::from_edges(tree.size, &tree.edges)
    }

    /// Render `n×n` cells joined by `edges`.
    ///
    /// The entrance `(0, 1)` and exit `(2n, 2n-1)` are always opened.
    /// Fails with [MazeError::InvalidEdge] for an edge that does not join
    /// two neighboring cells.
    pub fn from_edges(n: usize, edges: &[Edge]) -> Result<Self> {
        if n < 1 {
            return Err(MazeError::InvalidDimension(n));
        }
        let side = n
            .checked_mul(2)
            .and_then(|s| s.checked_add(1))
            .ok_or(MazeError::InvalidDimension(n))?;

        let mut squares = vec![vec![Self::S_WALL; side]; side];
        for row in squares.iter_mut().skip(1).step_by(2) {
            for square in row.iter_mut().skip(1).step_by(2) {
                *square = Self::S_PASSAGE;
            }
        }

        for edge in edges {
            if !are_adjacent(n, edge.u, edge.v) {
                return Err(MazeError::InvalidEdge {
                    u: edge.u,
                    v: edge.v,
                });
            }
            let (u_y, u_x) = (2 * (edge.u / n) + 1, 2 * (edge.u % n) + 1);
            let (v_y, v_x) = (2 * (edge.v / n) + 1, 2 * (edge.v % n) + 1);
            squares[(u_y + v_y) / 2][(u_x + v_x) / 2] = Self::S_PASSAGE;
        }

        squares[0][1] = Self::S_PASSAGE;
        squares[2 * n][2 * n - 1] = Self::S_PASSAGE;

        Ok(Self { squares })
    }

    /// Parse grid from its text form.
    ///
    /// Rows are separated by newlines, trailing blank lines are ignored.
    /// Returns error if rows differ in length or contain characters other
    /// than `#.SEo*`.
    pub fn parse(text: &str) -> Result<Self> {
        let squares: Vec<Vec<char>> = text
            .trim_end()
            .lines()
            .map(|row| row.trim_end_matches('\r').chars().collect())
            .collect();

        let width = match squares.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(MazeError::InvalidGrid("grid is empty".to_string())),
        };

        for (y, row) in squares.iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::InvalidGrid(format!(
                    "row {} has {} squares, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            if let Some((x, c)) = row.iter().find_position(|c| !Self::ALPHABET.contains(*c)) {
                return Err(MazeError::InvalidGrid(format!(
                    "unexpected character `{}` at y={}, x={}",
                    c, y, x
                )));
            }
        }

        Ok(Self { squares })
    }

    pub fn height(&self) -> usize {
        self.squares.len()
    }

    pub fn width(&self) -> usize {
        self.squares.first().map_or(0, Vec::len)
    }

    pub fn get(&self, p: Point) -> Option<char> {
        self.squares.get(p.y).and_then(|row| row.get(p.x)).copied()
    }

    pub(crate) fn set(&mut self, p: Point, c: char) {
        self.squares[p.y][p.x] = c;
    }

    /// In bounds and not a wall
    pub fn is_open(&self, p: Point) -> bool {
        matches!(self.get(p), Some(c) if c != Self::S_WALL)
    }

    /// Fixed entrance on the top border
    pub fn entrance(&self) -> Point {
        Point::new(0, 1)
    }

    /// Fixed exit on the bottom border
    pub fn exit(&self) -> Point {
        Point::new(
            self.height().saturating_sub(1),
            self.width().saturating_sub(2),
        )
    }

    /// Cells per side, if the grid has the shape of a rendered maze
    pub fn cell_size(&self) -> Option<usize> {
        let (h, w) = (self.height(), self.width());
        (h == w && h >= 3 && h % 2 == 1).then(|| (h - 1) / 2)
    }

    /// Open orthogonal neighbors of `p`
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        Self::DIRECTIONS.into_iter().filter_map(move |(dy, dx)| {
            let y = p.y.checked_add_signed(dy)?;
            let x = p.x.checked_add_signed(dx)?;
            let q = Point::new(y, x);
            self.is_open(q).then_some(q)
        })
    }

    /// Recover the cell edges of a rendered maze.
    ///
    /// Two cells are joined iff the square between them is open. Edges come
    /// out row by row, right edge before bottom edge.
    pub fn extract_edges(&self) -> Result<Vec<Edge>> {
        let n = self.cell_size().ok_or_else(|| {
            MazeError::InvalidGrid(format!(
                "{}x{} grid is not a rendered maze",
                self.height(),
                self.width()
            ))
        })?;

        let mut edges = Vec::new();
        for row in 0..n {
            for col in 0..n {
                let cell = row * n + col;
                let (y, x) = (2 * row + 1, 2 * col + 1);
                if col + 1 < n && self.is_open(Point::new(y, x + 1)) {
                    edges.push(Edge::new(cell, cell + 1));
                }
                if row + 1 < n && self.is_open(Point::new(y + 1, x)) {
                    edges.push(Edge::new(cell, cell + n));
                }
            }
        }
        Ok(edges)
    }

    /// Text rows of the grid
    pub fn rows(&self) -> Vec<String> {
        self.squares.iter().map(|row| row.iter().collect()).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.squares.iter().map(|row| row.iter().join("")).join("\n");
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Grid, Point};
    use crate::error::MazeError;
    use crate::kruskal::Edge;
    use crate::maze_generator::{Algorithm, MazeGenerator};

    fn two_by_two() -> Grid {
        Grid::from_edges(2, &[Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 3)]).unwrap()
    }

    #[test]
    fn render_small_maze() {
        let grid = two_by_two();
        assert_eq!(
            grid.rows(),
            vec!["#.###", "#...#", "#.#.#", "#.#.#", "###.#"]
        );
        assert_eq!(grid.entrance(), Point::new(0, 1));
        assert_eq!(grid.exit(), Point::new(4, 3));
        assert_eq!(grid.cell_size(), Some(2));
    }

    #[test]
    fn single_cell() {
        let grid = Grid::from_edges(1, &[]).unwrap();
        assert_eq!(grid.rows(), vec!["#.#", "#.#", "#.#"]);
    }

    #[test]
    fn cells_are_always_passages() {
        let tree = MazeGenerator::new(Some(5))
            .generate(7, Algorithm::Kruskal)
            .unwrap();
        let grid = Grid::render(&tree).unwrap();
        assert_eq!(grid.height(), 15);
        assert_eq!(grid.width(), 15);
        for r in 0..7 {
            for c in 0..7 {
                assert_eq!(grid.get(Point::new(2 * r + 1, 2 * c + 1)), Some('.'));
            }
        }
        // Corners between cells never open
        for y in (0..15).step_by(2) {
            for x in (0..15).step_by(2) {
                assert_eq!(grid.get(Point::new(y, x)), Some('#'));
            }
        }
    }

    #[test]
    fn non_adjacent_edge_is_rejected() {
        assert_eq!(
            Grid::from_edges(3, &[Edge::new(2, 3)]),
            Err(MazeError::InvalidEdge { u: 2, v: 3 })
        );
        assert_eq!(
            Grid::from_edges(2, &[Edge::new(3, 4)]),
            Err(MazeError::InvalidEdge { u: 3, v: 4 })
        );
        assert_eq!(Grid::from_edges(0, &[]), Err(MazeError::InvalidDimension(0)));
    }

    #[test]
    fn neighbors_skip_walls_and_borders() {
        let grid = two_by_two();
        let from_entrance: Vec<Point> = grid.neighbors(Point::new(0, 1)).collect();
        assert_eq!(from_entrance, vec![Point::new(1, 1)]);

        let from_corner: Vec<Point> = grid.neighbors(Point::new(1, 1)).collect();
        assert_eq!(
            from_corner,
            vec![Point::new(1, 2), Point::new(2, 1), Point::new(0, 1)]
        );
    }

    #[test]
    fn parse_and_display_round_trip() {
        let grid = two_by_two();
        let text = format!("{}\n", grid);
        assert_eq!(Grid::parse(&text).unwrap(), grid);
    }

    #[test]
    fn parse_accepts_annotations() {
        let grid = Grid::parse("#S#\n#o*\n#E#").unwrap();
        assert_eq!(grid.get(Point::new(1, 2)), Some('*'));
        assert!(grid.is_open(Point::new(2, 1)));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(Grid::parse(""), Err(MazeError::InvalidGrid(_))));
        assert!(matches!(
            Grid::parse("###\n##"),
            Err(MazeError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::parse("#x#"),
            Err(MazeError::InvalidGrid(_))
        ));
    }

    #[test]
    fn extract_recovers_edges() {
        let tree = MazeGenerator::new(Some(11))
            .generate(9, Algorithm::KruskalOptimized)
            .unwrap();
        let grid = Grid::render(&tree).unwrap();

        let original: HashSet<_> = tree.edges.iter().map(|e| e.endpoints()).collect();
        let extracted: HashSet<_> = grid
            .extract_edges()
            .unwrap()
            .iter()
            .map(|e| e.endpoints())
            .collect();
        assert_eq!(original, extracted);
    }

    #[test]
    fn extract_needs_maze_shape() {
        let grid = Grid::parse("....\n....").unwrap();
        assert!(grid.extract_edges().is_err());
    }
}
