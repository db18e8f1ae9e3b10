//! Union-find over cell indices

use crate::error::{MazeError, Result};

/// Disjoint set forest with path compression and union by rank.
///
/// Elements are the integers `0..len`. Every element starts as the root of
/// its own singleton set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisjointSet {
    /// Parent pointer per element; a root points to itself
    parent: Vec<usize>,
    /// Upper bound of the tree height below each root
    rank: Vec<u32>,
    /// Number of distinct roots
    components: usize,
}

impl DisjointSet {
    /// Create `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            components: n,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets currently tracked
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Find the root of the set containing `x`.
    ///
    /// Every node visited on the way up is relinked directly to the root.
    /// The walk is iterative, so long chains cannot overflow the stack.
    ///
    /// Returns [MazeError::OutOfRange] if `x` is not an element.
    pub fn find(&mut self, x: usize) -> Result<usize> {
        self.check(x)?;

        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        Ok(root)
    }

    /// Merge the sets containing `x` and `y`.
    ///
    /// Returns `false` without changing anything if they already share a
    /// root, i.e. joining them would close a cycle. On equal ranks the root
    /// of `x` becomes the parent.
    pub fn union(&mut self, x: usize, y: usize) -> Result<bool> {
        let root_x = self.find(x)?;
        let root_y = self.find(y)?;

        if root_x == root_y {
            return Ok(false);
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        self.components -= 1;
        Ok(true)
    }

    /// Check whether `x` and `y` belong to the same set
    pub fn same_set(&mut self, x: usize, y: usize) -> Result<bool> {
        Ok(self.find(x)? == self.find(y)?)
    }

    fn check(&self, x: usize) -> Result<()> {
        if x < self.parent.len() {
            Ok(())
        } else {
            Err(MazeError::OutOfRange {
                index: x,
                len: self.parent.len(),
            })
        }
    }
}
