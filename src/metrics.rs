//! Optional progress reporting for generators and solvers
//!
//! The engine reports events through [MetricsObserver]. Callers that are not
//! interested pass [NoMetrics]; [MetricsRecorder] keeps simple counters.

use std::time::{Duration, Instant};

/// Receiver of engine events. All methods default to no-ops.
pub trait MetricsObserver {
    /// Generation or solving of a maze of `size` started.
    ///
    /// `size` is cells per side. Solvers on a grid that is not shaped like a
    /// rendered maze report the grid height instead.
    fn started(&mut self, _size: usize, _algorithm: &str, _seed: Option<u64>) {}

    /// A candidate edge was examined
    fn edge_processed(&mut self) {}

    /// A disjoint-set query or merge was performed
    fn union_find_op(&mut self) {}

    /// A search or carving frame was abandoned
    fn backtrack(&mut self) {}

    /// A square was expanded by a solver
    fn node_explored(&mut self) {}

    /// Number of squares on the found path, including both ends
    fn path_found(&mut self, _length: usize) {}

    /// Run is complete; `output` identifies where the result went
    fn finished(&mut self, _output: &str) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetrics;

impl MetricsObserver for NoMetrics {}

/// Counts engine events for a single run
#[derive(Debug, Default, Clone)]
pub struct MetricsRecorder {
    pub size: usize,
    pub algorithm: String,
    pub seed: Option<u64>,
    pub edges_processed: usize,
    pub union_find_operations: usize,
    pub backtrack_count: usize,
    pub nodes_explored: usize,
    pub path_length: usize,
    pub output: Option<String>,
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall time between [MetricsObserver::started] and
    /// [MetricsObserver::finished], if both were reported
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Print summary to console
    pub fn print_report(&self) {
        let seed = self
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string());
        let elapsed_ms = self
            .elapsed
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0);

        println!("{}", "=".repeat(30));
        println!("{:>22}: {}", "algorithm", self.algorithm);
        println!("{:>22}: {}", "maze_size", self.size);
        println!("{:>22}: {}", "seed", seed);
        println!("{:>22}: {:.2}", "elapsed_ms", elapsed_ms);
        println!("{:>22}: {}", "edges_processed", self.edges_processed);
        println!("{:>22}: {}", "union_find_operations", self.union_find_operations);
        println!("{:>22}: {}", "backtrack_count", self.backtrack_count);
        println!("{:>22}: {}", "nodes_explored", self.nodes_explored);
        println!("{:>22}: {}", "path_length", self.path_length);
        if let Some(output) = &self.output {
            println!("{:>22}: {}", "output", output);
        }
        println!("{}", "=".repeat(30));
    }
}

impl MetricsObserver for MetricsRecorder {
    fn started(&mut self, size: usize, algorithm: &str, seed: Option<u64>) {
        *self = Self {
            size,
            algorithm: algorithm.to_string(),
            seed,
            started_at: Some(Instant::now()),
            ..Self::default()
        };
    }

    fn edge_processed(&mut self) {
        self.edges_processed += 1;
    }

    fn union_find_op(&mut self) {
        self.union_find_operations += 1;
    }

    fn backtrack(&mut self) {
        self.backtrack_count += 1;
    }

    fn node_explored(&mut self) {
        self.nodes_explored += 1;
    }

    fn path_found(&mut self, length: usize) {
        self.path_length = length;
    }

    fn finished(&mut self, output: &str) {
        self.elapsed = self.started_at.map(|t| t.elapsed());
        self.output = Some(output.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{MetricsObserver, MetricsRecorder};

    #[test]
    fn start_resets_counters() {
        let mut rec = MetricsRecorder::new();
        rec.started(3, "kruskal", Some(1));
        rec.edge_processed();
        rec.backtrack();
        assert_eq!(rec.edges_processed, 1);

        rec.started(5, "astar", None);
        assert_eq!(rec.edges_processed, 0);
        assert_eq!(rec.backtrack_count, 0);
        assert_eq!(rec.algorithm, "astar");
        assert_eq!(rec.size, 5);
    }

    #[test]
    fn finish_records_output_and_time() {
        let mut rec = MetricsRecorder::new();
        assert!(rec.elapsed().is_none());
        rec.started(2, "dfs", None);
        rec.path_found(7);
        rec.finished("maze.txt");
        assert!(rec.elapsed().is_some());
        assert_eq!(rec.path_length, 7);
        assert_eq!(rec.output.as_deref(), Some("maze.txt"));
    }
}
