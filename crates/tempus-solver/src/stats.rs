//! Counters and timings collected during a solve.

use std::time::Duration;

/// Statistics for a single `solve` call.
///
/// Counters live for the lifetime of one solve and feed the benchmark CSV
/// row; nothing here is load-bearing for correctness.
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    /// Edge-constraint evaluations performed.
    pub constraint_evals: u64,
    /// Evaluations that made the edge available.
    pub constraint_passes: u64,
    /// Evaluations that did not.
    pub constraint_failures: u64,
    /// Vertices of the time-unfolded graph (expansion solver only).
    pub expanded_vertices: u64,
    /// Instantiated edges of the time-unfolded graph (expansion solver only).
    pub expanded_edges: u64,
    /// Fixpoint sweeps until stabilisation.
    pub sweeps: u64,
    /// Vertex-time states examined across the fixpoint.
    pub states_explored: u64,
    /// Wall clock for the whole solve.
    pub total_time: Duration,
    /// Portion spent evaluating edge constraints.
    pub constraint_eval_time: Duration,
    /// Portion spent traversing the graph and updating the fixpoint.
    pub traversal_time: Duration,
}

impl SolveStats {
    /// Derive the traversal timing once the total is known.
    pub(crate) fn finish(&mut self, total: Duration) {
        self.total_time = total;
        self.traversal_time = total.saturating_sub(self.constraint_eval_time);
    }

    /// One benchmark CSV row:
    /// `solver_name,game_name,status,total_seconds,constraint_eval_seconds,graph_traversal_seconds,states_explored`.
    pub fn csv_row(&self, solver: &str, game: &str, status: &str) -> String {
        format!(
            "{},{},{},{:.6},{:.6},{:.6},{}",
            solver,
            game,
            status,
            self.total_time.as_secs_f64(),
            self.constraint_eval_time.as_secs_f64(),
            self.traversal_time.as_secs_f64(),
            self.states_explored,
        )
    }
}
