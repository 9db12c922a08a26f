//! Winner partition and advisory strategy produced by the solvers.

use crate::stats::SolveStats;
use std::collections::BTreeSet;
use tempus_game::{Player, VertexId};

/// Result of solving a temporal game: which player wins from each vertex at
/// time 0, plus a first move for Player-0-owned winning vertices.
///
/// Only the winner partition is load-bearing. The strategy is a greedy
/// first-move hint and carries no guarantee for deeper plies.
#[derive(Debug, Clone)]
pub struct Solution {
    solver: &'static str,
    winners: Vec<Player>,
    strategy: Vec<Option<VertexId>>,
    stats: SolveStats,
}

impl Solution {
    pub(crate) fn new(
        solver: &'static str,
        winners: Vec<Player>,
        strategy: Vec<Option<VertexId>>,
        stats: SolveStats,
    ) -> Self {
        debug_assert_eq!(winners.len(), strategy.len());
        Self {
            solver,
            winners,
            strategy,
            stats,
        }
    }

    /// Name of the solver that produced this solution.
    pub fn solver(&self) -> &'static str {
        self.solver
    }

    /// Winner of `vertex` at time 0.
    pub fn winner(&self, vertex: VertexId) -> Player {
        self.winners[vertex.index()]
    }

    /// Advisory first move for `vertex`, when one exists.
    pub fn strategy(&self, vertex: VertexId) -> Option<VertexId> {
        self.strategy[vertex.index()]
    }

    /// Vertices Player 0 wins from at time 0.
    pub fn winning_set(&self) -> BTreeSet<VertexId> {
        self.winners
            .iter()
            .enumerate()
            .filter(|(_, &winner)| winner == Player::Zero)
            .map(|(i, _)| VertexId(i as u32))
            .collect()
    }

    /// Statistics collected during the solve.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}
