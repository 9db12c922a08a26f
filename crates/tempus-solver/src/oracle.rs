//! Counted constraint-evaluation front-end shared by the solvers.

use crate::stats::SolveStats;
use smallvec::SmallVec;
use std::time::Instant;
use tempus_game::{EdgeId, Game, VertexId, TIME_VAR};
use tempus_presburger::{Env, Evaluator};

/// Evaluates edge availability while keeping the statistics counters
/// current. Holds one reusable environment whose only binding is the clock.
pub(crate) struct EdgeOracle<'g> {
    game: &'g Game,
    evaluator: Evaluator,
    env: Env,
}

impl<'g> EdgeOracle<'g> {
    pub fn new(game: &'g Game, evaluator: Evaluator) -> Self {
        Self {
            game,
            evaluator,
            env: Env::new(),
        }
    }

    /// Whether `edge` may be traversed at `time`.
    pub fn holds(&mut self, edge: EdgeId, time: i64, stats: &mut SolveStats) -> bool {
        self.env.bind(TIME_VAR, time);
        let start = Instant::now();
        let holds = self
            .evaluator
            .eval(&self.game.edge(edge).constraint, &self.env);
        stats.constraint_eval_time += start.elapsed();
        stats.constraint_evals += 1;
        if holds {
            stats.constraint_passes += 1;
        } else {
            stats.constraint_failures += 1;
        }
        holds
    }

    /// Available successors of `vertex` at `time`, in edge insertion order.
    pub fn successors(
        &mut self,
        vertex: VertexId,
        time: i64,
        stats: &mut SolveStats,
    ) -> SmallVec<[VertexId; 8]> {
        let mut out = SmallVec::new();
        for &edge in self.game.outgoing(vertex) {
            if self.holds(edge, time, stats) {
                out.push(self.game.edge(edge).dest);
            }
        }
        out
    }
}
