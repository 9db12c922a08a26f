//! Backward time-indexed attractor solver.

use crate::oracle::EdgeOracle;
use crate::solution::Solution;
use crate::stats::SolveStats;
use crate::{SolveError, SolveResult, Solver};
use std::time::Instant;
use tempus_game::{Game, Objective, ObjectiveKind, Player};
use tempus_presburger::Evaluator;
use tracing::{debug, trace};

/// Optimised reachability solver working backwards through time.
///
/// Maintains one winning slice `A` per time step, initialised with the
/// target set at the horizon and rebuilt (not accumulated) while stepping
/// `t` from `horizon - 1` down to 0. Target vertices satisfy the objective
/// at every time, so they re-enter each slice; a non-target vertex joins a
/// slice only through an available move into the next one, which is what
/// ties winning to a timed path valid from time 0.
///
/// Runs in `O(horizon · (|V| + |E|))` constraint evaluations. Reachability
/// objectives only; use [`crate::ExpansionSolver`] for the other kinds.
#[derive(Debug, Default)]
pub struct BackwardAttractorSolver {
    evaluator: Evaluator,
}

impl BackwardAttractorSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with a non-default existential enumeration bound.
    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }
}

impl Solver for BackwardAttractorSolver {
    fn name(&self) -> &'static str {
        "backward-attractor"
    }

    fn solve(
        &mut self,
        game: &Game,
        objective: &Objective,
        horizon: u32,
    ) -> SolveResult<Solution> {
        if objective.kind != ObjectiveKind::Reachability {
            return Err(SolveError::UnsupportedObjective {
                solver: self.name(),
                kind: objective.kind,
            });
        }

        let start = Instant::now();
        let mut stats = SolveStats::default();
        let mut oracle = EdgeOracle::new(game, self.evaluator);

        let n = game.vertex_count();
        let mut current = vec![false; n];
        for &target in objective.targets() {
            current[target.index()] = true;
        }
        let mut next = vec![false; n];

        for t in (0..horizon).rev() {
            for (v, vertex) in game.vertices() {
                stats.states_explored += 1;
                let wins = if objective.is_target(v) {
                    true
                } else {
                    let moves = oracle.successors(v, i64::from(t), &mut stats);
                    match vertex.owner {
                        Player::Zero => moves.iter().any(|w| current[w.index()]),
                        Player::One => {
                            !moves.is_empty() && moves.iter().all(|w| current[w.index()])
                        }
                    }
                };
                next[v.index()] = wins;
            }
            std::mem::swap(&mut current, &mut next);
            trace!(
                t,
                winning = current.iter().filter(|w| **w).count(),
                "time slice computed"
            );
        }

        // Greedy first-move hint at t = 0 for Player-0-owned winners.
        let mut strategy = vec![None; n];
        for (v, vertex) in game.vertices() {
            if current[v.index()] && vertex.owner == Player::Zero {
                strategy[v.index()] = oracle.successors(v, 0, &mut stats).first().copied();
            }
        }

        let winners = current
            .iter()
            .map(|&wins| if wins { Player::Zero } else { Player::One })
            .collect();
        stats.finish(start.elapsed());
        debug!(
            horizon,
            states = stats.states_explored,
            constraint_evals = stats.constraint_evals,
            "backward attractor finished"
        );
        Ok(Solution::new(self.name(), winners, strategy, stats))
    }
}
