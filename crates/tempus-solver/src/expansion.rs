//! Static time-unfolding solver.

use crate::oracle::EdgeOracle;
use crate::solution::Solution;
use crate::stats::SolveStats;
use crate::{SolveResult, Solver};
use smallvec::SmallVec;
use std::time::Instant;
use tempus_game::{Game, Objective, Player, VertexId};
use tempus_presburger::Evaluator;
use tracing::{debug, trace};

/// Reference solver over the time-unfolded static graph.
///
/// Replicates every vertex per time layer `0..=horizon`, instantiates
/// `(u, t) → (v, t + 1)` exactly when the edge constraint holds at `t`, and
/// runs a monotone controllable-predecessor fixpoint seeded with the states
/// the objective already decides (`Objective::is_satisfied` resp.
/// `Objective::has_failed`). Projecting layer 0 yields the winner of every
/// vertex at time 0.
///
/// The fixpoint is parameterised by the attracting player, which is what
/// lets one engine decide all four objective kinds: reach objectives
/// attract for Player 0 toward satisfied states, safety objectives attract
/// for Player 1 toward failed states and hand Player 0 the complement.
/// Stalemate states (no instantiated successor) never join an attractor, so
/// they fall to the safety side.
#[derive(Debug, Default)]
pub struct ExpansionSolver {
    evaluator: Evaluator,
}

impl ExpansionSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solver with a non-default existential enumeration bound.
    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }
}

impl Solver for ExpansionSolver {
    fn name(&self) -> &'static str {
        "static-expansion"
    }

    fn solve(
        &mut self,
        game: &Game,
        objective: &Objective,
        horizon: u32,
    ) -> SolveResult<Solution> {
        let start = Instant::now();
        let mut stats = SolveStats::default();
        let mut oracle = EdgeOracle::new(game, self.evaluator);

        let n = game.vertex_count();
        let layers = horizon as usize + 1;
        let node = |v: VertexId, t: usize| t * n + v.index();

        // Unfold: successors of (u, t) live in layer t + 1.
        let mut successors: Vec<SmallVec<[u32; 4]>> = vec![SmallVec::new(); n * layers];
        for t in 0..horizon as usize {
            for (id, edge) in game.edges() {
                if oracle.holds(id, t as i64, &mut stats) {
                    successors[node(edge.source, t)].push(node(edge.dest, t + 1) as u32);
                    stats.expanded_edges += 1;
                }
            }
        }
        stats.expanded_vertices = (n * layers) as u64;
        debug!(
            vertices = stats.expanded_vertices,
            edges = stats.expanded_edges,
            layers,
            "unfolded temporal graph"
        );

        // Seed with the states the objective already decides: reach kinds
        // attract Player 0 toward satisfied states, safety kinds attract
        // Player 1 toward failed ones.
        let attracting = if objective.player0_reaches() {
            Player::Zero
        } else {
            Player::One
        };
        let mut winning = vec![false; n * layers];
        for v in game.vertex_ids() {
            for t in 0..layers {
                let decided = if attracting == Player::Zero {
                    objective.is_satisfied(v, t as u32)
                } else {
                    objective.has_failed(v, t as u32)
                };
                if decided {
                    winning[node(v, t)] = true;
                }
            }
        }

        // Controllable-predecessor fixpoint: grow monotonically until no
        // sweep adds a state.
        loop {
            stats.sweeps += 1;
            let mut changed = false;
            for idx in 0..winning.len() {
                if winning[idx] {
                    continue;
                }
                stats.states_explored += 1;
                let owner = game.owner(VertexId((idx % n) as u32));
                let succ = &successors[idx];
                let joins = if owner == attracting {
                    succ.iter().any(|&s| winning[s as usize])
                } else {
                    !succ.is_empty() && succ.iter().all(|&s| winning[s as usize])
                };
                if joins {
                    winning[idx] = true;
                    changed = true;
                }
            }
            trace!(sweep = stats.sweeps, "fixpoint sweep finished");
            if !changed {
                break;
            }
        }

        // Project layer 0. For safety kinds the attractor belongs to
        // Player 1, so Player 0 wins its complement.
        let player0_wins_inside = attracting == Player::Zero;
        let winners: Vec<Player> = game
            .vertex_ids()
            .map(|v| {
                if winning[node(v, 0)] == player0_wins_inside {
                    Player::Zero
                } else {
                    Player::One
                }
            })
            .collect();

        // First-move hint for Player-0-owned winning vertices: prefer a
        // successor that keeps the play inside Player 0's region at layer 1.
        let mut strategy = vec![None; n];
        if horizon > 0 {
            for (v, vertex) in game.vertices() {
                if winners[v.index()] != Player::Zero || vertex.owner != Player::Zero {
                    continue;
                }
                let succ = &successors[node(v, 0)];
                let preferred = succ
                    .iter()
                    .find(|&&s| winning[s as usize] == player0_wins_inside)
                    .or_else(|| succ.first());
                strategy[v.index()] =
                    preferred.map(|&s| VertexId((s as usize % n) as u32));
            }
        }

        stats.finish(start.elapsed());
        debug!(
            horizon,
            sweeps = stats.sweeps,
            states = stats.states_explored,
            "static expansion finished"
        );
        Ok(Solution::new(self.name(), winners, strategy, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempus_presburger::{Formula, Term};

    fn time_eq(t: i64) -> Formula {
        Formula::Equal(Term::var("time"), Term::constant(t))
    }

    fn chain_game() -> (Game, VertexId, VertexId, VertexId) {
        // a -> b (t == 0), b -> c (t == 1), self-loops on c.
        let mut game = Game::new();
        let a = game.add_vertex("a", Player::Zero, false);
        let b = game.add_vertex("b", Player::Zero, false);
        let c = game.add_vertex("c", Player::Zero, true);
        game.add_edge(a, b, "", time_eq(0));
        game.add_edge(b, c, "", time_eq(1));
        game.add_edge(c, c, "", Formula::True);
        (game, a, b, c)
    }

    #[test]
    fn test_reach_through_timed_chain() {
        let (game, a, b, c) = chain_game();
        let objective = Objective::reachability([c]);
        let solution = ExpansionSolver::new().solve(&game, &objective, 2).unwrap();
        assert_eq!(solution.winner(a), Player::Zero);
        assert_eq!(solution.winner(c), Player::Zero);
        // b would need the t == 1 edge at time 0.
        assert_eq!(solution.winner(b), Player::One);
        assert_eq!(solution.strategy(a), Some(b));
    }

    #[test]
    fn test_safety_complement_on_owner_swapped_game() {
        // Same arena with every owner flipped: the safety attractor runs the
        // identical fixpoint, so Player 0's safety region is the exact
        // complement of her reachability region in the original game.
        let (game, _, _, c) = chain_game();
        let mut swapped = Game::new();
        for (_, vertex) in game.vertices() {
            swapped.add_vertex(
                vertex.name.clone(),
                vertex.owner.opponent(),
                vertex.target,
            );
        }
        for (_, edge) in game.edges() {
            swapped.add_edge(edge.source, edge.dest, "", edge.constraint.clone());
        }

        let mut solver = ExpansionSolver::new();
        let reach = solver
            .solve(&game, &Objective::reachability([c]), 2)
            .unwrap();
        let safe = solver
            .solve(&swapped, &Objective::safety([c]), 2)
            .unwrap();

        for v in game.vertex_ids() {
            assert_ne!(
                reach.winner(v) == Player::Zero,
                safe.winner(v) == Player::Zero,
                "vertex {} should flip between reach and swapped safety",
                game.name(v)
            );
        }
    }

    #[test]
    fn test_time_bounded_reach_expires() {
        let (game, a, b, c) = chain_game();
        // c is reached at time 2, one step too late for a bound of 1.
        let objective = Objective::time_bounded_reach([c], 1);
        let solution = ExpansionSolver::new().solve(&game, &objective, 4).unwrap();
        assert_eq!(solution.winner(a), Player::One);
        assert_eq!(solution.winner(b), Player::One);
        assert_eq!(solution.winner(c), Player::Zero);

        let relaxed = Objective::time_bounded_reach([c], 2);
        let solution = ExpansionSolver::new().solve(&game, &relaxed, 4).unwrap();
        assert_eq!(solution.winner(a), Player::Zero);
    }

    #[test]
    fn test_time_bounded_safety_survives_past_bound() {
        // Player 0 owns a forced march into the target at time 2; with a
        // safety bound of 1 the visit is harmless.
        let mut game = Game::new();
        let a = game.add_vertex("a", Player::Zero, false);
        let bad = game.add_vertex("bad", Player::Zero, true);
        game.add_edge(a, a, "", Formula::Le(Term::var("time"), Term::constant(0)));
        game.add_edge(a, bad, "", Formula::Ge(Term::var("time"), Term::constant(1)));
        game.add_edge(bad, bad, "", Formula::True);

        let mut solver = ExpansionSolver::new();
        let strict = solver
            .solve(&game, &Objective::time_bounded_safety([bad], 3), 3)
            .unwrap();
        assert_eq!(strict.winner(a), Player::One);

        let lax = solver
            .solve(&game, &Objective::time_bounded_safety([bad], 1), 3)
            .unwrap();
        assert_eq!(lax.winner(a), Player::Zero);
    }

    #[test]
    fn test_stalemate_falls_to_safety_side() {
        // a's only edge is never available: the reacher is stuck.
        let mut game = Game::new();
        let a = game.add_vertex("a", Player::One, false);
        let t = game.add_vertex("t", Player::Zero, true);
        game.add_edge(a, t, "", time_eq(-1));
        game.add_edge(t, t, "", Formula::True);

        let mut solver = ExpansionSolver::new();
        let reach = solver
            .solve(&game, &Objective::reachability([t]), 3)
            .unwrap();
        assert_eq!(reach.winner(a), Player::One);

        let safe = solver.solve(&game, &Objective::safety([t]), 3).unwrap();
        assert_eq!(safe.winner(a), Player::Zero);
    }
}
