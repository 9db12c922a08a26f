//! Property: the backward attractor and the static expansion solver agree
//! on every reachability game.
//!
//! Games are generated over small arenas with constraints drawn from the
//! shapes the description format produces. The expansion solver is the
//! reference; any disagreement is a bug in the attractor's slice update.

use proptest::prelude::*;
use tempus_game::{Game, Objective, Player};
use tempus_presburger::{Formula, Term};
use tempus_solver::{BackwardAttractorSolver, ExpansionSolver, Solver};

/// One generated edge: destination plus a constraint recipe.
#[derive(Debug, Clone)]
struct EdgeSpec {
    dest: usize,
    shape: usize,
    k: i64,
    m: i64,
}

fn build_constraint(spec: &EdgeSpec) -> Formula {
    let time = || Term::var("time");
    let modulus = spec.m.max(1);
    match spec.shape % 7 {
        0 => Formula::True,
        1 => Formula::Equal(time(), Term::constant(spec.k)),
        2 => Formula::Ge(time(), Term::constant(spec.k)),
        3 => Formula::Le(time(), Term::constant(spec.k)),
        4 => Formula::modulo(time(), modulus, spec.k.rem_euclid(modulus)).unwrap(),
        5 => Formula::not(Formula::Equal(time(), Term::constant(spec.k))),
        _ => Formula::exists(
            "w",
            Formula::Equal(
                time(),
                Term::scaled_var("w", 2).add(&Term::constant(spec.k.rem_euclid(2))),
            ),
        ),
    }
}

fn build_game(vertices: &[(bool, bool)], edges: &[(usize, EdgeSpec)]) -> (Game, Objective) {
    let mut game = Game::new();
    let ids: Vec<_> = vertices
        .iter()
        .enumerate()
        .map(|(i, &(owner_one, target))| {
            let owner = if owner_one { Player::One } else { Player::Zero };
            // Guarantee a nonempty target set.
            let target = target || (i == 0 && !vertices.iter().any(|&(_, t)| t));
            game.add_vertex(format!("v{i}"), owner, target)
        })
        .collect();
    for (src, spec) in edges {
        let dest = ids[spec.dest % ids.len()];
        game.add_edge(ids[src % ids.len()], dest, "", build_constraint(spec));
    }
    let targets: Vec<_> = game.target_ids().collect();
    let objective = Objective::reachability(targets);
    (game, objective)
}

fn arb_game() -> impl Strategy<Value = (Game, Objective)> {
    (1usize..=5).prop_flat_map(|n| {
        let vertices = prop::collection::vec((any::<bool>(), any::<bool>()), n);
        let edges = prop::collection::vec(
            (
                0..n,
                (0..n, 0usize..7, 0i64..6, 1i64..5)
                    .prop_map(|(dest, shape, k, m)| EdgeSpec { dest, shape, k, m }),
            ),
            0..=3 * n,
        );
        (vertices, edges)
            .prop_map(|(vertices, edges)| build_game(&vertices, &edges))
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn solvers_agree_on_reachability((game, objective) in arb_game(), horizon in 0u32..=6) {
        let expansion = ExpansionSolver::new()
            .solve(&game, &objective, horizon)
            .unwrap();
        let backward = BackwardAttractorSolver::new()
            .solve(&game, &objective, horizon)
            .unwrap();
        prop_assert_eq!(expansion.winning_set(), backward.winning_set());
    }

    #[test]
    fn zero_horizon_is_exactly_the_target_set((game, objective) in arb_game()) {
        let solution = ExpansionSolver::new().solve(&game, &objective, 0).unwrap();
        prop_assert_eq!(&solution.winning_set(), objective.targets());
    }

    #[test]
    fn expansion_is_monotone_in_the_horizon((game, objective) in arb_game(), horizon in 0u32..=5) {
        let mut solver = ExpansionSolver::new();
        let shorter = solver.solve(&game, &objective, horizon).unwrap();
        let longer = solver.solve(&game, &objective, horizon + 1).unwrap();
        prop_assert!(
            shorter.winning_set().is_subset(&longer.winning_set()),
            "winning set shrank when the horizon grew"
        );
    }

    #[test]
    fn solving_is_deterministic((game, objective) in arb_game(), horizon in 0u32..=5) {
        let first = ExpansionSolver::new().solve(&game, &objective, horizon).unwrap();
        let second = ExpansionSolver::new().solve(&game, &objective, horizon).unwrap();
        prop_assert_eq!(first.winning_set(), second.winning_set());

        let third = BackwardAttractorSolver::new()
            .solve(&game, &objective, horizon)
            .unwrap();
        let fourth = BackwardAttractorSolver::new()
            .solve(&game, &objective, horizon)
            .unwrap();
        prop_assert_eq!(third.winning_set(), fourth.winning_set());
    }

    #[test]
    fn safety_and_reach_partition_the_arena_when_roles_swap(
        (game, objective) in arb_game(),
        horizon in 0u32..=5,
    ) {
        // Owner-swapped copy of the same arena.
        let mut swapped = Game::new();
        for (_, vertex) in game.vertices() {
            swapped.add_vertex(vertex.name.clone(), vertex.owner.opponent(), vertex.target);
        }
        for (_, edge) in game.edges() {
            swapped.add_edge(edge.source, edge.dest, "", edge.constraint.clone());
        }
        let safety = Objective::safety(objective.targets().iter().copied());

        let mut solver = ExpansionSolver::new();
        let reach_solution = solver.solve(&game, &objective, horizon).unwrap();
        let safety_solution = solver.solve(&swapped, &safety, horizon).unwrap();

        for v in game.vertex_ids() {
            prop_assert_ne!(
                reach_solution.winner(v) == Player::Zero,
                safety_solution.winner(v) == Player::Zero
            );
        }
    }
}
