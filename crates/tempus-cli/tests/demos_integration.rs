//! Integration tests that ingest, validate, and solve every demo
//! description.

use std::fs;
use std::path::PathBuf;
use tempus_game::{validate, ObjectiveKind};
use tempus_solver::{BackwardAttractorSolver, ExpansionSolver, Solver};
use tempus_syntax::parse_description;

fn demo_files() -> Vec<PathBuf> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let demos = PathBuf::from(manifest_dir)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos");
    let mut files: Vec<_> = fs::read_dir(&demos)
        .unwrap_or_else(|_| panic!("no demos directory at {demos:?}"))
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "dot"))
        .collect();
    files.sort();
    files
}

#[test]
fn all_demos_parse_cleanly() {
    let files = demo_files();
    assert!(!files.is_empty(), "no .dot files found");

    for file in &files {
        let source = fs::read_to_string(file).unwrap();
        let description = parse_description(&source)
            .unwrap_or_else(|e| panic!("{}: {e}", file.display()));
        assert!(
            description.warnings.is_empty(),
            "{}: unexpected warnings {:?}",
            file.display(),
            description.warnings
        );
        assert!(
            description.time_bound.is_some(),
            "{}: demo must declare a time bound",
            file.display()
        );
    }
}

#[test]
fn all_demos_validate() {
    for file in demo_files() {
        let source = fs::read_to_string(&file).unwrap();
        let description = parse_description(&source).unwrap();
        validate(&description.game, &description.objective)
            .unwrap_or_else(|e| panic!("{}: {e}", file.display()));
    }
}

#[test]
fn all_demos_solve_and_solvers_agree() {
    for file in demo_files() {
        let source = fs::read_to_string(&file).unwrap();
        let description = parse_description(&source).unwrap();
        let horizon = description.time_bound.unwrap();

        let expansion = ExpansionSolver::new()
            .solve(&description.game, &description.objective, horizon)
            .unwrap_or_else(|e| panic!("{}: {e}", file.display()));

        if description.objective.kind == ObjectiveKind::Reachability {
            let backward = BackwardAttractorSolver::new()
                .solve(&description.game, &description.objective, horizon)
                .unwrap();
            assert_eq!(
                expansion.winning_set(),
                backward.winning_set(),
                "{}: solvers disagree",
                file.display()
            );
        }
    }
}

#[test]
fn winning_moves_are_available_at_time_zero() {
    // A strategy hint must name a successor reachable through an edge whose
    // constraint holds at time 0.
    for file in demo_files() {
        let source = fs::read_to_string(&file).unwrap();
        let description = parse_description(&source).unwrap();
        let horizon = description.time_bound.unwrap();
        let solution = ExpansionSolver::new()
            .solve(&description.game, &description.objective, horizon)
            .unwrap();

        let evaluator = tempus_presburger::Evaluator::default();
        for v in description.game.vertex_ids() {
            if let Some(next) = solution.strategy(v) {
                let available =
                    description.game.available_successors(&evaluator, v, 0);
                assert!(
                    available.contains(&next),
                    "{}: strategy at {} points to unavailable {}",
                    file.display(),
                    description.game.name(v),
                    description.game.name(next)
                );
            }
        }
    }
}
