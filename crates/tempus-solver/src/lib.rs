//! Solvers for temporal reachability games.
//!
//! Two engines behind one [`Solver`] seam: the time-unfolding
//! [`ExpansionSolver`] is the reference implementation and handles every
//! objective kind; the [`BackwardAttractorSolver`] is the optimised
//! specialisation for reachability objectives. Both produce the Player 0
//! winner partition at time 0 together with an advisory first-move strategy.

pub mod attractor;
pub mod expansion;
mod oracle;
pub mod solution;
pub mod stats;

pub use attractor::BackwardAttractorSolver;
pub use expansion::ExpansionSolver;
pub use solution::Solution;
pub use stats::SolveStats;

use tempus_game::{Game, Objective, ObjectiveKind};
use thiserror::Error;

/// Error raised when a solver is handed inputs it cannot decide.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("solver '{solver}' does not support {kind} objectives")]
    UnsupportedObjective {
        solver: &'static str,
        kind: ObjectiveKind,
    },
}

pub type SolveResult<T> = Result<T, SolveError>;

/// Common interface over the game solvers.
///
/// A `solve` call borrows the game immutably for its whole duration and
/// runs on the calling thread; the horizon is the sole progress bound.
pub trait Solver {
    /// Stable name used in logs and benchmark output.
    fn name(&self) -> &'static str;

    /// Decide the game over `horizon` time steps, producing the winner of
    /// every vertex at time 0.
    fn solve(
        &mut self,
        game: &Game,
        objective: &Objective,
        horizon: u32,
    ) -> SolveResult<Solution>;
}
