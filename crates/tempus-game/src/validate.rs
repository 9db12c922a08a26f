//! Structural validation run before solving.

use crate::game::{Game, TIME_VAR};
use crate::objective::Objective;
use thiserror::Error;

/// Structural defect that makes a game unsolvable or almost certainly a
/// user error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("game has no target vertex")]
    NoTargets,

    #[error("vertex '{name}' has no outgoing edge")]
    DeadEnd { name: String },

    #[error("constraint on edge '{from}' -> '{dest}' never references 'time': {constraint}")]
    TimelessConstraint {
        from: String,
        dest: String,
        constraint: String,
    },
}

/// Check the structural preconditions the solvers rely on.
///
/// 1. The objective names at least one target vertex.
/// 2. Every vertex has an outgoing edge. Unreachable configurations are
///    modelled by constraints that hold at no relevant time, never by
///    missing edges.
/// 3. Every constraint is either the trivially-true formula or mentions
///    [`TIME_VAR`] free. A non-trivial constraint without the clock is
///    constant over time and almost certainly an authoring mistake.
pub fn validate(game: &Game, objective: &Objective) -> Result<(), ValidationError> {
    if objective.targets().is_empty() {
        return Err(ValidationError::NoTargets);
    }

    for (id, vertex) in game.vertices() {
        if game.outgoing(id).is_empty() {
            return Err(ValidationError::DeadEnd {
                name: vertex.name.clone(),
            });
        }
    }

    for (_, edge) in game.edges() {
        if !edge.constraint.is_trivially_true() && !edge.constraint.mentions(TIME_VAR) {
            return Err(ValidationError::TimelessConstraint {
                from: game.name(edge.source).to_string(),
                dest: game.name(edge.dest).to_string(),
                constraint: edge.constraint.to_string(),
            });
        }
    }

    Ok(())
}
