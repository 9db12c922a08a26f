//! Temporal game model: arena-indexed graphs with Presburger edge
//! constraints, objectives, and pre-solve validation.

pub mod game;
pub mod objective;
pub mod validate;

pub use game::{Edge, EdgeId, Game, Player, Vertex, VertexId, TIME_VAR};
pub use objective::{Objective, ObjectiveKind};
pub use validate::{validate, ValidationError};
