//! Objectives for temporal games.

use crate::game::VertexId;
use std::collections::BTreeSet;
use std::fmt;

/// The kind of objective Player 0 pursues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveKind {
    /// Reach a target vertex within the solve horizon.
    Reachability,
    /// Avoid the target set throughout the horizon.
    Safety,
    /// Reach a target vertex no later than the time bound.
    TimeBoundedReach,
    /// Avoid the target set until the time bound has passed.
    TimeBoundedSafety,
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveKind::Reachability => write!(f, "reachability"),
            ObjectiveKind::Safety => write!(f, "safety"),
            ObjectiveKind::TimeBoundedReach => write!(f, "time_bounded_reach"),
            ObjectiveKind::TimeBoundedSafety => write!(f, "time_bounded_safety"),
        }
    }
}

/// A target set with an objective kind and an optional time bound.
///
/// The satisfied/failed split follows the game semantics: a play state
/// `(v, t)` that satisfies the objective is immediately winning for
/// Player 0, a failed state is immediately winning for Player 1, and play
/// continues otherwise. Time-bounded kinds without a bound behave like
/// their unbounded counterparts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub kind: ObjectiveKind,
    targets: BTreeSet<VertexId>,
    pub time_bound: Option<u32>,
}

impl Objective {
    pub fn new(
        kind: ObjectiveKind,
        targets: impl IntoIterator<Item = VertexId>,
        time_bound: Option<u32>,
    ) -> Self {
        Self {
            kind,
            targets: targets.into_iter().collect(),
            time_bound,
        }
    }

    pub fn reachability(targets: impl IntoIterator<Item = VertexId>) -> Self {
        Self::new(ObjectiveKind::Reachability, targets, None)
    }

    pub fn safety(targets: impl IntoIterator<Item = VertexId>) -> Self {
        Self::new(ObjectiveKind::Safety, targets, None)
    }

    pub fn time_bounded_reach(targets: impl IntoIterator<Item = VertexId>, bound: u32) -> Self {
        Self::new(ObjectiveKind::TimeBoundedReach, targets, Some(bound))
    }

    pub fn time_bounded_safety(targets: impl IntoIterator<Item = VertexId>, bound: u32) -> Self {
        Self::new(ObjectiveKind::TimeBoundedSafety, targets, Some(bound))
    }

    pub fn targets(&self) -> &BTreeSet<VertexId> {
        &self.targets
    }

    pub fn is_target(&self, vertex: VertexId) -> bool {
        self.targets.contains(&vertex)
    }

    fn bound(&self) -> u32 {
        self.time_bound.unwrap_or(u32::MAX)
    }

    /// Whether the objective is already satisfied at state `(vertex, time)`.
    pub fn is_satisfied(&self, vertex: VertexId, time: u32) -> bool {
        let target = self.is_target(vertex);
        match self.kind {
            ObjectiveKind::Reachability => target,
            ObjectiveKind::Safety => !target,
            ObjectiveKind::TimeBoundedReach => target && time <= self.bound(),
            ObjectiveKind::TimeBoundedSafety => time > self.bound() || !target,
        }
    }

    /// Whether the objective can no longer be met from `(vertex, time)`.
    pub fn has_failed(&self, vertex: VertexId, time: u32) -> bool {
        let target = self.is_target(vertex);
        match self.kind {
            ObjectiveKind::Reachability => false,
            ObjectiveKind::Safety => target,
            ObjectiveKind::TimeBoundedReach => !target && time > self.bound(),
            ObjectiveKind::TimeBoundedSafety => target && time <= self.bound(),
        }
    }

    /// Whether Player 0 is the side trying to reach the target set.
    pub fn player0_reaches(&self) -> bool {
        matches!(
            self.kind,
            ObjectiveKind::Reachability | ObjectiveKind::TimeBoundedReach
        )
    }
}
