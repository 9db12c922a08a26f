//! Arena-indexed temporal game graphs.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use tempus_presburger::{Env, Evaluator, Formula};

/// Name of the distinguished clock variable in edge constraints.
pub const TIME_VAR: &str = "time";

/// Index of a vertex in the game arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an edge in the game arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The two players. Player 0 (the reacher) tries to force the play into the
/// target set; Player 1 (the safety player) tries to keep it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Zero,
    One,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    /// Construct from the textual owner label `0` or `1`.
    pub fn from_index(index: u8) -> Option<Player> {
        match index {
            0 => Some(Player::Zero),
            1 => Some(Player::One),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Zero => write!(f, "player 0"),
            Player::One => write!(f, "player 1"),
        }
    }
}

/// A game vertex: unique name, owner, and target flag.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub name: String,
    pub owner: Player,
    pub target: bool,
}

/// A directed edge guarded by a Presburger constraint over [`TIME_VAR`].
/// The label is diagnostic only.
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: VertexId,
    pub dest: VertexId,
    pub label: String,
    pub constraint: Formula,
}

/// A directed multigraph with owner-labelled vertices and time-guarded
/// edges.
///
/// Vertices and edges live in contiguous arenas addressed by small indices;
/// adjacency is an outgoing edge-id list per vertex. The clock is not part
/// of the model: every availability query takes the time as a parameter.
/// Built once by the ingest layer, then read-only during solving.
#[derive(Debug, Clone, Default)]
pub struct Game {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,
    by_name: HashMap<String, VertexId>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex. Names must be unique; the ingest layer enforces this
    /// before insertion.
    pub fn add_vertex(&mut self, name: impl Into<String>, owner: Player, target: bool) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        let name = name.into();
        self.by_name.insert(name.clone(), id);
        self.vertices.push(Vertex {
            name,
            owner,
            target,
        });
        self.outgoing.push(Vec::new());
        id
    }

    /// Add an edge guarded by `constraint` (use [`Formula::True`] for an
    /// unconditional edge).
    pub fn add_edge(
        &mut self,
        source: VertexId,
        dest: VertexId,
        label: impl Into<String>,
        constraint: Formula,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            source,
            dest,
            label: label.into(),
            constraint,
        });
        self.outgoing[source.index()].push(id);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len() as u32).map(VertexId)
    }

    /// Vertices with their ids, in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }

    /// Edges with their ids, in arena order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    /// Look a vertex up by name.
    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: VertexId) -> &str {
        &self.vertices[id.index()].name
    }

    pub fn owner(&self, id: VertexId) -> Player {
        self.vertices[id.index()].owner
    }

    pub fn is_target(&self, id: VertexId) -> bool {
        self.vertices[id.index()].target
    }

    /// Outgoing edge ids of `id`, in insertion order.
    pub fn outgoing(&self, id: VertexId) -> &[EdgeId] {
        &self.outgoing[id.index()]
    }

    /// Vertices flagged as targets, in arena order.
    pub fn target_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices()
            .filter(|(_, v)| v.target)
            .map(|(id, _)| id)
    }

    /// Destinations of the out-edges of `vertex` whose constraint holds in
    /// the environment `{time ↦ time}`, in edge insertion order.
    pub fn available_successors(
        &self,
        evaluator: &Evaluator,
        vertex: VertexId,
        time: i64,
    ) -> SmallVec<[VertexId; 8]> {
        let env = Env::singleton(TIME_VAR, time);
        self.outgoing[vertex.index()]
            .iter()
            .map(|&e| &self.edges[e.index()])
            .filter(|edge| evaluator.eval(&edge.constraint, &env))
            .map(|edge| edge.dest)
            .collect()
    }
}
