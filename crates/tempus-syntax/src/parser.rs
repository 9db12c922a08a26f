//! Line-oriented parser for the DOT-flavoured game description format.
//!
//! ```text
//! // time_bound: 4
//! // objective: reachability
//! digraph G {
//!     v0 [name="v0", player=0];
//!     v1 [name="v1", player=1, target=1];
//!     v0 -> v1 [label="step", constraint="time % 2 == 1"];
//!     v1 -> v1;
//! }
//! ```
//!
//! `digraph`, `{`, `}`, and blank lines are ignored. Comments start with
//! `//`; the `time_bound` and `objective` directives are recognised inside
//! comments. Edge lines address vertices by their declaration id; the
//! `name` attribute (defaulting to the id) is the display name. An
//! unparseable constraint string degrades to trivially-true and records a
//! [`Warning`] instead of failing the whole ingest.

use crate::constraint::parse_constraint;
use std::collections::HashMap;
use std::fmt;
use tempus_game::{Game, Objective, ObjectiveKind, Player, VertexId};
use tempus_presburger::Formula;
use thiserror::Error;
use tracing::warn;

/// Non-fatal ingest diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Malformed description input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed vertex declaration: {text}")]
    MalformedVertex { line: u32, text: String },

    #[error("line {line}: malformed edge declaration: {text}")]
    MalformedEdge { line: u32, text: String },

    #[error("line {line}: malformed attribute list: {text}")]
    MalformedAttributes { line: u32, text: String },

    #[error("line {line}: duplicate vertex id '{id}'")]
    DuplicateVertex { line: u32, id: String },

    #[error("line {line}: duplicate vertex name '{name}'")]
    DuplicateName { line: u32, name: String },

    #[error("line {line}: unknown vertex id '{id}'")]
    UnknownVertex { line: u32, id: String },

    #[error("line {line}: unknown attribute '{name}'")]
    UnknownAttribute { line: u32, name: String },

    #[error("line {line}: invalid value '{value}' for attribute '{name}'")]
    InvalidAttribute {
        line: u32,
        name: String,
        value: String,
    },

    #[error("line {line}: vertex '{id}' is missing the 'player' attribute")]
    MissingPlayer { line: u32, id: String },

    #[error("line {line}: invalid directive value: {text}")]
    InvalidDirective { line: u32, text: String },
}

impl ParseError {
    /// Line the error occurred on (1-indexed).
    pub fn line(&self) -> u32 {
        match self {
            ParseError::MalformedVertex { line, .. }
            | ParseError::MalformedEdge { line, .. }
            | ParseError::MalformedAttributes { line, .. }
            | ParseError::DuplicateVertex { line, .. }
            | ParseError::DuplicateName { line, .. }
            | ParseError::UnknownVertex { line, .. }
            | ParseError::UnknownAttribute { line, .. }
            | ParseError::InvalidAttribute { line, .. }
            | ParseError::MissingPlayer { line, .. }
            | ParseError::InvalidDirective { line, .. } => *line,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed game description: the game, its objective, the default time
/// bound (if the file declared one), and any non-fatal warnings.
#[derive(Debug)]
pub struct Description {
    pub game: Game,
    pub objective: Objective,
    pub time_bound: Option<u32>,
    pub warnings: Vec<Warning>,
}

/// Parse a complete description.
pub fn parse_description(source: &str) -> ParseResult<Description> {
    DescriptionParser::default().parse(source)
}

#[derive(Default)]
struct DescriptionParser {
    game: Game,
    /// Declaration id -> arena index; edge lines resolve through this.
    ids: HashMap<String, VertexId>,
    warnings: Vec<Warning>,
    time_bound: Option<u32>,
    kind: Option<ObjectiveKind>,
}

impl DescriptionParser {
    fn parse(mut self, source: &str) -> ParseResult<Description> {
        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx as u32 + 1;
            let line = raw.trim();
            if line.is_empty() || line == "{" || line == "}" || line.starts_with("digraph") {
                continue;
            }
            if let Some(comment) = line.strip_prefix("//") {
                self.parse_directive(comment.trim(), line_no)?;
                continue;
            }
            if line.contains("->") {
                self.parse_edge_line(line, line_no)?;
            } else {
                self.parse_vertex_line(line, line_no)?;
            }
        }

        for warning in &self.warnings {
            warn!("{warning}");
        }

        let targets: Vec<_> = self.game.target_ids().collect();
        let objective = Objective::new(
            self.kind.unwrap_or(ObjectiveKind::Reachability),
            targets,
            self.time_bound,
        );
        Ok(Description {
            game: self.game,
            objective,
            time_bound: self.time_bound,
            warnings: self.warnings,
        })
    }

    /// Recognise `time_bound: N` and `objective: KIND` inside a comment.
    /// Any other comment text is ignored.
    fn parse_directive(&mut self, comment: &str, line: u32) -> ParseResult<()> {
        if let Some(value) = comment.strip_prefix("time_bound:") {
            let bound: u32 = value.trim().parse().map_err(|_| {
                ParseError::InvalidDirective {
                    line,
                    text: comment.to_string(),
                }
            })?;
            if bound == 0 {
                return Err(ParseError::InvalidDirective {
                    line,
                    text: comment.to_string(),
                });
            }
            self.time_bound = Some(bound);
        } else if let Some(value) = comment.strip_prefix("objective:") {
            self.kind = Some(match value.trim() {
                "reachability" => ObjectiveKind::Reachability,
                "safety" => ObjectiveKind::Safety,
                "time_bounded_reach" => ObjectiveKind::TimeBoundedReach,
                "time_bounded_safety" => ObjectiveKind::TimeBoundedSafety,
                _ => {
                    return Err(ParseError::InvalidDirective {
                        line,
                        text: comment.to_string(),
                    })
                }
            });
        }
        Ok(())
    }

    fn parse_vertex_line(&mut self, line: &str, line_no: u32) -> ParseResult<()> {
        let body = line.trim_end_matches(';').trim();
        let (id, attrs) = split_attr_block(body, line_no, || ParseError::MalformedVertex {
            line: line_no,
            text: line.to_string(),
        })?;
        if id.is_empty() || id.contains(char::is_whitespace) {
            return Err(ParseError::MalformedVertex {
                line: line_no,
                text: line.to_string(),
            });
        }
        if self.ids.contains_key(id) {
            return Err(ParseError::DuplicateVertex {
                line: line_no,
                id: id.to_string(),
            });
        }

        let mut name = id.to_string();
        let mut player = None;
        let mut target = false;
        for (key, value) in attrs {
            match key.as_str() {
                "name" => name = value,
                "player" => {
                    player = Some(
                        Player::from_index(value.parse().unwrap_or(u8::MAX)).ok_or_else(
                            || ParseError::InvalidAttribute {
                                line: line_no,
                                name: key.clone(),
                                value: value.clone(),
                            },
                        )?,
                    )
                }
                "target" => {
                    target = match value.as_str() {
                        "0" => false,
                        "1" => true,
                        _ => {
                            return Err(ParseError::InvalidAttribute {
                                line: line_no,
                                name: key.clone(),
                                value: value.clone(),
                            })
                        }
                    }
                }
                _ => {
                    return Err(ParseError::UnknownAttribute {
                        line: line_no,
                        name: key.clone(),
                    })
                }
            }
        }

        let player = player.ok_or_else(|| ParseError::MissingPlayer {
            line: line_no,
            id: id.to_string(),
        })?;
        if self.game.vertex_by_name(&name).is_some() {
            return Err(ParseError::DuplicateName { line: line_no, name });
        }
        let vertex = self.game.add_vertex(name, player, target);
        self.ids.insert(id.to_string(), vertex);
        Ok(())
    }

    fn parse_edge_line(&mut self, line: &str, line_no: u32) -> ParseResult<()> {
        let body = line.trim_end_matches(';').trim();
        let (endpoints, attrs) = split_attr_block(body, line_no, || ParseError::MalformedEdge {
            line: line_no,
            text: line.to_string(),
        })?;

        let Some((src, dst)) = endpoints.split_once("->") else {
            return Err(ParseError::MalformedEdge {
                line: line_no,
                text: line.to_string(),
            });
        };
        let source = self.resolve(src.trim(), line_no)?;
        let dest = self.resolve(dst.trim(), line_no)?;

        let mut label = String::new();
        let mut constraint = Formula::True;
        for (key, value) in attrs {
            match key.as_str() {
                "label" => label = value,
                "constraint" => {
                    constraint = match parse_constraint(&value) {
                        Ok(formula) => formula,
                        Err(err) => {
                            self.warnings.push(Warning {
                                line: line_no,
                                message: format!(
                                    "unrecognised constraint \"{value}\" treated as true: {err}"
                                ),
                            });
                            Formula::True
                        }
                    }
                }
                _ => {
                    return Err(ParseError::UnknownAttribute {
                        line: line_no,
                        name: key.clone(),
                    })
                }
            }
        }

        self.game.add_edge(source, dest, label, constraint);
        Ok(())
    }

    fn resolve(&self, id: &str, line: u32) -> ParseResult<VertexId> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| ParseError::UnknownVertex {
                line,
                id: id.to_string(),
            })
    }
}

/// Split `head [k=v, ...]` into the head text and its attribute pairs. The
/// bracket block is optional.
fn split_attr_block<'a>(
    body: &'a str,
    line_no: u32,
    malformed: impl Fn() -> ParseError,
) -> ParseResult<(&'a str, Vec<(String, String)>)> {
    let Some(open) = body.find('[') else {
        return Ok((body.trim(), Vec::new()));
    };
    let Some(close) = body.rfind(']') else {
        return Err(malformed());
    };
    if close < open {
        return Err(malformed());
    }
    let head = body[..open].trim();
    let attrs = parse_attrs(&body[open + 1..close], line_no)?;
    Ok((head, attrs))
}

/// Parse a comma-separated `key=value` list, honouring quotes so labels and
/// constraints may contain commas.
fn parse_attrs(text: &str, line_no: u32) -> ParseResult<Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                field.push(c);
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    let mut attrs = Vec::new();
    for field in fields {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let Some((key, value)) = field.split_once('=') else {
            return Err(ParseError::MalformedAttributes {
                line: line_no,
                text: field.to_string(),
            });
        };
        let key = key.trim().to_string();
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value)
            .to_string();
        attrs.push((key, value));
    }
    Ok(attrs)
}
