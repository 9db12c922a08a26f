//! Recursive evaluator for Presburger formulas.

use crate::formula::Formula;
use std::collections::BTreeMap;

/// Default inclusive upper bound for existential witness enumeration.
///
/// Full Presburger arithmetic (quantifier elimination) is outside this
/// crate's remit; `exists x: φ` is decided by testing integer witnesses
/// `x ∈ 0..=bound`. Formulas whose smallest witness exceeds the bound
/// evaluate to false.
pub const DEFAULT_EXISTS_BOUND: i64 = 10;

/// A finite map from variable names to integer values.
///
/// Variables absent from the environment read as zero, so evaluation is
/// total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    bindings: BTreeMap<String, i64>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment with the single binding `name ↦ value`.
    pub fn singleton(name: impl Into<String>, value: i64) -> Self {
        let mut env = Self::new();
        env.bind(&name.into(), value);
        env
    }

    /// Value bound to `name`, zero if unbound.
    pub fn get(&self, name: &str) -> i64 {
        self.bindings.get(name).copied().unwrap_or(0)
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn bind(&mut self, name: &str, value: i64) {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
        } else {
            self.bindings.insert(name.to_string(), value);
        }
    }
}

/// Formula evaluator with a configurable existential enumeration bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    /// Inclusive upper bound for `exists` witness enumeration.
    pub exists_bound: i64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            exists_bound: DEFAULT_EXISTS_BOUND,
        }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator enumerating existential witnesses in `0..=bound`.
    pub fn with_bound(bound: i64) -> Self {
        Self {
            exists_bound: bound,
        }
    }

    /// Evaluate `formula` under `env`. Total: every formula and environment
    /// produce a boolean.
    pub fn eval(&self, formula: &Formula, env: &Env) -> bool {
        match formula {
            Formula::True => true,
            Formula::False => false,
            Formula::Equal(l, r) => l.eval(env) == r.eval(env),
            Formula::Le(l, r) => l.eval(env) <= r.eval(env),
            Formula::Lt(l, r) => l.eval(env) < r.eval(env),
            Formula::Ge(l, r) => l.eval(env) >= r.eval(env),
            Formula::Gt(l, r) => l.eval(env) > r.eval(env),
            Formula::Mod {
                term,
                modulus,
                residue,
            } => {
                // Euclidean remainder, normalised into [0, modulus); the
                // modulus is positive by construction.
                term.eval(env).rem_euclid(*modulus) == *residue
            }
            Formula::And(children) => children.iter().all(|child| self.eval(child, env)),
            Formula::Or(children) => children.iter().any(|child| self.eval(child, env)),
            Formula::Not(inner) => !self.eval(inner, env),
            Formula::Exists { var, body } => {
                let mut scoped = env.clone();
                (0..=self.exists_bound).any(|witness| {
                    scoped.bind(var, witness);
                    self.eval(body, &scoped)
                })
            }
        }
    }
}

/// Evaluate with the default existential bound.
pub fn eval(formula: &Formula, env: &Env) -> bool {
    Evaluator::default().eval(formula, env)
}
