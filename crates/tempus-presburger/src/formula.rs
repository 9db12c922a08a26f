//! Formula AST for Presburger arithmetic constraints.

use crate::term::Term;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Error raised by the checked formula constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("modulus must be positive, got {0}")]
    NonPositiveModulus(i64),
}

/// A Presburger arithmetic formula.
///
/// Tree-shaped with owned subtrees; evaluation is a single structural
/// recursion in [`crate::eval`]. The trivially-true and trivially-false
/// formulas are the distinguished constants [`Formula::True`] and
/// [`Formula::False`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// Trivially true.
    True,
    /// Trivially false.
    False,
    /// `left == right`
    Equal(Term, Term),
    /// `left <= right`
    Le(Term, Term),
    /// `left < right`
    Lt(Term, Term),
    /// `left >= right`
    Ge(Term, Term),
    /// `left > right`
    Gt(Term, Term),
    /// `term ≡ residue (mod modulus)`, with `modulus > 0`. The remainder is
    /// normalised into `[0, modulus)` before comparison, so a residue outside
    /// that range is representable but unsatisfiable.
    Mod {
        term: Term,
        modulus: i64,
        residue: i64,
    },
    /// Finite conjunction; empty is true.
    And(Vec<Formula>),
    /// Finite disjunction; empty is false.
    Or(Vec<Formula>),
    /// Negation.
    Not(Box<Formula>),
    /// Bounded existential: some integer witness for `var` in
    /// `0..=exists_bound` makes `body` true.
    Exists { var: String, body: Box<Formula> },
}

impl Formula {
    /// `term ≡ residue (mod modulus)`. Rejects a non-positive modulus.
    pub fn modulo(term: Term, modulus: i64, residue: i64) -> Result<Self, FormulaError> {
        if modulus <= 0 {
            return Err(FormulaError::NonPositiveModulus(modulus));
        }
        Ok(Formula::Mod {
            term,
            modulus,
            residue,
        })
    }

    /// Negation.
    pub fn not(formula: Formula) -> Self {
        Formula::Not(Box::new(formula))
    }

    /// Bounded existential quantification of `var` over `body`.
    pub fn exists(var: impl Into<String>, body: Formula) -> Self {
        Formula::Exists {
            var: var.into(),
            body: Box::new(body),
        }
    }

    /// Whether this is the distinguished trivially-true constant.
    pub fn is_trivially_true(&self) -> bool {
        matches!(self, Formula::True)
    }

    /// Free variables of the formula. Existentially bound names are shadowed
    /// within their scope.
    pub fn support(&self) -> BTreeSet<String> {
        let mut free = BTreeSet::new();
        let mut bound = Vec::new();
        self.collect_free(&mut bound, &mut free);
        free
    }

    /// Whether `name` occurs free.
    pub fn mentions(&self, name: &str) -> bool {
        self.support().contains(name)
    }

    fn collect_free(&self, bound: &mut Vec<String>, free: &mut BTreeSet<String>) {
        let add_term = |term: &Term, bound: &[String], free: &mut BTreeSet<String>| {
            for var in term.variables() {
                if !bound.iter().any(|b| b == var) {
                    free.insert(var.to_string());
                }
            }
        };
        match self {
            Formula::True | Formula::False => {}
            Formula::Equal(l, r)
            | Formula::Le(l, r)
            | Formula::Lt(l, r)
            | Formula::Ge(l, r)
            | Formula::Gt(l, r) => {
                add_term(l, bound, free);
                add_term(r, bound, free);
            }
            Formula::Mod { term, .. } => add_term(term, bound, free),
            Formula::And(children) | Formula::Or(children) => {
                for child in children {
                    child.collect_free(bound, free);
                }
            }
            Formula::Not(inner) => inner.collect_free(bound, free),
            Formula::Exists { var, body } => {
                bound.push(var.clone());
                body.collect_free(bound, free);
                bound.pop();
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => write!(f, "true"),
            Formula::False => write!(f, "false"),
            Formula::Equal(l, r) => write!(f, "{l} == {r}"),
            Formula::Le(l, r) => write!(f, "{l} <= {r}"),
            Formula::Lt(l, r) => write!(f, "{l} < {r}"),
            Formula::Ge(l, r) => write!(f, "{l} >= {r}"),
            Formula::Gt(l, r) => write!(f, "{l} > {r}"),
            Formula::Mod {
                term,
                modulus,
                residue,
            } => write!(f, "{term} % {modulus} == {residue}"),
            Formula::And(children) => {
                if children.is_empty() {
                    return write!(f, "true");
                }
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " && ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Formula::Or(children) => {
                if children.is_empty() {
                    return write!(f, "false");
                }
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " || ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Formula::Not(inner) => write!(f, "!({inner})"),
            Formula::Exists { var, body } => write!(f, "exists {var}: {body}"),
        }
    }
}
