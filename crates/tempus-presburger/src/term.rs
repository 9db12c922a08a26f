//! Linear integer terms over named variables.

use crate::eval::Env;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A linear expression `c + a₁·x₁ + … + aₙ·xₙ` over named integer variables.
///
/// Variables with coefficient zero are never stored, so structural equality
/// coincides with equality of the normal form. Iteration order over the
/// variables is the lexicographic name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Term {
    coeffs: BTreeMap<String, i64>,
    constant: i64,
}

impl Term {
    /// The constant term `value`.
    pub fn constant(value: i64) -> Self {
        Self {
            coeffs: BTreeMap::new(),
            constant: value,
        }
    }

    /// The term `1·name`.
    pub fn var(name: impl Into<String>) -> Self {
        Self::scaled_var(name, 1)
    }

    /// The term `coefficient·name`. A zero coefficient yields the zero term.
    pub fn scaled_var(name: impl Into<String>, coefficient: i64) -> Self {
        let mut coeffs = BTreeMap::new();
        if coefficient != 0 {
            coeffs.insert(name.into(), coefficient);
        }
        Self {
            coeffs,
            constant: 0,
        }
    }

    /// The constant part of the term.
    pub fn constant_part(&self) -> i64 {
        self.constant
    }

    /// Coefficient of `name`, zero if absent.
    pub fn coefficient(&self, name: &str) -> i64 {
        self.coeffs.get(name).copied().unwrap_or(0)
    }

    /// Variables with a nonzero coefficient, in name order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.coeffs.keys().map(String::as_str)
    }

    /// Whether `name` occurs with a nonzero coefficient.
    pub fn mentions(&self, name: &str) -> bool {
        self.coeffs.contains_key(name)
    }

    /// Pointwise sum. Variables whose coefficients cancel are dropped.
    pub fn add(&self, other: &Term) -> Term {
        let mut coeffs = self.coeffs.clone();
        for (name, &coeff) in &other.coeffs {
            let merged = coeffs.entry(name.clone()).or_insert(0);
            *merged += coeff;
            if *merged == 0 {
                coeffs.remove(name);
            }
        }
        Term {
            coeffs,
            constant: self.constant + other.constant,
        }
    }

    /// Scalar multiple. Scaling by zero yields the zero term.
    pub fn scale(&self, k: i64) -> Term {
        if k == 0 {
            return Term::default();
        }
        Term {
            coeffs: self
                .coeffs
                .iter()
                .map(|(name, coeff)| (name.clone(), coeff * k))
                .collect(),
            constant: self.constant * k,
        }
    }

    /// Additive inverse.
    pub fn neg(&self) -> Term {
        self.scale(-1)
    }

    /// Value of the term under `env`. Variables absent from the environment
    /// read as zero.
    pub fn eval(&self, env: &Env) -> i64 {
        self.coeffs
            .iter()
            .fold(self.constant, |acc, (name, coeff)| {
                acc + coeff * env.get(name)
            })
    }
}

impl Add for Term {
    type Output = Term;

    fn add(self, other: Term) -> Term {
        Term::add(&self, &other)
    }
}

impl Sub for Term {
    type Output = Term;

    fn sub(self, other: Term) -> Term {
        Term::add(&self, &other.neg())
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::neg(&self)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, &coeff) in &self.coeffs {
            if first {
                if coeff == 1 {
                    write!(f, "{name}")?;
                } else if coeff == -1 {
                    write!(f, "-{name}")?;
                } else {
                    write!(f, "{coeff}*{name}")?;
                }
                first = false;
            } else if coeff < 0 {
                if coeff == -1 {
                    write!(f, " - {name}")?;
                } else {
                    write!(f, " - {}*{name}", -coeff)?;
                }
            } else if coeff == 1 {
                write!(f, " + {name}")?;
            } else {
                write!(f, " + {coeff}*{name}")?;
            }
        }
        if first {
            write!(f, "{}", self.constant)
        } else if self.constant > 0 {
            write!(f, " + {}", self.constant)
        } else if self.constant < 0 {
            write!(f, " - {}", -self.constant)
        } else {
            Ok(())
        }
    }
}
