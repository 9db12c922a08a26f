//! Presburger arithmetic for temporal games.
//!
//! Linear integer terms over named variables, a formula AST with comparisons,
//! modular congruences, boolean connectives and bounded existentials, and a
//! recursive evaluator. Quantifier elimination is deliberately out of scope:
//! `exists` is decided by enumerating integer witnesses up to a fixed bound
//! (see [`DEFAULT_EXISTS_BOUND`]).

pub mod eval;
pub mod formula;
pub mod term;

pub use eval::{eval, Env, Evaluator, DEFAULT_EXISTS_BOUND};
pub use formula::{Formula, FormulaError};
pub use term::Term;
