//! Recursive descent parser for the constraint mini-language.
//!
//! Grammar, loosest-binding first (`||` and `&&` left-associative):
//!
//! ```text
//! expr   := or
//! or     := and ('||' and)*
//! and    := prefix ('&&' prefix)*
//! prefix := '!' prefix | 'exists' ident (':'|'.') expr
//!         | '(' expr ')' | 'true' | 'false' | atom
//! atom   := term cmp term
//!         | term ('%' | 'mod') int '==' int
//! cmp    := '==' | '!=' | '<=' | '>=' | '<' | '>'
//! term   := factor (('+' | '-') factor)*
//! factor := ['-'] (int ['*' ident] | ident)
//! ```

use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use tempus_presburger::{Formula, FormulaError, Term};
use thiserror::Error;

/// Constraint parse failure. The ingest layer degrades these to a
/// trivially-true constraint plus a warning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("unexpected {found} at {span}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("invalid congruence at {span}: {source}")]
    BadCongruence {
        span: Span,
        #[source]
        source: FormulaError,
    },
}

pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Parse one constraint expression, requiring the whole input to be
/// consumed.
pub fn parse_constraint(source: &str) -> ConstraintResult<Formula> {
    let mut parser = ConstraintParser::new(source);
    let formula = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(formula)
}

struct ConstraintParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ConstraintParser {
    fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
        }
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos.min(self.tokens.len() - 1)].span
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected<T>(&self, expected: &str) -> ConstraintResult<T> {
        Err(ConstraintError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek_kind().to_string(),
            span: self.current_span(),
        })
    }

    fn expect_eof(&self) -> ConstraintResult<()> {
        if self.peek_kind() == &TokenKind::Eof {
            Ok(())
        } else {
            self.unexpected("end of constraint")
        }
    }

    fn expect_integer(&mut self) -> ConstraintResult<i64> {
        if let TokenKind::Integer(n) = self.peek_kind() {
            let n = *n;
            self.advance();
            Ok(n)
        } else {
            self.unexpected("integer literal")
        }
    }

    fn expect_ident(&mut self) -> ConstraintResult<String> {
        if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            self.unexpected("identifier")
        }
    }

    fn parse_expr(&mut self) -> ConstraintResult<Formula> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ConstraintResult<Formula> {
        let mut lhs = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.parse_and()?;
            lhs = match lhs {
                Formula::Or(mut children) => {
                    children.push(rhs);
                    Formula::Or(children)
                }
                other => Formula::Or(vec![other, rhs]),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ConstraintResult<Formula> {
        let mut lhs = self.parse_prefix()?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.parse_prefix()?;
            lhs = match lhs {
                Formula::And(mut children) => {
                    children.push(rhs);
                    Formula::And(children)
                }
                other => Formula::And(vec![other, rhs]),
            };
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ConstraintResult<Formula> {
        match self.peek_kind() {
            TokenKind::Bang => {
                self.advance();
                Ok(Formula::not(self.parse_prefix()?))
            }
            TokenKind::Exists => {
                self.advance();
                let var = self.expect_ident()?;
                if !self.eat(&TokenKind::Colon) && !self.eat(&TokenKind::Dot) {
                    return self.unexpected("':' or '.' after quantified variable");
                }
                Ok(Formula::exists(var, self.parse_expr()?))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if !self.eat(&TokenKind::RParen) {
                    return self.unexpected("')'");
                }
                Ok(inner)
            }
            TokenKind::True => {
                self.advance();
                Ok(Formula::True)
            }
            TokenKind::False => {
                self.advance();
                Ok(Formula::False)
            }
            _ => self.parse_atom(),
        }
    }

    /// A comparison or congruence anchored on a term.
    fn parse_atom(&mut self) -> ConstraintResult<Formula> {
        let lhs = self.parse_term()?;
        match self.peek_kind() {
            TokenKind::EqEq => {
                self.advance();
                Ok(Formula::Equal(lhs, self.parse_term()?))
            }
            TokenKind::NotEq => {
                self.advance();
                Ok(Formula::not(Formula::Equal(lhs, self.parse_term()?)))
            }
            TokenKind::Le => {
                self.advance();
                Ok(Formula::Le(lhs, self.parse_term()?))
            }
            TokenKind::Ge => {
                self.advance();
                Ok(Formula::Ge(lhs, self.parse_term()?))
            }
            TokenKind::Lt => {
                self.advance();
                Ok(Formula::Lt(lhs, self.parse_term()?))
            }
            TokenKind::Gt => {
                self.advance();
                Ok(Formula::Gt(lhs, self.parse_term()?))
            }
            TokenKind::Percent | TokenKind::Mod => {
                let span = self.current_span();
                self.advance();
                let modulus = self.expect_integer()?;
                if !self.eat(&TokenKind::EqEq) {
                    return self.unexpected("'==' after modulus");
                }
                let residue = self.expect_integer()?;
                Formula::modulo(lhs, modulus, residue).map_err(|source| {
                    ConstraintError::BadCongruence { span, source }
                })
            }
            _ => self.unexpected("comparison operator"),
        }
    }

    fn parse_term(&mut self) -> ConstraintResult<Term> {
        let mut term = self.parse_factor()?;
        loop {
            if self.eat(&TokenKind::Plus) {
                term = term.add(&self.parse_factor()?);
            } else if self.eat(&TokenKind::Minus) {
                term = term.add(&self.parse_factor()?.neg());
            } else {
                return Ok(term);
            }
        }
    }

    /// `['-'] (int ['*' ident] | ident)`
    fn parse_factor(&mut self) -> ConstraintResult<Term> {
        let negate = self.eat(&TokenKind::Minus);
        let factor = match self.peek_kind() {
            TokenKind::Integer(n) => {
                let n = *n;
                self.advance();
                if self.eat(&TokenKind::Star) {
                    Term::scaled_var(self.expect_ident()?, n)
                } else {
                    Term::constant(n)
                }
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Term::var(name)
            }
            _ => return self.unexpected("integer or identifier"),
        };
        Ok(if negate { factor.neg() } else { factor })
    }
}
