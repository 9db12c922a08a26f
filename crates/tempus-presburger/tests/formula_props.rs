//! Property tests for term arithmetic and modular congruence evaluation.

use proptest::prelude::*;
use std::collections::BTreeMap;
use tempus_presburger::{eval, Env, Formula, Term};

const VAR_NAMES: &[&str] = &["time", "x", "y", "k"];

fn arb_term() -> impl Strategy<Value = Term> {
    (
        proptest::collection::btree_map(0usize..VAR_NAMES.len(), -20i64..=20, 0..=3),
        -50i64..=50,
    )
        .prop_map(|(coeffs, constant)| {
            let mut term = Term::constant(constant);
            for (var, coeff) in coeffs {
                term = term.add(&Term::scaled_var(VAR_NAMES[var], coeff));
            }
            term
        })
}

fn arb_env() -> impl Strategy<Value = Env> {
    proptest::collection::btree_map(0usize..VAR_NAMES.len(), -30i64..=30, 0..=VAR_NAMES.len())
        .prop_map(|bindings: BTreeMap<usize, i64>| {
            let mut env = Env::new();
            for (var, value) in bindings {
                env.bind(VAR_NAMES[var], value);
            }
            env
        })
}

proptest! {
    #[test]
    fn neg_negates_evaluation(term in arb_term(), env in arb_env()) {
        prop_assert_eq!(term.neg().eval(&env), -term.eval(&env));
    }

    #[test]
    fn add_is_pointwise(a in arb_term(), b in arb_term(), env in arb_env()) {
        prop_assert_eq!(a.add(&b).eval(&env), a.eval(&env) + b.eval(&env));
    }

    #[test]
    fn scale_multiplies_evaluation(term in arb_term(), k in -10i64..=10, env in arb_env()) {
        prop_assert_eq!(term.scale(k).eval(&env), k * term.eval(&env));
    }

    #[test]
    fn add_then_sub_round_trips(a in arb_term(), b in arb_term()) {
        prop_assert_eq!(a.add(&b).add(&b.neg()), a.clone());
    }

    #[test]
    fn mod_matches_normalised_remainder(
        term in arb_term(),
        modulus in 1i64..=12,
        residue in 0i64..=11,
        env in arb_env(),
    ) {
        let formula = Formula::modulo(term.clone(), modulus, residue).unwrap();
        let expected = ((term.eval(&env) % modulus) + modulus) % modulus == residue;
        prop_assert_eq!(eval(&formula, &env), expected);
    }

    #[test]
    fn double_negation_is_identity(term in arb_term(), bound in 0i64..=30, env in arb_env()) {
        let inner = Formula::Le(term, Term::constant(bound));
        let doubled = Formula::not(Formula::not(inner.clone()));
        prop_assert_eq!(eval(&doubled, &env), eval(&inner, &env));
    }
}
