//! Property-based tests for the polynomial, Gröbner, and algebraic layers.

use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;
use tarski_math::algebraic::real_roots;
use tarski_math::grobner::{grobner_basis, reduce};
use tarski_math::polynomial::{Polynomial, Var};

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn poly_from(var: Var, coeffs: &[i64]) -> Polynomial {
    let coeffs: Vec<BigRational> = coeffs.iter().map(|&c| rat(c)).collect();
    Polynomial::univariate(var, &coeffs)
}

fn small_upoly(var: Var) -> impl Strategy<Value = Polynomial> {
    prop::collection::vec(-9i64..=9, 1..=5).prop_map(move |cs| poly_from(var, &cs))
}

fn small_bivariate() -> impl Strategy<Value = Polynomial> {
    prop::collection::vec((0u32..=1, 0u32..=1, -4i64..=4), 1..=4).prop_map(
        |terms| {
            let entries: Vec<(i64, Vec<(Var, u32)>)> = terms
                .into_iter()
                .map(|(dx, dy, c)| (c, vec![(0, dx), (1, dy)]))
                .collect();
            let borrowed: Vec<(i64, &[(Var, u32)])> =
                entries.iter().map(|(c, ps)| (*c, ps.as_slice())).collect();
            Polynomial::from_coeffs_int(&borrowed)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_commutes(p in small_upoly(0), q in small_upoly(0)) {
        prop_assert_eq!(p.add(&q), q.add(&p));
    }

    #[test]
    fn mul_distributes_over_add(
        p in small_upoly(0),
        q in small_upoly(0),
        r in small_upoly(0),
    ) {
        prop_assert_eq!(p.mul(&q.add(&r)), p.mul(&q).add(&p.mul(&r)));
    }

    #[test]
    fn derivative_product_rule(p in small_upoly(0), q in small_upoly(0)) {
        let lhs = p.mul(&q).derivative(0);
        let rhs = p.derivative(0).mul(&q).add(&p.mul(&q.derivative(0)));
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn remainder_leaves_divisible_difference(p in small_upoly(0), q in small_upoly(0)) {
        prop_assume!(q.degree(0) >= 1);
        let r = p.rem_univariate(&q, 0);
        prop_assert!(r.is_zero() || r.degree(0) < q.degree(0));
        let diff = p.sub(&r);
        prop_assert!(diff.div_exact_univariate(&q, 0).is_some());
    }

    #[test]
    fn eval_commutes_with_arithmetic(
        p in small_upoly(0),
        q in small_upoly(0),
        x in -5i64..=5,
    ) {
        let at = rat(x);
        let sum = p.add(&q).eval_at(0, &at).constant_value();
        let parts = p.eval_at(0, &at).constant_value() + q.eval_at(0, &at).constant_value();
        prop_assert_eq!(sum, parts);
    }

    #[test]
    fn ideal_members_reduce_to_zero(f in small_bivariate(), g in small_bivariate()) {
        prop_assume!(!f.is_zero() && !g.is_zero());
        prop_assume!(f.total_degree() <= 2 && g.total_degree() <= 2);
        let gb = grobner_basis(&[f.clone(), g.clone()]);
        // f * (g + 1) lies in the ideal generated by f and g... in fact in (f)
        let member = f.mul(&g.add(&Polynomial::one()));
        prop_assert!(reduce(&member, &gb).is_zero());
    }

    #[test]
    fn reduce_is_idempotent(f in small_bivariate(), g in small_bivariate(), p in small_bivariate()) {
        prop_assume!(!f.is_zero() && !g.is_zero());
        prop_assume!(f.total_degree() <= 2 && g.total_degree() <= 2);
        let gb = grobner_basis(&[f, g]);
        let once = reduce(&p, &gb);
        prop_assert_eq!(reduce(&once, &gb), once.clone());
    }

    #[test]
    fn roots_of_split_polynomials_are_recovered(
        roots in prop::collection::btree_set(-6i64..=6, 1..=4),
    ) {
        let mut f = Polynomial::one();
        for &r in &roots {
            f = f.mul(&poly_from(0, &[-r, 1]));
        }
        let found = real_roots(&f, 0);
        prop_assert_eq!(found.len(), roots.len());
        for (alg, expected) in found.iter().zip(roots.iter()) {
            prop_assert_eq!(alg.cmp_rational(&rat(*expected)), std::cmp::Ordering::Equal);
        }
    }

    #[test]
    fn sturm_count_matches_enumeration(p in small_upoly(0)) {
        prop_assume!(p.degree(0) >= 1);
        let roots = real_roots(&p, 0);
        let sf = p.square_free(0);
        let bound = sf.cauchy_bound(0) + rat(1);
        prop_assert_eq!(roots.len(), sf.count_real_roots_in(0, &(-bound.clone()), &bound));
    }
}
