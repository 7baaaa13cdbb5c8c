//! Property-based tests for the engine primitives.

use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;
use tarski_cad::conf::mr;
use tarski_cad::sign::{Sign, SignSet};
use tarski_math::polynomial::{Polynomial, Var};

fn poly_from(var: Var, coeffs: &[i64]) -> Polynomial {
    let coeffs: Vec<BigRational> = coeffs
        .iter()
        .map(|&c| BigRational::from_integer(BigInt::from(c)))
        .collect();
    Polynomial::univariate(var, &coeffs)
}

fn small_upoly(var: Var) -> impl Strategy<Value = Polynomial> {
    prop::collection::vec(-9i64..=9, 2..=5).prop_map(move |cs| poly_from(var, &cs))
}

fn any_sign() -> impl Strategy<Value = Sign> {
    prop::sample::select(vec![Sign::Neg, Sign::Zero, Sign::Pos])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mr_identity_holds(a in small_upoly(0), b in small_upoly(0)) {
        prop_assume!(a.degree(0) >= 1 && b.degree(0) >= 1);
        let (p, q) = if a.degree(0) >= b.degree(0) { (a, b) } else { (b, a) };
        let (lead, k, r) = mr(&p, &q, 0);

        prop_assert_eq!(k, p.degree(0) - q.degree(0) + 1);
        prop_assert!(r.is_zero() || r.degree(0) < q.degree(0));
        // lead^k * p - r is an exact multiple of q
        let multiple = lead.pow(k).mul(&p).sub(&r);
        prop_assert!(multiple.pseudo_remainder(&q, 0).is_zero());
    }

    #[test]
    fn sign_multiplication_mirrors_rationals(x in -9i64..=9, y in -9i64..=9) {
        let rx = BigRational::from_integer(BigInt::from(x));
        let ry = BigRational::from_integer(BigInt::from(y));
        let expected = Sign::of_rational(&(rx.clone() * ry.clone()));
        prop_assert_eq!(Sign::of_rational(&rx).multiply(Sign::of_rational(&ry)), expected);
    }

    #[test]
    fn sign_pow_mirrors_rationals(x in -9i64..=9, k in 0u32..=5) {
        let rx = BigRational::from_integer(BigInt::from(x));
        let expected = Sign::of_rational(&rx.pow(k as i32));
        prop_assert_eq!(Sign::of_rational(&rx).pow(k), expected);
    }

    #[test]
    fn sign_set_intersection_is_conjunction(a in any_sign(), b in any_sign(), probe in any_sign()) {
        let sa = SignSet::only(a).union(SignSet::only(b));
        let sb = SignSet::only(b).union(SignSet::only(probe));
        let both = sa.intersect(sb);
        prop_assert_eq!(both.contains(probe), sa.contains(probe) && sb.contains(probe));
    }
}
