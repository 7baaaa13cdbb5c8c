//! Gröbner basis computation over the graded reverse lexicographic order.
//!
//! Buchberger's algorithm with the product (coprimality) criterion, full
//! normal-form reduction, and an auto-reduced monic output basis. The basis
//! is used to canonicalize polynomials modulo an ideal of polynomials known
//! to vanish.

use crate::polynomial::{Monomial, MonomialOrder, Polynomial, Term};
use num_rational::BigRational;
use num_traits::One;

const ORDER: MonomialOrder = MonomialOrder::GRevLex;

/// Leading term of a non-zero polynomial under grevlex.
fn leading(p: &Polynomial) -> &Term {
    p.leading_term_under(ORDER)
        .expect("leading term of zero polynomial")
}

/// S-polynomial of two non-zero polynomials under grevlex.
pub fn s_polynomial(f: &Polynomial, g: &Polynomial) -> Polynomial {
    let lf = leading(f);
    let lg = leading(g);
    let lcm = lcm_monomial(&lf.monomial, &lg.monomial);

    let mf = lcm
        .div(&lf.monomial)
        .expect("lcm divisible by leading monomial");
    let mg = lcm
        .div(&lg.monomial)
        .expect("lcm divisible by leading monomial");

    let a = f
        .mul_monomial(&mf)
        .scale(&(BigRational::one() / lf.coeff.clone()));
    let b = g
        .mul_monomial(&mg)
        .scale(&(BigRational::one() / lg.coeff.clone()));
    a.sub(&b)
}

/// Full normal form of `p` modulo `basis`: repeatedly cancels any term of the
/// intermediate result that is divisible by a leading term of the basis.
pub fn reduce(p: &Polynomial, basis: &[Polynomial]) -> Polynomial {
    let mut r = p.clone();
    'outer: loop {
        if r.is_zero() {
            return r;
        }
        for b in basis {
            if b.is_zero() {
                continue;
            }
            let lb = leading(b);
            let step = r.terms().iter().find_map(|term| {
                term.monomial
                    .div(&lb.monomial)
                    .map(|q| (q, &term.coeff / &lb.coeff))
            });
            if let Some((q, factor)) = step {
                r = r.sub(&b.mul_monomial(&q).scale(&factor));
                continue 'outer;
            }
        }
        return r;
    }
}

/// Compute a Gröbner basis of the ideal generated by `polys` under grevlex.
///
/// The returned basis is auto-reduced and monic; an inconsistent ideal (1 in
/// the ideal) yields the single polynomial `1`.
pub fn grobner_basis(polys: &[Polynomial]) -> Vec<Polynomial> {
    let mut basis: Vec<Polynomial> = polys
        .iter()
        .filter(|p| !p.is_zero())
        .map(monic_under_order)
        .collect();
    if basis.is_empty() {
        return basis;
    }

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for i in 0..basis.len() {
        for j in (i + 1)..basis.len() {
            pairs.push((i, j));
        }
    }

    while let Some((i, j)) = pairs.pop() {
        let fi = &basis[i];
        let fj = &basis[j];
        // Product criterion: coprime leading monomials reduce to zero.
        let li = &leading(fi).monomial;
        let lj = &leading(fj).monomial;
        if lcm_monomial(li, lj).total_degree() == li.total_degree() + lj.total_degree() {
            continue;
        }
        let s = s_polynomial(fi, fj);
        let r = reduce(&s, &basis);
        if !r.is_zero() {
            let r = monic_under_order(&r);
            let k = basis.len();
            for idx in 0..k {
                pairs.push((idx, k));
            }
            basis.push(r);
        }
    }

    autoreduce(basis)
}

/// Remove redundant members and fully reduce each against the others.
fn autoreduce(mut basis: Vec<Polynomial>) -> Vec<Polynomial> {
    // Drop members whose leading monomial is divisible by another's.
    let mut keep = vec![true; basis.len()];
    for i in 0..basis.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..basis.len() {
            if i == j || !keep[j] {
                continue;
            }
            let li = &leading(&basis[i]).monomial;
            let lj = &leading(&basis[j]).monomial;
            if li.div(lj).is_some() && !(li == lj && j > i) {
                keep[i] = false;
                break;
            }
        }
    }
    let kept: Vec<Polynomial> = basis
        .drain(..)
        .zip(keep)
        .filter_map(|(p, k)| if k { Some(p) } else { None })
        .collect();

    let mut reduced = Vec::with_capacity(kept.len());
    for i in 0..kept.len() {
        let others: Vec<Polynomial> = kept
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p.clone())
            .collect();
        let r = reduce(&kept[i], &others);
        if !r.is_zero() {
            reduced.push(monic_under_order(&r));
        }
    }
    reduced.sort_by(|a, b| ORDER.compare(&leading(a).monomial, &leading(b).monomial));
    reduced
}

fn monic_under_order(p: &Polynomial) -> Polynomial {
    let lc = leading(p).coeff.clone();
    p.scale(&(BigRational::one() / lc))
}

fn lcm_monomial(a: &Monomial, b: &Monomial) -> Monomial {
    let mut powers: Vec<(u32, u32)> = a.vars().iter().map(|vp| (vp.var, vp.power)).collect();
    for vp in b.vars() {
        match powers.iter_mut().find(|(v, _)| *v == vp.var) {
            Some((_, p)) => *p = (*p).max(vp.power),
            None => powers.push((vp.var, vp.power)),
        }
    }
    Monomial::from_powers(powers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn test_reduce_by_linear() {
        // reduce x^2 + y modulo { x - 1 } -> 1 + y
        let p = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (1, &[(1, 1)])]);
        let b = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (-1, &[])]);
        let r = reduce(&p, &[b]);
        assert_eq!(r, Polynomial::from_coeffs_int(&[(1, &[(1, 1)]), (1, &[])]));
    }

    #[test]
    fn test_reduce_idempotent() {
        let p = Polynomial::from_coeffs_int(&[(1, &[(0, 1), (1, 1)]), (3, &[(1, 2)])]);
        let b = vec![Polynomial::from_coeffs_int(&[(1, &[(1, 1)]), (-2, &[])])];
        let r1 = reduce(&p, &b);
        let r2 = reduce(&r1, &b);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_member_reduces_to_zero() {
        // x^2 - 1 and x - 1 generate an ideal containing (x+1)(x-1)
        let p1 = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (-1, &[])]);
        let p2 = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (-1, &[])]);
        let gb = grobner_basis(&[p1.clone(), p2]);
        assert!(reduce(&p1, &gb).is_zero());
    }

    #[test]
    fn test_inconsistent_ideal() {
        // x = 0 and x = 1 together put 1 in the ideal
        let p1 = Polynomial::from_coeffs_int(&[(1, &[(0, 1)])]);
        let p2 = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (-1, &[])]);
        let gb = grobner_basis(&[p1, p2]);
        assert!(gb.iter().any(|p| p.is_constant()));
        let one = Polynomial::constant(rat(1));
        assert!(reduce(&one, &gb).is_zero());
    }

    #[test]
    fn test_s_polynomial_cancels_leads() {
        // f = x^2 y - 1, g = x y^2 - x: S kills the xy-lcm leading terms
        let f = Polynomial::from_coeffs_int(&[(1, &[(0, 2), (1, 1)]), (-1, &[])]);
        let g = Polynomial::from_coeffs_int(&[(1, &[(0, 1), (1, 2)]), (-1, &[(0, 1)])]);
        let s = s_polynomial(&f, &g);
        let lcm = Monomial::from_powers([(0, 2), (1, 2)]);
        assert!(s.terms().iter().all(|t| t.monomial != lcm));
    }

    #[test]
    fn test_basis_is_monic() {
        let p = Polynomial::from_coeffs_int(&[(3, &[(0, 1)]), (6, &[])]);
        let gb = grobner_basis(&[p]);
        assert_eq!(gb.len(), 1);
        assert_eq!(leading(&gb[0]).coeff, rat(1));
    }

    #[test]
    fn test_elimination_flavor() {
        // { x - y, y^2 - 2 }: reducing x^2 must give 2
        let p1 = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (-1, &[(1, 1)])]);
        let p2 = Polynomial::from_coeffs_int(&[(1, &[(1, 2)]), (-2, &[])]);
        let gb = grobner_basis(&[p1, p2]);
        let x2 = Polynomial::from_coeffs_int(&[(1, &[(0, 2)])]);
        assert_eq!(reduce(&x2, &gb), Polynomial::constant(rat(2)));
    }
}
