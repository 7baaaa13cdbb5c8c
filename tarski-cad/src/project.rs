//! Projection: eliminate the distinguished variable from a system of sign
//! constraints.
//!
//! Given constraints `(p, S)` — "the sign of `p` in the main variable lies
//! in `S`" — projection builds the sign configuration of the constraint
//! polynomials and keeps the cells on which every constraint holds. Each
//! surviving branch of the symbolic case analysis yields a pair of the
//! branch's assumption (as parameter constraints for the next elimination
//! level) and its satisfying cells.

use crate::assumption::{Assumption, Branches};
use crate::conf::{Cell, Point, build_sign_conf, normalize_poly};
use crate::sign::SignSet;
use tarski_math::polynomial::{Polynomial, Var};

/// One surviving projection branch: the conditions on the parameters, and
/// the cells of the main variable consistent with them.
pub type ProjectedBranch = (Vec<(Polynomial, SignSet)>, Vec<Cell>);

fn is_sentinel(cell: &Cell) -> bool {
    matches!(cell, Cell::Point(Point::NegInf) | Cell::Point(Point::PosInf))
}

/// Project a constraint system along `var`.
///
/// Constraints of degree zero in `var` are pure parameter facts and are
/// assumed directly. The rest drive the sign configuration; per branch, each
/// constraint polynomial is re-normalized (a constraint that degenerates to
/// a parameter polynomial under the branch's zero assumptions is assumed
/// away), and the cells whose sign maps satisfy every remaining constraint
/// survive. A branch with no surviving cell is infeasible and dropped.
pub fn project(
    constraints: &[(Polynomial, SignSet)],
    var: Var,
    asm: &Assumption,
) -> Vec<ProjectedBranch> {
    let mut base = asm.clone();
    let mut active: Vec<(Polynomial, SignSet)> = Vec::new();
    for (p, signs) in constraints {
        if p.degree(var) == 0 {
            match base.assume(p, *signs) {
                Some(a) => base = a,
                None => return Vec::new(),
            }
        } else {
            active.push((p.clone(), *signs));
        }
    }

    let polys: Vec<Polynomial> = active.iter().map(|(p, _)| p.clone()).collect();
    let mut out = Vec::new();
    for (conf, conf_asm) in build_sign_conf(&polys, var, &base) {
        // Re-normalize every constraint under this branch's assumption.
        let mut states: Branches<Vec<(Polynomial, SignSet)>> = vec![(Vec::new(), conf_asm)];
        for (p, signs) in &active {
            let mut next = Vec::new();
            for (kept, a) in states {
                for (np, a2) in normalize_poly(p, var, &a) {
                    if np.degree(var) == 0 {
                        if let Some(a3) = a2.assume(&np, *signs) {
                            next.push((kept.clone(), a3));
                        }
                    } else {
                        let mut kept2 = kept.clone();
                        kept2.push((np, *signs));
                        next.push((kept2, a2));
                    }
                }
            }
            states = next;
        }

        for (kept, a) in states {
            let cells: Vec<Cell> = conf
                .cells()
                .filter(|(cell, map)| {
                    !is_sentinel(cell)
                        && kept.iter().all(|(p, signs)| match map.get(p) {
                            Some(s) => signs.contains(*s),
                            None => panic!("constraint {} missing from configuration", p),
                        })
                })
                .map(|(cell, _)| cell.clone())
                .collect();
            if cells.is_empty() {
                continue;
            }
            tracing::trace!(
                cells = cells.len(),
                conditions = a.conditions().len(),
                "projection branch survives"
            );
            out.push((a.conditions(), cells));
        }
    }
    tracing::debug!(branches = out.len(), "projection complete");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::Sign;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use rustc_hash::FxHashMap;

    fn upoly(var: Var, coeffs: &[i64]) -> Polynomial {
        let coeffs: Vec<BigRational> = coeffs
            .iter()
            .map(|&c| BigRational::from_integer(BigInt::from(c)))
            .collect();
        Polynomial::univariate(var, &coeffs)
    }

    fn pos() -> SignSet {
        SignSet::only(Sign::Pos)
    }

    #[test]
    fn test_project_univariate_band() {
        // x + 1 > 0, -2x + 3 > 0, x > 0: the band 0 < x < 3/2
        let constraints = vec![
            (upoly(0, &[1, 1]), pos()),
            (upoly(0, &[3, -2]), pos()),
            (upoly(0, &[0, 1]), pos()),
        ];
        let branches = project(&constraints, 0, &Assumption::new());
        assert_eq!(branches.len(), 1);
        let (conds, cells) = &branches[0];
        assert!(conds.is_empty());
        // a single open interval survives
        assert_eq!(cells.len(), 1);
        assert!(matches!(cells[0], Cell::Interval(..)));
    }

    #[test]
    fn test_project_infeasible() {
        // x^2 < 0 has no cell
        let constraints = vec![(upoly(0, &[0, 0, 1]), SignSet::only(Sign::Neg))];
        let branches = project(&constraints, 0, &Assumption::new());
        assert!(branches.is_empty());
    }

    #[test]
    fn test_project_every_cell_satisfies() {
        // projection invariant: surviving cells satisfy the requested signs
        let constraints = vec![
            (upoly(0, &[-2, 0, 1]), SignSet::from_signs([Sign::Neg, Sign::Zero])),
            (upoly(0, &[0, 1]), SignSet::from_signs([Sign::Zero, Sign::Pos])),
        ];
        let branches = project(&constraints, 0, &Assumption::new());
        assert!(!branches.is_empty());
        // re-check against a fresh configuration
        let polys: Vec<Polynomial> = constraints.iter().map(|(p, _)| p.clone()).collect();
        let confs = build_sign_conf(&polys, 0, &Assumption::new());
        assert_eq!(confs.len(), 1);
        let conf = &confs[0].0;
        for (_, cells) in &branches {
            for cell in cells {
                let map = conf
                    .cells()
                    .find(|(c, _)| *c == cell)
                    .map(|(_, m)| m)
                    .expect("cell from projection exists in configuration");
                for (p, signs) in &constraints {
                    assert!(signs.contains(map[p]));
                }
            }
        }
    }

    #[test]
    fn test_project_degree_zero_constraint() {
        // a constant constraint is decided immediately
        let five = Polynomial::from_coeffs_int(&[(5, &[])]);
        let sat = project(&[(five.clone(), pos())], 0, &Assumption::new());
        assert_eq!(sat.len(), 1);
        let unsat = project(&[(five, SignSet::only(Sign::Neg))], 0, &Assumption::new());
        assert!(unsat.is_empty());
    }

    #[test]
    fn test_project_symbolic_discriminant() {
        // a x^2 + b x + c = 0 over parameters a (1), b (2), c (3):
        // the classical case split on a, b, and b^2 - 4ac
        let p = Polynomial::from_coeffs_int(&[
            (1, &[(0, 2), (1, 1)]),
            (1, &[(0, 1), (2, 1)]),
            (1, &[(3, 1)]),
        ]);
        let branches = project(&[(p, SignSet::only(Sign::Zero))], 0, &Assumption::new());
        assert!(!branches.is_empty());

        // every branch's conditions must be satisfiable in the classical
        // sense: check a few witness assignments against the branch lists
        let witnesses: [(i64, i64, i64, bool); 5] = [
            // a, b, c, should some branch accept
            (1, 0, -4, true),  // x^2 = 4
            (1, 0, 4, false),  // x^2 = -4
            (0, 2, 6, true),   // linear
            (0, 0, 0, true),   // trivial
            (0, 0, 5, false),  // 5 = 0
        ];
        for (a, b, c, expect) in witnesses {
            let assignment: FxHashMap<Var, BigRational> = [
                (1, BigRational::from_integer(BigInt::from(a))),
                (2, BigRational::from_integer(BigInt::from(b))),
                (3, BigRational::from_integer(BigInt::from(c))),
            ]
            .into_iter()
            .collect();
            let accepted = branches.iter().any(|(conds, _)| {
                conds.iter().all(|(q, signs)| {
                    signs.contains(Sign::of_rational(&q.eval(&assignment)))
                })
            });
            assert_eq!(accepted, expect, "witness a={} b={} c={}", a, b, c);
        }
    }
}
