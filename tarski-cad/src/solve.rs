//! The recursive solver: decide a system of polynomial relations over the
//! reals and produce a witness model.
//!
//! Variables are eliminated one at a time in the caller's order: each level
//! projects the constraints along its head variable, recurses on the
//! parameter conditions of every projection branch, and on the first branch
//! whose residual system is satisfiable backs a concrete sample out of a
//! surviving cell into the model.

use crate::assumption::Assumption;
use crate::sample::{Model, find_sample};
use crate::sign::{Sign, SignSet};
use crate::project::project;
use tarski_math::polynomial::{Polynomial, Var};

/// Relational operators between two polynomials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs < rhs`
    Lt,
    /// `lhs > rhs`
    Gt,
    /// `lhs = rhs`
    Eq,
    /// `lhs != rhs`
    Ne,
}

impl RelOp {
    /// The signs of `lhs - rhs` permitted by the relation.
    pub fn sign_set(self) -> SignSet {
        match self {
            RelOp::Le => SignSet::from_signs([Sign::Neg, Sign::Zero]),
            RelOp::Ge => SignSet::from_signs([Sign::Pos, Sign::Zero]),
            RelOp::Lt => SignSet::only(Sign::Neg),
            RelOp::Gt => SignSet::only(Sign::Pos),
            RelOp::Eq => SignSet::only(Sign::Zero),
            RelOp::Ne => SignSet::NONZERO,
        }
    }
}

/// Decide a conjunction of polynomial relations over the ordered variables
/// `vars`, returning a satisfying model of real algebraic numbers, or `None`
/// when the system is unsatisfiable.
///
/// Every variable occurring in the relations must be listed; the list order
/// is the elimination order.
pub fn solve(vars: &[Var], relations: &[(Polynomial, RelOp, Polynomial)]) -> Option<Model> {
    let constraints: Vec<(Polynomial, SignSet)> = relations
        .iter()
        .map(|(lhs, op, rhs)| (lhs.sub(rhs), op.sign_set()))
        .collect();
    solve_constraints(vars, &constraints)
}

/// Decide a conjunction of sign constraints `(p, S)` over the ordered
/// variables `vars`.
pub fn solve_constraints(vars: &[Var], constraints: &[(Polynomial, SignSet)]) -> Option<Model> {
    let Some((&head, rest)) = vars.split_first() else {
        // No variables left: every constraint must be numeric and satisfied.
        for (p, signs) in constraints {
            assert!(
                p.is_zero() || p.is_constant(),
                "constraint {} mentions a variable outside the elimination order",
                p
            );
            if !signs.contains(Sign::of_rational(&p.constant_value())) {
                return None;
            }
        }
        return Some(Model::default());
    };

    tracing::debug!(
        variable = head,
        constraints = constraints.len(),
        "eliminating variable"
    );
    for (conditions, cells) in project(constraints, head, &Assumption::new()) {
        let Some(mut model) = solve_constraints(rest, &conditions) else {
            continue;
        };
        for cell in &cells {
            if let Some(sample) = find_sample(&model, cell, head) {
                tracing::debug!(variable = head, cell = %cell, "sampled");
                model.insert(head, sample);
                return Some(model);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn upoly(var: Var, coeffs: &[i64]) -> Polynomial {
        let coeffs: Vec<BigRational> = coeffs
            .iter()
            .map(|&c| BigRational::from_integer(BigInt::from(c)))
            .collect();
        Polynomial::univariate(var, &coeffs)
    }

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn test_rel_op_sign_sets() {
        assert_eq!(RelOp::Lt.sign_set(), SignSet::only(Sign::Neg));
        assert_eq!(RelOp::Eq.sign_set(), SignSet::only(Sign::Zero));
        assert_eq!(RelOp::Ne.sign_set(), SignSet::NONZERO);
        assert!(RelOp::Le.sign_set().contains(Sign::Zero));
        assert!(RelOp::Ge.sign_set().contains(Sign::Pos));
    }

    #[test]
    fn test_solve_no_variables() {
        let zero = Polynomial::zero();
        let one = Polynomial::one();
        assert!(solve(&[], &[(zero.clone(), RelOp::Eq, zero.clone())]).is_some());
        assert!(solve(&[], &[(one, RelOp::Lt, zero)]).is_none());
    }

    #[test]
    fn test_solve_univariate_band() {
        // x + 1 > 0, -2x + 3 > 0, x > 0
        let zero = Polynomial::zero();
        let relations = vec![
            (upoly(0, &[1, 1]), RelOp::Gt, zero.clone()),
            (upoly(0, &[3, -2]), RelOp::Gt, zero.clone()),
            (upoly(0, &[0, 1]), RelOp::Gt, zero),
        ];
        let model = solve(&[0], &relations).unwrap();
        let x = &model[&0];
        assert_eq!(x.cmp_rational(&rat(0)), std::cmp::Ordering::Greater);
        assert_eq!(
            x.cmp_rational(&BigRational::new(BigInt::from(3), BigInt::from(2))),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_solve_unsat_square() {
        // x^2 < 0
        let relations = vec![(upoly(0, &[0, 0, 1]), RelOp::Lt, Polynomial::zero())];
        assert!(solve(&[0], &relations).is_none());
    }
}
