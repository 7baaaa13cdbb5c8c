//! Cell sampling: concrete real algebraic witnesses from symbolic cells.
//!
//! Once the recursive solver has a numeric model for the parameters, a cell
//! of the current variable is specialized against it and a sample point
//! extracted: the root itself for a point cell, an integer outside the
//! outermost roots for the unbounded intervals, and the exact midpoint for a
//! bounded one.

use crate::conf::{Cell, Point};
use num_traits::One;
use num_rational::BigRational;
use rustc_hash::FxHashMap;
use tarski_math::algebraic::{AlgebraicNumber, real_roots_with_model};
use tarski_math::polynomial::Var;

/// A partial assignment of variables to real algebraic numbers.
pub type Model = FxHashMap<Var, AlgebraicNumber>;

/// Specialize a symbolic root against the model: substitute the model into
/// the polynomial's coefficients and take the root with the recorded index.
/// The returned number re-derives its own defining polynomial and index.
///
/// # Panics
///
/// Panics on a point at infinity, or when the specialized polynomial does
/// not have the recorded root (the projection established it exists, so
/// that is a caller bug).
pub fn eval_point(model: &Model, pt: &Point, var: Var) -> AlgebraicNumber {
    match pt {
        Point::RootOf(p, index) => {
            let roots = real_roots_with_model(p, var, model);
            let found = roots.len();
            match roots.into_iter().nth(*index) {
                Some(root) => root,
                None => panic!(
                    "root {} of {} does not exist under the model ({} real roots)",
                    index, p, found
                ),
            }
        }
        Point::NegInf | Point::PosInf => panic!("cannot evaluate a point at infinity"),
    }
}

/// Sample a concrete value inside a specialized cell.
///
/// Returns `None` when the cell collapses under the model (its endpoints are
/// out of order), which fails the surrounding search branch. Ill-formed
/// cells (a point at infinity, an interval with inverted sentinels) panic.
pub fn find_sample(model: &Model, cell: &Cell, var: Var) -> Option<AlgebraicNumber> {
    match cell {
        Cell::Point(pt @ Point::RootOf(..)) => Some(eval_point(model, pt, var)),
        Cell::Point(_) => panic!("ill-formed sample cell: {}", cell),
        Cell::Interval(Point::NegInf, Point::PosInf) => Some(AlgebraicNumber::zero()),
        Cell::Interval(Point::NegInf, ub @ Point::RootOf(..)) => {
            let r = eval_point(model, ub, var);
            Some(AlgebraicNumber::from_rational(r.floor() - BigRational::one()))
        }
        Cell::Interval(lb @ Point::RootOf(..), Point::PosInf) => {
            let r = eval_point(model, lb, var);
            Some(AlgebraicNumber::from_rational(r.ceil() + BigRational::one()))
        }
        Cell::Interval(lb @ Point::RootOf(..), ub @ Point::RootOf(..)) => {
            let lo = eval_point(model, lb, var);
            let hi = eval_point(model, ub, var);
            if lo < hi { Some(lo.midpoint(&hi)) } else { None }
        }
        Cell::Interval(..) => panic!("ill-formed sample cell: {}", cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use tarski_math::polynomial::Polynomial;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn upoly(var: Var, coeffs: &[i64]) -> Polynomial {
        let coeffs: Vec<BigRational> = coeffs.iter().map(|&c| rat(c)).collect();
        Polynomial::univariate(var, &coeffs)
    }

    #[test]
    fn test_sample_point_cell() {
        // second root of x^2 + 4x - 10 is -2 + sqrt(14)
        let p = upoly(0, &[-10, 4, 1]);
        let cell = Cell::Point(Point::RootOf(p, 1));
        let sample = find_sample(&Model::default(), &cell, 0).unwrap();
        assert_eq!(sample.signum(), 1);
        // (sample + 2)^2 = 14
        let shifted = sample.add_rational(&rat(2));
        assert_eq!(
            shifted.pow(2).cmp_rational(&rat(14)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_sample_whole_line() {
        let cell = Cell::Interval(Point::NegInf, Point::PosInf);
        let sample = find_sample(&Model::default(), &cell, 0).unwrap();
        assert_eq!(sample.to_rational(), Some(rat(0)));
    }

    #[test]
    fn test_sample_unbounded_intervals() {
        let p = upoly(0, &[-2, 0, 1]); // roots ±√2
        let left = Cell::Interval(Point::NegInf, Point::RootOf(p.clone(), 0));
        let sample = find_sample(&Model::default(), &left, 0).unwrap();
        // floor(-√2) - 1 = -3
        assert_eq!(sample.to_rational(), Some(rat(-3)));

        let right = Cell::Interval(Point::RootOf(p, 1), Point::PosInf);
        let sample = find_sample(&Model::default(), &right, 0).unwrap();
        // ceil(√2) + 1 = 3
        assert_eq!(sample.to_rational(), Some(rat(3)));
    }

    #[test]
    fn test_sample_bounded_interval() {
        let p = upoly(0, &[0, 1]); // root 0
        let q = upoly(0, &[-3, 2]); // root 3/2
        let cell = Cell::Interval(Point::RootOf(p, 0), Point::RootOf(q, 0));
        let sample = find_sample(&Model::default(), &cell, 0).unwrap();
        assert_eq!(
            sample.to_rational(),
            Some(BigRational::new(BigInt::from(3), BigInt::from(4)))
        );
    }

    #[test]
    fn test_sample_collapsed_interval_fails() {
        // inverted endpoints: root 1 of x^2-2 on the left, root 0 on the right
        let p = upoly(0, &[-2, 0, 1]);
        let cell = Cell::Interval(Point::RootOf(p.clone(), 1), Point::RootOf(p, 0));
        assert!(find_sample(&Model::default(), &cell, 0).is_none());
    }

    #[test]
    fn test_sample_specializes_against_model() {
        // x^2 - y at y = 4: first root is -2, left interval samples -3
        let p = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (-1, &[(1, 1)])]);
        let mut model = Model::default();
        model.insert(1, AlgebraicNumber::from_rational(rat(4)));
        let cell = Cell::Interval(Point::NegInf, Point::RootOf(p, 0));
        let sample = find_sample(&model, &cell, 0).unwrap();
        assert_eq!(sample.to_rational(), Some(rat(-3)));
    }

    #[test]
    #[should_panic(expected = "ill-formed sample cell")]
    fn test_sample_point_at_infinity_panics() {
        let _ = find_sample(&Model::default(), &Cell::Point(Point::NegInf), 0);
    }
}
