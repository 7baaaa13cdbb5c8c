//! tarski-cad — cylindrical algebraic decomposition over the rationals.
//!
//! Decides systems of polynomial sign conditions over the reals and extracts
//! witness models of real algebraic numbers. The engine decomposes the space
//! of each variable into finitely many cells on which every constraint
//! polynomial has a constant sign, searches the decomposition for cells
//! consistent with the requested signs, and stacks the per-variable
//! decompositions recursively, branching on the signs of symbolic
//! coefficients as it goes.
//!
//! # Examples
//!
//! ```
//! use tarski_cad::solve::{RelOp, solve};
//! use tarski_math::polynomial::Polynomial;
//!
//! // x^2 + 4x - 10 = 0 and x > 0: satisfied only by x = -2 + sqrt(14)
//! let p = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (4, &[(0, 1)]), (-10, &[])]);
//! let x = Polynomial::from_var(0);
//! let zero = Polynomial::zero();
//!
//! let model = solve(&[0], &[(p, RelOp::Eq, zero.clone()), (x, RelOp::Gt, zero)]).unwrap();
//! assert_eq!(model[&0].signum(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assumption;
pub mod conf;
pub mod project;
pub mod sample;
pub mod sign;
pub mod solve;

pub use assumption::{Assumption, Branches};
pub use conf::{Cell, Point, SignConf, SignMap, build_sign_conf, collect_polynomials, mr,
    normalize_poly, refine_sign_conf, sign_at};
pub use project::{ProjectedBranch, project};
pub use sample::{Model, eval_point, find_sample};
pub use sign::{Sign, SignSet};
pub use solve::{RelOp, solve, solve_constraints};
