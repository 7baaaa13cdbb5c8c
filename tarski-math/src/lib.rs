//! tarski-math — exact mathematical substrate for the CAD engine.
//!
//! This crate provides the three ingredients cylindrical algebraic
//! decomposition is built from:
//!
//! - Multivariate polynomial arithmetic over `BigRational` with canonical
//!   term lists and the `lex` / `grlex` / `grevlex` monomial orders
//! - Gröbner basis computation (Buchberger, `grevlex`) for reasoning modulo
//!   an ideal of polynomials known to vanish
//! - Real algebraic numbers with exact comparison and field arithmetic,
//!   backed by Sturm-sequence root isolation and bivariate resultants
//!
//! # Examples
//!
//! ## Polynomials
//!
//! ```
//! use tarski_math::polynomial::Polynomial;
//!
//! // p = x0^2 - 2
//! let p = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (-2, &[])]);
//! assert_eq!(p.degree(0), 2);
//! assert_eq!(p.derivative(0), Polynomial::from_coeffs_int(&[(2, &[(0, 1)])]));
//! ```
//!
//! ## Real roots
//!
//! ```
//! use tarski_math::algebraic::real_roots;
//! use tarski_math::polynomial::Polynomial;
//!
//! let p = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (-2, &[])]);
//! let roots = real_roots(&p, 0);
//! assert_eq!(roots.len(), 2);
//! assert!(roots[0] < roots[1]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod algebraic;
pub mod grobner;
pub mod polynomial;

pub use algebraic::{AlgebraicError, AlgebraicNumber, eval_alg, real_roots, real_roots_with_model};
pub use grobner::{grobner_basis, reduce, s_polynomial};
pub use polynomial::{Monomial, MonomialOrder, NULL_VAR, Polynomial, Term, Var, VarPower};
