//! Real algebraic numbers with exact arithmetic.
//!
//! An algebraic number is represented as a square-free defining polynomial
//! over ℚ together with an isolating interval containing exactly one of its
//! real roots; rationals are the exact `lower == upper` case. Comparison
//! refines intervals (with a gcd-based equality test so refinement always
//! terminates), and addition and multiplication go through bivariate
//! resultants: the resultant yields a rational polynomial whose roots include
//! the sum or product, and interval refinement selects the right one.
//!
//! The module also evaluates multivariate polynomials at algebraic points and
//! enumerates the real roots of a polynomial after substituting such a point
//! into its coefficients, which is what cell sampling needs.

use crate::polynomial::{self, Monomial, Polynomial, Term, Var};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Canonical variable of defining polynomials.
const ROOT_VAR: Var = 0;
/// Scratch variable for resultant computations.
const AUX_VAR: Var = 1;

/// Errors from explicit algebraic-number construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgebraicError {
    /// The zero polynomial has no well-defined roots.
    #[error("zero polynomial has no well-defined roots")]
    ZeroPolynomial,
    /// The interval does not isolate exactly one real root.
    #[error("interval does not isolate exactly one root")]
    NonIsolatingInterval,
}

/// A real algebraic number: a root of a rational polynomial, pinned down by
/// an isolating interval.
#[derive(Clone)]
pub struct AlgebraicNumber {
    /// Square-free, primitive defining polynomial, univariate in [`ROOT_VAR`].
    poly: Polynomial,
    lower: BigRational,
    upper: BigRational,
}

fn rat_int(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

fn eval_rat(p: &Polynomial, at: &BigRational) -> BigRational {
    p.eval_at(ROOT_VAR, at).constant_value()
}

fn sign_rat(q: &BigRational) -> i32 {
    if q.is_positive() {
        1
    } else if q.is_negative() {
        -1
    } else {
        0
    }
}

impl AlgebraicNumber {
    /// The algebraic number equal to a rational.
    pub fn from_rational(r: BigRational) -> Self {
        Self {
            poly: Polynomial::univariate(ROOT_VAR, &[-r.clone(), BigRational::one()]),
            lower: r.clone(),
            upper: r,
        }
    }

    /// Zero.
    pub fn zero() -> Self {
        Self::from_rational(BigRational::zero())
    }

    /// Construct from a univariate polynomial and an isolating interval.
    ///
    /// # Errors
    ///
    /// [`AlgebraicError::ZeroPolynomial`] for a zero or constant polynomial;
    /// [`AlgebraicError::NonIsolatingInterval`] when the interval does not
    /// contain exactly one real root of the (square-free part of the)
    /// polynomial with non-vanishing endpoints.
    pub fn new(
        poly: &Polynomial,
        lower: BigRational,
        upper: BigRational,
    ) -> Result<Self, AlgebraicError> {
        if poly.is_zero() || poly.is_constant() {
            return Err(AlgebraicError::ZeroPolynomial);
        }
        assert!(poly.is_univariate(), "defining polynomial must be univariate");
        let f = normalize_defining(poly);
        if lower > upper {
            return Err(AlgebraicError::NonIsolatingInterval);
        }
        if lower == upper {
            return if eval_rat(&f, &lower).is_zero() {
                Ok(Self::from_rational(lower))
            } else {
                Err(AlgebraicError::NonIsolatingInterval)
            };
        }
        if eval_rat(&f, &lower).is_zero()
            || eval_rat(&f, &upper).is_zero()
            || f.count_real_roots_in(ROOT_VAR, &lower, &upper) != 1
        {
            return Err(AlgebraicError::NonIsolatingInterval);
        }
        if f.degree(ROOT_VAR) == 1 {
            let root = -f.univ_coeff(ROOT_VAR, 0) / f.univ_coeff(ROOT_VAR, 1);
            return Ok(Self::from_rational(root));
        }
        Ok(Self {
            poly: f,
            lower,
            upper,
        })
    }

    /// Whether the value is rational (known exactly).
    pub fn is_rational(&self) -> bool {
        self.lower == self.upper
    }

    /// The exact rational value, when rational.
    pub fn to_rational(&self) -> Option<BigRational> {
        if self.is_rational() {
            Some(self.lower.clone())
        } else {
            None
        }
    }

    /// The square-free defining polynomial (in variable 0).
    pub fn defining_poly(&self) -> &Polynomial {
        &self.poly
    }

    /// The current isolating interval.
    pub fn isolating_interval(&self) -> (BigRational, BigRational) {
        (self.lower.clone(), self.upper.clone())
    }

    /// Index of this root among the real roots of the defining polynomial,
    /// in ascending order.
    pub fn root_index(&self) -> usize {
        if self.is_rational() {
            // Rational values carry `x - r` as defining polynomial.
            return 0;
        }
        let bound = self.poly.cauchy_bound(ROOT_VAR) + BigRational::one();
        let seq = self.poly.sturm_sequence(ROOT_VAR);
        let at_low = polynomial::sign_variations_at(&seq, ROOT_VAR, &(-bound));
        let at_l = polynomial::sign_variations_at(&seq, ROOT_VAR, &self.lower);
        at_low.saturating_sub(at_l)
    }

    /// Halve the isolating interval. Collapses to an exact rational when the
    /// midpoint happens to be the root.
    pub fn refine(&mut self) {
        if self.is_rational() {
            return;
        }
        let mid = (&self.lower + &self.upper) / rat_int(2);
        let v = eval_rat(&self.poly, &mid);
        if v.is_zero() {
            *self = Self::from_rational(mid);
        } else if sign_rat(&eval_rat(&self.poly, &self.lower)) != sign_rat(&v) {
            self.upper = mid;
        } else {
            self.lower = mid;
        }
    }

    /// Sign of the value: -1, 0, or 1.
    pub fn signum(&self) -> i32 {
        if let Some(r) = self.to_rational() {
            return sign_rat(&r);
        }
        if !self.lower.is_negative() {
            return 1;
        }
        if !self.upper.is_positive() {
            return -1;
        }
        if eval_rat(&self.poly, &BigRational::zero()).is_zero() {
            // Zero is a root inside the isolating interval, hence this root.
            return 0;
        }
        let mut c = self.clone();
        loop {
            c.refine();
            if let Some(r) = c.to_rational() {
                return sign_rat(&r);
            }
            if !c.lower.is_negative() {
                return 1;
            }
            if !c.upper.is_positive() {
                return -1;
            }
        }
    }

    /// Exact comparison against a rational.
    pub fn cmp_rational(&self, r: &BigRational) -> Ordering {
        if let Some(q) = self.to_rational() {
            return q.cmp(r);
        }
        let mut c = self.clone();
        loop {
            if *r <= c.lower {
                return Ordering::Greater;
            }
            if *r >= c.upper {
                return Ordering::Less;
            }
            if eval_rat(&c.poly, r).is_zero() {
                return Ordering::Equal;
            }
            c.refine();
            if let Some(q) = c.to_rational() {
                return q.cmp(r);
            }
        }
    }

    /// Largest integer not exceeding the value, as a rational.
    pub fn floor(&self) -> BigRational {
        if let Some(r) = self.to_rational() {
            return r.floor();
        }
        let mut c = self.clone();
        loop {
            let lf = c.lower.floor();
            let uf = c.upper.floor();
            if lf == uf {
                return lf;
            }
            // An integer root inside the interval is the value itself.
            let mut n = lf.clone() + BigRational::one();
            while n <= uf {
                if n > c.lower && n < c.upper && eval_rat(&c.poly, &n).is_zero() {
                    return n;
                }
                n += BigRational::one();
            }
            c.refine();
            if let Some(r) = c.to_rational() {
                return r.floor();
            }
        }
    }

    /// Smallest integer not below the value, as a rational.
    pub fn ceil(&self) -> BigRational {
        -self.neg().floor()
    }

    /// Additive inverse.
    pub fn neg(&self) -> Self {
        if let Some(r) = self.to_rational() {
            return Self::from_rational(-r);
        }
        let d = self.poly.degree(ROOT_VAR);
        let coeffs: Vec<BigRational> = (0..=d)
            .map(|i| {
                let c = self.poly.univ_coeff(ROOT_VAR, i);
                if i % 2 == 1 { -c } else { c }
            })
            .collect();
        Self {
            poly: Polynomial::univariate(ROOT_VAR, &coeffs).primitive(),
            lower: -&self.upper,
            upper: -&self.lower,
        }
    }

    /// Multiply by a rational.
    pub fn scale(&self, c: &BigRational) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        if let Some(r) = self.to_rational() {
            return Self::from_rational(r * c);
        }
        // p(x/c) cleared of denominators: roots are scaled by c.
        let d = self.poly.degree(ROOT_VAR);
        let coeffs: Vec<BigRational> = (0..=d)
            .map(|i| self.poly.univ_coeff(ROOT_VAR, i) * c.pow((d - i) as i32))
            .collect();
        let (mut lo, mut hi) = (&self.lower * c, &self.upper * c);
        if c.is_negative() {
            std::mem::swap(&mut lo, &mut hi);
        }
        Self {
            poly: Polynomial::univariate(ROOT_VAR, &coeffs).primitive(),
            lower: lo,
            upper: hi,
        }
    }

    /// Add a rational.
    pub fn add_rational(&self, c: &BigRational) -> Self {
        if let Some(r) = self.to_rational() {
            return Self::from_rational(r + c);
        }
        // p(x - c): roots are shifted by c.
        let shift = Polynomial::univariate(ROOT_VAR, &[-c.clone(), BigRational::one()]);
        Self {
            poly: self.poly.substitute(ROOT_VAR, &shift).primitive(),
            lower: &self.lower + c,
            upper: &self.upper + c,
        }
    }

    /// Exact sum of two algebraic numbers.
    pub fn add(&self, other: &Self) -> Self {
        if let Some(r) = self.to_rational() {
            return other.add_rational(&r);
        }
        if let Some(r) = other.to_rational() {
            return self.add_rational(&r);
        }
        // α + β is a root of res_y(p(x - y), q(y)).
        let x_minus_y = Polynomial::from_var(ROOT_VAR).sub(&Polynomial::from_var(AUX_VAR));
        let shifted = self.poly.substitute(ROOT_VAR, &x_minus_y);
        let other_y = other.poly.rename_var(ROOT_VAR, AUX_VAR);
        let elim = shifted.resultant(&other_y, AUX_VAR);
        debug_assert!(!elim.is_zero());
        select_root(real_roots(&elim, ROOT_VAR), self, other, |a, b| {
            (&a.lower + &b.lower, &a.upper + &b.upper)
        })
    }

    /// Exact difference.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Exact product of two algebraic numbers.
    pub fn mul(&self, other: &Self) -> Self {
        if let Some(r) = self.to_rational() {
            return other.scale(&r);
        }
        if let Some(r) = other.to_rational() {
            return self.scale(&r);
        }
        // α·β is a root of res_y(y^d p(x/y), q(y)).
        let d = self.poly.degree(ROOT_VAR);
        let homogenized = Polynomial::from_terms((0..=d).filter_map(|i| {
            let c = self.poly.univ_coeff(ROOT_VAR, i);
            if c.is_zero() {
                None
            } else {
                Some(Term::new(
                    c,
                    Monomial::from_powers([(ROOT_VAR, i), (AUX_VAR, d - i)]),
                ))
            }
        }));
        let other_y = other.poly.rename_var(ROOT_VAR, AUX_VAR);
        let elim = homogenized.resultant(&other_y, AUX_VAR);
        debug_assert!(!elim.is_zero());
        select_root(real_roots(&elim, ROOT_VAR), self, other, |a, b| {
            let products = [
                &a.lower * &b.lower,
                &a.lower * &b.upper,
                &a.upper * &b.lower,
                &a.upper * &b.upper,
            ];
            let lo = products.iter().min().cloned().unwrap_or_else(BigRational::zero);
            let hi = products.iter().max().cloned().unwrap_or_else(BigRational::zero);
            (lo, hi)
        })
    }

    /// Power by repeated multiplication.
    pub fn pow(&self, n: u32) -> Self {
        if let Some(r) = self.to_rational() {
            return Self::from_rational(r.pow(n as i32));
        }
        let mut result = Self::from_rational(BigRational::one());
        for _ in 0..n {
            result = result.mul(self);
        }
        result
    }

    /// Exact midpoint `(self + other) / 2`.
    pub fn midpoint(&self, other: &Self) -> Self {
        self.add(other)
            .scale(&BigRational::new(BigInt::from(1), BigInt::from(2)))
    }
}

fn normalize_defining(poly: &Polynomial) -> Polynomial {
    let var = poly.max_var();
    let p = if var == ROOT_VAR || poly.is_constant() {
        poly.clone()
    } else {
        poly.rename_var(var, ROOT_VAR)
    };
    p.square_free(ROOT_VAR).primitive()
}

/// Pick the unique candidate consistent with the (refining) interval bounds
/// of an arithmetic operation. The true result is always a candidate, so the
/// loop terminates once refinement separates it from the impostors.
fn select_root(
    candidates: Vec<AlgebraicNumber>,
    a: &AlgebraicNumber,
    b: &AlgebraicNumber,
    bounds: impl Fn(&AlgebraicNumber, &AlgebraicNumber) -> (BigRational, BigRational),
) -> AlgebraicNumber {
    let mut a = a.clone();
    let mut b = b.clone();
    let mut remaining = candidates;
    loop {
        let (lo, hi) = bounds(&a, &b);
        remaining.retain(|c| {
            c.cmp_rational(&lo) != Ordering::Less && c.cmp_rational(&hi) != Ordering::Greater
        });
        match remaining.len() {
            0 => panic!("arithmetic result lost among resultant roots"),
            1 => return remaining.swap_remove(0),
            _ => {
                a.refine();
                b.refine();
            }
        }
    }
}

/// All real roots of a polynomial univariate in `var`, in ascending order.
///
/// # Panics
///
/// Panics when given the zero polynomial.
pub fn real_roots(p: &Polynomial, var: Var) -> Vec<AlgebraicNumber> {
    assert!(!p.is_zero(), "root enumeration of the zero polynomial");
    debug_assert!(p.is_univariate());
    let f = normalize_defining(&if var == ROOT_VAR {
        p.clone()
    } else {
        p.rename_var(var, ROOT_VAR)
    });
    if f.degree(ROOT_VAR) == 0 {
        return Vec::new();
    }
    if f.degree(ROOT_VAR) == 1 {
        let a1 = f.univ_coeff(ROOT_VAR, 1);
        let a0 = f.univ_coeff(ROOT_VAR, 0);
        return vec![AlgebraicNumber::from_rational(-a0 / a1)];
    }
    let seq = f.sturm_sequence(ROOT_VAR);
    let bound = f.cauchy_bound(ROOT_VAR) + BigRational::one();
    let mut out = Vec::new();
    isolate(&f, &seq, -bound.clone(), bound, &mut out);
    out
}

fn variations(seq: &[Polynomial], at: &BigRational) -> usize {
    polynomial::sign_variations_at(seq, ROOT_VAR, at)
}

/// Recursive bisection; `f(lower)` and `f(upper)` are non-zero.
fn isolate(
    f: &Polynomial,
    seq: &[Polynomial],
    lower: BigRational,
    upper: BigRational,
    out: &mut Vec<AlgebraicNumber>,
) {
    let count = variations(seq, &lower).saturating_sub(variations(seq, &upper));
    match count {
        0 => {}
        1 => out.push(AlgebraicNumber {
            poly: f.clone(),
            lower,
            upper,
        }),
        _ => {
            let mid = (&lower + &upper) / rat_int(2);
            if eval_rat(f, &mid).is_zero() {
                let w = isolation_radius(f, seq, &mid, (&upper - &lower) / rat_int(4));
                isolate(f, seq, lower, &mid - &w, out);
                out.push(AlgebraicNumber::from_rational(mid.clone()));
                isolate(f, seq, &mid + &w, upper, out);
            } else {
                isolate(f, seq, lower, mid.clone(), out);
                isolate(f, seq, mid, upper, out);
            }
        }
    }
}

/// Shrink a radius around a known rational root until it excludes all other
/// roots and avoids roots at its endpoints.
fn isolation_radius(
    f: &Polynomial,
    seq: &[Polynomial],
    center: &BigRational,
    start: BigRational,
) -> BigRational {
    let mut w = start;
    loop {
        let a = center - &w;
        let b = center + &w;
        if !eval_rat(f, &a).is_zero()
            && !eval_rat(f, &b).is_zero()
            && variations(seq, &a).saturating_sub(variations(seq, &b)) == 1
        {
            return w;
        }
        w /= rat_int(2);
    }
}

impl PartialEq for AlgebraicNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AlgebraicNumber {}

impl PartialOrd for AlgebraicNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AlgebraicNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        if let Some(r) = other.to_rational() {
            return self.cmp_rational(&r);
        }
        if let Some(r) = self.to_rational() {
            return other.cmp_rational(&r).reverse();
        }

        // Exact equality test up front so refinement is guaranteed to part
        // unequal values.
        let g = self.poly.gcd_univariate(&other.poly, ROOT_VAR);
        if g.degree(ROOT_VAR) > 0 {
            let lo = (&self.lower).max(&other.lower).clone();
            let hi = (&self.upper).min(&other.upper).clone();
            if lo < hi && g.count_real_roots_in(ROOT_VAR, &lo, &hi) > 0 {
                return Ordering::Equal;
            }
        }

        let mut a = self.clone();
        let mut b = other.clone();
        loop {
            if a.upper <= b.lower {
                return Ordering::Less;
            }
            if b.upper <= a.lower {
                return Ordering::Greater;
            }
            a.refine();
            b.refine();
            if let Some(r) = b.to_rational() {
                return a.cmp_rational(&r);
            }
            if let Some(r) = a.to_rational() {
                return b.cmp_rational(&r).reverse();
            }
        }
    }
}

impl fmt::Debug for AlgebraicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(r) = self.to_rational() {
            write!(f, "{}", r)
        } else {
            write!(f, "root({:?}, ({}, {}))", self.poly, self.lower, self.upper)
        }
    }
}

impl fmt::Display for AlgebraicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Evaluate a multivariate polynomial at a model of algebraic values.
///
/// # Panics
///
/// Panics when a variable of the polynomial is missing from the model.
pub fn eval_alg(p: &Polynomial, model: &FxHashMap<Var, AlgebraicNumber>) -> AlgebraicNumber {
    let vars = p.vars();
    if vars
        .iter()
        .all(|v| model.get(v).is_some_and(|a| a.is_rational()))
    {
        let assignment: FxHashMap<Var, BigRational> = vars
            .iter()
            .map(|v| (*v, model[v].lower.clone()))
            .collect();
        return AlgebraicNumber::from_rational(p.eval(&assignment));
    }

    let mut sum = AlgebraicNumber::zero();
    for term in p.terms() {
        let mut val = AlgebraicNumber::from_rational(term.coeff.clone());
        for vp in term.monomial.vars() {
            let v = match model.get(&vp.var) {
                Some(v) => v,
                None => panic!("variable x{} not in model", vp.var),
            };
            val = val.mul(&v.pow(vp.power));
        }
        sum = sum.add(&val);
    }
    sum
}

/// Real roots, ascending, of `p` viewed as univariate in `var` after
/// substituting `model` into its coefficient polynomials.
///
/// Rational model entries are substituted directly. Algebraic entries are
/// eliminated one at a time against their defining polynomials: the
/// polynomial is first reduced modulo the defining polynomial, a resultant
/// produces a rational candidate polynomial (with variable-free shared
/// factors stripped when the resultant degenerates), and exact evaluation
/// filters the candidates down to the true roots.
///
/// # Panics
///
/// Panics when `p` is zero, a needed variable is missing from the model, or
/// the substituted polynomial vanishes identically (the caller is expected
/// to have established a non-vanishing leading coefficient).
pub fn real_roots_with_model(
    p: &Polynomial,
    var: Var,
    model: &FxHashMap<Var, AlgebraicNumber>,
) -> Vec<AlgebraicNumber> {
    assert!(!p.is_zero(), "root enumeration of the zero polynomial");

    let mut f = p.clone();
    let mut alg_vars: Vec<Var> = Vec::new();
    for v in p.vars() {
        if v == var {
            continue;
        }
        let value = match model.get(&v) {
            Some(value) => value,
            None => panic!("variable x{} not in model", v),
        };
        match value.to_rational() {
            Some(r) => f = f.eval_at(v, &r),
            None => alg_vars.push(v),
        }
    }
    if f.is_zero() {
        panic!("polynomial vanishes identically under the model");
    }
    if alg_vars.is_empty() {
        if f.degree(var) == 0 {
            return Vec::new();
        }
        return real_roots(&f, var);
    }

    // Candidate generation: eliminate each algebraic variable in turn.
    let mut g = f.clone();
    for &v in &alg_vars {
        if g.degree(v) == 0 {
            continue;
        }
        let value = &model[&v];
        let defining = value.defining_poly().rename_var(ROOT_VAR, v);
        if g.degree(v) >= defining.degree(v) {
            g = g.pseudo_remainder(&defining, v);
            if g.is_zero() {
                panic!("polynomial vanishes identically under the model");
            }
        }
        loop {
            let elim = g.resultant(&defining, v);
            if !elim.is_zero() {
                g = elim;
                break;
            }
            let shared = shared_factor_in(&g, &defining, v);
            if vanishes_at(&shared, v, value) {
                panic!("polynomial vanishes identically under the model");
            }
            g = match g.div_exact_in(&shared, v) {
                Some(q) => q,
                None => panic!("shared factor does not divide its source"),
            };
        }
    }

    if g.is_zero() || g.degree(var) == 0 {
        return Vec::new();
    }
    let candidates = real_roots(&g, var);

    // Exact membership filter.
    let mut full = model.clone();
    candidates
        .into_iter()
        .filter(|c| {
            full.insert(var, c.clone());
            eval_alg(&f, &full).signum() == 0
        })
        .collect()
}

/// Largest `v`-only common factor of `g` and a polynomial univariate in `v`.
///
/// A factor free of the other variables must divide every coefficient of `g`
/// grouped by its non-`v` monomial, so a chain of univariate gcds finds it.
fn shared_factor_in(g: &Polynomial, m: &Polynomial, v: Var) -> Polynomial {
    let mut groups: FxHashMap<Monomial, Vec<Term>> = FxHashMap::default();
    for term in g.terms() {
        let dv = term.monomial.degree(v);
        let rest = term
            .monomial
            .div(&Monomial::from_var_power(v, dv))
            .unwrap_or_else(Monomial::unit);
        groups
            .entry(rest)
            .or_default()
            .push(Term::new(term.coeff.clone(), Monomial::from_var_power(v, dv)));
    }
    let mut h = m.clone();
    for (_, terms) in groups {
        if h.degree(v) == 0 {
            break;
        }
        let part = Polynomial::from_terms(terms);
        h = h.gcd_univariate(&part, v);
    }
    debug_assert!(h.degree(v) > 0);
    h
}

/// Whether a polynomial univariate in `v` vanishes at an algebraic value.
fn vanishes_at(h: &Polynomial, v: Var, value: &AlgebraicNumber) -> bool {
    let h0 = h.rename_var(v, ROOT_VAR);
    if let Some(r) = value.to_rational() {
        return eval_rat(&h0, &r).is_zero();
    }
    let g = h0.gcd_univariate(value.defining_poly(), ROOT_VAR);
    if g.degree(ROOT_VAR) == 0 {
        return false;
    }
    g.count_real_roots_in(ROOT_VAR, &value.lower, &value.upper) > 0
}
