//! Multivariate polynomial arithmetic over the rationals.
//!
//! Polynomials are kept in a canonical form (terms sorted descending under
//! graded lexicographic order, like terms combined, zero terms removed), so
//! equality and hashing agree with algebraic equality and polynomials can key
//! hash maps. Leading terms under other monomial orders are obtained by
//! scanning with the requested comparator rather than by re-sorting.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

/// Variable identifier.
pub type Var = u32;

/// Sentinel for "no variable" (constant polynomials).
pub const NULL_VAR: Var = u32::MAX;

/// A variable raised to a positive power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarPower {
    /// The variable.
    pub var: Var,
    /// The exponent, always >= 1 inside a monomial.
    pub power: u32,
}

impl VarPower {
    /// Create a new variable power.
    #[inline]
    pub fn new(var: Var, power: u32) -> Self {
        Self { var, power }
    }
}

/// A product of variable powers, sorted by variable index.
///
/// The unit monomial (the constant 1) is the empty product.
#[derive(Clone, PartialEq, Eq)]
pub struct Monomial {
    vars: SmallVec<[VarPower; 4]>,
    total_degree: u32,
}

impl Monomial {
    /// The unit monomial.
    #[inline]
    pub fn unit() -> Self {
        Self {
            vars: SmallVec::new(),
            total_degree: 0,
        }
    }

    /// A single variable to the first power.
    #[inline]
    pub fn from_var(var: Var) -> Self {
        Self::from_var_power(var, 1)
    }

    /// A single variable to the given power.
    pub fn from_var_power(var: Var, power: u32) -> Self {
        if power == 0 {
            return Self::unit();
        }
        let mut vars = SmallVec::new();
        vars.push(VarPower::new(var, power));
        Self {
            vars,
            total_degree: power,
        }
    }

    /// Build a monomial from (variable, power) pairs; the input need not be
    /// sorted or combined.
    pub fn from_powers(powers: impl IntoIterator<Item = (Var, u32)>) -> Self {
        let mut merged: FxHashMap<Var, u32> = FxHashMap::default();
        for (var, power) in powers {
            if power > 0 {
                *merged.entry(var).or_insert(0) += power;
            }
        }
        let mut vars: SmallVec<[VarPower; 4]> = merged
            .into_iter()
            .map(|(v, p)| VarPower::new(v, p))
            .collect();
        vars.sort_by_key(|vp| vp.var);
        let total_degree = vars.iter().map(|vp| vp.power).sum();
        Self { vars, total_degree }
    }

    /// Whether this is the unit monomial.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.vars.is_empty()
    }

    /// Sum of all exponents.
    #[inline]
    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// The variable-power pairs, sorted by variable.
    #[inline]
    pub fn vars(&self) -> &[VarPower] {
        &self.vars
    }

    /// Exponent of a specific variable (0 if absent).
    pub fn degree(&self, var: Var) -> u32 {
        self.vars
            .iter()
            .find(|vp| vp.var == var)
            .map(|vp| vp.power)
            .unwrap_or(0)
    }

    /// Largest variable index, or [`NULL_VAR`] for the unit monomial.
    pub fn max_var(&self) -> Var {
        self.vars.last().map(|vp| vp.var).unwrap_or(NULL_VAR)
    }

    /// Product of two monomials.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        if self.is_unit() {
            return other.clone();
        }
        if other.is_unit() {
            return self.clone();
        }
        Monomial::from_powers(
            self.vars
                .iter()
                .chain(other.vars.iter())
                .map(|vp| (vp.var, vp.power)),
        )
    }

    /// Quotient `self / other` if `other` divides `self`.
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        if other.is_unit() {
            return Some(self.clone());
        }
        let mut result: SmallVec<[VarPower; 4]> = SmallVec::new();
        let mut j = 0;
        for vp in &self.vars {
            while j < other.vars.len() && other.vars[j].var < vp.var {
                return None;
            }
            if j < other.vars.len() && other.vars[j].var == vp.var {
                if vp.power < other.vars[j].power {
                    return None;
                }
                let rest = vp.power - other.vars[j].power;
                if rest > 0 {
                    result.push(VarPower::new(vp.var, rest));
                }
                j += 1;
            } else {
                result.push(*vp);
            }
        }
        if j < other.vars.len() {
            return None;
        }
        let total_degree = result.iter().map(|vp| vp.power).sum();
        Some(Monomial {
            vars: result,
            total_degree,
        })
    }

    /// Monomial power.
    pub fn pow(&self, n: u32) -> Monomial {
        if n == 0 {
            return Monomial::unit();
        }
        let vars: SmallVec<[VarPower; 4]> = self
            .vars
            .iter()
            .map(|vp| VarPower::new(vp.var, vp.power * n))
            .collect();
        Monomial {
            total_degree: self.total_degree * n,
            vars,
        }
    }

    /// Lexicographic comparison.
    pub fn lex_cmp(&self, other: &Monomial) -> Ordering {
        let mut i = 0;
        let mut j = 0;
        while i < self.vars.len() && j < other.vars.len() {
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => match self.vars[i].power.cmp(&other.vars[j].power) {
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                    }
                    ord => return ord,
                },
            }
        }
        if i < self.vars.len() {
            Ordering::Greater
        } else if j < other.vars.len() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Graded lexicographic comparison.
    pub fn grlex_cmp(&self, other: &Monomial) -> Ordering {
        self.total_degree
            .cmp(&other.total_degree)
            .then_with(|| self.lex_cmp(other))
    }

    /// Graded reverse lexicographic comparison.
    pub fn grevlex_cmp(&self, other: &Monomial) -> Ordering {
        match self.total_degree.cmp(&other.total_degree) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // Equal degree: smaller power of the largest differing variable wins.
        let mut i = self.vars.len();
        let mut j = other.vars.len();
        while i > 0 && j > 0 {
            i -= 1;
            j -= 1;
            match self.vars[i].var.cmp(&other.vars[j].var) {
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => match self.vars[i].power.cmp(&other.vars[j].power) {
                    Ordering::Equal => {}
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                },
            }
        }
        if i > 0 {
            Ordering::Less
        } else if j > 0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl Hash for Monomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for vp in &self.vars {
            vp.hash(state);
        }
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unit() {
            return write!(f, "1");
        }
        for (i, vp) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if vp.power == 1 {
                write!(f, "x{}", vp.var)?;
            } else {
                write!(f, "x{}^{}", vp.var, vp.power)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A coefficient together with a monomial.
#[derive(Clone, PartialEq, Eq)]
pub struct Term {
    /// Rational coefficient, never zero inside a polynomial.
    pub coeff: BigRational,
    /// Monomial part.
    pub monomial: Monomial,
}

impl Term {
    /// Create a term.
    #[inline]
    pub fn new(coeff: BigRational, monomial: Monomial) -> Self {
        Self { coeff, monomial }
    }

    /// A constant term.
    #[inline]
    pub fn constant(c: BigRational) -> Self {
        Self::new(c, Monomial::unit())
    }

    /// Whether the coefficient is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }
}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coeff.numer().hash(state);
        self.coeff.denom().hash(state);
        self.monomial.hash(state);
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.monomial.is_unit() {
            write!(f, "{}", self.coeff)
        } else if self.coeff.is_one() {
            write!(f, "{:?}", self.monomial)
        } else if self.coeff == -BigRational::one() {
            write!(f, "-{:?}", self.monomial)
        } else {
            write!(f, "{}*{:?}", self.coeff, self.monomial)
        }
    }
}

/// Monomial orders understood by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonomialOrder {
    /// Lexicographic.
    Lex,
    /// Graded lexicographic (the canonical storage order).
    #[default]
    GrLex,
    /// Graded reverse lexicographic.
    GRevLex,
}

impl MonomialOrder {
    /// Compare two monomials under this order.
    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        match self {
            MonomialOrder::Lex => a.lex_cmp(b),
            MonomialOrder::GrLex => a.grlex_cmp(b),
            MonomialOrder::GRevLex => a.grevlex_cmp(b),
        }
    }
}

/// A multivariate polynomial over `BigRational`, stored as a canonical term
/// list (descending grlex, like terms combined, no zero terms).
#[derive(Clone)]
pub struct Polynomial {
    terms: Vec<Term>,
}

impl Polynomial {
    /// The zero polynomial.
    #[inline]
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// The constant 1.
    #[inline]
    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    /// A constant polynomial.
    pub fn constant(c: BigRational) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![Term::constant(c)],
            }
        }
    }

    /// The polynomial `x_var`.
    pub fn from_var(var: Var) -> Self {
        Self {
            terms: vec![Term::new(BigRational::one(), Monomial::from_var(var))],
        }
    }

    /// The polynomial `x_var^power`.
    pub fn from_var_power(var: Var, power: u32) -> Self {
        if power == 0 {
            Self::one()
        } else {
            Self {
                terms: vec![Term::new(
                    BigRational::one(),
                    Monomial::from_var_power(var, power),
                )],
            }
        }
    }

    /// Build from arbitrary terms; normalizes into canonical form.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut poly = Self {
            terms: terms.into_iter().filter(|t| !t.is_zero()).collect(),
        };
        poly.normalize();
        poly
    }

    /// Build from integer coefficients and power lists, e.g.
    /// `from_coeffs_int(&[(1, &[(0, 2)]), (-1, &[])])` for `x0^2 - 1`.
    pub fn from_coeffs_int(coeffs: &[(i64, &[(Var, u32)])]) -> Self {
        Self::from_terms(coeffs.iter().map(|(c, powers)| {
            Term::new(
                BigRational::from_integer(BigInt::from(*c)),
                Monomial::from_powers(powers.iter().copied()),
            )
        }))
    }

    /// Univariate polynomial with `coeffs[i]` the coefficient of `var^i`.
    pub fn univariate(var: Var, coeffs: &[BigRational]) -> Self {
        Self::from_terms(coeffs.iter().enumerate().filter(|(_, c)| !c.is_zero()).map(
            |(i, c)| Term::new(c.clone(), Monomial::from_var_power(var, i as u32)),
        ))
    }

    /// Whether this is the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether this is a non-zero constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].monomial.is_unit()
    }

    /// Constant value of a constant (or zero) polynomial.
    pub fn constant_value(&self) -> BigRational {
        if self.is_constant() {
            self.terms[0].coeff.clone()
        } else {
            BigRational::zero()
        }
    }

    /// Whether this is the constant 1.
    pub fn is_one(&self) -> bool {
        self.is_constant() && self.terms[0].coeff.is_one()
    }

    /// Whether at most one distinct variable occurs.
    pub fn is_univariate(&self) -> bool {
        let mut seen: Option<Var> = None;
        for term in &self.terms {
            for vp in term.monomial.vars() {
                match seen {
                    None => seen = Some(vp.var),
                    Some(v) if v != vp.var => return false,
                    _ => {}
                }
            }
        }
        true
    }

    /// Number of terms.
    #[inline]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The canonical term list (descending grlex).
    #[inline]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Total degree (0 for the zero polynomial).
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Degree in a specific variable.
    pub fn degree(&self, var: Var) -> u32 {
        self.terms
            .iter()
            .map(|t| t.monomial.degree(var))
            .max()
            .unwrap_or(0)
    }

    /// Largest variable occurring, or [`NULL_VAR`].
    pub fn max_var(&self) -> Var {
        self.terms
            .iter()
            .map(|t| t.monomial.max_var())
            .filter(|&v| v != NULL_VAR)
            .max()
            .unwrap_or(NULL_VAR)
    }

    /// All variables occurring, ascending.
    pub fn vars(&self) -> Vec<Var> {
        let mut vars: Vec<Var> = self
            .terms
            .iter()
            .flat_map(|t| t.monomial.vars().iter().map(|vp| vp.var))
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Leading term under the canonical (grlex) order.
    #[inline]
    pub fn leading_term(&self) -> Option<&Term> {
        self.terms.first()
    }

    /// Leading coefficient under the canonical (grlex) order.
    pub fn leading_coeff(&self) -> BigRational {
        self.terms
            .first()
            .map(|t| t.coeff.clone())
            .unwrap_or_else(BigRational::zero)
    }

    /// Leading term under an arbitrary monomial order, found by scanning.
    pub fn leading_term_under(&self, order: MonomialOrder) -> Option<&Term> {
        self.terms
            .iter()
            .max_by(|a, b| order.compare(&a.monomial, &b.monomial))
    }

    /// Polynomial coefficient of `var^k`: for `p(y_1, .., y_n, x)` this is
    /// the coefficient of `x^k` as a polynomial in the remaining variables.
    pub fn coeff(&self, var: Var, k: u32) -> Polynomial {
        Polynomial::from_terms(self.terms.iter().filter(|t| t.monomial.degree(var) == k).map(
            |t| {
                let rest = t
                    .monomial
                    .div(&Monomial::from_var_power(var, k))
                    .unwrap_or_else(Monomial::unit);
                Term::new(t.coeff.clone(), rest)
            },
        ))
    }

    /// Rational coefficient of `var^k`, for polynomials univariate in `var`.
    pub fn univ_coeff(&self, var: Var, k: u32) -> BigRational {
        for term in &self.terms {
            if term.monomial.degree(var) == k && term.monomial.vars().len() <= 1 {
                return term.coeff.clone();
            }
        }
        BigRational::zero()
    }

    fn normalize(&mut self) {
        self.terms
            .sort_by(|a, b| b.monomial.grlex_cmp(&a.monomial));
        let mut i = 0;
        while i < self.terms.len() {
            let mut j = i + 1;
            while j < self.terms.len() && self.terms[j].monomial == self.terms[i].monomial {
                let coeff = std::mem::replace(&mut self.terms[j].coeff, BigRational::zero());
                self.terms[i].coeff += coeff;
                j += 1;
            }
            self.terms.drain((i + 1)..j);
            i += 1;
        }
        self.terms.retain(|t| !t.coeff.is_zero());
    }

    /// Additive inverse.
    pub fn neg(&self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(-t.coeff.clone(), t.monomial.clone()))
                .collect(),
        }
    }

    /// Sum of two polynomials.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Polynomial::from_terms(terms)
    }

    /// Difference of two polynomials.
    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.neg())
    }

    /// Scalar multiple.
    pub fn scale(&self, c: &BigRational) -> Polynomial {
        if c.is_zero() {
            return Polynomial::zero();
        }
        if c.is_one() {
            return self.clone();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(&t.coeff * c, t.monomial.clone()))
                .collect(),
        }
    }

    /// Product of two polynomials.
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for t1 in &self.terms {
            for t2 in &other.terms {
                terms.push(Term::new(&t1.coeff * &t2.coeff, t1.monomial.mul(&t2.monomial)));
            }
        }
        Polynomial::from_terms(terms)
    }

    /// Multiply by a monomial. Cheaper than a general product.
    pub fn mul_monomial(&self, m: &Monomial) -> Polynomial {
        if m.is_unit() {
            return self.clone();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(t.coeff.clone(), t.monomial.mul(m)))
                .collect(),
        }
    }

    /// Polynomial power by repeated squaring.
    pub fn pow(&self, k: u32) -> Polynomial {
        if k == 0 {
            return Polynomial::one();
        }
        let mut base = self.clone();
        let mut result = Polynomial::one();
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                result = Polynomial::mul(&result, &base);
            }
            k >>= 1;
            if k > 0 {
                base = Polynomial::mul(&base, &base);
            }
        }
        result
    }

    /// Divide through by the grlex leading coefficient.
    pub fn make_monic(&self) -> Polynomial {
        if self.is_zero() {
            return self.clone();
        }
        let lc = self.leading_coeff();
        if lc.is_one() {
            return self.clone();
        }
        self.scale(&(BigRational::one() / lc))
    }

    /// Formal derivative with respect to a variable.
    pub fn derivative(&self, var: Var) -> Polynomial {
        Polynomial::from_terms(self.terms.iter().filter_map(|t| {
            let d = t.monomial.degree(var);
            if d == 0 {
                return None;
            }
            let coeff = &t.coeff * BigRational::from_integer(BigInt::from(d));
            let monomial = Monomial::from_powers(
                t.monomial
                    .vars()
                    .iter()
                    .map(|vp| {
                        if vp.var == var {
                            (vp.var, vp.power - 1)
                        } else {
                            (vp.var, vp.power)
                        }
                    })
                    .filter(|(_, p)| *p > 0),
            );
            Some(Term::new(coeff, monomial))
        }))
    }

    /// Substitute a rational value for one variable.
    pub fn eval_at(&self, var: Var, value: &BigRational) -> Polynomial {
        Polynomial::from_terms(self.terms.iter().map(|t| {
            let d = t.monomial.degree(var);
            if d == 0 {
                t.clone()
            } else {
                let coeff = &t.coeff * value.pow(d as i32);
                let rest = t
                    .monomial
                    .div(&Monomial::from_var_power(var, d))
                    .unwrap_or_else(Monomial::unit);
                Term::new(coeff, rest)
            }
        }))
    }

    /// Evaluate with every variable assigned.
    ///
    /// # Panics
    ///
    /// Panics if a variable of the polynomial is missing from the assignment.
    pub fn eval(&self, assignment: &FxHashMap<Var, BigRational>) -> BigRational {
        let mut result = BigRational::zero();
        for term in &self.terms {
            let mut val = term.coeff.clone();
            for vp in term.monomial.vars() {
                match assignment.get(&vp.var) {
                    Some(v) => val *= v.pow(vp.power as i32),
                    None => panic!("variable x{} not in assignment", vp.var),
                }
            }
            result += val;
        }
        result
    }

    /// Substitute a polynomial for a variable.
    pub fn substitute(&self, var: Var, replacement: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for term in &self.terms {
            let d = term.monomial.degree(var);
            if d == 0 {
                result = Polynomial::add(&result, &Polynomial::from_terms([term.clone()]));
            } else {
                let rest = term
                    .monomial
                    .div(&Monomial::from_var_power(var, d))
                    .unwrap_or_else(Monomial::unit);
                let carrier = Polynomial::from_terms([Term::new(term.coeff.clone(), rest)]);
                result = Polynomial::add(&result, &Polynomial::mul(&carrier, &replacement.pow(d)));
            }
        }
        result
    }

    /// GCD of the integer parts of all coefficients, for content stripping.
    pub fn integer_content(&self) -> BigRational {
        if self.terms.is_empty() {
            return BigRational::one();
        }
        let mut num_gcd = BigInt::zero();
        let mut den_lcm = BigInt::one();
        for term in &self.terms {
            num_gcd = gcd_bigint(&num_gcd, term.coeff.numer());
            den_lcm = lcm_bigint(&den_lcm, term.coeff.denom());
        }
        if num_gcd.is_zero() {
            BigRational::one()
        } else {
            BigRational::new(num_gcd, den_lcm)
        }
    }

    /// Divide out the integer content; the sign of the leading coefficient is
    /// preserved.
    pub fn primitive(&self) -> Polynomial {
        if self.is_zero() {
            return self.clone();
        }
        let content = self.integer_content();
        self.scale(&(BigRational::one() / content))
    }

    /// Pseudo-division with respect to `var`: returns `(q, r)` with
    /// `lc^s * self = q * divisor + r`, `deg_var(r) < deg_var(divisor)`,
    /// where `lc` is `divisor`'s polynomial leading coefficient in `var` and
    /// `s` is the number of reduction steps taken.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    pub fn pseudo_div(&self, divisor: &Polynomial, var: Var) -> (Polynomial, Polynomial) {
        assert!(!divisor.is_zero(), "pseudo-division by zero polynomial");
        let dd = divisor.degree(var);
        if self.is_zero() || self.degree(var) < dd {
            return (Polynomial::zero(), self.clone());
        }
        let lc = divisor.coeff(var, dd);
        let mut q = Polynomial::zero();
        let mut r = self.clone();
        while !r.is_zero() && r.degree(var) >= dd {
            let dr = r.degree(var);
            let cr = r.coeff(var, dr);
            let shift = Monomial::from_var_power(var, dr - dd);
            let step = cr.mul_monomial(&shift);
            q = Polynomial::add(&Polynomial::mul(&lc, &q), &step);
            r = Polynomial::sub(&Polynomial::mul(&lc, &r), &Polynomial::mul(&step, divisor));
            debug_assert!(r.is_zero() || r.degree(var) < dr);
        }
        (q, r)
    }

    /// Remainder of [`Polynomial::pseudo_div`].
    pub fn pseudo_remainder(&self, divisor: &Polynomial, var: Var) -> Polynomial {
        self.pseudo_div(divisor, var).1
    }

    /// Euclidean remainder for polynomials univariate in `var` over ℚ.
    pub fn rem_univariate(&self, divisor: &Polynomial, var: Var) -> Polynomial {
        assert!(!divisor.is_zero(), "division by zero polynomial");
        let dd = divisor.degree(var);
        let lc = divisor.univ_coeff(var, dd);
        let mut r = self.clone();
        while !r.is_zero() && r.degree(var) >= dd {
            let dr = r.degree(var);
            let cr = r.univ_coeff(var, dr);
            let factor = cr / &lc;
            let step = divisor
                .scale(&factor)
                .mul_monomial(&Monomial::from_var_power(var, dr - dd));
            r = Polynomial::sub(&r, &step);
        }
        r
    }

    /// Exact quotient for polynomials univariate in `var` over ℚ, or `None`
    /// when the division leaves a remainder.
    pub fn div_exact_univariate(&self, divisor: &Polynomial, var: Var) -> Option<Polynomial> {
        assert!(!divisor.is_zero(), "division by zero polynomial");
        let dd = divisor.degree(var);
        let lc = divisor.univ_coeff(var, dd);
        let mut q = Polynomial::zero();
        let mut r = self.clone();
        while !r.is_zero() && r.degree(var) >= dd {
            let dr = r.degree(var);
            let cr = r.univ_coeff(var, dr);
            let factor = cr / &lc;
            let step = Polynomial::from_terms([Term::new(
                factor,
                Monomial::from_var_power(var, dr - dd),
            )]);
            q = Polynomial::add(&q, &step);
            r = Polynomial::sub(&r, &Polynomial::mul(&step, divisor));
        }
        if r.is_zero() { Some(q) } else { None }
    }

    /// Exact quotient by a divisor univariate in `var` with rational
    /// coefficients; the dividend may involve other variables. Returns
    /// `None` when the division leaves a remainder.
    pub fn div_exact_in(&self, divisor: &Polynomial, var: Var) -> Option<Polynomial> {
        assert!(!divisor.is_zero(), "division by zero polynomial");
        let dd = divisor.degree(var);
        let lc = divisor.univ_coeff(var, dd);
        let inv = BigRational::one() / lc;
        let mut q = Polynomial::zero();
        let mut r = self.clone();
        while !r.is_zero() && r.degree(var) >= dd {
            let dr = r.degree(var);
            let step = r
                .coeff(var, dr)
                .scale(&inv)
                .mul_monomial(&Monomial::from_var_power(var, dr - dd));
            q = Polynomial::add(&q, &step);
            r = Polynomial::sub(&r, &Polynomial::mul(&step, divisor));
        }
        if r.is_zero() { Some(q) } else { None }
    }

    /// Rename a variable. The target variable must not already occur.
    pub fn rename_var(&self, from: Var, to: Var) -> Polynomial {
        debug_assert!(from == to || !self.vars().contains(&to));
        Polynomial::from_terms(self.terms.iter().map(|t| {
            let monomial = Monomial::from_powers(t.monomial.vars().iter().map(|vp| {
                if vp.var == from {
                    (to, vp.power)
                } else {
                    (vp.var, vp.power)
                }
            }));
            Term::new(t.coeff.clone(), monomial)
        }))
    }

    /// Monic GCD of two polynomials univariate in `var` over ℚ.
    pub fn gcd_univariate(&self, other: &Polynomial, var: Var) -> Polynomial {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.rem_univariate(&b, var);
            a = b;
            b = r;
        }
        if a.is_zero() { a } else { a.make_monic() }
    }

    /// Square-free part of a polynomial univariate in `var` over ℚ.
    pub fn square_free(&self, var: Var) -> Polynomial {
        if self.is_zero() || self.degree(var) == 0 {
            return self.clone();
        }
        let deriv = self.derivative(var);
        let g = self.gcd_univariate(&deriv, var);
        if g.degree(var) == 0 {
            return self.primitive();
        }
        match self.div_exact_univariate(&g, var) {
            Some(q) => q.primitive(),
            None => self.primitive(),
        }
    }

    /// Sturm sequence of a polynomial univariate in `var` over ℚ.
    ///
    /// Successive elements are negated euclidean remainders, scaled by
    /// positive rationals to keep coefficients small; sign variations at a
    /// point therefore count roots per Sturm's theorem.
    pub fn sturm_sequence(&self, var: Var) -> Vec<Polynomial> {
        if self.is_zero() || self.degree(var) == 0 {
            return vec![self.clone()];
        }
        let mut seq = vec![self.clone(), self.derivative(var)];
        loop {
            let n = seq.len();
            let r = seq[n - 2].rem_univariate(&seq[n - 1], var);
            if r.is_zero() {
                break;
            }
            // Positive rescaling only, so sign variations are preserved.
            let content = r.integer_content();
            seq.push(r.scale(&(BigRational::one() / content.abs())).neg());
        }
        seq
    }

    /// Number of distinct real roots in the open interval `(a, b)`, for a
    /// square-free polynomial univariate in `var` with `p(a) != 0` and
    /// `p(b) != 0`.
    pub fn count_real_roots_in(&self, var: Var, a: &BigRational, b: &BigRational) -> usize {
        if self.is_zero() {
            return 0;
        }
        let seq = self.sturm_sequence(var);
        let va = sign_variations_at(&seq, var, a);
        let vb = sign_variations_at(&seq, var, b);
        va.saturating_sub(vb)
    }

    /// Cauchy root bound: every real root of this polynomial (univariate in
    /// `var`) has absolute value strictly below the returned value.
    pub fn cauchy_bound(&self, var: Var) -> BigRational {
        let d = self.degree(var);
        if d == 0 {
            return BigRational::one();
        }
        let lc = self.univ_coeff(var, d).abs();
        let mut max_ratio = BigRational::zero();
        for k in 0..d {
            let ratio = self.univ_coeff(var, k).abs() / &lc;
            if ratio > max_ratio {
                max_ratio = ratio;
            }
        }
        BigRational::one() + max_ratio
    }

    /// Resultant-style eliminant of two polynomials with respect to `var`,
    /// computed by a pseudo-remainder sequence with integer content
    /// stripping.
    ///
    /// The result vanishes wherever the true resultant vanishes (the
    /// pseudo-division steps may contribute extra factors built from leading
    /// coefficients), which is exactly the superset contract the root-finding
    /// consumers need. Returns zero iff the inputs share a factor of positive
    /// degree in `var`.
    pub fn resultant(&self, other: &Polynomial, var: Var) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        let dp = self.degree(var);
        let dq = other.degree(var);
        if dp == 0 {
            return self.pow(dq);
        }
        if dq == 0 {
            return other.pow(dp);
        }
        let mut a = self.primitive();
        let mut b = other.primitive();
        if a.degree(var) < b.degree(var) {
            std::mem::swap(&mut a, &mut b);
        }
        loop {
            let r = a.pseudo_remainder(&b, var).primitive();
            if r.is_zero() {
                // Shared factor of positive degree in `var`.
                return if b.degree(var) > 0 {
                    Polynomial::zero()
                } else {
                    b.pow(a.degree(var))
                };
            }
            if r.degree(var) == 0 {
                return r;
            }
            a = b;
            b = r;
        }
    }
}

/// Sign variations of a polynomial sequence evaluated at a rational point.
pub(crate) fn sign_variations_at(seq: &[Polynomial], var: Var, point: &BigRational) -> usize {
    let signs: Vec<i8> = seq
        .iter()
        .map(|p| {
            let v = p.eval_at(var, point).constant_value();
            if v.is_positive() {
                1
            } else if v.is_negative() {
                -1
            } else {
                0
            }
        })
        .filter(|&s| s != 0)
        .collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

fn gcd_bigint(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

fn lcm_bigint(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    (a * b).abs() / gcd_bigint(a, b)
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for Polynomial {}

impl Hash for Polynomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.terms.len().hash(state);
        for term in &self.terms {
            term.hash(state);
        }
    }
}

impl PartialOrd for Polynomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order on canonical term lists (leading monomials first), used for
/// deterministic iteration, not for algebraic comparison.
impl Ord for Polynomial {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut i = 0;
        loop {
            match (self.terms.get(i), other.terms.get(i)) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => {
                    match a
                        .monomial
                        .grlex_cmp(&b.monomial)
                        .then_with(|| a.coeff.cmp(&b.coeff))
                    {
                        Ordering::Equal => i += 1,
                        ord => return ord,
                    }
                }
            }
        }
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i == 0 {
                write!(f, "{:?}", term)?;
            } else if term.coeff.is_negative() {
                write!(f, " - {:?}", Term::new(-term.coeff.clone(), term.monomial.clone()))?;
            } else {
                write!(f, " + {:?}", term)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        Polynomial::neg(&self)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        Polynomial::neg(self)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: Self) -> Polynomial {
        Polynomial::add(&self, &rhs)
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::add(self, rhs)
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: Self) -> Polynomial {
        Polynomial::sub(&self, &rhs)
    }
}

impl Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::sub(self, rhs)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: Self) -> Polynomial {
        Polynomial::mul(&self, &rhs)
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        Polynomial::mul(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn upoly(var: Var, coeffs: &[i64]) -> Polynomial {
        Polynomial::univariate(var, &coeffs.iter().map(|&c| rat(c)).collect::<Vec<_>>())
    }

    #[test]
    fn test_monomial_orders() {
        let x2 = Monomial::from_var_power(0, 2);
        let xy = Monomial::from_powers([(0, 1), (1, 1)]);
        let y2 = Monomial::from_var_power(1, 2);

        // grlex on equal degree falls back to lex: x^2 > xy > y^2
        assert_eq!(x2.grlex_cmp(&xy), Ordering::Greater);
        assert_eq!(xy.grlex_cmp(&y2), Ordering::Greater);

        // grevlex agrees on these, differs in general
        assert_eq!(x2.grevlex_cmp(&xy), Ordering::Greater);

        // classic grevlex vs grlex separation: x*z^2 vs y^2*z
        let xz2 = Monomial::from_powers([(0, 1), (2, 2)]);
        let y2z = Monomial::from_powers([(1, 2), (2, 1)]);
        assert_eq!(xz2.grlex_cmp(&y2z), Ordering::Greater);
        assert_eq!(xz2.grevlex_cmp(&y2z), Ordering::Less);
    }

    #[test]
    fn test_monomial_div() {
        let m1 = Monomial::from_powers([(0, 3), (1, 1)]);
        let m2 = Monomial::from_var_power(0, 2);
        let q = m1.div(&m2).unwrap();
        assert_eq!(q.degree(0), 1);
        assert_eq!(q.degree(1), 1);
        assert!(m2.div(&m1).is_none());
    }

    #[test]
    fn test_canonical_equality() {
        let p = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (2, &[])]);
        let q = Polynomial::from_coeffs_int(&[(2, &[]), (1, &[(0, 1)])]);
        assert_eq!(p, q);

        let mut map: FxHashMap<Polynomial, i32> = FxHashMap::default();
        map.insert(p, 7);
        assert_eq!(map.get(&q), Some(&7));
    }

    #[test]
    fn test_arithmetic() {
        let p = upoly(0, &[1, 1]); // x + 1
        let q = upoly(0, &[-1, 1]); // x - 1
        let prod = &p * &q;
        assert_eq!(prod, upoly(0, &[-1, 0, 1]));
        assert_eq!(&prod + &Polynomial::one(), upoly(0, &[0, 0, 1]));
        assert_eq!(p.pow(2), upoly(0, &[1, 2, 1]));
    }

    #[test]
    fn test_coeff_extraction() {
        // p = (y + 1) x^2 + y x - 3
        let p = Polynomial::from_coeffs_int(&[
            (1, &[(0, 2), (1, 1)]),
            (1, &[(0, 2)]),
            (1, &[(0, 1), (1, 1)]),
            (-3, &[]),
        ]);
        assert_eq!(p.degree(0), 2);
        assert_eq!(p.coeff(0, 2), Polynomial::from_coeffs_int(&[(1, &[(1, 1)]), (1, &[])]));
        assert_eq!(p.coeff(0, 1), Polynomial::from_coeffs_int(&[(1, &[(1, 1)])]));
        assert_eq!(p.coeff(0, 0), Polynomial::constant(rat(-3)));
    }

    #[test]
    fn test_derivative() {
        let p = upoly(0, &[5, -3, 0, 2]); // 2x^3 - 3x + 5
        assert_eq!(p.derivative(0), upoly(0, &[-3, 0, 6]));
        assert!(Polynomial::constant(rat(4)).derivative(0).is_zero());
    }

    #[test]
    fn test_eval_and_substitute() {
        let p = Polynomial::from_coeffs_int(&[(1, &[(0, 2)]), (1, &[(1, 1)])]); // x^2 + y
        let at = p.eval_at(0, &rat(3));
        assert_eq!(at, Polynomial::from_coeffs_int(&[(1, &[(1, 1)]), (9, &[])]));

        let mut m = FxHashMap::default();
        m.insert(0, rat(3));
        m.insert(1, rat(-2));
        assert_eq!(p.eval(&m), rat(7));

        // substitute x -> y + 1 into x^2: (y + 1)^2
        let x2 = upoly(0, &[0, 0, 1]);
        let rep = Polynomial::from_coeffs_int(&[(1, &[(1, 1)]), (1, &[])]);
        assert_eq!(x2.substitute(0, &rep), Polynomial::from_coeffs_int(&[(1, &[(1, 2)]), (2, &[(1, 1)]), (1, &[])]));
    }

    #[test]
    fn test_pseudo_div_identity() {
        // a = x^3 + x + 1, b = 2x + 1 over the rationals
        let a = upoly(0, &[1, 1, 0, 1]);
        let b = upoly(0, &[1, 2]);
        let (q, r) = a.pseudo_div(&b, 0);
        // lc(b)^s * a = q * b + r for s reduction steps (here 3)
        let lhs = a.scale(&rat(8));
        let rhs = (&q * &b) + r.clone();
        assert_eq!(lhs, rhs);
        assert!(r.degree(0) < b.degree(0));
    }

    #[test]
    fn test_pseudo_div_poly_coeffs() {
        // a = y x^2 - 1, b = x + y, eliminating x
        let a = Polynomial::from_coeffs_int(&[(1, &[(0, 2), (1, 1)]), (-1, &[])]);
        let b = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (1, &[(1, 1)])]);
        let (q, r) = a.pseudo_div(&b, 0);
        assert_eq!(r.degree(0), 0);
        // identity with lc(b) = 1: a = q*b + r
        assert_eq!(a, (&q * &b) + r);
    }

    #[test]
    fn test_rem_and_gcd_univariate() {
        // gcd(x^2 - 1, x^2 - 2x + 1) = x - 1
        let a = upoly(0, &[-1, 0, 1]);
        let b = upoly(0, &[1, -2, 1]);
        let g = a.gcd_univariate(&b, 0);
        assert_eq!(g, upoly(0, &[-1, 1]));

        let q = a.div_exact_univariate(&g, 0).unwrap();
        assert_eq!(q, upoly(0, &[1, 1]));
        assert!(a.div_exact_univariate(&upoly(0, &[0, 0, 0, 1]), 0).is_none());
    }

    #[test]
    fn test_square_free() {
        // (x - 1)^2 (x + 2) squarefrees to (x - 1)(x + 2) up to content
        let p = upoly(0, &[-1, 1]).pow(2) * upoly(0, &[2, 1]);
        let sf = p.square_free(0);
        assert_eq!(sf.degree(0), 2);
        assert!(sf.gcd_univariate(&sf.derivative(0), 0).degree(0) == 0);
    }

    #[test]
    fn test_sturm_count() {
        // x^3 - x has roots -1, 0, 1
        let p = upoly(0, &[0, -1, 0, 1]);
        assert_eq!(p.count_real_roots_in(0, &rat(-2), &rat(2)), 3);
        assert_eq!(p.count_real_roots_in(0, &BigRational::new(BigInt::from(1), BigInt::from(2)), &rat(2)), 1);
        // x^2 + 1 has none
        let q = upoly(0, &[1, 0, 1]);
        assert_eq!(q.count_real_roots_in(0, &rat(-10), &rat(10)), 0);
    }

    #[test]
    fn test_cauchy_bound() {
        let p = upoly(0, &[-6, 5, 1]); // roots -6 and 1
        let b = p.cauchy_bound(0);
        assert!(b > rat(6));
    }

    #[test]
    fn test_resultant_common_root() {
        // res_x(x^2 - 2, x - y) vanishes at y = ±√2, i.e. equals ±(y^2 - 2)
        let p = upoly(0, &[-2, 0, 1]);
        let q = Polynomial::from_coeffs_int(&[(1, &[(0, 1)]), (-1, &[(1, 1)])]);
        let r = p.resultant(&q, 0);
        assert_eq!(r.degree(1), 2);
        assert!(r.eval_at(1, &rat(0)).constant_value() != BigRational::zero());
        let sqrt2_sq = r.substitute(1, &upoly(1, &[0, 1]));
        // y^2 - 2 divides the eliminant
        let g = sqrt2_sq.gcd_univariate(&upoly(1, &[-2, 0, 1]), 1);
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn test_resultant_shared_factor_is_zero() {
        let p = upoly(0, &[-1, 0, 1]); // (x-1)(x+1)
        let q = upoly(0, &[-1, 1]); // x - 1
        assert!(p.resultant(&q, 0).is_zero() || p.resultant(&q, 0).degree(0) == 0);
        // identical polynomials share a factor
        assert!(p.resultant(&p, 0).is_zero());
    }

    #[test]
    fn test_primitive() {
        let p = upoly(0, &[4, 6]).scale(&BigRational::new(BigInt::from(1), BigInt::from(3)));
        let prim = p.primitive();
        assert_eq!(prim, upoly(0, &[2, 3]));
    }
}
