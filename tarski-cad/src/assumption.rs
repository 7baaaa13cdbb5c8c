//! Symbolic assumptions about parameter polynomials, and the branching
//! discipline of the search.
//!
//! An [`Assumption`] is an immutable snapshot of what the current search
//! branch takes for granted about the coefficient polynomials: a set of
//! feasible signs per polynomial, plus a Gröbner basis of polynomials known
//! to vanish. Every engine operation consumes an assumption and either
//! returns a narrowed copy ([`Assumption::assume`], `None` prunes the
//! branch) or fans out into alternatives ([`Assumption::sign_of_coeff`]).
//! The [`Branches`] alias is the enumeration of all surviving
//! `(value, assumption)` pairs of such an operation; depth-first search over
//! it replaces global mutable state.

use crate::sign::{Sign, SignSet};
use rustc_hash::FxHashMap;
use tarski_math::grobner::{grobner_basis, reduce};
use tarski_math::polynomial::Polynomial;

/// All surviving alternatives of a non-deterministic step, each with the
/// assumption it holds under.
pub type Branches<T> = Vec<(T, Assumption)>;

/// Sign and vanishing facts about parameter polynomials.
///
/// Invariants:
/// - `sign_map` keys are reduced modulo `zero_basis`, monic under grlex, and
///   non-constant; no value is empty or the singleton `{Zero}` (such entries
///   are absorbed into `zero_basis`).
/// - `zero_basis` is a Gröbner basis under grevlex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assumption {
    sign_map: FxHashMap<Polynomial, SignSet>,
    zero_basis: Vec<Polynomial>,
}

impl Assumption {
    /// The empty assumption: nothing is known.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce a polynomial modulo the basis of known zeros.
    pub fn reduce(&self, p: &Polynomial) -> Polynomial {
        reduce(p, &self.zero_basis)
    }

    /// The recorded feasible signs of a polynomial, if any.
    pub fn known_signs(&self, p: &Polynomial) -> Option<SignSet> {
        self.sign_map.get(p).copied()
    }

    /// The polynomials known to vanish.
    pub fn zero_basis(&self) -> &[Polynomial] {
        &self.zero_basis
    }

    /// Narrow the assumption with the fact "the sign of `p` lies in `signs`".
    ///
    /// Returns the narrowed assumption, or `None` when the fact contradicts
    /// what is already assumed (the branch is pruned).
    pub fn assume(&self, p: &Polynomial, signs: SignSet) -> Option<Assumption> {
        let mut next = self.clone();
        if next.assume_in_place(p, signs) {
            Some(next)
        } else {
            None
        }
    }

    /// Branch on the sign of a coefficient polynomial: one alternative per
    /// feasible sign in `{Neg, Zero, Pos}`.
    pub fn sign_of_coeff(&self, c: &Polynomial) -> Branches<Sign> {
        [Sign::Neg, Sign::Zero, Sign::Pos]
            .into_iter()
            .filter_map(|s| self.assume(c, SignSet::only(s)).map(|a| (s, a)))
            .collect()
    }

    /// Render the assumption as a list of `(polynomial, sign set)`
    /// conditions: the sign map entries plus one `= 0` condition per basis
    /// member, deterministically ordered.
    pub fn conditions(&self) -> Vec<(Polynomial, SignSet)> {
        let mut out: Vec<(Polynomial, SignSet)> = self
            .sign_map
            .iter()
            .map(|(p, ss)| (p.clone(), *ss))
            .collect();
        out.extend(
            self.zero_basis
                .iter()
                .map(|b| (b.clone(), SignSet::only(Sign::Zero))),
        );
        out.sort();
        out
    }

    fn assume_in_place(&mut self, p: &Polynomial, signs: SignSet) -> bool {
        let r = self.reduce(p);
        if r.is_zero() || r.is_constant() {
            return signs.contains(Sign::of_rational(&r.constant_value()));
        }
        let lc_sign = Sign::of_rational(&r.leading_coeff());
        let monic = r.make_monic();
        let adjusted = signs.divide(lc_sign);
        let current = self
            .sign_map
            .get(&monic)
            .copied()
            .unwrap_or(SignSet::ALL);
        let narrowed = current.intersect(adjusted);
        if narrowed.is_empty() {
            return false;
        }
        if narrowed == SignSet::only(Sign::Zero) {
            self.sign_map.remove(&monic);
            self.learn_zeros(vec![monic])
        } else {
            self.sign_map.insert(monic, narrowed);
            true
        }
    }

    /// Extend the vanishing ideal and re-reduce every sign map entry against
    /// the new basis, absorbing entries that collapse to constants or to
    /// further zeros. Returns `false` on contradiction.
    fn learn_zeros(&mut self, zeros: Vec<Polynomial>) -> bool {
        let mut pending = zeros;
        loop {
            let mut gens = self.zero_basis.clone();
            gens.append(&mut pending);
            self.zero_basis = grobner_basis(&gens);
            if self.zero_basis.iter().any(|b| b.is_constant()) {
                // 1 lies in the ideal: the zeros are jointly impossible.
                return false;
            }

            let entries: Vec<(Polynomial, SignSet)> = self.sign_map.drain().collect();
            for (q, ss) in entries {
                let r = self.reduce(&q);
                if r.is_zero() || r.is_constant() {
                    if !ss.contains(Sign::of_rational(&r.constant_value())) {
                        return false;
                    }
                    continue;
                }
                let lc_sign = Sign::of_rational(&r.leading_coeff());
                let monic = r.make_monic();
                let adjusted = ss.divide(lc_sign);
                let merged = self
                    .sign_map
                    .get(&monic)
                    .copied()
                    .unwrap_or(SignSet::ALL)
                    .intersect(adjusted);
                if merged.is_empty() {
                    return false;
                }
                if merged == SignSet::only(Sign::Zero) {
                    self.sign_map.remove(&monic);
                    pending.push(monic);
                } else {
                    self.sign_map.insert(monic, merged);
                }
            }

            if pending.is_empty() {
                return true;
            }
        }
    }
}
