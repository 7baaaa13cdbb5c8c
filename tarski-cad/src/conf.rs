//! Sign configurations: cell decompositions of the real line annotated with
//! polynomial signs.
//!
//! A configuration is an ordered, alternating list of points and open
//! intervals, bracketed by the two sentinel points at ∓∞, with each entry
//! mapping every processed polynomial to its constant sign there. Building
//! one proceeds in three layers:
//!
//! 1. [`mr`] — a sign-respecting pseudo-remainder, the primitive that turns
//!    "sign of `p` at a root of `q`" into a question about a lower-degree
//!    polynomial;
//! 2. [`collect_polynomials`] — the closure of the input set under
//!    normalization, derivatives, and pairwise `mr` remainders, which
//!    guarantees every such question is answerable from the configuration
//!    itself;
//! 3. [`build_sign_conf`] / [`refine_sign_conf`] — the degree-ascending fold
//!    that inserts each polynomial's roots and signs into the decomposition.
//!
//! Symbolic coefficients make each layer non-deterministic: the functions
//! return [`Branches`], one entry per feasible coefficient-sign case.

use crate::assumption::{Assumption, Branches};
use crate::sign::{Sign, SignSet};
use rustc_hash::FxHashMap;
use std::fmt;
use tarski_math::polynomial::{Monomial, Polynomial, Var};

/// An endpoint of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Point {
    /// The left sentinel, below every real.
    NegInf,
    /// The right sentinel, above every real.
    PosInf,
    /// The `index`-th real root (ascending, 0-based) of a polynomial.
    ///
    /// Only created once the surrounding assumption establishes that the
    /// root exists.
    RootOf(Polynomial, usize),
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Point::NegInf => write!(f, "-inf"),
            Point::PosInf => write!(f, "+inf"),
            Point::RootOf(p, i) => write!(f, "root[{}]({})", i, p),
        }
    }
}

/// A point or an open interval of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A single point.
    Point(Point),
    /// The open interval between two points.
    Interval(Point, Point),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Point(p) => write!(f, "{{{}}}", p),
            Cell::Interval(l, u) => write!(f, "({}, {})", l, u),
        }
    }
}

/// Signs of the processed polynomials on one cell.
pub type SignMap = FxHashMap<Polynomial, Sign>;

/// A decomposition of the line into alternating points and intervals, each
/// annotated with every processed polynomial's sign.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignConf {
    pub(crate) entries: Vec<(Cell, SignMap)>,
}

impl SignConf {
    /// The seed configuration: the whole line, no polynomials yet.
    pub fn seed() -> Self {
        Self {
            entries: vec![
                (Cell::Point(Point::NegInf), SignMap::default()),
                (
                    Cell::Interval(Point::NegInf, Point::PosInf),
                    SignMap::default(),
                ),
                (Cell::Point(Point::PosInf), SignMap::default()),
            ],
        }
    }

    /// The cells with their sign maps, in line order.
    pub fn cells(&self) -> impl Iterator<Item = (&Cell, &SignMap)> {
        self.entries.iter().map(|(c, m)| (c, m))
    }
}

impl fmt::Display for SignConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (cell, map) in &self.entries {
            write!(f, "{}:", cell)?;
            let mut items: Vec<(&Polynomial, &Sign)> = map.iter().collect();
            items.sort_by(|a, b| a.0.cmp(b.0));
            for (p, s) in items {
                write!(f, " [{} {}]", p, s)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Sign-respecting pseudo-remainder.
///
/// For `deg(p) >= deg(q) > 0` in `var`, returns `(b, k, r)` where `b` is the
/// polynomial leading coefficient of `q`, `k = deg(p) - deg(q) + 1`, and
/// `b^k · p = q · l + r` with `deg(r) < deg(q)` for some quotient `l`.
/// Evaluating at a root of `q` gives `b^k · p = r`, so the sign of `p` there
/// is `sign(r) / sign(b)^k`, with the `b` factor irrelevant for even `k`.
///
/// # Panics
///
/// Panics unless `deg(p) >= deg(q) > 0`.
pub fn mr(p: &Polynomial, q: &Polynomial, var: Var) -> (Polynomial, u32, Polynomial) {
    let dp = p.degree(var);
    let dq = q.degree(var);
    assert!(dq > 0 && dp >= dq, "mr requires deg(p) >= deg(q) > 0");

    let b = q.coeff(var, dq);
    let k = dp - dq + 1;
    let mut l = Polynomial::zero();
    let mut r = p.clone();
    let mut steps = 0u32;
    while !r.is_zero() && r.degree(var) >= dq {
        let dr = r.degree(var);
        let step = r
            .coeff(var, dr)
            .mul_monomial(&Monomial::from_var_power(var, dr - dq));
        l = b.mul(&l).add(&step);
        r = b.mul(&r).sub(&step.mul(q));
        debug_assert!(r.is_zero() || r.degree(var) < dr);
        steps += 1;
    }
    // Pad with unused leading-coefficient powers so the identity holds with
    // exactly k factors.
    let pad = b.pow(k - steps);
    l = l.mul(&pad);
    r = r.mul(&pad);
    debug_assert_eq!(b.pow(k).mul(p), q.mul(&l).add(&r));
    debug_assert!(r.degree(var) < dq);
    (b, k, r)
}

/// Strip zero high-order terms whose symbolic leading coefficients are
/// undetermined, branching on each: either the coefficient is non-zero and
/// becomes the true leading coefficient, or it vanishes and the term drops.
pub fn normalize_poly(p: &Polynomial, var: Var, asm: &Assumption) -> Branches<Polynomial> {
    let d = p.degree(var);
    if p.is_zero() || d == 0 {
        return vec![(p.clone(), asm.clone())];
    }
    let c = p.coeff(var, d);
    let mut out = Vec::new();
    if let Some(a) = asm.assume(&c, SignSet::NONZERO) {
        out.push((p.clone(), a));
    }
    if let Some(a) = asm.assume(&c, SignSet::only(Sign::Zero)) {
        let dropped = p.sub(&c.mul_monomial(&Monomial::from_var_power(var, d)));
        out.extend(normalize_poly(&dropped, var, &a));
    }
    out
}

/// Closure of the input polynomials under normalization, formal derivatives
/// in `var`, and pairwise `mr` remainders; only normalized members of
/// positive degree are retained.
///
/// The closure is what lets [`sign_at`] decide the sign of any member at any
/// root of any other member from the configuration alone.
pub fn collect_polynomials(
    ps: &[Polynomial],
    var: Var,
    asm: &Assumption,
) -> Branches<Vec<Polynomial>> {
    let mut todo: Vec<Polynomial> = ps.to_vec();
    todo.reverse();
    collect_rec(todo, Vec::new(), var, asm.clone())
}

fn collect_rec(
    mut todo: Vec<Polynomial>,
    acc: Vec<Polynomial>,
    var: Var,
    asm: Assumption,
) -> Branches<Vec<Polynomial>> {
    loop {
        let Some(p) = todo.pop() else {
            return vec![(acc, asm)];
        };
        if p.is_zero() || p.degree(var) == 0 {
            continue;
        }
        let mut out = Vec::new();
        for (np, na) in normalize_poly(&p, var, &asm) {
            let mut todo2 = todo.clone();
            let mut acc2 = acc.clone();
            if np.degree(var) > 0 && !acc2.contains(&np) {
                todo2.push(np.derivative(var));
                for q in &acc2 {
                    if np.degree(var) >= q.degree(var) {
                        todo2.push(mr(&np, q, var).2);
                    }
                    if q.degree(var) >= np.degree(var) {
                        todo2.push(mr(q, &np, var).2);
                    }
                }
                acc2.push(np);
            }
            out.extend(collect_rec(todo2, acc2, var, na));
        }
        return out;
    }
}

/// Sign of `p` at a configuration point.
///
/// At the sentinels the sign is that of the leading coefficient (negated at
/// `-inf` for odd degree). At a root of `q` the sign follows from [`mr`]:
/// the remainder is normalized, its sign read from the point's map (or
/// branched on, when it is free of `var`), and divided by the sign of the
/// leading coefficient when `k` is odd.
pub fn sign_at(
    p: &Polynomial,
    pt: &Point,
    map: &SignMap,
    var: Var,
    asm: &Assumption,
) -> Branches<Sign> {
    match pt {
        Point::PosInf => asm.sign_of_coeff(&p.coeff(var, p.degree(var))),
        Point::NegInf => {
            let d = p.degree(var);
            let branches = asm.sign_of_coeff(&p.coeff(var, d));
            if d % 2 == 1 {
                branches.into_iter().map(|(s, a)| (s.negate(), a)).collect()
            } else {
                branches
            }
        }
        Point::RootOf(q, _) => {
            let (b, k, r) = mr(p, q, var);
            let mut out = Vec::new();
            for (rn, a1) in normalize_poly(&r, var, asm) {
                let sign_branches: Branches<Sign> = if rn.is_zero() {
                    vec![(Sign::Zero, a1)]
                } else if rn.degree(var) > 0 {
                    let s = match map.get(&rn) {
                        Some(s) => *s,
                        None => panic!("sign of {} not recorded at {}", rn, pt),
                    };
                    vec![(s, a1)]
                } else {
                    a1.sign_of_coeff(&rn)
                };
                for (sr, a2) in sign_branches {
                    if k % 2 == 0 {
                        out.push((sr, a2));
                    } else {
                        for (sb, a3) in a2.sign_of_coeff(&b) {
                            out.push((sr.divide(sb), a3));
                        }
                    }
                }
            }
            out
        }
    }
}

/// Build the sign configuration of a polynomial set: compute the closure,
/// sort by ascending degree, and fold every member through
/// [`refine_sign_conf`] starting from the seed.
pub fn build_sign_conf(ps: &[Polynomial], var: Var, asm: &Assumption) -> Branches<SignConf> {
    let mut out = Vec::new();
    for (mut polys, a) in collect_polynomials(ps, var, asm) {
        polys.sort_by_key(|p| p.degree(var));
        let mut confs: Branches<SignConf> = vec![(SignConf::seed(), a)];
        for p in &polys {
            let mut next = Vec::new();
            for (conf, ca) in confs {
                next.extend(refine_sign_conf(p, conf, var, &ca));
            }
            confs = next;
        }
        out.extend(confs);
    }
    out
}

/// Insert one polynomial into a configuration: annotate every existing point
/// with its sign, then split each interval whose endpoints see opposite
/// non-zero signs at the polynomial's next root.
pub fn refine_sign_conf(
    p: &Polynomial,
    conf: SignConf,
    var: Var,
    asm: &Assumption,
) -> Branches<SignConf> {
    // Signs at points first; intervals keep their maps for now.
    let mut states: Branches<Vec<(Cell, SignMap)>> = vec![(Vec::new(), asm.clone())];
    for (cell, map) in conf.entries {
        match &cell {
            Cell::Point(pt) => {
                let mut next = Vec::new();
                for (done, a) in states {
                    for (s, a2) in sign_at(p, pt, &map, var, &a) {
                        let mut done2 = done.clone();
                        let mut map2 = map.clone();
                        map2.insert(p.clone(), s);
                        done2.push((cell.clone(), map2));
                        next.push((done2, a2));
                    }
                }
                states = next;
            }
            Cell::Interval(..) => {
                for (done, _) in states.iter_mut() {
                    done.push((cell.clone(), map.clone()));
                }
            }
        }
    }

    states
        .into_iter()
        .map(|(entries, a)| (split_intervals(p, entries), a))
        .collect()
}

/// The interval pass of [`refine_sign_conf`]: pure, given point signs.
///
/// The root counter advances past every point where `p` is already zero
/// before a new root is emitted, so indices agree with the global ascending
/// order of `p`'s roots.
fn split_intervals(p: &Polynomial, entries: Vec<(Cell, SignMap)>) -> SignConf {
    let mut out: Vec<(Cell, SignMap)> = Vec::new();
    let mut n = 0usize;
    for (i, (cell, map)) in entries.iter().enumerate() {
        match cell {
            Cell::Point(_) => {
                out.push((cell.clone(), map.clone()));
                if map.get(p) == Some(&Sign::Zero) {
                    n += 1;
                }
            }
            Cell::Interval(l, u) => {
                let s1 = entries[i - 1].1[p];
                let s2 = entries[i + 1].1[p];
                let annotated = |s: Sign| {
                    let mut m = map.clone();
                    m.insert(p.clone(), s);
                    m
                };
                match (s1, s2) {
                    (s1, s2) if s1 == s2 => {
                        out.push((cell.clone(), annotated(s1)));
                    }
                    (Sign::Zero, s) | (s, Sign::Zero) => {
                        out.push((cell.clone(), annotated(s)));
                    }
                    (s1, s2) => {
                        let root = Point::RootOf(p.clone(), n);
                        out.push((
                            Cell::Interval(l.clone(), root.clone()),
                            annotated(s1),
                        ));
                        out.push((Cell::Point(root.clone()), annotated(Sign::Zero)));
                        out.push((Cell::Interval(root, u.clone()), annotated(s2)));
                        n += 1;
                    }
                }
            }
        }
    }
    SignConf { entries: out }
}
