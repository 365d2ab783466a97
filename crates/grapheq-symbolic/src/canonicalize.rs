//! Staged canonicalization pipeline.
//!
//! Expressions are brought to a flat sum-of-products form: signs folded
//! into coefficients, products distributed over sums, constants merged,
//! like terms and like factors collected, and terms ordered by descending
//! degree. The canonical form is what the polynomial view, the solver and
//! the display layer all assume.

use crate::coeff::Coefficient;
use crate::expr::{Expr, ExprKind};
use serde::{Deserialize, Serialize};

/// Integer exponents up to this bound are expanded when the base is a sum.
const MAX_POW_EXPAND: i64 = 8;

/// A canonicalization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanonPass {
    /// Rewrite `Neg` nodes into `-1` factors (or negated constants).
    FoldSigns,
    /// Flatten nested `Add`/`Mul` nodes.
    Flatten,
    /// Distribute products over sums; expand small integer powers of sums.
    Distribute,
    /// Merge numeric constants in sums, products and powers.
    MergeConstants,
    /// `x^0 = 1`, `x^1 = x`, `1^e = 1`, `0^n = 0`, collapse numeric
    /// power-of-power.
    PowerRules,
    /// Order terms by descending degree and factors canonically.
    SortTerms,
    /// Collect like terms (`x + x = 2x`) and like factors (`x*x = x^2`).
    CollectTerms,
}

/// Ordered pipeline of canonicalization passes.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    passes: Vec<CanonPass>,
}

impl Canonicalizer {
    pub fn new(passes: Vec<CanonPass>) -> Self {
        Canonicalizer { passes }
    }

    /// The full pipeline, including distribution. This is the single entry
    /// used on every parsed expression; downstream code relies on its
    /// output shape.
    pub fn expanded() -> Self {
        Self::new(vec![
            CanonPass::FoldSigns,
            CanonPass::Flatten,
            CanonPass::Distribute,
            CanonPass::Flatten,
            CanonPass::MergeConstants,
            CanonPass::PowerRules,
            CanonPass::SortTerms,
            CanonPass::CollectTerms,
            CanonPass::MergeConstants,
            CanonPass::SortTerms,
        ])
    }

    /// Like [`Canonicalizer::expanded`] but without distribution. Used
    /// where the input is already a flat sum and expansion would only
    /// churn.
    pub fn collected() -> Self {
        Self::new(vec![
            CanonPass::FoldSigns,
            CanonPass::Flatten,
            CanonPass::MergeConstants,
            CanonPass::PowerRules,
            CanonPass::SortTerms,
            CanonPass::CollectTerms,
            CanonPass::MergeConstants,
            CanonPass::SortTerms,
        ])
    }

    pub fn apply(&self, expr: Expr) -> Expr {
        let mut current = expr;
        for pass in &self.passes {
            current = apply_pass(&current, *pass);
        }
        current
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::expanded()
    }
}

/// Canonicalize with the full (expanding) pipeline.
pub fn canonicalize(expr: &Expr) -> Expr {
    Canonicalizer::expanded().apply(expr.clone())
}

fn apply_pass(expr: &Expr, pass: CanonPass) -> Expr {
    match pass {
        CanonPass::FoldSigns => fold_signs(expr),
        CanonPass::Flatten => flatten(expr),
        CanonPass::Distribute => distribute(expr),
        CanonPass::MergeConstants => merge_constants(expr),
        CanonPass::PowerRules => power_rules(expr),
        CanonPass::SortTerms => sort_terms(expr),
        CanonPass::CollectTerms => collect_terms(expr),
    }
}

/// Rebuild a node with `f` applied to each direct child.
fn map_children(expr: &Expr, f: &mut impl FnMut(&Expr) -> Expr) -> Expr {
    match expr.kind() {
        ExprKind::Num(_) | ExprKind::Var(_) => expr.clone(),
        ExprKind::Add(children) => Expr::add(children.iter().map(|c| f(c)).collect()),
        ExprKind::Mul(children) => Expr::mul(children.iter().map(|c| f(c)).collect()),
        ExprKind::Pow(base, exp) => Expr::pow(f(base), f(exp)),
        ExprKind::Neg(inner) => Expr::neg(f(inner)),
    }
}

fn fold_signs(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Neg(inner) => {
            let folded = fold_signs(inner);
            match folded.as_coeff() {
                Some(c) => Expr::num(-c.clone()),
                None => Expr::mul(vec![Expr::int(-1), folded]),
            }
        }
        _ => map_children(expr, &mut fold_signs),
    }
}

fn flatten(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Add(terms) => {
            let mut out = Vec::with_capacity(terms.len());
            for t in terms {
                let t = flatten(t);
                if let ExprKind::Add(inner) = t.kind() {
                    out.extend(inner.iter().cloned());
                } else {
                    out.push(t);
                }
            }
            Expr::add(out)
        }
        ExprKind::Mul(factors) => {
            let mut out = Vec::with_capacity(factors.len());
            for fct in factors {
                let fct = flatten(fct);
                if let ExprKind::Mul(inner) = fct.kind() {
                    out.extend(inner.iter().cloned());
                } else {
                    out.push(fct);
                }
            }
            Expr::mul(out)
        }
        _ => map_children(expr, &mut flatten),
    }
}

/// Multiply two expressions, distributing whenever either side is a sum.
fn mul_expand(a: &Expr, b: &Expr) -> Expr {
    if let ExprKind::Add(terms) = a.kind() {
        return Expr::add(terms.iter().map(|t| mul_expand(t, b)).collect());
    }
    if let ExprKind::Add(terms) = b.kind() {
        return Expr::add(terms.iter().map(|t| mul_expand(a, t)).collect());
    }
    Expr::mul(vec![a.clone(), b.clone()])
}

fn distribute(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Mul(factors) => {
            let mut iter = factors.iter().map(distribute);
            let first = iter.next().unwrap_or_else(|| Expr::int(1));
            iter.fold(first, |acc, f| mul_expand(&acc, &f))
        }
        ExprKind::Pow(base, exp) => {
            let base = distribute(base);
            let exp = distribute(exp);
            if let (ExprKind::Add(_), Some(n)) = (base.kind(), exp.as_coeff()) {
                if let Some(k) = n.as_integer() {
                    if (2..=MAX_POW_EXPAND).contains(&k) {
                        let mut acc = base.clone();
                        for _ in 1..k {
                            acc = mul_expand(&acc, &base);
                        }
                        return acc;
                    }
                }
            }
            // (a*b)^n = a^n * b^n for integer n
            if let (ExprKind::Mul(factors), Some(n)) = (base.kind(), exp.as_coeff()) {
                if n.is_integer() {
                    return distribute(&Expr::mul(
                        factors
                            .iter()
                            .map(|f| Expr::pow(f.clone(), Expr::num(n.clone())))
                            .collect(),
                    ));
                }
            }
            Expr::pow(base, exp)
        }
        _ => map_children(expr, &mut distribute),
    }
}

fn merge_constants(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Add(terms) => {
            let mut sum = Coefficient::int(0);
            let mut rest = Vec::new();
            for t in terms {
                let t = merge_constants(t);
                match t.as_coeff() {
                    Some(c) => sum = sum + c.clone(),
                    None => rest.push(t),
                }
            }
            if !sum.is_zero() || rest.is_empty() {
                rest.push(Expr::num(sum));
            }
            Expr::add(rest)
        }
        ExprKind::Mul(factors) => {
            let mut product = Coefficient::int(1);
            let mut rest = Vec::new();
            for f in factors {
                let f = merge_constants(f);
                match f.as_coeff() {
                    Some(c) => product = product * c.clone(),
                    None => rest.push(f),
                }
            }
            if product.is_zero() {
                return Expr::int(0);
            }
            if !product.is_one() || rest.is_empty() {
                rest.insert(0, Expr::num(product));
            }
            Expr::mul(rest)
        }
        ExprKind::Pow(base, exp) => {
            let base = merge_constants(base);
            let exp = merge_constants(exp);
            if let (Some(b), Some(e)) = (base.as_coeff(), exp.as_coeff()) {
                if let Some(k) = e.as_integer() {
                    return Expr::num(b.pow_int(k));
                }
                if let Coefficient::Rational(1, q) = e {
                    if let Ok(n) = u32::try_from(*q) {
                        if let Some(root) = b.nth_root_exact(n) {
                            return Expr::num(root);
                        }
                    }
                }
            }
            Expr::pow(base, exp)
        }
        _ => map_children(expr, &mut merge_constants),
    }
}

fn power_rules(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Pow(base, exp) => {
            let base = power_rules(base);
            let exp = power_rules(exp);
            if exp.is_zero() {
                return Expr::int(1);
            }
            if exp.is_one() {
                return base;
            }
            if base.is_one() {
                return Expr::int(1);
            }
            if base.is_zero() {
                if let Some(e) = exp.as_coeff() {
                    if !e.is_negative() {
                        return Expr::int(0);
                    }
                }
            }
            // (x^a)^b = x^(a*b) for numeric a, b
            if let ExprKind::Pow(inner_base, inner_exp) = base.kind() {
                if let (Some(a), Some(b)) = (inner_exp.as_coeff(), exp.as_coeff()) {
                    let collapsed = Expr::pow(inner_base.clone(), Expr::num(a.clone() * b.clone()));
                    return power_rules(&collapsed);
                }
            }
            Expr::pow(base, exp)
        }
        _ => map_children(expr, &mut power_rules),
    }
}

/// Deterministic structural ordering used for factor and tie-break
/// comparisons: numbers < variables < powers < products < sums.
fn cmp_expr(a: &Expr, b: &Expr) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    fn rank(e: &Expr) -> u8 {
        match e.kind() {
            ExprKind::Num(_) => 0,
            ExprKind::Var(_) => 1,
            ExprKind::Pow(_, _) => 2,
            ExprKind::Mul(_) => 3,
            ExprKind::Add(_) => 4,
            ExprKind::Neg(_) => 5,
        }
    }

    rank(a).cmp(&rank(b)).then_with(|| match (a.kind(), b.kind()) {
        (ExprKind::Num(x), ExprKind::Num(y)) => x.cmp(y),
        (ExprKind::Var(x), ExprKind::Var(y)) => x.cmp(y),
        (ExprKind::Pow(b1, e1), ExprKind::Pow(b2, e2)) => {
            cmp_expr(b1, b2).then_with(|| cmp_expr(e1, e2))
        }
        (ExprKind::Mul(x), ExprKind::Mul(y)) | (ExprKind::Add(x), ExprKind::Add(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| {
                x.iter()
                    .zip(y.iter())
                    .map(|(l, r)| cmp_expr(l, r))
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            }),
        (ExprKind::Neg(x), ExprKind::Neg(y)) => cmp_expr(x, y),
        _ => Ordering::Equal,
    })
}

/// Total degree of a term: the sum of numeric exponents over all variable
/// factors. Used only for ordering.
pub(crate) fn total_degree(term: &Expr) -> f64 {
    match term.kind() {
        ExprKind::Num(_) => 0.0,
        ExprKind::Var(_) => 1.0,
        ExprKind::Pow(base, exp) => match exp.as_coeff() {
            Some(e) => total_degree(base) * e.to_f64(),
            None => total_degree(base),
        },
        ExprKind::Mul(factors) => factors.iter().map(total_degree).sum(),
        ExprKind::Add(terms) => terms.iter().map(total_degree).fold(0.0, f64::max),
        ExprKind::Neg(inner) => total_degree(inner),
    }
}

fn sort_terms(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Add(terms) => {
            let mut sorted: Vec<_> = terms.iter().map(sort_terms).collect();
            sorted.sort_by(|a, b| {
                total_degree(b)
                    .partial_cmp(&total_degree(a))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| cmp_expr(a, b))
            });
            Expr::add(sorted)
        }
        ExprKind::Mul(factors) => {
            let mut sorted: Vec<_> = factors.iter().map(sort_terms).collect();
            sorted.sort_by(cmp_expr);
            Expr::mul(sorted)
        }
        _ => map_children(expr, &mut sort_terms),
    }
}

/// Split a term into its numeric coefficient and the remaining monomial.
fn split_coefficient(term: &Expr) -> (Coefficient, Expr) {
    match term.kind() {
        ExprKind::Num(c) => (c.clone(), Expr::int(1)),
        ExprKind::Mul(factors) => {
            let mut coeff = Coefficient::int(1);
            let mut rest = Vec::new();
            for f in factors {
                match f.as_coeff() {
                    Some(c) => coeff = coeff * c.clone(),
                    None => rest.push(f.clone()),
                }
            }
            (coeff, Expr::mul(rest))
        }
        _ => (Coefficient::int(1), term.clone()),
    }
}

fn collect_terms(expr: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Mul(factors) => {
            // Like factors: group by base, summing numeric exponents.
            let mut coeff = Coefficient::int(1);
            let mut bases: Vec<(Expr, Coefficient)> = Vec::new();
            let mut opaque: Vec<Expr> = Vec::new();
            for f in factors {
                let f = collect_terms(f);
                if let Some(c) = f.as_coeff() {
                    coeff = coeff * c.clone();
                    continue;
                }
                let (base, exp) = match f.kind() {
                    ExprKind::Pow(b, e) => match e.as_coeff() {
                        Some(c) => (b.clone(), c.clone()),
                        None => {
                            opaque.push(f.clone());
                            continue;
                        }
                    },
                    _ => (f.clone(), Coefficient::int(1)),
                };
                match bases.iter_mut().find(|(b, _)| *b == base) {
                    Some((_, e)) => *e = e.clone() + exp,
                    None => bases.push((base, exp)),
                }
            }
            if coeff.is_zero() {
                return Expr::int(0);
            }
            let mut out = Vec::new();
            if !coeff.is_one() {
                out.push(Expr::num(coeff));
            }
            for (base, exp) in bases {
                if exp.is_zero() {
                    continue;
                }
                if exp.is_one() {
                    out.push(base);
                } else {
                    out.push(Expr::pow(base, Expr::num(exp)));
                }
            }
            out.extend(opaque);
            Expr::mul(out)
        }
        ExprKind::Add(terms) => {
            // Like terms: group by monomial, summing coefficients.
            let mut groups: Vec<(Expr, Coefficient)> = Vec::new();
            let mut const_sum = Coefficient::int(0);
            for t in terms {
                let t = collect_terms(t);
                if let Some(c) = t.as_coeff() {
                    const_sum = const_sum + c.clone();
                    continue;
                }
                let (coeff, base) = split_coefficient(&t);
                match groups.iter_mut().find(|(b, _)| *b == base) {
                    Some((_, c)) => *c = c.clone() + coeff,
                    None => groups.push((base, coeff)),
                }
            }
            let mut out = Vec::new();
            for (base, coeff) in groups {
                if coeff.is_zero() {
                    continue;
                }
                if base.is_one() {
                    out.push(Expr::num(coeff));
                } else if coeff.is_one() {
                    out.push(base);
                } else {
                    out.push(Expr::mul(vec![Expr::num(coeff), base]));
                }
            }
            if !const_sum.is_zero() || out.is_empty() {
                out.push(Expr::num(const_sum));
            }
            Expr::add(out)
        }
        _ => map_children(expr, &mut collect_terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn flatten_merges_nested_sums() {
        let nested = Expr::add(vec![x(), Expr::add(vec![Expr::var("y"), Expr::var("z")])]);
        let flat = flatten(&nested);
        match flat.kind() {
            ExprKind::Add(terms) => assert_eq!(terms.len(), 3),
            other => panic!("expected Add, got {other:?}"),
        }
    }

    #[test]
    fn like_terms_collapse() {
        // 2x + 4x = 6x
        let e = Expr::add(vec![
            Expr::mul(vec![Expr::int(2), x()]),
            Expr::mul(vec![Expr::int(4), x()]),
        ]);
        let c = canonicalize(&e);
        assert_eq!(c, Expr::mul(vec![Expr::int(6), x()]));
    }

    #[test]
    fn like_factors_collapse() {
        // x * x = x^2
        let e = Expr::mul(vec![x(), x()]);
        let c = canonicalize(&e);
        assert_eq!(c, Expr::pow(x(), Expr::int(2)));
    }

    #[test]
    fn cancelling_terms_leave_zero() {
        let e = Expr::sub(x(), x());
        assert!(canonicalize(&e).is_zero());
    }

    #[test]
    fn distribution_expands_products_of_sums() {
        // (x + 1)(x - 1) = x^2 - 1
        let e = Expr::mul(vec![
            Expr::add(vec![x(), Expr::int(1)]),
            Expr::add(vec![x(), Expr::int(-1)]),
        ]);
        let c = canonicalize(&e);
        let expected = Expr::add(vec![Expr::pow(x(), Expr::int(2)), Expr::int(-1)]);
        assert_eq!(c, expected);
    }

    #[test]
    fn integer_powers_of_sums_expand() {
        // (x + 1)^2 = x^2 + 2x + 1
        let e = Expr::pow(Expr::add(vec![x(), Expr::int(1)]), Expr::int(2));
        let c = canonicalize(&e);
        let expected = Expr::add(vec![
            Expr::pow(x(), Expr::int(2)),
            Expr::mul(vec![Expr::int(2), x()]),
            Expr::int(1),
        ]);
        assert_eq!(c, expected);
    }

    #[test]
    fn terms_sort_by_descending_degree() {
        // 3x + x^2 becomes x^2 + 3x
        let e = Expr::add(vec![
            Expr::mul(vec![Expr::int(3), x()]),
            Expr::pow(x(), Expr::int(2)),
        ]);
        let c = canonicalize(&e);
        match c.kind() {
            ExprKind::Add(terms) => {
                assert_eq!(terms[0], Expr::pow(x(), Expr::int(2)));
            }
            other => panic!("expected Add, got {other:?}"),
        }
    }

    #[test]
    fn double_negation_folds_away() {
        let e = Expr::neg(Expr::neg(x()));
        assert_eq!(canonicalize(&e), x());
    }

    #[test]
    fn numeric_powers_evaluate() {
        let e = Expr::pow(Expr::int(2), Expr::int(10));
        assert_eq!(canonicalize(&e), Expr::int(1024));
        let r = Expr::pow(Expr::int(4), Expr::rational(1, 2));
        assert_eq!(canonicalize(&r), Expr::int(2));
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let e = Expr::mul(vec![
            Expr::add(vec![x(), Expr::int(2)]),
            Expr::add(vec![x(), Expr::int(-2)]),
        ]);
        let once = canonicalize(&e);
        assert_eq!(canonicalize(&once), once);
    }
}
