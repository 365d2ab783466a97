//! Polynomial view of a canonical expression in one variable.
//!
//! Coefficients are themselves expressions over the remaining variables,
//! which is what equation solving needs: `x^2 + y^2 - 4` seen in `y` is
//! `1*y^2 + (x^2 - 4)`.

use crate::canonicalize::Canonicalizer;
use crate::expr::{Expr, ExprKind};

/// Highest exponent the extractor will accept. Anything past this is not a
/// shape this engine solves anyway.
const MAX_DEGREE: usize = 64;

#[derive(Debug, Clone)]
pub struct Polynomial {
    var: String,
    coeffs: Vec<Expr>,
}

impl Polynomial {
    /// Extract the polynomial view of `expr` in `var`.
    ///
    /// `expr` must be in canonical form (a flat sum of products). Returns
    /// `None` when `var` occurs non-polynomially: fractional or negative
    /// powers, symbolic exponents, or inside an exponent.
    pub fn in_variable(expr: &Expr, var: &str) -> Option<Self> {
        let terms: Vec<Expr> = match expr.kind() {
            ExprKind::Add(terms) => terms.clone(),
            _ => vec![expr.clone()],
        };

        let mut buckets: Vec<Vec<Expr>> = vec![Vec::new()];
        for term in &terms {
            let (power, rest) = split_term(term, var)?;
            if power >= buckets.len() {
                buckets.resize(power + 1, Vec::new());
            }
            buckets[power].push(rest);
        }

        let cleanup = Canonicalizer::collected();
        let mut coeffs: Vec<Expr> = buckets
            .into_iter()
            .map(|terms| cleanup.apply(Expr::add(terms)))
            .collect();
        while coeffs.len() > 1 && coeffs.last().is_some_and(Expr::is_zero) {
            coeffs.pop();
        }

        Some(Polynomial {
            var: var.to_string(),
            coeffs,
        })
    }

    pub fn variable(&self) -> &str {
        &self.var
    }

    /// Degree of the polynomial; 0 for a constant (including zero).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient of `var^k`; zero when `k` exceeds the degree.
    pub fn coeff(&self, k: usize) -> Expr {
        self.coeffs.get(k).cloned().unwrap_or_else(|| Expr::int(0))
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(Expr::is_zero)
    }
}

/// Split one canonical term into the power of `var` it carries and the
/// product of everything else.
fn split_term(term: &Expr, var: &str) -> Option<(usize, Expr)> {
    let factors: Vec<Expr> = match term.kind() {
        ExprKind::Mul(factors) => factors.clone(),
        _ => vec![term.clone()],
    };

    let mut power = 0usize;
    let mut rest = Vec::new();
    for factor in factors {
        match factor.kind() {
            ExprKind::Var(name) if name == var => power += 1,
            ExprKind::Pow(base, exp) => {
                if let ExprKind::Var(name) = base.kind() {
                    if name == var {
                        let k = exp.as_coeff().and_then(|c| c.as_integer())?;
                        if k < 1 || k as usize > MAX_DEGREE {
                            return None;
                        }
                        power += k as usize;
                        continue;
                    }
                }
                // `var` hiding anywhere else in a power is non-polynomial.
                if factor.contains_var(var) {
                    return None;
                }
                rest.push(factor);
            }
            _ => {
                if factor.contains_var(var) {
                    return None;
                }
                rest.push(factor);
            }
        }
    }
    if power > MAX_DEGREE {
        return None;
    }
    Some((power, Expr::mul(rest)))
}

/// Degree of `expr` in `var`, when `expr` is polynomial in it.
pub fn degree_in(expr: &Expr, var: &str) -> Option<usize> {
    Polynomial::in_variable(expr, var).map(|p| p.degree())
}

/// Absolute numeric coefficient of every term of a canonical expression
/// (the constant term included). Feeds the auto-range heuristic.
pub fn term_magnitudes(expr: &Expr) -> Vec<f64> {
    let terms: Vec<&Expr> = match expr.kind() {
        ExprKind::Add(terms) => terms.iter().collect(),
        _ => vec![expr],
    };
    terms
        .into_iter()
        .map(|t| match t.kind() {
            ExprKind::Num(c) => c.to_f64().abs(),
            ExprKind::Mul(factors) => factors
                .iter()
                .filter_map(|f| f.as_coeff())
                .map(|c| c.to_f64())
                .product::<f64>()
                .abs(),
            _ => 1.0,
        })
        .collect()
}
