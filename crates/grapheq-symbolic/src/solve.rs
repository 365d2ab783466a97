//! Closed-form equation solving.
//!
//! Solves `expr = 0` for one variable via the polynomial view: linear and
//! quadratic closed forms, plus isolation of pure n-th powers. Higher
//! degrees and non-polynomial shapes are reported as unsupported and
//! degrade to an empty, flagged entry upstream rather than failing the
//! whole request.

use crate::cancel::CancelToken;
use crate::canonicalize::canonicalize;
use crate::coeff::Coefficient;
use crate::expr::Expr;
use crate::poly::Polynomial;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("cannot solve for `{0}`: unsupported equation shape")]
    Unsupported(String),
    #[error("solving was cancelled")]
    Cancelled,
}

/// Solve `expr = 0` for `var`, returning the real solution branches.
///
/// `expr` must be canonical. An empty result means no (real) solutions;
/// symbolic branches that are only conditionally real are kept and
/// filtered numerically at evaluation time.
pub fn solve_for(expr: &Expr, var: &str, cancel: &CancelToken) -> Result<Vec<Expr>, SolveError> {
    if cancel.is_cancelled() {
        return Err(SolveError::Cancelled);
    }

    let poly = Polynomial::in_variable(expr, var)
        .ok_or_else(|| SolveError::Unsupported(var.to_string()))?;

    let roots = match poly.degree() {
        // Constant equation: either trivially true or trivially false; in
        // both cases there is nothing to report for this variable.
        0 => Vec::new(),
        1 => solve_linear(&poly),
        2 => solve_quadratic(&poly, cancel)?,
        _ => solve_pure_power(&poly).ok_or_else(|| SolveError::Unsupported(var.to_string()))?,
    };

    if cancel.is_cancelled() {
        return Err(SolveError::Cancelled);
    }
    Ok(roots.iter().map(canonicalize).collect())
}

/// `c1*v + c0 = 0` => `v = -c0/c1`.
fn solve_linear(poly: &Polynomial) -> Vec<Expr> {
    let c0 = poly.coeff(0);
    let c1 = poly.coeff(1);
    vec![Expr::div(Expr::neg(c0), c1)]
}

/// `a*v^2 + b*v + c = 0` via the quadratic formula, with exact handling of
/// numeric discriminants.
fn solve_quadratic(poly: &Polynomial, cancel: &CancelToken) -> Result<Vec<Expr>, SolveError> {
    let a = poly.coeff(2);
    let b = poly.coeff(1);
    let c = poly.coeff(0);

    // b^2 - 4ac
    let disc = canonicalize(&Expr::sub(
        Expr::pow(b.clone(), Expr::int(2)),
        Expr::mul(vec![Expr::int(4), a.clone(), c]),
    ));

    if cancel.is_cancelled() {
        return Err(SolveError::Cancelled);
    }

    let two_a = Expr::mul(vec![Expr::int(2), a]);
    if let Some(d) = disc.as_coeff() {
        if d.is_negative() {
            return Ok(Vec::new());
        }
        if d.is_zero() {
            return Ok(vec![Expr::div(Expr::neg(b), two_a)]);
        }
    }

    let root = sqrt_expr(&disc);
    Ok(vec![
        Expr::div(
            Expr::sub(Expr::neg(b.clone()), root.clone()),
            two_a.clone(),
        ),
        Expr::div(Expr::add(vec![Expr::neg(b), root]), two_a),
    ])
}

/// `cn*v^n + c0 = 0` => real n-th roots of `-c0/cn`. Only applies when all
/// intermediate coefficients vanish.
fn solve_pure_power(poly: &Polynomial) -> Option<Vec<Expr>> {
    let n = poly.degree();
    for k in 1..n {
        if !poly.coeff(k).is_zero() {
            return None;
        }
    }
    let target = canonicalize(&Expr::div(Expr::neg(poly.coeff(0)), poly.coeff(n)));
    let exp = Expr::rational(1, n as i64);

    if n % 2 == 1 {
        // Odd degree: exactly one real root, sign-aware for numeric targets.
        if let Some(t) = target.as_coeff() {
            if t.is_negative() {
                let mag = Expr::num(t.abs());
                return Some(vec![Expr::neg(Expr::pow(mag, exp))]);
            }
        }
        return Some(vec![Expr::pow(target, exp)]);
    }

    // Even degree: no real roots for a numeric negative target, otherwise
    // a +/- pair.
    if let Some(t) = target.as_coeff() {
        if t.is_negative() {
            return Some(Vec::new());
        }
    }
    let principal = Expr::pow(target, exp);
    Some(vec![Expr::neg(principal.clone()), principal])
}

/// Square root of an expression, exact for perfect-square rationals.
fn sqrt_expr(expr: &Expr) -> Expr {
    if let Some(c) = expr.as_coeff() {
        if let Some(root) = c.sqrt_exact() {
            return Expr::num(root);
        }
    }
    Expr::pow(expr.clone(), Expr::rational(1, 2))
}
