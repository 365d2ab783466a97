//! Rendering expressions in the output grammar.
//!
//! Powers use `^`, multiplication has no glyph (`6x`, `2xy`), half powers
//! render as `sqrt(...)` and negative powers as division (`4/x`). The
//! renderer assumes canonical input but degrades gracefully on anything
//! else.

use crate::coeff::Coefficient;
use crate::expr::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_expr(self))
    }
}

fn render_expr(e: &Expr) -> String {
    match e.kind() {
        ExprKind::Add(terms) => render_sum(terms),
        _ => {
            let (neg, body) = render_term(e);
            if neg {
                format!("-{body}")
            } else {
                body
            }
        }
    }
}

fn render_sum(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        let (neg, body) = render_term(term);
        if i == 0 {
            if neg {
                out.push('-');
            }
        } else {
            out.push_str(if neg { " - " } else { " + " });
        }
        out.push_str(&body);
    }
    out
}

/// Render a non-sum node as `(is_negative, magnitude)` so sums can fold
/// the sign into the joining operator.
fn render_term(e: &Expr) -> (bool, String) {
    match e.kind() {
        ExprKind::Num(c) => (c.is_negative(), render_coeff_magnitude(c)),
        ExprKind::Var(name) => (false, name.clone()),
        ExprKind::Mul(factors) => render_product(factors),
        ExprKind::Pow(_, exp) => {
            if exp.as_coeff().is_some_and(Coefficient::is_negative) {
                render_product(std::slice::from_ref(e))
            } else {
                (false, render_pow(e))
            }
        }
        ExprKind::Neg(inner) => {
            let (neg, body) = render_term(inner);
            (!neg, body)
        }
        ExprKind::Add(terms) => (false, format!("({})", render_sum(terms))),
    }
}

fn render_coeff_magnitude(c: &Coefficient) -> String {
    match c {
        Coefficient::Rational(n, d) => {
            if *d == 1 {
                format!("{}", n.abs())
            } else {
                format!("{}/{}", n.abs(), d)
            }
        }
        Coefficient::Float(f) => format!("{}", f.abs()),
    }
}

/// Render a product, folding rational denominators and negative powers
/// into a single `/` form: `3x/2`, `4/x`, `3x/(2y)`.
fn render_product(factors: &[Expr]) -> (bool, String) {
    let mut coeff = Coefficient::int(1);
    let mut numerator: Vec<String> = Vec::new();
    let mut denominator: Vec<String> = Vec::new();

    for factor in factors {
        if let Some(c) = factor.as_coeff() {
            coeff = coeff * c.clone();
            continue;
        }
        if let ExprKind::Pow(base, exp) = factor.kind() {
            if let Some(e) = factor_negative_exponent(exp) {
                if e.is_one() {
                    denominator.push(render_factor(base));
                } else {
                    denominator.push(render_pow(&Expr::pow(base.clone(), Expr::num(e))));
                }
                continue;
            }
        }
        numerator.push(render_factor(factor));
    }

    let negative = coeff.is_negative();
    let (coeff_num, coeff_den) = match coeff.abs() {
        Coefficient::Rational(n, d) => (
            (n != 1 || numerator.is_empty()).then(|| n.to_string()),
            (d != 1).then(|| d.to_string()),
        ),
        Coefficient::Float(f) => (Some(format!("{f}")), None),
    };

    let mut num_str = coeff_num.unwrap_or_default();
    for part in &numerator {
        num_str.push_str(part);
    }
    if num_str.is_empty() {
        num_str.push('1');
    }

    let mut den_parts: Vec<String> = Vec::new();
    if let Some(d) = coeff_den {
        den_parts.push(d);
    }
    den_parts.extend(denominator);

    if den_parts.is_empty() {
        return (negative, num_str);
    }

    let den_str = if den_parts.len() == 1 {
        den_parts.into_iter().next().unwrap_or_default()
    } else {
        format!("({})", den_parts.concat())
    };
    (negative, format!("{num_str}/{den_str}"))
}

/// The magnitude of a numeric exponent, when it is negative.
fn factor_negative_exponent(exp: &Expr) -> Option<Coefficient> {
    let c = exp.as_coeff()?;
    c.is_negative().then(|| c.clone().abs())
}

fn render_factor(e: &Expr) -> String {
    match e.kind() {
        ExprKind::Var(name) => name.clone(),
        ExprKind::Pow(_, _) => render_pow(e),
        _ => format!("({})", render_expr(e)),
    }
}

fn render_pow(e: &Expr) -> String {
    let ExprKind::Pow(base, exp) = e.kind() else {
        return render_expr(e);
    };

    if exp
        .as_coeff()
        .is_some_and(|c| *c == Coefficient::rational(1, 2))
    {
        return format!("sqrt({})", render_expr(base));
    }

    let base_str = match base.kind() {
        ExprKind::Var(name) => name.clone(),
        ExprKind::Num(c) if !c.is_negative() && c.is_integer() => render_coeff_magnitude(c),
        _ => format!("({})", render_expr(base)),
    };

    let exp_str = match exp.kind() {
        ExprKind::Num(c) if c.is_integer() && !c.is_negative() => render_coeff_magnitude(c),
        ExprKind::Var(name) => name.clone(),
        _ => format!("({})", render_expr(exp)),
    };

    format!("{base_str}^{exp_str}")
}
