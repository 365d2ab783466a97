//! The symbolic expression tree.
//!
//! Nodes are shared behind `Arc`, so cloning an expression is cheap and
//! trees can be handed to worker threads without copying. Constructors
//! collapse trivial shapes (`Add` of one term, `Mul` of one factor) so the
//! canonicalizer never sees them.

use crate::coeff::Coefficient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expr {
    kind: Arc<ExprKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprKind {
    Num(Coefficient),
    Var(String),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Expr, Expr),
    Neg(Expr),
}

impl Expr {
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    fn new(kind: ExprKind) -> Self {
        Expr {
            kind: Arc::new(kind),
        }
    }

    pub fn num(c: Coefficient) -> Self {
        Expr::new(ExprKind::Num(c))
    }

    pub fn int(n: i64) -> Self {
        Expr::num(Coefficient::int(n))
    }

    pub fn rational(num: i64, den: i64) -> Self {
        Expr::num(Coefficient::rational(num, den))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::new(ExprKind::Var(name.into()))
    }

    pub fn add(terms: Vec<Expr>) -> Self {
        match terms.len() {
            0 => Expr::int(0),
            1 => terms.into_iter().next().expect("len checked"),
            _ => Expr::new(ExprKind::Add(terms)),
        }
    }

    pub fn mul(factors: Vec<Expr>) -> Self {
        match factors.len() {
            0 => Expr::int(1),
            1 => factors.into_iter().next().expect("len checked"),
            _ => Expr::new(ExprKind::Mul(factors)),
        }
    }

    pub fn pow(base: Expr, exp: Expr) -> Self {
        Expr::new(ExprKind::Pow(base, exp))
    }

    pub fn neg(inner: Expr) -> Self {
        Expr::new(ExprKind::Neg(inner))
    }

    /// `a - b`, expressed through addition and negation.
    pub fn sub(a: Expr, b: Expr) -> Self {
        Expr::add(vec![a, Expr::neg(b)])
    }

    /// `a / b`, expressed through multiplication and a `-1` power.
    pub fn div(a: Expr, b: Expr) -> Self {
        Expr::mul(vec![a, Expr::pow(b, Expr::int(-1))])
    }

    pub fn as_coeff(&self) -> Option<&Coefficient> {
        match self.kind() {
            ExprKind::Num(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_num(&self) -> bool {
        matches!(self.kind(), ExprKind::Num(_))
    }

    pub fn is_zero(&self) -> bool {
        self.as_coeff().is_some_and(|c| c.is_zero())
    }

    pub fn is_one(&self) -> bool {
        self.as_coeff().is_some_and(|c| c.is_one())
    }

    pub fn node_count(&self) -> usize {
        1 + match self.kind() {
            ExprKind::Num(_) | ExprKind::Var(_) => 0,
            ExprKind::Add(children) | ExprKind::Mul(children) => {
                children.iter().map(Expr::node_count).sum()
            }
            ExprKind::Pow(base, exp) => base.node_count() + exp.node_count(),
            ExprKind::Neg(inner) => inner.node_count(),
        }
    }

    /// Free variables, in lexicographic order.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    pub fn collect_vars(&self, out: &mut BTreeSet<String>) {
        match self.kind() {
            ExprKind::Num(_) => {}
            ExprKind::Var(name) => {
                out.insert(name.clone());
            }
            ExprKind::Add(children) | ExprKind::Mul(children) => {
                for child in children {
                    child.collect_vars(out);
                }
            }
            ExprKind::Pow(base, exp) => {
                base.collect_vars(out);
                exp.collect_vars(out);
            }
            ExprKind::Neg(inner) => inner.collect_vars(out),
        }
    }

    pub fn contains_var(&self, name: &str) -> bool {
        match self.kind() {
            ExprKind::Num(_) => false,
            ExprKind::Var(v) => v == name,
            ExprKind::Add(children) | ExprKind::Mul(children) => {
                children.iter().any(|c| c.contains_var(name))
            }
            ExprKind::Pow(base, exp) => base.contains_var(name) || exp.contains_var(name),
            ExprKind::Neg(inner) => inner.contains_var(name),
        }
    }

    /// Replace every occurrence of `name` with `replacement`.
    pub fn substitute(&self, name: &str, replacement: &Expr) -> Expr {
        match self.kind() {
            ExprKind::Num(_) => self.clone(),
            ExprKind::Var(v) => {
                if v == name {
                    replacement.clone()
                } else {
                    self.clone()
                }
            }
            ExprKind::Add(children) => Expr::add(
                children
                    .iter()
                    .map(|c| c.substitute(name, replacement))
                    .collect(),
            ),
            ExprKind::Mul(children) => Expr::mul(
                children
                    .iter()
                    .map(|c| c.substitute(name, replacement))
                    .collect(),
            ),
            ExprKind::Pow(base, exp) => Expr::pow(
                base.substitute(name, replacement),
                exp.substitute(name, replacement),
            ),
            ExprKind::Neg(inner) => Expr::neg(inner.substitute(name, replacement)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_collapse_trivial_shapes() {
        assert_eq!(Expr::add(vec![]), Expr::int(0));
        assert_eq!(Expr::mul(vec![]), Expr::int(1));
        assert_eq!(Expr::add(vec![Expr::var("x")]), Expr::var("x"));
    }

    #[test]
    fn free_vars_are_sorted_and_deduplicated() {
        let e = Expr::add(vec![
            Expr::var("y"),
            Expr::mul(vec![Expr::var("x"), Expr::var("y")]),
        ]);
        let vars: Vec<_> = e.free_vars().into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn substitution_replaces_every_occurrence() {
        let e = Expr::add(vec![Expr::var("x"), Expr::pow(Expr::var("x"), Expr::int(2))]);
        let s = e.substitute("x", &Expr::int(3));
        assert!(!s.contains_var("x"));
    }
}
