//! GraphEq symbolic engine.
//!
//! A small computer-algebra core purpose-built for the equation-plotting
//! pipeline:
//! - immutable expression trees with cheap (`Arc`) sharing,
//! - exact rational coefficients with float fallback,
//! - a staged canonicalization pipeline producing a flat sum-of-products
//!   form shared by solving, display and plotting,
//! - closed-form solving for the shapes the input grammar produces,
//! - stack-bytecode compilation for fast numeric grid evaluation,
//! - cooperative cancellation for bounded execution.
//!
//! The canonical form guarantees that `a = b` and `b = a` behave
//! identically downstream: both reduce to the same `left - right`
//! normal form up to sign, and solution sets are computed from roots,
//! which sign does not change.

mod cancel;
mod canonicalize;
mod coeff;
mod compile;
mod display;
mod expr;
mod poly;
mod solve;

pub use cancel::CancelToken;
pub use canonicalize::{canonicalize, CanonPass, Canonicalizer};
pub use coeff::Coefficient;
pub use compile::{compile, CompileError, CompiledExpr, Op};
pub use expr::{Expr, ExprKind};
pub use poly::{degree_in, term_magnitudes, Polynomial};
pub use solve::{solve_for, SolveError};
