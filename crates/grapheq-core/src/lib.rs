//! GraphEq core: the bounded, cancellable request engine.
//!
//! Wires the lexer, parser, symbolic engine and plot crates into one
//! pipeline: raw text -> normalization -> equation model -> bounded
//! per-variable solving -> (two variables) range discovery -> contour
//! field -> renderer. Transport, delivery and image rasterization details
//! stay behind the [`Renderer`](grapheq_plot::Renderer) seam and the
//! reply struct.

mod artifact;
mod bounded;
mod engine;
mod reply;
mod request;
mod solver;

pub use artifact::ArtifactStore;
pub use bounded::{run as run_bounded, BoundedConfig, BoundedOutcome};
pub use engine::{Engine, EngineConfig};
pub use reply::{
    format_solutions, Reply, MSG_MULTIPLE_EQUALS, MSG_NO_SOLUTIONS, MSG_PARSE_FAILURE, MSG_PARTIAL,
};
pub use request::{hint_for, parse_request, RangeHint, Request};
pub use solver::{solve_equation, SolutionMap, SolveOutcome, VariableSolution};
