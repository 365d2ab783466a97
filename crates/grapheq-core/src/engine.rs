//! The request pipeline: normalize, parse, solve, and (for two-variable
//! equations) discover a window, sample the field and render.
//!
//! Every entity is request-scoped; the only thing that outlives a request
//! is the rendered artifact, owned by the [`ArtifactStore`].

use crate::artifact::ArtifactStore;
use crate::bounded::{self, BoundedConfig, BoundedOutcome};
use crate::reply::{format_solutions, Reply, MSG_MULTIPLE_EQUALS, MSG_PARSE_FAILURE};
use crate::request::{hint_for, parse_request, RangeHint};
use crate::solver::{solve_equation, SolutionMap};
use grapheq_lexer::normalize;
use grapheq_parser::{parse_input, Equation, ParseError, Parsed};
use grapheq_plot::{
    discover_window, fallback_window, AxisRange, ContourField, FigureSpec, PlotError, RangeJob,
    Renderer, DEFAULT_RESOLUTION,
};
use grapheq_symbolic::{canonicalize, compile, CompileError};
use log::{debug, info, warn};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Budget and poll interval shared by the solver and the range
    /// sampler.
    pub bounded: BoundedConfig,
    /// Field resolution along each axis.
    pub resolution: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            bounded: BoundedConfig::default(),
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Internal failures of the plotting stage. Absorbed into a text-only
/// reply; never shown to the user.
#[derive(Debug, Error)]
enum PlotStageError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Plot(#[from] PlotError),
}

pub struct Engine {
    config: EngineConfig,
    artifacts: ArtifactStore,
    renderer: Box<dyn Renderer + Send + Sync>,
}

impl Engine {
    /// Build an engine and start the artifact sweeper.
    pub fn new(
        config: EngineConfig,
        artifacts: ArtifactStore,
        renderer: Box<dyn Renderer + Send + Sync>,
    ) -> Self {
        artifacts.start_sweeper();
        Engine {
            config,
            artifacts,
            renderer,
        }
    }

    /// Handle one raw input line. Never panics, never surfaces internal
    /// error detail: exactly one of the fixed reply shapes comes back.
    pub fn handle(&self, raw: &str) -> Reply {
        let request = parse_request(raw);
        let normalized = normalize(&request.body);
        debug!("normalized {:?} -> {normalized:?}", request.body);

        let parsed = match parse_input(&normalized) {
            Ok(parsed) => parsed,
            Err(ParseError::MultipleEquals) => return Reply::text(MSG_MULTIPLE_EQUALS),
            Err(err) => {
                debug!("parse failure for {normalized:?}: {err}");
                return Reply::text(MSG_PARSE_FAILURE);
            }
        };

        match parsed {
            Parsed::Expression(expr) => Reply::text(canonicalize(&expr).to_string()),
            Parsed::Equation(equation) => self.handle_equation(&equation, &request.hints),
        }
    }

    fn handle_equation(&self, equation: &Equation, hints: &[RangeHint]) -> Reply {
        let (solutions, any_timed_out) = solve_equation(equation, self.config.bounded);
        let reply = Reply::text(format_solutions(&solutions, any_timed_out));

        let vars: Vec<String> = equation.free_variables().into_iter().collect();
        if vars.len() != 2 {
            return reply;
        }

        // Lexicographic order fixes the axes: first variable horizontal.
        match self.render_curve(equation, &solutions, hints, &vars[0], &vars[1]) {
            Ok(path) => reply.with_image(path),
            Err(err) => {
                warn!("plot stage failed, replying text-only: {err}");
                reply
            }
        }
    }

    fn render_curve(
        &self,
        equation: &Equation,
        solutions: &SolutionMap,
        hints: &[RangeHint],
        x_var: &str,
        y_var: &str,
    ) -> Result<PathBuf, PlotStageError> {
        let lmr = equation.left_minus_right();
        let axis_range = |var: &str| {
            hint_for(hints, var)
                .map(|h| AxisRange::seeded(h.min, h.max))
                .unwrap_or_default()
        };
        let branches = |var: &str| {
            solutions
                .get(var)
                .map(|s| s.roots.clone())
                .unwrap_or_default()
        };

        let job = RangeJob {
            left_minus_right: lmr.clone(),
            x_var: x_var.to_string(),
            y_var: y_var.to_string(),
            x_roots: branches(x_var),
            y_roots: branches(y_var),
            x_range: axis_range(x_var),
            y_range: axis_range(y_var),
        };

        let worker_job = job.clone();
        let window = match bounded::run(self.config.bounded, move |token| {
            discover_window(&worker_job, token)
        }) {
            BoundedOutcome::Completed(Ok(window)) => window,
            outcome => {
                warn!("range discovery degraded ({outcome:?}); using fallback window");
                fallback_window(&job)
            }
        };
        debug!("resolved window {window:?}");

        let compiled = compile(lmr, &[x_var.to_string(), y_var.to_string()])?;
        let field = ContourField::build(&compiled, window, self.config.resolution);
        let figure = FigureSpec {
            title: format!("{lmr} = 0"),
            x_label: x_var.to_string(),
            y_label: y_var.to_string(),
            field,
        };

        let path = self.artifacts.allocate("png");
        self.renderer.render(&figure, &path)?;
        info!("rendered implicit curve to {}", path.display());
        Ok(path)
    }
}
