//! Reply assembly: fixed user-facing messages and solution-text
//! rendering.
//!
//! Raw error detail never reaches the user; it goes to the operational
//! log. Exactly one of the fixed shapes below is produced per request.

use crate::solver::{SolutionMap, SolveOutcome};
use std::path::PathBuf;

pub const MSG_MULTIPLE_EQUALS: &str = "Include exactly one equals sign (=) in an equation.";
pub const MSG_PARSE_FAILURE: &str = "Please enter the expression correctly.";
pub const MSG_NO_SOLUTIONS: &str = "No solutions were found.";
pub const MSG_PARTIAL: &str =
    "Some solutions could not be computed within the time limit, sorry.";

/// What goes back to the delivery channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub image: Option<PathBuf>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: PathBuf) -> Self {
        self.image = Some(image);
        self
    }
}

/// Render a solution map: variables in lexicographic order, one
/// `name = expr` line per branch, an explicit incompleteness notice when
/// any entry is flagged.
pub fn format_solutions(map: &SolutionMap, any_timed_out: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (var, solution) in map {
        for root in &solution.roots {
            lines.push(format!("{var} = {root}"));
        }
    }

    if lines.is_empty() {
        if any_timed_out {
            return MSG_PARTIAL.to_string();
        }
        return MSG_NO_SOLUTIONS.to_string();
    }

    let mut out = lines.join("\n");
    if any_timed_out {
        out.push('\n');
        out.push_str(MSG_PARTIAL);
    }
    out
}
