//! Per-variable bounded solving.
//!
//! Each free variable is solved independently as its own bounded unit;
//! timeouts and engine failures degrade that variable's entry to an
//! empty, flagged result without touching the others. The worst-case
//! wall-clock is `budget × variable_count`.

use crate::bounded::{self, BoundedConfig, BoundedOutcome};
use grapheq_parser::Equation;
use grapheq_symbolic::{solve_for, Expr};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Completion state of one variable's solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Complete,
    /// The solve timed out or failed; `roots` holds whatever partial
    /// result was available (usually nothing).
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSolution {
    pub roots: Vec<Expr>,
    pub outcome: SolveOutcome,
}

/// Variable name -> solution branches, in lexicographic key order.
pub type SolutionMap = BTreeMap<String, VariableSolution>;

/// Solve the equation for every free variable. Returns the map and
/// whether any entry is incomplete.
pub fn solve_equation(equation: &Equation, config: BoundedConfig) -> (SolutionMap, bool) {
    let mut map = SolutionMap::new();
    let mut any_timed_out = false;

    for var in equation.free_variables() {
        let lmr = equation.left_minus_right().clone();
        let job_var = var.clone();
        let outcome = bounded::run(config, move |token| solve_for(&lmr, &job_var, token));

        let entry = match outcome {
            BoundedOutcome::Completed(Ok(roots)) => {
                debug!("solved for `{var}`: {} branch(es)", roots.len());
                VariableSolution {
                    roots,
                    outcome: SolveOutcome::Complete,
                }
            }
            BoundedOutcome::Completed(Err(err)) => {
                warn!("solve for `{var}` failed: {err}");
                any_timed_out = true;
                VariableSolution {
                    roots: Vec::new(),
                    outcome: SolveOutcome::TimedOut,
                }
            }
            BoundedOutcome::TimedOut | BoundedOutcome::Failed => {
                warn!("solve for `{var}` did not finish in time");
                any_timed_out = true;
                VariableSolution {
                    roots: Vec::new(),
                    outcome: SolveOutcome::TimedOut,
                }
            }
        };
        map.insert(var, entry);
    }

    (map, any_timed_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapheq_lexer::normalize;
    use grapheq_parser::{parse_input, Parsed};

    fn equation(input: &str) -> Equation {
        match parse_input(&normalize(input)).expect("parse") {
            Parsed::Equation(eq) => eq,
            other => panic!("expected equation, got {other:?}"),
        }
    }

    #[test]
    fn single_variable_solve_is_complete() {
        let (map, timed_out) = solve_equation(&equation("x=5"), BoundedConfig::default());
        assert!(!timed_out);
        let entry = &map["x"];
        assert_eq!(entry.outcome, SolveOutcome::Complete);
        assert_eq!(entry.roots, vec![Expr::int(5)]);
    }

    #[test]
    fn symmetric_equations_solve_identically() {
        let (ab, _) = solve_equation(&equation("a=b"), BoundedConfig::default());
        let (ba, _) = solve_equation(&equation("b=a"), BoundedConfig::default());
        assert_eq!(ab, ba);
    }

    #[test]
    fn each_variable_gets_an_independent_entry() {
        let (map, timed_out) = solve_equation(&equation("x^2+y^2=4"), BoundedConfig::default());
        assert!(!timed_out);
        assert_eq!(map.len(), 2);
        assert_eq!(map["x"].roots.len(), 2);
        assert_eq!(map["y"].roots.len(), 2);
    }

    #[test]
    fn unsupported_shapes_degrade_to_flagged_empty_entries() {
        // x^x is not polynomial in x; y is still solved.
        let (map, timed_out) = solve_equation(&equation("x^x+y=1"), BoundedConfig::default());
        assert!(timed_out);
        assert_eq!(map["x"].outcome, SolveOutcome::TimedOut);
        assert!(map["x"].roots.is_empty());
        assert_eq!(map["y"].outcome, SolveOutcome::Complete);
        assert_eq!(map["y"].roots.len(), 1);
    }
}
