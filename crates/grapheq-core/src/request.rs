//! Raw-input splitting: the expression body plus trailing range hints.
//!
//! Hints are comma-separated `var=min..max` parts after the expression
//! (`x^2+y^2=4, x=-5..5`). Hint parsing is best effort: a malformed part
//! is ignored and the axis stays undecided.

use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeHint {
    pub var: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub body: String,
    pub hints: Vec<RangeHint>,
}

/// Split the raw input into the expression body and its range hints.
pub fn parse_request(raw: &str) -> Request {
    let mut parts = raw.split(',');
    let body = parts.next().unwrap_or_default().trim().to_string();
    let hints = parts
        .filter_map(|part| {
            let hint = parse_hint(part);
            if hint.is_none() {
                debug!("ignoring malformed range hint {part:?}");
            }
            hint
        })
        .collect();
    Request { body, hints }
}

/// Parse one `var=min..max` hint.
fn parse_hint(part: &str) -> Option<RangeHint> {
    let (name, bounds) = part.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let (min, max) = bounds.split_once("..")?;
    let min: f64 = min.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;
    if !min.is_finite() || !max.is_finite() || min >= max {
        return None;
    }
    Some(RangeHint {
        var: name.to_string(),
        min,
        max,
    })
}

/// Look up the hint for one axis variable.
pub fn hint_for<'a>(hints: &'a [RangeHint], var: &str) -> Option<&'a RangeHint> {
    hints.iter().find(|h| h.var == var)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_only() {
        let r = parse_request("x^2+y^2=4");
        assert_eq!(r.body, "x^2+y^2=4");
        assert!(r.hints.is_empty());
    }

    #[test]
    fn trailing_hints_are_extracted() {
        let r = parse_request("x^2+y^2=4, x=-5..5, y=0..10");
        assert_eq!(r.body, "x^2+y^2=4");
        assert_eq!(
            r.hints,
            vec![
                RangeHint {
                    var: "x".into(),
                    min: -5.0,
                    max: 5.0
                },
                RangeHint {
                    var: "y".into(),
                    min: 0.0,
                    max: 10.0
                },
            ]
        );
    }

    #[test]
    fn malformed_hints_are_ignored() {
        for raw in [
            "x=4, x=5..",
            "x=4, =1..2",
            "x=4, y=3..1",
            "x=4, y=a..b",
            "x=4, just text",
        ] {
            let r = parse_request(raw);
            assert_eq!(r.body, "x=4");
            assert!(r.hints.is_empty(), "hints accepted for {raw:?}");
        }
    }

    #[test]
    fn decimal_and_negative_bounds() {
        let r = parse_request("xy=1, x=-0.5..2.5");
        assert_eq!(r.hints[0].min, -0.5);
        assert_eq!(r.hints[0].max, 2.5);
    }

    #[test]
    fn hint_lookup_by_variable() {
        let r = parse_request("xy=1, y=-1..1");
        assert!(hint_for(&r.hints, "y").is_some());
        assert!(hint_for(&r.hints, "x").is_none());
    }
}
