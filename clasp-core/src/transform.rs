//! Edge-weight transforms applied before any analysis runs.
//!
//! A transform is a sequence of `op(arg)` steps separated by `,` or `;`.
//! Filters drop entries failing a comparison; rescaling steps rewrite the
//! weight. Steps run in order on each entry.

use std::{fmt, str::FromStr, sync::Arc};

use crate::{Result, error::ClaspError, graph::SparseGraph};

/// One transform step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformStep {
    /// `gq(x)`: keep weights `>= x`.
    AtLeast(f32),
    /// `gt(x)`: keep weights `> x`.
    Above(f32),
    /// `lq(x)`: keep weights `<= x`.
    AtMost(f32),
    /// `lt(x)`: keep weights `< x`.
    Below(f32),
    /// `mul(x)`: multiply weights by `x`.
    Scale(f32),
    /// `add(x)`: add `x` to weights.
    Shift(f32),
}

impl TransformStep {
    fn apply(self, weight: f32) -> Option<f32> {
        match self {
            Self::AtLeast(x) => (weight >= x).then_some(weight),
            Self::Above(x) => (weight > x).then_some(weight),
            Self::AtMost(x) => (weight <= x).then_some(weight),
            Self::Below(x) => (weight < x).then_some(weight),
            Self::Scale(x) => Some(weight * x),
            Self::Shift(x) => Some(weight + x),
        }
    }

    fn parts(self) -> (&'static str, f32) {
        match self {
            Self::AtLeast(x) => ("gq", x),
            Self::Above(x) => ("gt", x),
            Self::AtMost(x) => ("lq", x),
            Self::Below(x) => ("lt", x),
            Self::Scale(x) => ("mul", x),
            Self::Shift(x) => ("add", x),
        }
    }
}

impl fmt::Display for TransformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, arg) = self.parts();
        write!(f, "{name}({arg})")
    }
}

/// Ordered list of [`TransformStep`]s.
///
/// # Examples
/// ```
/// use clasp_core::{EdgeTransform, SparseGraph};
///
/// let graph = SparseGraph::canonical(3, [(0, 1, 0.2), (1, 2, 0.8)])?;
/// let transform: EdgeTransform = "gq(0.5); mul(10)".parse()?;
/// let shaped = transform.apply(&graph)?;
/// assert_eq!(shaped.weight(0, 1), None);
/// assert_eq!(shaped.weight(1, 2), Some(8.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeTransform {
    steps: Vec<TransformStep>,
}

impl EdgeTransform {
    /// Creates a transform from explicit steps.
    #[must_use]
    pub fn new(steps: Vec<TransformStep>) -> Self {
        Self { steps }
    }

    /// Parses a transform specification.
    ///
    /// # Errors
    /// Returns [`ClaspError::InvalidTransform`] naming the offending step.
    pub fn parse(spec: &str) -> Result<Self> {
        let steps = spec
            .split([',', ';'])
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(parse_step)
            .collect::<Result<Vec<_>>>()?;
        if steps.is_empty() {
            return Err(invalid(spec, "no transform steps given"));
        }
        Ok(Self { steps })
    }

    /// Returns the steps in application order.
    #[must_use]
    #[rustfmt::skip]
    pub fn steps(&self) -> &[TransformStep] { &self.steps }

    /// Applies every step to each entry of `graph`, producing a new graph.
    ///
    /// # Errors
    /// Returns a graph error when rescaling overflows to a non-finite weight.
    pub fn apply(&self, graph: &SparseGraph) -> Result<SparseGraph> {
        let shaped = graph.filter_map_entries(|_, _, weight| {
            self.steps
                .iter()
                .try_fold(weight, |current, step| step.apply(current))
        })?;
        Ok(shaped)
    }
}

impl FromStr for EdgeTransform {
    type Err = ClaspError;

    fn from_str(spec: &str) -> Result<Self> {
        Self::parse(spec)
    }
}

impl fmt::Display for EdgeTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

fn parse_step(step: &str) -> Result<TransformStep> {
    let (name, rest) = step
        .split_once('(')
        .ok_or_else(|| invalid(step, "expected op(arg)"))?;
    let arg = rest
        .strip_suffix(')')
        .ok_or_else(|| invalid(step, "missing closing parenthesis"))?;
    let value: f32 = arg
        .trim()
        .parse()
        .map_err(|_| invalid(step, "argument is not a number"))?;
    if !value.is_finite() {
        return Err(invalid(step, "argument must be finite"));
    }
    let step = match name.trim() {
        "gq" => TransformStep::AtLeast(value),
        "gt" => TransformStep::Above(value),
        "lq" => TransformStep::AtMost(value),
        "lt" => TransformStep::Below(value),
        "mul" => TransformStep::Scale(value),
        "add" => TransformStep::Shift(value),
        _ => return Err(invalid(step, "unknown operation")),
    };
    Ok(step)
}

fn invalid(spec: &str, reason: &'static str) -> ClaspError {
    ClaspError::InvalidTransform {
        spec: Arc::from(spec),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single("gt(0.5)", vec![TransformStep::Above(0.5)])]
    #[case::mixed(
        " lq(3) ; add(-1),mul(2) ",
        vec![TransformStep::AtMost(3.0), TransformStep::Shift(-1.0), TransformStep::Scale(2.0)]
    )]
    #[case::trailing_separator("lt(1),", vec![TransformStep::Below(1.0)])]
    fn parses_steps(#[case] spec: &str, #[case] expected: Vec<TransformStep>) {
        let transform = EdgeTransform::parse(spec).expect("spec is valid");
        assert_eq!(transform.steps(), expected.as_slice());
    }

    #[rstest]
    #[case::empty("", "no transform steps given")]
    #[case::no_parens("gq", "expected op(arg)")]
    #[case::unclosed("gq(1", "missing closing parenthesis")]
    #[case::not_a_number("mul(x)", "argument is not a number")]
    #[case::infinite("mul(inf)", "argument must be finite")]
    #[case::unknown("pow(2)", "unknown operation")]
    fn rejects_malformed_steps(#[case] spec: &str, #[case] reason: &str) {
        let err = EdgeTransform::parse(spec).expect_err("spec is malformed");
        assert!(matches!(
            &err,
            ClaspError::InvalidTransform { reason: got, .. } if *got == reason
        ));
    }

    #[rstest]
    fn steps_apply_in_order() {
        let graph = SparseGraph::canonical(3, [(0, 1, 1.0), (1, 2, 2.0), (2, 0, 3.0)])
            .expect("entries are valid");
        let transform = EdgeTransform::parse("add(1),gt(2.5),mul(0.5)").expect("spec is valid");
        let shaped = transform.apply(&graph).expect("weights stay finite");
        let entries: Vec<_> = shaped.entries().collect();
        assert_eq!(entries, vec![(1, 2, 1.5), (2, 0, 2.0)]);
        assert_eq!(graph.entry_count(), 3);
    }

    #[rstest]
    fn overflowing_weights_are_rejected() {
        let graph = SparseGraph::canonical(2, [(0, 1, f32::MAX)]).expect("entries are valid");
        let transform = EdgeTransform::parse("mul(10)").expect("spec is valid");
        let err = transform.apply(&graph).expect_err("weight overflows");
        assert_eq!(err.graph_code().map(|c| c.as_str()), Some("GRAPH_NON_FINITE_WEIGHT"));
    }

    #[rstest]
    fn display_round_trips_through_parse() {
        let transform = EdgeTransform::parse("gq(0.25);mul(4)").expect("spec is valid");
        assert_eq!(transform.to_string(), "gq(0.25),mul(4)");
    }
}
