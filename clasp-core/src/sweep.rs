//! Granularity sweeps over a range of weight cutoffs.
//!
//! A sweep walks an arithmetic sequence of integer levels, turns each level
//! into a weight cutoff, and reports the component partition of the graph
//! restricted to edges at or above that cutoff.

use std::{fmt, io, str::FromStr, sync::Arc};

use tracing::debug;

use crate::{
    Result,
    components::{Partition, find_components},
    error::ClaspError,
    graph::{NodeId, SparseGraph},
};

/// Level sequence `low, low + step, ..., <= high` with optional scaling.
///
/// # Examples
/// ```
/// use clasp_core::SweepLevels;
///
/// let levels: SweepLevels = "2/3/9/run".parse()?;
/// assert_eq!(levels.levels().collect::<Vec<_>>(), vec![2, 5, 8]);
/// assert_eq!(levels.side_file(5).as_deref(), Some("run.L5"));
///
/// let scaled = levels.with_norm(10.0)?;
/// assert_eq!(scaled.cutoff(5), 0.5);
/// # Ok::<(), clasp_core::ClaspError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SweepLevels {
    low: u64,
    step: u64,
    high: u64,
    prefix: Option<String>,
    norm: Option<f64>,
}

impl SweepLevels {
    /// Creates a level sequence.
    ///
    /// # Errors
    /// Returns [`ClaspError::InvalidLevels`] when `step` is zero or `low`
    /// exceeds `high`.
    pub fn new(low: u64, step: u64, high: u64) -> Result<Self> {
        let spec = || Arc::from(format!("{low}/{step}/{high}"));
        if step == 0 {
            return Err(ClaspError::InvalidLevels {
                spec: spec(),
                reason: "step must be positive",
            });
        }
        if low > high {
            return Err(ClaspError::InvalidLevels {
                spec: spec(),
                reason: "low level exceeds high level",
            });
        }
        Ok(Self {
            low,
            step,
            high,
            prefix: None,
            norm: None,
        })
    }

    /// Parses `low/step/high` or `low/step/high/prefix`.
    ///
    /// # Errors
    /// Returns [`ClaspError::InvalidLevels`] for malformed specifications.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason| ClaspError::InvalidLevels {
            spec: Arc::from(spec),
            reason,
        };
        let mut parts = spec.splitn(4, '/');
        let mut number = || {
            parts
                .next()
                .and_then(|part| part.trim().parse::<u64>().ok())
                .ok_or_else(|| invalid("expected low/step/high[/prefix]"))
        };
        let (low, step, high) = (number()?, number()?, number()?);
        let prefix = parts.next().map(str::trim);
        let levels = Self::new(low, step, high).map_err(|err| match err {
            ClaspError::InvalidLevels { reason, .. } => invalid(reason),
            other => other,
        })?;
        match prefix {
            Some("") => Err(invalid("file prefix is empty")),
            Some(prefix) => Ok(levels.with_prefix(prefix)),
            None => Ok(levels),
        }
    }

    /// Writes per-level partitions to files named `<prefix>.L<level>`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Divides every level by `norm` to obtain its cutoff.
    ///
    /// # Errors
    /// Returns [`ClaspError::InvalidLevelNorm`] unless `norm` is finite and
    /// positive.
    pub fn with_norm(mut self, norm: f64) -> Result<Self> {
        if !(norm.is_finite() && norm > 0.0) {
            return Err(ClaspError::InvalidLevelNorm { got: norm });
        }
        self.norm = Some(norm);
        Ok(self)
    }

    /// Iterates over the levels in increasing order.
    pub fn levels(&self) -> impl Iterator<Item = u64> + '_ {
        let step = self.step;
        std::iter::successors(Some(self.low), move |&level| level.checked_add(step))
            .take_while(|&level| level <= self.high)
    }

    /// Returns the weight cutoff of `level`.
    #[must_use]
    pub fn cutoff(&self, level: u64) -> f64 {
        let level = level as f64;
        self.norm.map_or(level, |norm| level / norm)
    }

    /// Returns the side-file name of `level` when a prefix is configured.
    #[must_use]
    pub fn side_file(&self, level: u64) -> Option<String> {
        self.prefix
            .as_ref()
            .map(|prefix| format!("{prefix}.L{level}"))
    }

    /// Returns the configured file prefix.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl FromStr for SweepLevels {
    type Err = ClaspError;

    fn from_str(spec: &str) -> Result<Self> {
        Self::parse(spec)
    }
}

impl fmt::Display for SweepLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.low, self.step, self.high)?;
        if let Some(prefix) = &self.prefix {
            write!(f, "/{prefix}")?;
        }
        Ok(())
    }
}

/// Partition observed at one sweep level.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepLevel {
    /// The integer level.
    pub level: u64,
    /// The weight cutoff applied at this level.
    pub cutoff: f64,
    /// Components of the graph restricted to weights `>= cutoff`.
    pub partition: Partition,
}

/// Receives sweep levels in increasing order.
pub trait SweepSink {
    /// Receives one level.
    ///
    /// # Errors
    /// Returns any I/O error raised while emitting the level.
    fn level(&mut self, level: &SweepLevel) -> io::Result<()>;
}

impl SweepSink for Vec<SweepLevel> {
    fn level(&mut self, level: &SweepLevel) -> io::Result<()> {
        self.push(level.clone());
        Ok(())
    }
}

/// Runs a sweep and streams each level to `sink`.
///
/// `graph` is never modified; each level filters a working copy.
///
/// # Errors
/// Returns graph errors raised by the restriction and
/// [`ClaspError::Output`] when the sink fails.
///
/// # Examples
/// ```
/// use clasp_core::{SparseGraph, SweepLevel, SweepLevels, sweep};
///
/// let graph = SparseGraph::canonical(3, [(0, 1, 0.9), (1, 2, 0.4)])?.symmetrized();
/// let levels = SweepLevels::new(0, 5, 10)?.with_norm(10.0)?;
/// let mut seen: Vec<SweepLevel> = Vec::new();
/// sweep(&graph, None, true, &levels, &mut seen)?;
/// let sizes: Vec<_> = seen.iter().map(|l| l.partition.sizes()).collect();
/// assert_eq!(sizes, vec![vec![3], vec![2, 1], vec![1, 1, 1]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn sweep<S>(
    graph: &SparseGraph,
    restrict: Option<&[NodeId]>,
    assume_symmetric: bool,
    levels: &SweepLevels,
    sink: &mut S,
) -> Result<usize>
where
    S: SweepSink + ?Sized,
{
    let scoped;
    let graph = match restrict {
        Some(nodes) => {
            scoped = graph.restrict(nodes)?;
            &scoped
        }
        None => graph,
    };

    let mut emitted = 0;
    for level in levels.levels() {
        let cutoff = levels.cutoff(level);
        let filtered = graph.at_least(cutoff);
        let partition = find_components(&filtered, None, assume_symmetric)?;
        debug!(level, cutoff, components = partition.len(), "sweep level");
        sink.level(&SweepLevel {
            level,
            cutoff,
            partition,
        })
        .map_err(ClaspError::output("sweep level"))?;
        emitted += 1;
    }
    Ok(emitted)
}
