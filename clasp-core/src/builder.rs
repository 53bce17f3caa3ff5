//! Builder for [`Clasp`] configurations.
//!
//! Collects the run-wide options once and validates them before any graph is
//! touched.

use crate::{Result, clasp::Clasp, error::ClaspError, transform::EdgeTransform};

/// Configures and constructs [`Clasp`] instances.
///
/// # Examples
/// ```
/// use clasp_core::ClaspBuilder;
///
/// let clasp = ClaspBuilder::new()
///     .with_component_bound(3)
///     .with_canonical(true)
///     .with_stop_below(0.2)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clasp.component_bound(), 3);
/// assert!(clasp.canonical());
/// assert!(!clasp.symmetric_input());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClaspBuilder {
    symmetric_input: bool,
    component_bound: usize,
    canonical: bool,
    stop_below: Option<f32>,
    transform: Option<EdgeTransform>,
}

impl ClaspBuilder {
    /// Creates a builder with every option off.
    ///
    /// # Examples
    /// ```
    /// use clasp_core::ClaspBuilder;
    ///
    /// let builder = ClaspBuilder::new();
    /// assert_eq!(builder.component_bound(), 0);
    /// assert_eq!(builder.stop_below(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that input graphs are already symmetric.
    #[must_use]
    pub fn with_symmetric_input(mut self, symmetric: bool) -> Self {
        self.symmetric_input = symmetric;
        self
    }

    /// Returns whether input graphs are trusted to be symmetric.
    #[must_use]
    #[rustfmt::skip]
    pub fn symmetric_input(&self) -> bool { self.symmetric_input }

    /// Drops components smaller than `min_size` when bounding the domain.
    #[must_use]
    pub fn with_component_bound(mut self, min_size: usize) -> Self {
        self.component_bound = min_size;
        self
    }

    /// Returns the minimum component size.
    #[must_use]
    #[rustfmt::skip]
    pub fn component_bound(&self) -> usize { self.component_bound }

    /// Renumbers the bounded domain onto `0..M`.
    #[must_use]
    pub fn with_canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    /// Returns whether bounded domains are renumbered.
    #[must_use]
    #[rustfmt::skip]
    pub fn canonical(&self) -> bool { self.canonical }

    /// Stops linkage at the first edge lighter than `threshold`.
    #[must_use]
    pub fn with_stop_below(mut self, threshold: f32) -> Self {
        self.stop_below = Some(threshold);
        self
    }

    /// Returns the linkage stop threshold.
    #[must_use]
    #[rustfmt::skip]
    pub fn stop_below(&self) -> Option<f32> { self.stop_below }

    /// Applies `transform` to every graph before analysis.
    #[must_use]
    pub fn with_transform(mut self, transform: EdgeTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns the configured edge transform.
    #[must_use]
    pub fn transform(&self) -> Option<&EdgeTransform> {
        self.transform.as_ref()
    }

    /// Validates the configuration and constructs a [`Clasp`] instance.
    ///
    /// # Errors
    /// Returns [`ClaspError::InvalidStopThreshold`] when the threshold is NaN
    /// or infinite.
    ///
    /// # Examples
    /// ```
    /// use clasp_core::{ClaspBuilder, ClaspErrorCode};
    ///
    /// let err = ClaspBuilder::new().with_stop_below(f32::NAN).build().unwrap_err();
    /// assert_eq!(err.code(), ClaspErrorCode::InvalidStopThreshold);
    /// ```
    pub fn build(self) -> Result<Clasp> {
        if let Some(threshold) = self.stop_below.filter(|t| !t.is_finite()) {
            return Err(ClaspError::InvalidStopThreshold { got: threshold });
        }
        Ok(Clasp::new(
            self.symmetric_input,
            self.component_bound,
            self.canonical,
            self.stop_below,
            self.transform,
        ))
    }
}
