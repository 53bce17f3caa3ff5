//! Error types for the clasp core library.
//!
//! Defines the error enums exposed by the public API, their stable codes, and
//! a convenient result alias.

use std::{fmt, io, sync::Arc};

use thiserror::Error;

use crate::graph::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing or reshaping a [`crate::SparseGraph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// An entry carried a NaN or infinite weight.
    #[error("edge {row} -> {column} has a non-finite weight")]
    NonFiniteWeight {
        /// Row node of the offending entry.
        row: NodeId,
        /// Column node of the offending entry.
        column: NodeId,
    },
    /// An entry or restriction referenced a node outside the domain.
    #[error("node {node} is not part of the graph domain")]
    NodeOutsideDomain {
        /// The node that was not found.
        node: NodeId,
    },
    /// A relabelling map did not cover a node that is still present.
    #[error("node {node} has no image in the domain map")]
    UnmappedNode {
        /// The node without an image.
        node: NodeId,
    },
    /// A node was assigned to more than one partition column.
    #[error("node {node} appears in more than one column")]
    DuplicateMember {
        /// The repeated node.
        node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An entry carried a NaN or infinite weight.
        NonFiniteWeight => NonFiniteWeight { .. } => "GRAPH_NON_FINITE_WEIGHT",
        /// An entry or restriction referenced a node outside the domain.
        NodeOutsideDomain => NodeOutsideDomain { .. } => "GRAPH_NODE_OUTSIDE_DOMAIN",
        /// A relabelling map did not cover a node that is still present.
        UnmappedNode => UnmappedNode { .. } => "GRAPH_UNMAPPED_NODE",
        /// A node was assigned to more than one partition column.
        DuplicateMember => DuplicateMember { .. } => "GRAPH_DUPLICATE_MEMBER",
    }
}

/// Error type produced when constructing or running [`crate::Clasp`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClaspError {
    /// Linkage requires node identifiers `0..N` with no gaps.
    #[error("linkage needs a canonical domain but position {position} holds node {node}")]
    NonCanonicalDomain {
        /// First position whose node does not equal the position.
        position: usize,
        /// Node found at that position.
        node: NodeId,
    },
    /// The stop threshold must be a finite number.
    #[error("stop threshold must be finite (got {got})")]
    InvalidStopThreshold {
        /// The rejected threshold.
        got: f32,
    },
    /// A sweep level specification could not be parsed.
    #[error("invalid level specification `{spec}`: {reason}")]
    InvalidLevels {
        /// The specification as supplied.
        spec: Arc<str>,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The sweep normaliser must be finite and positive.
    #[error("level normaliser must be finite and positive (got {got})")]
    InvalidLevelNorm {
        /// The rejected normaliser.
        got: f64,
    },
    /// An edge transform specification could not be parsed.
    #[error("invalid edge transform `{spec}`: {reason}")]
    InvalidTransform {
        /// The offending part of the specification.
        spec: Arc<str>,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Deselected labels cannot be reported once the domain is relabelled.
    #[error("deselected labels are unavailable when the domain is made canonical")]
    DeselectionAfterMapping,
    /// Writing emitted records failed.
    #[error("failed to write {what}: {error}")]
    Output {
        /// Which stream was being written.
        what: &'static str,
        #[source]
        /// Underlying I/O failure.
        error: io::Error,
    },
    /// A graph operation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`ClaspError`] variants.
    enum ClaspErrorCode for ClaspError {
        /// Linkage requires node identifiers `0..N` with no gaps.
        NonCanonicalDomain => NonCanonicalDomain { .. } => "CLASP_NON_CANONICAL_DOMAIN",
        /// The stop threshold must be a finite number.
        InvalidStopThreshold => InvalidStopThreshold { .. } => "CLASP_INVALID_STOP_THRESHOLD",
        /// A sweep level specification could not be parsed.
        InvalidLevels => InvalidLevels { .. } => "CLASP_INVALID_LEVELS",
        /// The sweep normaliser must be finite and positive.
        InvalidLevelNorm => InvalidLevelNorm { .. } => "CLASP_INVALID_LEVEL_NORM",
        /// An edge transform specification could not be parsed.
        InvalidTransform => InvalidTransform { .. } => "CLASP_INVALID_TRANSFORM",
        /// Deselected labels cannot be reported once the domain is relabelled.
        DeselectionAfterMapping => DeselectionAfterMapping => "CLASP_DESELECTION_AFTER_MAPPING",
        /// Writing emitted records failed.
        Output => Output { .. } => "CLASP_OUTPUT_FAILURE",
        /// A graph operation failed.
        GraphFailure => Graph { .. } => "CLASP_GRAPH_FAILURE",
    }
}

impl ClaspError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in a graph operation.
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn output(what: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |error| Self::Output { what, error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ClaspError>;
