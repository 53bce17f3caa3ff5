//! Clasp core library.
//!
//! Single-linkage dendrograms, connected components, granularity sweeps and
//! component-size domain bounding over sparse weighted graphs.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bound;
mod builder;
mod clasp;
mod components;
mod error;
mod graph;
mod labels;
mod linkage;
mod report;
mod sweep;
#[cfg(test)]
mod test_utils;
mod transform;

pub use crate::{
    bound::{BoundedDomain, DomainMap, bound_domain},
    builder::ClaspBuilder,
    clasp::Clasp,
    components::{Partition, find_components},
    error::{ClaspError, ClaspErrorCode, GraphError, GraphErrorCode, Result},
    graph::{NodeId, SparseGraph},
    labels::LabelTable,
    linkage::{
        ClusterForest, Edge, ISOLATE_WEIGHT, JoinEvent, JoinKind, JoinLog, JoinSink, LeafTouch,
        LinkageConfig, LinkageSummary, Merge, MergedSide, extract_edges, link, order_edges,
    },
    report::{
        ComponentLine, JOIN_HEADER, JoinRecordWriter, SizeList, SweepLine, SweepWriter,
        write_components,
    },
    sweep::{SweepLevel, SweepLevels, SweepSink, sweep},
    transform::{EdgeTransform, TransformStep},
};
