//! Writers mirroring the readers' formats.

use std::io::{self, Write};

use clasp_core::{DomainMap, LabelTable, SparseGraph};

/// Writes `graph` as a native edge list.
///
/// Nodes that take part in no entry are declared with `node <id>` so the
/// domain survives a round trip.
///
/// # Errors
/// Returns any I/O error raised by `out`.
///
/// # Examples
/// ```
/// use clasp_core::SparseGraph;
/// use clasp_providers_text::write_edge_list;
///
/// let graph = SparseGraph::from_entries([0, 1, 7], [(0, 1, 0.25)])?;
/// let mut out = Vec::new();
/// write_edge_list(&graph, &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "node 7\n0 1 0.25\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_edge_list<W: Write>(graph: &SparseGraph, mut out: W) -> io::Result<()> {
    let domain = graph.domain();
    let mut touched = vec![false; domain.len()];
    for (row, column, _) in graph.entries() {
        for node in [row, column] {
            if let Ok(position) = domain.binary_search(&node) {
                touched[position] = true;
            }
        }
    }
    for (&node, _) in domain.iter().zip(&touched).filter(|(_, touched)| !**touched) {
        writeln!(out, "node {node}")?;
    }
    for (row, column, weight) in graph.entries() {
        writeln!(out, "{row} {column} {weight}")?;
    }
    Ok(())
}

/// Writes `<id>\t<label>` lines in id order.
///
/// # Errors
/// Returns any I/O error raised by `out`.
pub fn write_label_table<W: Write>(labels: &LabelTable, mut out: W) -> io::Result<()> {
    for (node, label) in labels.iter() {
        writeln!(out, "{node}\t{label}")?;
    }
    Ok(())
}

/// Writes `<old>\t<new>` lines for every mapped node.
///
/// # Errors
/// Returns any I/O error raised by `out`.
pub fn write_domain_map<W: Write>(map: &DomainMap, mut out: W) -> io::Result<()> {
    for (node, image) in map.pairs() {
        writeln!(out, "{node}\t{image}")?;
    }
    Ok(())
}
