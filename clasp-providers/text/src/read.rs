//! Line-oriented readers.

use std::{collections::HashMap, io::BufRead, str::FromStr};

use clasp_core::{LabelTable, NodeId, Partition, SparseGraph};

use crate::errors::TextProviderError;

type Result<T> = core::result::Result<T, TextProviderError>;

/// Yields `(line_number, content)` for every line that is neither blank nor
/// a `#` comment. Content is trimmed.
fn content_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) => {
                let trimmed = line.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('#'))
                    .then(|| Ok((index + 1, trimmed.to_owned())))
            }
            Err(err) => Some(Err(err.into())),
        })
}

fn number<T: FromStr>(line: usize, token: &str, expected: &'static str) -> Result<T> {
    token.parse().map_err(|_| TextProviderError::InvalidNumber {
        line,
        token: token.to_owned(),
        expected,
    })
}

fn weight(line: usize, token: &str) -> Result<f32> {
    let value: f32 = number(line, token, "weight")?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TextProviderError::InvalidNumber {
            line,
            token: token.to_owned(),
            expected: "finite weight",
        })
    }
}

/// Reads the native edge list.
///
/// Lines are either `node <id>`, declaring a node, or `<src> <dst> <weight>`.
/// The domain is every declared or referenced node.
///
/// # Errors
/// Returns [`TextProviderError`] for unreadable input or malformed lines.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use clasp_providers_text::read_edge_list;
///
/// let graph = read_edge_list(Cursor::new("# demo\nnode 4\n0 1 0.5\n"))?;
/// assert_eq!(graph.domain(), &[0, 1, 4]);
/// assert_eq!(graph.weight(0, 1), Some(0.5));
/// # Ok::<(), clasp_providers_text::TextProviderError>(())
/// ```
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<SparseGraph> {
    let mut domain = Vec::new();
    let mut entries = Vec::new();
    for line in content_lines(reader) {
        let (line, text) = line?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            ["node", id] => domain.push(number(line, id, "node id")?),
            [source, target, w] => {
                let source: NodeId = number(line, source, "node id")?;
                let target: NodeId = number(line, target, "node id")?;
                domain.extend([source, target]);
                entries.push((source, target, weight(line, w)?));
            }
            _ => {
                return Err(TextProviderError::MalformedLine {
                    line,
                    reason: "expected `node <id>` or `<src> <dst> <weight>`",
                });
            }
        }
    }
    Ok(SparseGraph::from_entries(domain, entries)?)
}

/// Reads label pairs, assigning ids in order of first appearance.
///
/// Each line is `<label> <label> [<weight>]`, with a default weight of `1`.
/// Entries are mirrored and repeated pairs keep the larger weight, so the
/// result is symmetric over the canonical domain.
///
/// # Errors
/// Returns [`TextProviderError`] for unreadable input or malformed lines.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use clasp_providers_text::read_abc;
///
/// let (graph, labels) = read_abc(Cursor::new("cat dog 0.5\ndog emu\n"))?;
/// assert_eq!(labels.get(2), Some("emu"));
/// assert_eq!(graph.weight(2, 1), Some(1.0));
/// assert!(graph.is_symmetric());
/// # Ok::<(), clasp_providers_text::TextProviderError>(())
/// ```
pub fn read_abc<R: BufRead>(reader: R) -> Result<(SparseGraph, LabelTable)> {
    let mut ids: HashMap<String, NodeId> = HashMap::new();
    let mut labels = LabelTable::new();
    let entries = read_pairs(reader, |_, label| {
        let next = ids.len();
        let id = *ids.entry(label.to_owned()).or_insert_with(|| {
            labels.insert(next, label);
            next
        });
        Ok(id)
    })?;
    let graph = SparseGraph::from_entries(0..labels.len(), entries)?;
    Ok((graph, labels))
}

/// Reads label pairs, resolving labels through an existing table.
///
/// The domain is every node of `labels`.
///
/// # Errors
/// Returns [`TextProviderError::UnknownLabel`] for labels missing from
/// `labels`, and the errors of [`read_abc`] otherwise.
pub fn read_abc_with_labels<R: BufRead>(reader: R, labels: &LabelTable) -> Result<SparseGraph> {
    let ids: HashMap<&str, NodeId> = labels.iter().map(|(node, label)| (label, node)).collect();
    let entries = read_pairs(reader, |line, label| {
        ids.get(label)
            .copied()
            .ok_or_else(|| TextProviderError::UnknownLabel {
                line,
                label: label.to_owned(),
            })
    })?;
    let domain = labels.iter().map(|(node, _)| node);
    Ok(SparseGraph::from_entries(domain, entries)?)
}

fn read_pairs<R, F>(reader: R, mut resolve: F) -> Result<Vec<(NodeId, NodeId, f32)>>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<NodeId>,
{
    let mut entries = Vec::new();
    for line in content_lines(reader) {
        let (line, text) = line?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let (left, right, w) = match tokens.as_slice() {
            [left, right] => (*left, *right, 1.0),
            [left, right, w] => (*left, *right, weight(line, w)?),
            _ => {
                return Err(TextProviderError::MalformedLine {
                    line,
                    reason: "expected `<label> <label> [<weight>]`",
                });
            }
        };
        let (left, right) = (resolve(line, left)?, resolve(line, right)?);
        entries.extend([(left, right, w), (right, left, w)]);
    }
    Ok(entries)
}

/// Reads a label table of `<id>\t<label>` lines.
///
/// # Errors
/// Returns [`TextProviderError::DuplicateLabel`] when an id repeats.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use clasp_providers_text::read_label_table;
///
/// let table = read_label_table(Cursor::new("0\tgreat tit\n3\twren\n"))?;
/// assert_eq!(table.get(0), Some("great tit"));
/// assert_eq!(table.len(), 2);
/// # Ok::<(), clasp_providers_text::TextProviderError>(())
/// ```
pub fn read_label_table<R: BufRead>(reader: R) -> Result<LabelTable> {
    let mut table = LabelTable::new();
    for line in content_lines(reader) {
        let (line, text) = line?;
        let Some((id, label)) = text.split_once('\t') else {
            return Err(TextProviderError::MalformedLine {
                line,
                reason: "expected `<id>\\t<label>`",
            });
        };
        let node: NodeId = number(line, id.trim(), "node id")?;
        if table.insert(node, label.trim()).is_some() {
            return Err(TextProviderError::DuplicateLabel { line, node });
        }
    }
    Ok(table)
}

/// Reads a block file: one block of whitespace separated node ids per line.
///
/// # Errors
/// Returns a graph error wrapped in [`TextProviderError::Graph`] when a node
/// appears in more than one block.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use clasp_providers_text::read_blocks;
///
/// let blocks = read_blocks(Cursor::new("5 1\n2\n"))?;
/// assert_eq!(blocks.columns(), &[vec![1, 5], vec![2]]);
/// assert_eq!(blocks.domain(), &[1, 2, 5]);
/// # Ok::<(), clasp_providers_text::TextProviderError>(())
/// ```
pub fn read_blocks<R: BufRead>(reader: R) -> Result<Partition> {
    let mut blocks = Vec::new();
    for line in content_lines(reader) {
        let (line, text) = line?;
        let block = text
            .split_whitespace()
            .map(|token| number(line, token, "node id"))
            .collect::<Result<Vec<NodeId>>>()?;
        blocks.push(block);
    }
    Ok(Partition::from_columns(blocks)?)
}
