//! File loading and creation helpers shared by the commands.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use clasp_core::{LabelTable, Partition, SparseGraph};
use clasp_providers_text::{
    TextProviderError, read_abc, read_abc_with_labels, read_blocks, read_edge_list,
    read_label_table,
};
use tracing::{Span, debug, field, instrument};

use super::commands::{CliError, SourceArgs};

/// Graph and optional labels named by [`SourceArgs`].
#[derive(Debug)]
pub(super) struct LoadedInput {
    pub(super) graph: SparseGraph,
    pub(super) labels: Option<LabelTable>,
}

#[instrument(
    name = "cli.load_input",
    err,
    skip(args),
    fields(format = field::Empty, nodes = field::Empty, entries = field::Empty),
)]
pub(super) fn load_input(args: &SourceArgs) -> Result<LoadedInput, CliError> {
    let table = args
        .tab
        .as_deref()
        .map(|path| read_file(path, read_label_table))
        .transpose()?;
    let span = Span::current();
    let loaded = match (&args.graph, &args.abc) {
        (Some(path), _) => {
            span.record("format", "edge-list");
            LoadedInput {
                graph: read_file(path, read_edge_list)?,
                labels: table,
            }
        }
        (None, Some(path)) => {
            span.record("format", "abc");
            match table {
                Some(table) => LoadedInput {
                    graph: read_file(path, |reader| read_abc_with_labels(reader, &table))?,
                    labels: Some(table),
                },
                None => {
                    let (graph, labels) = read_file(path, read_abc)?;
                    LoadedInput {
                        graph,
                        labels: Some(labels),
                    }
                }
            }
        }
        (None, None) => return Err(CliError::MissingInput),
    };
    span.record("nodes", loaded.graph.node_count());
    span.record("entries", loaded.graph.entry_count());
    Ok(loaded)
}

pub(super) fn load_blocks(path: &Path) -> Result<Partition, CliError> {
    let blocks = read_file(path, read_blocks)?;
    debug!(
        path = %path.display(),
        blocks = blocks.len(),
        nodes = blocks.domain().len(),
        "loaded blocks"
    );
    Ok(blocks)
}

fn read_file<T>(
    path: &Path,
    read: impl FnOnce(BufReader<File>) -> Result<T, TextProviderError>,
) -> Result<T, CliError> {
    let file = File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read(BufReader::new(file)).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates `path` and hands a buffered writer to `write`, flushing afterwards.
pub(super) fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), CliError> {
    let wrap = |source| CliError::Write {
        target: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(wrap)?;
    writer.flush().map_err(wrap)
}
