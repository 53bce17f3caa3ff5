//! Text renderings of join logs, size lists and component listings.
//!
//! Every record renders to exactly one line so writers can emit it with a
//! single `write_all` and never tear a line on failure.

use std::{
    fmt,
    io::{self, Write},
};

use crate::{
    components::Partition,
    graph::NodeId,
    labels::LabelTable,
    linkage::{JoinEvent, JoinSink, LeafTouch},
    sweep::{SweepLevel, SweepSink},
};

/// Header line preceding the join records.
pub const JOIN_HEADER: &str = "link\tval\tNID\tANN\tBOB\txcsz\tycsz\txycsz\tnedge\tctr\tlss\tnsg";

impl fmt::Display for JoinEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{:.2}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.0}\t{}\t{}",
            self.order,
            self.weight,
            self.name,
            self.left_name,
            self.right_name,
            self.left_size,
            self.right_size,
            self.merged_size,
            self.progress_percent(),
            self.centroid,
            self.largest_sub_split,
            self.singleton_joins,
        )
    }
}

impl fmt::Display for LeafTouch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(weight) => write!(f, "{}\t{weight:.2}", self.name),
            None => write!(f, "{}\t0.0", self.name),
        }
    }
}

/// Space separated component sizes, optionally run-length encoded.
///
/// Run-length encoding collapses consecutive equal sizes into
/// `size(count)`; runs of one print the bare size.
///
/// # Examples
/// ```
/// use clasp_core::SizeList;
///
/// let sizes = [4, 2, 2, 2, 1];
/// assert_eq!(SizeList::plain(&sizes).to_string(), "4 2 2 2 1");
/// assert_eq!(SizeList::run_length(&sizes).to_string(), "4 2(3) 1");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SizeList<'a> {
    sizes: &'a [usize],
    run_length: bool,
}

impl<'a> SizeList<'a> {
    /// Lists every size.
    #[must_use]
    pub fn plain(sizes: &'a [usize]) -> Self {
        Self {
            sizes,
            run_length: false,
        }
    }

    /// Lists each run of equal sizes once, with its length.
    #[must_use]
    pub fn run_length(sizes: &'a [usize]) -> Self {
        Self {
            sizes,
            run_length: true,
        }
    }

    fn runs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let run_length = self.run_length;
        self.sizes
            .chunk_by(move |left, right| run_length && left == right)
            .map(|run| (run[0], run.len()))
    }
}

impl fmt::Display for SizeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (size, count)) in self.runs().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{size}")?;
            if count > 1 {
                write!(f, "({count})")?;
            }
        }
        Ok(())
    }
}

/// One sweep line: the level right-aligned to two columns, then the sizes.
#[derive(Clone, Copy, Debug)]
pub struct SweepLine<'a> {
    level: &'a SweepLevel,
    run_length: bool,
}

impl<'a> SweepLine<'a> {
    /// Renders `level`, optionally run-length encoding its sizes.
    #[must_use]
    pub fn new(level: &'a SweepLevel, run_length: bool) -> Self {
        Self { level, run_length }
    }
}

impl fmt::Display for SweepLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}:", self.level.level)?;
        let sizes = self.level.partition.sizes();
        if sizes.is_empty() {
            return Ok(());
        }
        let list = if self.run_length {
            SizeList::run_length(&sizes)
        } else {
            SizeList::plain(&sizes)
        };
        write!(f, " {list}")
    }
}

/// Tab separated members of one component, by label when available.
#[derive(Clone, Copy, Debug)]
pub struct ComponentLine<'a> {
    members: &'a [NodeId],
    labels: Option<&'a LabelTable>,
}

impl<'a> ComponentLine<'a> {
    /// Renders `members`, naming each through `labels` when given.
    #[must_use]
    pub fn new(members: &'a [NodeId], labels: Option<&'a LabelTable>) -> Self {
        Self { members, labels }
    }
}

impl fmt::Display for ComponentLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, &member) in self.members.iter().enumerate() {
            if index > 0 {
                f.write_str("\t")?;
            }
            match self.labels {
                Some(labels) => f.write_str(&labels.label_or_id(member))?,
                None => write!(f, "{member}")?,
            }
        }
        Ok(())
    }
}

/// Writes one [`ComponentLine`] per column of `partition`.
///
/// # Errors
/// Returns any I/O error raised by `out`.
pub fn write_components<W: Write + ?Sized>(
    partition: &Partition,
    labels: Option<&LabelTable>,
    out: &mut W,
) -> io::Result<()> {
    for column in partition.columns() {
        write_line(out, ComponentLine::new(column, labels))?;
    }
    Ok(())
}

fn write_line<W: Write + ?Sized>(out: &mut W, line: impl fmt::Display) -> io::Result<()> {
    let mut text = line.to_string();
    text.push('\n');
    out.write_all(text.as_bytes())
}

/// [`JoinSink`] writing the join log and the leaf list as text.
///
/// # Examples
/// ```
/// use clasp_core::{JoinRecordWriter, LinkageConfig, SparseGraph, link};
///
/// let graph = SparseGraph::canonical(2, [(0, 1, 0.5), (1, 0, 0.5)])?;
/// let mut writer = JoinRecordWriter::new(Vec::new(), Vec::new());
/// link(&graph, None, &LinkageConfig::default(), &mut writer)?;
/// let (joins, leaves) = writer.into_inner();
/// let joins = String::from_utf8(joins)?;
/// assert_eq!(joins.lines().count(), 2);
/// assert!(joins.contains("\n1\t0.50\tL1_2\tleaf_0\tleaf_1\t1\t1\t2\t100.00\t"));
/// assert_eq!(String::from_utf8(leaves)?, "0\t0.50\n1\t0.50\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JoinRecordWriter<J, L> {
    joins: J,
    leaves: L,
}

impl<J: Write, L: Write> JoinRecordWriter<J, L> {
    /// Writes join records to `joins` and leaf touches to `leaves`.
    #[must_use]
    pub fn new(joins: J, leaves: L) -> Self {
        Self { joins, leaves }
    }

    /// Flushes both outputs.
    ///
    /// # Errors
    /// Returns any I/O error raised while flushing.
    pub fn flush(&mut self) -> io::Result<()> {
        self.joins.flush()?;
        self.leaves.flush()
    }

    /// Returns the underlying outputs.
    pub fn into_inner(self) -> (J, L) {
        (self.joins, self.leaves)
    }
}

impl<J: Write, L: Write> JoinSink for JoinRecordWriter<J, L> {
    fn begin(&mut self) -> io::Result<()> {
        write_line(&mut self.joins, JOIN_HEADER)
    }

    fn join(&mut self, event: &JoinEvent) -> io::Result<()> {
        write_line(&mut self.joins, event)
    }

    fn leaf(&mut self, touch: &LeafTouch) -> io::Result<()> {
        write_line(&mut self.leaves, touch)
    }
}

/// [`SweepSink`] writing one [`SweepLine`] per level.
#[derive(Debug)]
pub struct SweepWriter<W> {
    out: W,
    run_length: bool,
}

impl<W: Write> SweepWriter<W> {
    /// Writes sweep lines to `out`.
    #[must_use]
    pub fn new(out: W, run_length: bool) -> Self {
        Self { out, run_length }
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SweepSink for SweepWriter<W> {
    fn level(&mut self, level: &SweepLevel) -> io::Result<()> {
        write_line(&mut self.out, SweepLine::new(level, self.run_length))
    }
}
