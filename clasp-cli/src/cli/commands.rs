//! Command definitions and execution for the clasp CLI.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clasp_core::{
    Clasp, ClaspBuilder, ClaspError, EdgeTransform, JoinRecordWriter, LabelTable, LinkageSummary,
    SizeList, SweepLevel, SweepLevels, SweepSink, SweepWriter, write_components,
};
use clasp_providers_text::{
    TextProviderError, write_domain_map, write_edge_list, write_label_table,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::{LoadedInput, load_blocks, load_input, write_file};

const DEFAULT_LEAF_LIST: &str = "nodes.list";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "clasp",
    about = "Components, granularity sweeps and single-linkage dendrograms of similarity graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Report connected components and bound the domain by component size.
    Components(ComponentsCommand),
    /// Report components over a range of weight cutoffs.
    Levels(LevelsCommand),
    /// Write the single-linkage join log and leaf list.
    Link(LinkCommand),
}

/// Input options shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Graph in the native edge-list format.
    #[arg(long, conflicts_with = "abc", required_unless_present = "abc")]
    pub graph: Option<PathBuf>,

    /// Graph given as label pairs `<label> <label> [<weight>]`.
    #[arg(long)]
    pub abc: Option<PathBuf>,

    /// Label table of `<id>\t<label>` lines.
    #[arg(long)]
    pub tab: Option<PathBuf>,

    /// Treat the input graph as already symmetric.
    #[arg(long = "is-undirected")]
    pub is_undirected: bool,

    /// Edge-weight transform applied before anything else, e.g. `gq(0.5),mul(10)`.
    #[arg(long = "tf", value_parser = EdgeTransform::parse)]
    pub transform: Option<EdgeTransform>,

    /// Main output file; standard output when absent.
    #[arg(short = 'o', long = "out")]
    pub output: Option<PathBuf>,
}

impl SourceArgs {
    fn has_labels(&self) -> bool {
        self.tab.is_some() || self.abc.is_some()
    }

    fn builder(&self) -> ClaspBuilder {
        let builder = ClaspBuilder::new().with_symmetric_input(self.is_undirected || self.abc.is_some());
        match &self.transform {
            Some(transform) => builder.with_transform(transform.clone()),
            None => builder,
        }
    }
}

/// Main output of the `components` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ComponentsOutput {
    /// Space separated component sizes.
    #[default]
    Sizes,
    /// Run-length encoded component sizes.
    SizeCounts,
    /// Number of components.
    Count,
    /// One line of members per component.
    Cc,
    /// Entries inside one block of the `--dom` file.
    Block,
    /// Entries between blocks of the `--dom` file.
    BlockComplement,
}

/// Options accepted by the `components` command.
#[derive(Debug, Args, Clone, Default)]
pub struct ComponentsCommand {
    /// Input options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Block file whose union restricts the domain.
    #[arg(long)]
    pub dom: Option<PathBuf>,

    /// What to write to the main output.
    #[arg(long, value_enum, default_value_t = ComponentsOutput::Sizes)]
    pub write: ComponentsOutput,

    /// Drop components with fewer members.
    #[arg(long = "cc-bound", default_value_t = 0)]
    pub cc_bound: usize,

    /// Renumber the retained domain onto `0..M`.
    #[arg(long)]
    pub canonical: bool,

    /// Write the graph restricted to the retained domain.
    #[arg(long = "write-matrix")]
    pub write_matrix: Option<PathBuf>,

    /// Write the label table of the retained domain.
    #[arg(long = "write-tab")]
    pub write_tab: Option<PathBuf>,

    /// Write the label table of the dropped domain.
    #[arg(long = "write-tabx", conflicts_with = "canonical")]
    pub write_tabx: Option<PathBuf>,

    /// Write the `<old>\t<new>` renumbering map.
    #[arg(long = "write-map", requires = "canonical")]
    pub write_map: Option<PathBuf>,
}

/// Main output of the `levels` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LevelsOutput {
    /// Every component size.
    Sizes,
    /// Run-length encoded component sizes.
    #[default]
    SizeCounts,
}

/// Options accepted by the `levels` command.
#[derive(Debug, Args, Clone)]
pub struct LevelsCommand {
    /// Input options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Block file whose union restricts the domain.
    #[arg(long)]
    pub dom: Option<PathBuf>,

    /// Levels as `low/step/high[/prefix]`; with a prefix each level's
    /// components go to `<prefix>.L<level>`.
    #[arg(long, value_parser = SweepLevels::parse)]
    pub levels: SweepLevels,

    /// Divide each level by this value to obtain its weight cutoff.
    #[arg(long = "levels-norm")]
    pub levels_norm: Option<f64>,

    /// Size rendering for each level.
    #[arg(long, value_enum, default_value_t = LevelsOutput::SizeCounts)]
    pub write: LevelsOutput,
}

/// Options accepted by the `link` command.
#[derive(Debug, Args, Clone)]
pub struct LinkCommand {
    /// Input options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Stop at the first edge lighter than this weight.
    #[arg(long = "stop-below")]
    pub stop_below: Option<f32>,

    /// File receiving one line per leaf as it joins a cluster.
    #[arg(long = "leaf-list", default_value = DEFAULT_LEAF_LIST)]
    pub leaf_list: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Neither `--graph` nor `--abc` was supplied.
    #[error("an input graph is required (`--graph` or `--abc`)")]
    MissingInput,
    /// An option was given without the option it depends on.
    #[error("`{option}` requires `{requires}`")]
    MissingCompanion {
        /// The option that was supplied.
        option: &'static str,
        /// The option it depends on.
        requires: &'static str,
    },
    /// An input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Open {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An input file could not be parsed.
    #[error("failed to read `{path}`: {source}")]
    Input {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: TextProviderError,
    },
    /// An output could not be written.
    #[error("failed to write {target}: {source}")]
    Write {
        /// File path, or `standard output`.
        target: String,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Core orchestration failed.
    #[error(transparent)]
    Core(#[from] ClaspError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionSummary {
    /// Outcome of `components`.
    Components {
        /// Nodes taking part in component discovery.
        nodes: usize,
        /// Components found before bounding.
        components: usize,
        /// Components kept by the bound.
        retained_components: usize,
        /// Nodes kept by the bound.
        retained_nodes: usize,
    },
    /// Outcome of `levels`: the number of levels written.
    Levels {
        /// Levels written.
        levels: usize,
    },
    /// Outcome of `link`.
    Link(LinkageSummary),
}

/// Executes `cli`, writing the main output to `--out` or standard output.
///
/// # Errors
/// Returns [`CliError`] when loading, processing or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clasp_cli::cli::{Cli, Command, ComponentsCommand, ExecutionSummary, SourceArgs, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let graph = dir.path().join("graph.txt");
/// std::fs::write(&graph, "0 1 0.5\n1 0 0.5\nnode 2\n")?;
/// let cli = Cli {
///     command: Command::Components(ComponentsCommand {
///         source: SourceArgs {
///             graph: Some(graph),
///             output: Some(dir.path().join("sizes.txt")),
///             ..SourceArgs::default()
///         },
///         ..ComponentsCommand::default()
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(matches!(summary, ExecutionSummary::Components { components: 2, .. }));
/// assert_eq!(std::fs::read_to_string(dir.path().join("sizes.txt"))?, "2 1\n");
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let name = match &cli.command {
        Command::Components(_) => "components",
        Command::Levels(_) => "levels",
        Command::Link(_) => "link",
    };
    Span::current().record("command", name);

    let target = cli.source().output.clone();
    match target {
        Some(path) => {
            let file = File::create(&path).map_err(|source| CliError::Write {
                target: path.display().to_string(),
                source,
            })?;
            execute(cli, BufWriter::new(file))
        }
        None => execute(cli, BufWriter::new(io::stdout().lock())),
    }
}

impl Cli {
    fn source(&self) -> &SourceArgs {
        match &self.command {
            Command::Components(command) => &command.source,
            Command::Levels(command) => &command.source,
            Command::Link(command) => &command.source,
        }
    }
}

/// Executes `cli`, writing the main output to `out`.
///
/// Side files named by the command are still written to disk.
///
/// # Errors
/// Returns [`CliError`] when loading, processing or writing fails.
pub fn execute<W: Write>(cli: Cli, mut out: W) -> Result<ExecutionSummary, CliError> {
    let summary = match cli.command {
        Command::Components(command) => run_components(&command, &mut out)?,
        Command::Levels(command) => run_levels(&command, &mut out)?,
        Command::Link(command) => run_link(&command, &mut out)?,
    };
    out.flush().map_err(main_output)?;
    info!(summary = ?summary, "command completed");
    Ok(summary)
}

fn main_output(source: io::Error) -> CliError {
    CliError::Write {
        target: "main output".to_owned(),
        source,
    }
}

fn required_labels<'a>(
    labels: Option<&'a LabelTable>,
    option: &'static str,
) -> Result<&'a LabelTable, CliError> {
    labels.ok_or(CliError::MissingCompanion {
        option,
        requires: "--tab or --abc",
    })
}

#[instrument(
    name = "cli.components",
    err,
    skip(command, out),
    fields(write = ?command.write, cc_bound = command.cc_bound, canonical = command.canonical),
)]
pub(super) fn run_components<W: Write>(
    command: &ComponentsCommand,
    out: &mut W,
) -> Result<ExecutionSummary, CliError> {
    let needs_blocks = matches!(
        command.write,
        ComponentsOutput::Block | ComponentsOutput::BlockComplement
    );
    if needs_blocks && command.dom.is_none() {
        return Err(CliError::MissingCompanion {
            option: "--write block|block-complement",
            requires: "--dom",
        });
    }
    for (given, option) in [
        (command.write_tab.is_some(), "--write-tab"),
        (command.write_tabx.is_some(), "--write-tabx"),
    ] {
        if given && !command.source.has_labels() {
            return Err(CliError::MissingCompanion {
                option,
                requires: "--tab or --abc",
            });
        }
    }

    let clasp = command
        .source
        .builder()
        .with_component_bound(command.cc_bound)
        .with_canonical(command.canonical)
        .build()?;
    let LoadedInput { graph, labels } = load_input(&command.source)?;
    let blocks = command.dom.as_deref().map(load_blocks).transpose()?;
    let graph = clasp.prepare(&graph)?;

    let partition = clasp.components(&graph, blocks.as_ref().map(|b| b.domain()))?;
    let bounded = clasp.bound(&partition)?;

    if let Some(path) = &command.write_matrix {
        let restricted = bounded.restrict_graph(&graph)?;
        write_file(path, |w| write_edge_list(&restricted, w))?;
    }
    if let Some(path) = &command.write_tabx {
        let dropped = bounded.deselected_labels(required_labels(labels.as_ref(), "--write-tabx")?)?;
        write_file(path, |w| write_label_table(&dropped, w))?;
    }
    let retained_labels = labels.as_ref().map(|table| bounded.restrict_labels(table));
    if let Some(path) = &command.write_tab {
        let table = required_labels(retained_labels.as_ref(), "--write-tab")?;
        write_file(path, |w| write_label_table(table, w))?;
    }
    if let (Some(path), Some(map)) = (&command.write_map, bounded.map()) {
        write_file(path, |w| write_domain_map(map, w))?;
    }

    let kept = bounded.partition();
    let written = match command.write {
        ComponentsOutput::Sizes => writeln!(out, "{}", SizeList::plain(&kept.sizes())),
        ComponentsOutput::SizeCounts => writeln!(out, "{}", SizeList::run_length(&kept.sizes())),
        ComponentsOutput::Count => writeln!(out, "{}", kept.len()),
        ComponentsOutput::Cc => write_components(kept, retained_labels.as_ref(), out),
        ComponentsOutput::Block | ComponentsOutput::BlockComplement => {
            let Some(blocks) = &blocks else {
                return Err(CliError::MissingCompanion {
                    option: "--write block|block-complement",
                    requires: "--dom",
                });
            };
            let shaped = if command.write == ComponentsOutput::Block {
                blocks.within_blocks(&graph)
            } else {
                blocks.between_blocks(&graph)
            };
            write_edge_list(&shaped, &mut *out)
        }
    };
    written.map_err(main_output)?;

    Ok(ExecutionSummary::Components {
        nodes: partition.domain().len(),
        components: partition.len(),
        retained_components: kept.len(),
        retained_nodes: bounded.retained().len(),
    })
}

/// Sweep sink writing the level lines and, when a prefix is configured, one
/// component file per level.
///
/// A failing side file is kept in `failed` so the error can name its path.
struct LevelOutputs<'a, W: Write> {
    lines: SweepWriter<&'a mut W>,
    levels: &'a SweepLevels,
    labels: Option<&'a LabelTable>,
    failed: Option<CliError>,
}

impl<W: Write> LevelOutputs<'_, W> {
    fn write_side_file(&self, name: &str, level: &SweepLevel) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(name)?);
        write_components(&level.partition, self.labels, &mut writer)?;
        writer.flush()
    }
}

impl<W: Write> SweepSink for LevelOutputs<'_, W> {
    fn level(&mut self, level: &SweepLevel) -> io::Result<()> {
        self.lines.level(level)?;
        let Some(name) = self.levels.side_file(level.level) else {
            return Ok(());
        };
        if let Err(source) = self.write_side_file(&name, level) {
            let kind = source.kind();
            self.failed = Some(CliError::Write {
                target: name,
                source,
            });
            return Err(kind.into());
        }
        Ok(())
    }
}

#[instrument(
    name = "cli.levels",
    err,
    skip(command, out),
    fields(levels = %command.levels, norm = ?command.levels_norm),
)]
pub(super) fn run_levels<W: Write>(
    command: &LevelsCommand,
    out: &mut W,
) -> Result<ExecutionSummary, CliError> {
    let levels = match command.levels_norm {
        Some(norm) => command.levels.clone().with_norm(norm)?,
        None => command.levels.clone(),
    };
    let clasp = command.source.builder().build()?;
    let LoadedInput { graph, labels } = load_input(&command.source)?;
    let blocks = command.dom.as_deref().map(load_blocks).transpose()?;
    let graph = clasp.prepare(&graph)?;

    let mut sink = LevelOutputs {
        lines: SweepWriter::new(out, command.write == LevelsOutput::SizeCounts),
        levels: &levels,
        labels: labels.as_ref(),
        failed: None,
    };
    let restrict = blocks.as_ref().map(|b| b.domain());
    let written = match clasp.sweep(&graph, restrict, &levels, &mut sink) {
        Ok(written) => written,
        Err(err) => return Err(sink.failed.take().unwrap_or_else(|| err.into())),
    };
    Ok(ExecutionSummary::Levels { levels: written })
}

#[instrument(
    name = "cli.link",
    err,
    skip(command, out),
    fields(stop_below = ?command.stop_below, leaf_list = %command.leaf_list.display()),
)]
pub(super) fn run_link<W: Write>(
    command: &LinkCommand,
    out: &mut W,
) -> Result<ExecutionSummary, CliError> {
    let builder = command.source.builder();
    let builder = match command.stop_below {
        Some(threshold) => builder.with_stop_below(threshold),
        None => builder,
    };
    let clasp: Clasp = builder.build()?;
    let LoadedInput { graph, labels } = load_input(&command.source)?;
    let graph = clasp.prepare(&graph)?;
    clasp.check_linkable(&graph)?;

    let leaf_target = || command.leaf_list.display().to_string();
    let leaves = File::create(&command.leaf_list).map_err(|source| CliError::Write {
        target: leaf_target(),
        source,
    })?;
    let mut writer = JoinRecordWriter::new(&mut *out, BufWriter::new(leaves));
    let summary = clasp.link(&graph, labels.as_ref(), &mut writer)?;
    writer.flush().map_err(|source| CliError::Write {
        target: leaf_target(),
        source,
    })?;
    Ok(ExecutionSummary::Link(summary))
}
