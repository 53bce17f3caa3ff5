//! Command-line interface for clasp.
//!
//! Three commands share one input surface: `components` reports the
//! connected components and bounds the domain by component size, `levels`
//! sweeps a range of weight cutoffs, and `link` writes the single-linkage
//! join log.

mod commands;
mod input;

pub use commands::{
    Cli, CliError, Command, ComponentsCommand, ComponentsOutput, ExecutionSummary, LevelsCommand,
    LevelsOutput, LinkCommand, SourceArgs, execute, run_cli,
};
