use std::io;

use clasp_core::GraphError;
use thiserror::Error;

/// Errors raised while reading text inputs.
#[derive(Debug, Error)]
pub enum TextProviderError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: &'static str },
    #[error("line {line}: `{token}` is not a valid {expected}")]
    InvalidNumber {
        line: usize,
        token: String,
        expected: &'static str,
    },
    #[error("line {line}: label `{label}` is not in the label table")]
    UnknownLabel { line: usize, label: String },
    #[error("line {line}: node {node} is labelled twice")]
    DuplicateLabel { line: usize, node: usize },
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),
}
