//! Text formats for clasp graphs, label tables and domain maps.
//!
//! Readers take any [`std::io::BufRead`] and report malformed input with the
//! one-based line number. Writers emit the same formats back.

mod errors;
mod read;
mod write;

pub use errors::TextProviderError;
pub use read::{read_abc, read_abc_with_labels, read_blocks, read_edge_list, read_label_table};
pub use write::{write_domain_map, write_edge_list, write_label_table};
