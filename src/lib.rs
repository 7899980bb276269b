//! ordsync: fetch a code of ordinances from the Municode content API and write it as nested or flattened JSON.

pub mod clean;
pub mod cli;
pub mod config;
pub mod formats;
pub mod model;
pub mod source;
pub mod tree;

// Re-exports for CLI and consumers.
pub use clean::clean;
pub use formats::{
    to_flat, to_nested, write_json, write_output, FlatEntry, FormatError, NestedChapter,
    NestedSection, OutputShape,
};
pub use model::{Chapter, Section, TreeNode};
pub use source::{
    extract_content, fetch_leaf_text, ApiClient, ApiClientBuilder, CodeSource, JobContext,
    SourceError,
};
pub use tree::{build_tree, count_leaves, BuildOptions, DEFAULT_PACING};
