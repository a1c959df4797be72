//! # Treeindex
//!
//! `treeindex` builds a textual snapshot of a directory for use as agent
//! context: a tree of everything under the root (minus skipped and
//! gitignored entries) and the full text of the files directly in the root.
//!
//! The walk is cycle-safe across symbolic links and never aborts on a bad
//! entry; failures are recorded on the affected [`TreeNode`] instead. Root
//! files go through size and binary triage before their text is embedded.
//!
//! # Features
//!
//! - `parallel`: Classifies root-level files in parallel using Rayon.
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use treeindex::{IndexBuilder, index_directory};
//!
//! let options = IndexBuilder::new(".")
//!     .max_file_size(50 * 1024)
//!     .respect_gitignore(true)
//!     .build();
//!
//! let report = index_directory(&options).expect("Failed to index directory");
//! println!("{}", report);
//! ```

pub mod commands;
mod engine;
mod error;
pub mod fs;
mod options;
pub mod output;
pub mod plugin;
mod reader;
mod tree;
mod types;

pub use engine::{index_directory, index_tree};
pub use error::{Result, TreeIndexError};
pub use options::{
    BinaryDetection, DEFAULT_MAX_FILE_SIZE, DEFAULT_SKIP_EXTENSIONS, DEFAULT_SKIP_NAMES,
    IndexBuilder, IndexOptions, TreeOptions, WalkConfig,
};
pub use reader::{
    PROBE_LENGTH, classify_file, classify_file_with, has_binary_extension, read_file_content,
};
pub use tree::{build_tree, build_tree_with};
pub use types::{
    BINARY_FILE, CIRCULAR_REFERENCE, FILE_TOO_LARGE, FileContent, FileReadResult, NodeKind,
    TreeNode, compare_names, format_size,
};
