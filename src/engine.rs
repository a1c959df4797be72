use crate::error::Result;
use crate::options::IndexOptions;
use crate::output::format_report;
use crate::reader::classify_file;
use crate::tree::build_tree;
use crate::types::{FileReadResult, TreeNode};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Walks `options.root` and classifies every root-level file.
///
/// Nested files keep only their size; their contents are never read.
pub fn index_tree(options: &IndexOptions) -> Result<TreeNode> {
    #[cfg(feature = "logging")]
    tracing::debug!("Indexing {}", options.root.display());
    let mut tree = build_tree(&options.root, &options.tree)?;
    classify_root_files(&mut tree, options);
    Ok(tree)
}

/// Walks, classifies and renders the markdown report.
pub fn index_directory(options: &IndexOptions) -> Result<String> {
    let tree = index_tree(options)?;
    Ok(format_report(&tree, &tree.path))
}

fn classify_node(node: &mut TreeNode, options: &IndexOptions) {
    let result: FileReadResult =
        classify_file(&node.path, options.max_file_size, options.binary_detection).into();
    node.apply(result);
}

#[cfg(not(feature = "parallel"))]
fn classify_root_files(tree: &mut TreeNode, options: &IndexOptions) {
    let Some(children) = tree.children.as_mut() else {
        return;
    };
    for node in children.iter_mut().filter(|n| n.is_file()) {
        classify_node(node, options);
    }
}

#[cfg(feature = "parallel")]
fn classify_root_files(tree: &mut TreeNode, options: &IndexOptions) {
    let Some(children) = tree.children.as_mut() else {
        return;
    };
    children
        .par_iter_mut()
        .filter(|n| n.is_file())
        .for_each(|node| classify_node(node, options));
}
