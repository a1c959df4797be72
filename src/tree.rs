//! Recursive directory walker that produces a [`TreeNode`] tree.
//!
//! The walk never reads file contents. Entries are filtered by name first
//! (skip lists), then by the root `.gitignore`, and only the survivors are
//! stat'ed. Failures below the root are recorded on the affected node and the
//! walk moves on to the next sibling.

use crate::error::{Result, TreeIndexError};
use crate::fs::{DirEntryInfo, EntryKind, FileSystem, OsFs, describe_io_error};
use crate::options::{IGNORE_FILE_NAME, TreeOptions, WalkConfig};
use crate::types::{CIRCULAR_REFERENCE, TreeNode, compare_names, compare_nodes};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Walks `root` on the real filesystem.
///
/// # Errors
///
/// Returns [`TreeIndexError::NotADirectory`] if `root` does not exist or is
/// not a directory. No other failure aborts the walk.
pub fn build_tree(root: impl AsRef<Path>, options: &TreeOptions) -> Result<TreeNode> {
    build_tree_with(&OsFs, root, options)
}

/// Walks `root` through the given [`FileSystem`].
pub fn build_tree_with<F: FileSystem>(
    fs: &F,
    root: impl AsRef<Path>,
    options: &TreeOptions,
) -> Result<TreeNode> {
    let root = root.as_ref();
    let root = resolve_root(root).map_err(|e| TreeIndexError::not_a_directory(root, Some(e)))?;
    match fs.metadata(&root) {
        Ok(meta) if meta.kind == EntryKind::Directory => {}
        Ok(_) => return Err(TreeIndexError::not_a_directory(root, None)),
        Err(e) => return Err(TreeIndexError::not_a_directory(root, Some(e))),
    }

    #[cfg(feature = "logging")]
    tracing::debug!("Building tree for {}", root.display());

    let config = WalkConfig::from(options);
    let ignore_rules = if config.respect_gitignore {
        load_ignore_rules(fs, &root)
    } else {
        None
    };
    let canonical_root = fs.canonicalize(&root).unwrap_or_else(|_| root.clone());

    let mut walker = TreeWalker {
        fs,
        config,
        ignore_rules,
        visited: HashSet::from([canonical_root.clone()]),
    };

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let node = TreeNode::directory(name, root.clone(), -1);
    Ok(match walker.walk_dir(&root, &canonical_root, "", 0) {
        Ok(children) => node.with_children(children),
        Err(e) => node.with_error(describe_io_error(&e)),
    })
}

/// Absolute form of `root` with `.` and `..` folded lexically. Symlinks are
/// left alone.
fn resolve_root(root: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(root)?;
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

/// Parses `<root>/.gitignore`. A missing or unreadable file means no rules.
fn load_ignore_rules<F: FileSystem>(fs: &F, root: &Path) -> Option<Gitignore> {
    let path = root.join(IGNORE_FILE_NAME);
    let contents = match fs.read_to_string(&path) {
        Ok(contents) => contents,
        Err(_e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("No ignore rules from {}: {}", path.display(), _e);
            return None;
        }
    };
    let mut builder = GitignoreBuilder::new(root);
    for line in contents.lines() {
        if let Err(_e) = builder.add_line(Some(path.clone()), line) {
            #[cfg(feature = "logging")]
            tracing::debug!("Skipping ignore pattern {:?}: {}", line, _e);
        }
    }
    match builder.build() {
        Ok(rules) if !rules.is_empty() => Some(rules),
        Ok(_) => None,
        Err(_e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Failed to build ignore rules: {}", _e);
            None
        }
    }
}

/// What `inspect` decided to do with an entry.
enum Visit {
    File { size: u64 },
    Directory { canonical: PathBuf },
    Cycle,
}

/// State for one walk.
///
/// `visited` holds canonical directory paths and is only touched from the
/// single depth-first recursion below; sibling traversal is sequential.
struct TreeWalker<'a, F: FileSystem> {
    fs: &'a F,
    config: WalkConfig,
    ignore_rules: Option<Gitignore>,
    visited: HashSet<PathBuf>,
}

impl<F: FileSystem> TreeWalker<'_, F> {
    /// Lists and visits the entries of `dir`. Children get `depth`.
    fn walk_dir(
        &mut self,
        dir: &Path,
        canonical: &Path,
        relative: &str,
        depth: i32,
    ) -> io::Result<Vec<TreeNode>> {
        let mut entries = self.fs.read_dir(dir)?;
        entries.sort_by(|a, b| compare_names(&a.name, &b.name));

        let mut nodes = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.config.is_skipped(&entry.name) {
                continue;
            }
            let entry_relative = if relative.is_empty() {
                entry.name.clone()
            } else {
                format!("{}/{}", relative, entry.name)
            };
            if self.is_ignored(&entry_relative, entry.kind == Some(EntryKind::Directory)) {
                #[cfg(feature = "logging")]
                tracing::debug!("Ignored by {}: {}", IGNORE_FILE_NAME, entry_relative);
                continue;
            }
            nodes.push(self.visit(entry, dir, canonical, &entry_relative, depth));
        }
        nodes.sort_by(compare_nodes);
        Ok(nodes)
    }

    fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        self.ignore_rules
            .as_ref()
            .is_some_and(|rules| rules.matched(Path::new(relative), is_dir).is_ignore())
    }

    fn visit(
        &mut self,
        entry: DirEntryInfo,
        parent: &Path,
        parent_canonical: &Path,
        relative: &str,
        depth: i32,
    ) -> TreeNode {
        let path = parent.join(&entry.name);
        match self.inspect(&path, &parent_canonical.join(&entry.name)) {
            Ok(Visit::File { size }) => TreeNode::file(entry.name, path, depth).with_size(size),
            Ok(Visit::Directory { canonical }) => {
                let children = self.walk_dir(&path, &canonical, relative, depth + 1);
                let node = TreeNode::directory(entry.name, path, depth);
                match children {
                    Ok(children) => node.with_children(children),
                    Err(e) => {
                        #[cfg(feature = "logging")]
                        tracing::debug!("Cannot read directory {}: {}", node.path.display(), e);
                        node.with_error(describe_io_error(&e))
                    }
                }
            }
            Ok(Visit::Cycle) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Symlink cycle at {}", path.display());
                TreeNode::directory(entry.name, path, depth).with_error(CIRCULAR_REFERENCE)
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Cannot stat {}: {}", path.display(), e);
                let node = if entry.kind == Some(EntryKind::Directory) {
                    TreeNode::directory(entry.name, path, depth)
                } else {
                    TreeNode::file(entry.name, path, depth)
                };
                node.with_error(describe_io_error(&e))
            }
        }
    }

    /// `lstat`s the entry and, for symlinks, resolves the target and checks it
    /// against the visited set.
    fn inspect(&mut self, path: &Path, canonical_guess: &Path) -> io::Result<Visit> {
        let meta = self.fs.symlink_metadata(path)?;
        match meta.kind {
            EntryKind::Symlink => {
                let canonical = self.fs.canonicalize(path)?;
                let target = self.fs.metadata(path)?;
                if target.kind != EntryKind::Directory {
                    return Ok(Visit::File { size: target.len });
                }
                if !self.visited.insert(canonical.clone()) {
                    return Ok(Visit::Cycle);
                }
                Ok(Visit::Directory { canonical })
            }
            EntryKind::Directory => {
                let canonical = canonical_guess.to_path_buf();
                self.visited.insert(canonical.clone());
                Ok(Visit::Directory { canonical })
            }
            EntryKind::File => Ok(Visit::File { size: meta.len }),
        }
    }
}
