use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

pub const CIRCULAR_REFERENCE: &str = "Circular reference";
pub const FILE_TOO_LARGE: &str = "File too large";
pub const BINARY_FILE: &str = "Binary file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// A single filesystem entry in the walked tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Base name of the entry.
    pub name: String,
    /// Absolute path: the parent's path joined with `name`.
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// `0` for the root's direct children, `-1` for the root itself.
    pub depth: i32,
    /// Directories first, then by name. `None` for files and for
    /// directories whose entries could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    /// Filled in by content classification (root-level files only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Traversal failure or classification tag, shown inline by the renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, depth: i32) -> Self {
        Self::new(name.into(), path.into(), NodeKind::File, depth)
    }

    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>, depth: i32) -> Self {
        Self::new(name.into(), path.into(), NodeKind::Directory, depth)
    }

    fn new(name: String, path: PathBuf, kind: NodeKind, depth: i32) -> Self {
        Self {
            name,
            path,
            kind,
            depth,
            children: None,
            content: None,
            size: None,
            error: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Children of this node, or an empty slice.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Direct file children (the root-level files when called on the root).
    pub fn files(&self) -> impl Iterator<Item = &TreeNode> {
        self.children().iter().filter(|n| n.is_file())
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children().iter().find(|n| n.name == name)
    }

    /// Records a classification result on this node.
    pub fn apply(&mut self, result: FileReadResult) {
        self.content = Some(result.content);
        self.size = Some(result.size);
        if let Some(error) = result.error {
            self.error = Some(error);
        }
    }
}

thread_local! {
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Orders names with root-locale Unicode collation: punctuation before
/// digits before letters, accents and case as secondary/tertiary
/// differences, lowercase first. Byte order breaks remaining ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        })
        .then_with(|| a.cmp(b))
}

/// Sibling order: directories before files, then [`compare_names`].
pub fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Directory, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Directory) => Ordering::Greater,
        _ => compare_names(&a.name, &b.name),
    }
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text { content: String, size: u64 },
    TooLarge { size: u64 },
    Binary { size: u64 },
    ReadError(String),
}

impl FileContent {
    pub fn size(&self) -> u64 {
        match self {
            FileContent::Text { size, .. }
            | FileContent::TooLarge { size }
            | FileContent::Binary { size } => *size,
            FileContent::ReadError(_) => 0,
        }
    }

    /// Error tag reported alongside the content, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            FileContent::Text { .. } => None,
            FileContent::TooLarge { .. } => Some(FILE_TOO_LARGE),
            FileContent::Binary { .. } => Some(BINARY_FILE),
            FileContent::ReadError(reason) => Some(reason.as_str()),
        }
    }
}

/// String form of [`FileContent`].
///
/// For anything but readable text, `content` holds a bracketed placeholder
/// such as `[Binary file]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReadResult {
    pub content: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<FileContent> for FileReadResult {
    fn from(value: FileContent) -> Self {
        match value {
            FileContent::Text { content, size } => Self {
                content,
                size,
                error: None,
            },
            FileContent::TooLarge { size } => Self {
                content: format!("[{}: {}]", FILE_TOO_LARGE, format_size(size)),
                size,
                error: Some(FILE_TOO_LARGE.to_string()),
            },
            FileContent::Binary { size } => Self {
                content: format!("[{}]", BINARY_FILE),
                size,
                error: Some(BINARY_FILE.to_string()),
            },
            FileContent::ReadError(reason) => Self {
                content: format!("[{}]", reason),
                size: 0,
                error: Some(reason),
            },
        }
    }
}

/// Human-readable byte count: `B` below 1 KiB, then one decimal `KB`/`MB`,
/// rounding halves up.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{} KB", one_decimal(bytes, KIB))
    } else {
        format!("{} MB", one_decimal(bytes, MIB))
    }
}

fn one_decimal(bytes: u64, unit: u64) -> String {
    let tenths = (u128::from(bytes) * 10 + u128::from(unit) / 2) / u128::from(unit);
    format!("{}.{}", tenths / 10, tenths % 10)
}
