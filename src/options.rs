use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_SKIP_NAMES: &[&str] = &[".git", "node_modules", ".opencode", "dist", "build"];
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[".log"];
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024;
pub const IGNORE_FILE_NAME: &str = ".gitignore";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryDetection {
    /// A null byte in the probe marks the file binary.
    #[default]
    Simple,
    /// `content_inspector` decides from the probe.
    Accurate,
    /// Only the extension heuristic applies.
    None,
}

/// Caller-facing walk options. Every field falls back to its default when
/// left unset; a supplied list replaces the default list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeOptions {
    pub skip_names: Option<Vec<String>>,
    pub skip_extensions: Option<Vec<String>>,
    pub respect_gitignore: Option<bool>,
}

/// [`TreeOptions`] with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    pub skip_names: HashSet<String>,
    pub skip_extensions: Vec<String>,
    pub respect_gitignore: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig::from(&TreeOptions::default())
    }
}

impl From<&TreeOptions> for WalkConfig {
    fn from(options: &TreeOptions) -> Self {
        let skip_names = match &options.skip_names {
            Some(names) => names.iter().cloned().collect(),
            None => DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect(),
        };
        let skip_extensions = match &options.skip_extensions {
            Some(exts) => exts.clone(),
            None => DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            skip_names,
            skip_extensions,
            respect_gitignore: options.respect_gitignore.unwrap_or(true),
        }
    }
}

impl WalkConfig {
    /// Name-only exclusion, checked before any stat call.
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_names.contains(name)
            || self
                .skip_extensions
                .iter()
                .any(|ext| name.ends_with(ext.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    pub root: PathBuf,
    pub max_file_size: u64,
    pub binary_detection: BinaryDetection,
    pub tree: TreeOptions,
}
impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            binary_detection: BinaryDetection::Simple,
            tree: TreeOptions::default(),
        }
    }
}
#[derive(Debug, Default)]
pub struct IndexBuilder {
    options: IndexOptions,
}
impl IndexBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: IndexOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.options.max_file_size = bytes;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.tree.respect_gitignore = Some(yes);
        self
    }
    pub fn skip_names(mut self, names: Vec<String>) -> Self {
        self.options.tree.skip_names = Some(names);
        self
    }
    pub fn skip_extensions(mut self, extensions: Vec<String>) -> Self {
        self.options.tree.skip_extensions = Some(extensions);
        self
    }
    pub fn tree_options(mut self, tree: TreeOptions) -> Self {
        self.options.tree = tree;
        self
    }
    pub fn build(self) -> IndexOptions {
        self.options
    }
}
