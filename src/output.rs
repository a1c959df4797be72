//! Output formatting for indexed trees.
//!
//! [`format_report`] produces the markdown report handed to agents: a
//! tree diagram of the whole walk followed by one fenced block per root-level
//! file. [`format_index`] additionally offers a JSON dump of the tree.

use crate::error::{Result, TreeIndexError};
use crate::types::{TreeNode, compare_nodes, format_size};
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Formats an indexed tree. `pretty` only affects JSON.
pub fn format_index(tree: &TreeNode, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(format_report(tree, &tree.path)),
        OutputFormat::Json => format_json(tree, pretty),
    }
}

/// Writes the formatted tree to a file.
pub fn write_index_to_file(
    tree: &TreeNode,
    format: OutputFormat,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<()> {
    let content = format_index(tree, format, pretty)?;
    fs::write(&path, content).map_err(|e| TreeIndexError::io(path.as_ref(), e))?;
    Ok(())
}

/// Renders the markdown report for `root`, titled with `root_path`.
pub fn format_report(root: &TreeNode, root_path: &Path) -> String {
    let mut lines = vec![
        format!("# Directory Index: {}", root_path.display()),
        String::new(),
        "## File Structure".to_string(),
        String::new(),
        "```".to_string(),
    ];
    render_tree(root, &mut lines);
    lines.push("```".to_string());
    lines.push(String::new());
    lines.push("## Root Level Files".to_string());
    lines.push(String::new());

    let mut root_files = root.files().peekable();
    if root_files.peek().is_none() {
        lines.push("_No root-level files found._".to_string());
        return lines.join("\n");
    }

    for file in root_files {
        let content = match (&file.content, &file.error) {
            (Some(content), _) => content.clone(),
            (None, Some(error)) => format!("[{}]", error),
            (None, None) => "[No content]".to_string(),
        };
        lines.push(format!("### {}", file.name));
        lines.push(format!("```{}", language_from_name(&file.name)));
        lines.push(content);
        lines.push("```".to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

// ----------------------- Internal formatting -----------------------

fn render_tree(root: &TreeNode, lines: &mut Vec<String>) {
    let label = if root.name.is_empty() {
        root.path.display().to_string()
    } else {
        root.name.clone()
    };
    lines.push(format!("{}/", label));
    render_children(root.children(), "", lines);
}

fn render_children(nodes: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
    let mut ordered: Vec<&TreeNode> = nodes.iter().collect();
    ordered.sort_by(|a, b| compare_nodes(a, b));

    let count = ordered.len();
    for (index, node) in ordered.into_iter().enumerate() {
        let is_last = index + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        let mut line = format!("{}{}{}", prefix, connector, node.name);
        if node.is_dir() {
            line.push('/');
        } else if let Some(size) = node.size {
            line.push_str(&format!(" ({})", format_size(size)));
        }
        if let Some(error) = &node.error {
            line.push_str(&format!(" [{}]", error));
        }
        lines.push(line);

        if node.is_dir() && !node.children().is_empty() {
            let next = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render_children(node.children(), &next, lines);
        }
    }
}

fn format_json(tree: &TreeNode, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(json)
}

fn language_from_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "md" => "markdown",
        "json" => "json",
        "ts" => "typescript",
        "tsx" => "tsx",
        "js" => "javascript",
        "yml" | "yaml" => "yaml",
        _ => "text",
    }
}
