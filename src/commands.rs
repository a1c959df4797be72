//! Command templates stored as markdown files.
//!
//! A template file may start with a header block:
//!
//! ```text
//! ---
//! description: Summarize the repository
//! agent: build
//! subtask: true
//! ---
//! Body of the template...
//! ```
//!
//! The header is a list of `key: value` lines, not full YAML.

use crate::error::{Result, TreeIndexError};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const TEMPLATE_GLOB: &str = "**/*.md";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    /// Relative path without `.md`, with `/` replaced by `-`.
    pub name: String,
    pub frontmatter: Frontmatter,
    pub template: String,
}

/// Splits `text` into its header and trimmed body.
///
/// Without a `---` delimited header the whole text is the body.
pub fn parse_frontmatter(text: &str) -> (Frontmatter, String) {
    let text = text.replace("\r\n", "\n");
    let Some((header, body)) = split_header(&text) else {
        return (Frontmatter::default(), text.trim().to_string());
    };

    let mut frontmatter = Frontmatter::default();
    for line in header.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "description" => frontmatter.description = Some(value.to_string()),
            "agent" => frontmatter.agent = Some(value.to_string()),
            "model" => frontmatter.model = Some(value.to_string()),
            "subtask" => frontmatter.subtask = Some(value == "true"),
            _ => {}
        }
    }
    (frontmatter, body.trim().to_string())
}

fn split_header(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---\n")?;
    let end = rest.find("\n---\n")?;
    Some((&rest[..end], &rest[end + "\n---\n".len()..]))
}

/// Loads every `**/*.md` template under `dir`, sorted by name.
///
/// A missing directory yields no templates.
pub fn load_commands(dir: impl AsRef<Path>) -> Result<Vec<CommandTemplate>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        #[cfg(feature = "logging")]
        tracing::debug!("No command directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let matcher = Glob::new(TEMPLATE_GLOB)
        .map_err(|e| TreeIndexError::InvalidPattern(format!("{}: {}", TEMPLATE_GLOB, e)))?
        .compile_matcher();

    let mut commands = Vec::new();
    for path in template_paths(dir, &matcher)? {
        let text = fs::read_to_string(&path).map_err(|e| TreeIndexError::io(&path, e))?;
        let relative = path.strip_prefix(dir).unwrap_or(&path);
        let (frontmatter, template) = parse_frontmatter(&text);
        commands.push(CommandTemplate {
            name: command_name(relative),
            frontmatter,
            template,
        });
    }
    commands.sort_by(|a, b| a.name.cmp(&b.name));
    #[cfg(feature = "logging")]
    tracing::debug!("Loaded {} command templates", commands.len());
    Ok(commands)
}

fn template_paths(dir: &Path, matcher: &GlobMatcher) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false);
    let mut paths = Vec::new();
    for result in builder.build() {
        let entry = result.map_err(|e| TreeIndexError::Walk(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        if matcher.is_match(relative) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn command_name(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    joined
        .strip_suffix(".md")
        .unwrap_or(&joined)
        .replace('/', "-")
}
