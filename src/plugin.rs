//! Host integration: a callable `tree_indexer` tool plus command templates
//! injected into the host's configuration.

use crate::commands::{CommandTemplate, load_commands};
use crate::engine::index_directory;
use crate::error::{Result, TreeIndexError};
use crate::options::IndexBuilder;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TOOL_NAME: &str = "tree_indexer";
pub const TOOL_DESCRIPTION: &str = "Generate a directory tree with root file contents";

/// A tool as advertised to the host: name, description and JSON schema of
/// its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Arguments accepted by the `tree_indexer` tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndexArgs {
    /// Root path to index. Relative paths resolve against the tool's
    /// working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Max file size in bytes. Whole-valued floats such as `5.0` are
    /// accepted.
    #[serde(default, deserialize_with = "whole_bytes")]
    pub max_file_size: Option<u64>,
}

fn whole_bytes<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(bytes) = number.as_u64() {
        return Ok(Some(bytes));
    }
    match number.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(D::Error::custom(format!(
            "maxFileSize must be a non-negative whole number of bytes, got {}",
            number
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct TreeIndexerTool {
    directory: PathBuf,
}

impl TreeIndexerTool {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Root path to index (defaults to current directory)"
                    },
                    "maxFileSize": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Max file size in bytes"
                    }
                },
                "additionalProperties": false
            }),
        }
    }

    /// Indexes the requested directory and returns the markdown report.
    pub fn execute(&self, args: IndexArgs) -> Result<String> {
        let root = match args.path {
            Some(path) => self.directory.join(path),
            None => self.directory.clone(),
        };
        let mut builder = IndexBuilder::new(root);
        if let Some(limit) = args.max_file_size {
            builder = builder.max_file_size(limit);
        }
        index_directory(&builder.build())
    }

    /// Like [`execute`](Self::execute), taking raw JSON arguments.
    pub fn execute_json(&self, args: Value) -> Result<String> {
        let args = if args.is_null() {
            IndexArgs::default()
        } else {
            serde_json::from_value(args).map_err(TreeIndexError::InvalidArguments)?
        };
        self.execute(args)
    }
}

/// One command entry in the host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtask: Option<bool>,
}

impl From<&CommandTemplate> for CommandConfig {
    fn from(cmd: &CommandTemplate) -> Self {
        Self {
            template: cmd.template.clone(),
            description: cmd.frontmatter.description.clone(),
            agent: cmd.frontmatter.agent.clone(),
            model: cmd.frontmatter.model.clone(),
            subtask: cmd.frontmatter.subtask,
        }
    }
}

/// The part of the host configuration this plugin writes to. Keys it does
/// not know about are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<BTreeMap<String, CommandConfig>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct CodeIndexPlugin {
    commands: Vec<CommandTemplate>,
    tool: TreeIndexerTool,
}

impl CodeIndexPlugin {
    /// Loads templates from `commands_dir`; the tool defaults to `directory`.
    pub fn load(commands_dir: impl AsRef<Path>, directory: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(load_commands(commands_dir)?, directory))
    }

    pub fn new(commands: Vec<CommandTemplate>, directory: impl Into<PathBuf>) -> Self {
        Self {
            commands,
            tool: TreeIndexerTool::new(directory),
        }
    }

    pub fn commands(&self) -> &[CommandTemplate] {
        &self.commands
    }

    pub fn tools(&self) -> BTreeMap<&'static str, &TreeIndexerTool> {
        BTreeMap::from([(TOOL_NAME, &self.tool)])
    }

    pub fn tool(&self) -> &TreeIndexerTool {
        &self.tool
    }

    /// Registers every loaded template under `config.command`.
    pub fn config(&self, config: &mut HostConfig) {
        let commands = config.command.get_or_insert_with(BTreeMap::new);
        for cmd in &self.commands {
            commands.insert(cmd.name.clone(), CommandConfig::from(cmd));
        }
    }
}
