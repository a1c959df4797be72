//! Command-line interface for treeindex.
//!
//! Indexes a directory and prints the markdown report (or the JSON tree).
//! Also exposes the agent tool schema and the command templates a host
//! would load.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::exit;
use treeindex::output::{self, OutputFormat as Format};
use treeindex::plugin::TreeIndexerTool;
use treeindex::{BinaryDetection, DEFAULT_MAX_FILE_SIZE, IndexBuilder, IndexOptions, TreeNode};

/// treeindex — directory snapshot for agent context
#[derive(Parser)]
#[command(name = "treeindex", version, about, long_about = None)]
struct Cli {
    /// Root directory (default current dir)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Pretty output (indented JSON)
    #[arg(short, long)]
    pretty: bool,

    /// Root files larger than this many bytes have their content omitted
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Binary detection strategy for the content probe
    #[arg(long, default_value = "simple", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Entry name to always skip (repeatable, replaces the defaults)
    #[arg(long = "skip-name")]
    skip_names: Vec<String>,

    /// Name suffix to always skip (repeatable, replaces the defaults)
    #[arg(long = "skip-extension")]
    skip_extensions: Vec<String>,

    /// Disable .gitignore handling
    #[arg(long)]
    no_gitignore: bool,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the tree_indexer tool schema as JSON and exit
    #[arg(long)]
    tool_spec: bool,

    /// Print the command templates loaded from DIR as JSON and exit
    #[arg(long, value_name = "DIR")]
    commands: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Json => Format::Json,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

impl Cli {
    fn to_options(&self) -> IndexOptions {
        let mut builder = IndexBuilder::new(&self.root)
            .max_file_size(self.max_file_size)
            .binary_detection(self.binary_detection)
            .respect_gitignore(!self.no_gitignore);
        if !self.skip_names.is_empty() {
            builder = builder.skip_names(self.skip_names.clone());
        }
        if !self.skip_extensions.is_empty() {
            builder = builder.skip_extensions(self.skip_extensions.clone());
        }
        builder.build()
    }
}

#[cfg(feature = "logging")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    #[cfg(feature = "logging")]
    init_logging();

    if cli.tool_spec {
        print_json(&TreeIndexerTool::spec(), cli.pretty);
        return;
    }
    if let Some(dir) = &cli.commands {
        match treeindex::commands::load_commands(dir) {
            Ok(commands) => print_json(&commands, cli.pretty),
            Err(e) => fail(e),
        }
        return;
    }

    match treeindex::index_tree(&cli.to_options()) {
        Ok(tree) => output_result(&tree, &cli),
        Err(e) => fail(e),
    }
}

fn output_result(tree: &TreeNode, cli: &Cli) {
    let format = Format::from(cli.format);
    if let Some(path) = &cli.output {
        if let Err(e) = output::write_index_to_file(tree, format, path, cli.pretty) {
            fail(e);
        }
        return;
    }
    match output::format_index(tree, format, cli.pretty) {
        Ok(out) => println!("{}", out),
        Err(e) => fail(e),
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .unwrap_or_else(|e| {
        eprintln!("JSON serialization error: {}", e);
        exit(1);
    });
    println!("{}", json);
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    exit(1);
}
