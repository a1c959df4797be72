use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use treeindex::commands::{Frontmatter, parse_frontmatter};
use treeindex::fs::{DirEntryInfo, EntryMetadata, FileSystem, OsFs};
use treeindex::{
    BinaryDetection, DEFAULT_SKIP_NAMES, FileContent, FileReadResult, TreeOptions, WalkConfig,
    classify_file, classify_file_with, format_size, has_binary_extension, read_file_content,
};

/// Real filesystem whose files can be stat-ed but not opened.
struct UnopenableFs;

impl FileSystem for UnopenableFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        OsFs.read_dir(path)
    }
    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        OsFs.symlink_metadata(path)
    }
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        OsFs.metadata(path)
    }
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        OsFs.canonicalize(path)
    }
    fn read_to_string(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
    fn read_prefix(&self, _path: &Path, _limit: u64) -> io::Result<Vec<u8>> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
    fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
}

#[test]
fn test_reads_text_file() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("note.txt");
    fs::write(&file_path, "hello\nworld\n").unwrap();
    let result = read_file_content(&file_path, Some(100_000));
    assert_eq!(result.content, "hello\nworld\n");
    assert_eq!(result.size, 12);
    assert!(result.error.is_none());
}
#[test]
fn test_detects_null_byte_binary() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("blob");
    fs::write(&file_path, vec![0, 1, 2, 3]).unwrap();
    let result = read_file_content(&file_path, None);
    assert_eq!(result.content, "[Binary file]");
    assert_eq!(result.error.as_deref(), Some("Binary file"));
    assert_eq!(result.size, 4);
}
#[test]
fn test_null_byte_past_probe_is_text() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("late.txt");
    let mut body = "a".repeat(8000).into_bytes();
    body.push(0);
    fs::write(&file_path, &body).unwrap();
    let result = read_file_content(&file_path, None);
    assert!(result.error.is_none());
    assert_eq!(result.content.len(), 8001);
}
#[test]
fn test_binary_extension_wins_over_text_bytes() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("logo.PNG");
    fs::write(&file_path, "not really an image").unwrap();
    let result = read_file_content(&file_path, None);
    assert_eq!(result.error.as_deref(), Some("Binary file"));
    assert!(has_binary_extension(Path::new("archive.tar.gz")));
    assert!(!has_binary_extension(Path::new("main.rs")));
    assert!(!has_binary_extension(Path::new("Makefile")));
}
#[test]
fn test_enforces_size_limit() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("big.txt");
    let mut f = File::create(&file_path).unwrap();
    write!(f, "{}", "a".repeat(1024)).unwrap();
    drop(f);
    let result = read_file_content(&file_path, Some(10));
    assert!(result.content.starts_with("[File too large:"));
    assert_eq!(result.content, "[File too large: 1.0 KB]");
    assert_eq!(result.error.as_deref(), Some("File too large"));
    assert_eq!(result.size, 1024);
}
#[test]
fn test_size_limit_is_inclusive() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("edge.txt");
    fs::write(&file_path, "0123456789").unwrap();
    let result = read_file_content(&file_path, Some(10));
    assert_eq!(result.content, "0123456789");
    assert!(result.error.is_none());
}
#[test]
fn test_missing_file_is_a_value() {
    let dir = tempdir().unwrap();
    let result = read_file_content(dir.path().join("absent.txt"), None);
    assert_eq!(result.size, 0);
    let error = result.error.expect("missing file should carry an error");
    assert_eq!(result.content, format!("[{}]", error));
}
#[test]
fn test_unreadable_file_reports_permission_denied() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("secret.txt");
    fs::write(&file_path, "top secret").unwrap();
    let outcome = classify_file_with(&UnopenableFs, &file_path, 1024, BinaryDetection::Simple);
    assert_eq!(outcome, FileContent::ReadError("Permission denied".into()));
    let result = FileReadResult::from(outcome);
    assert_eq!(result.error.as_deref(), Some("Permission denied"));
    assert_eq!(result.content, "[Permission denied]");
    assert_eq!(result.size, 0);
}
#[test]
fn test_probe_strategies() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("mixed.txt");
    fs::write(&file_path, b"text\0more").unwrap();
    assert_eq!(
        classify_file(&file_path, 1024, BinaryDetection::Simple),
        FileContent::Binary { size: 9 }
    );
    assert_eq!(
        classify_file(&file_path, 1024, BinaryDetection::Accurate),
        FileContent::Binary { size: 9 }
    );
    let outcome = classify_file(&file_path, 8, BinaryDetection::None);
    assert_eq!(outcome.size(), 9);
    assert_eq!(outcome.error(), Some("File too large"));
    assert_eq!(
        classify_file(&file_path, 1024, BinaryDetection::None),
        FileContent::Text {
            content: "text\0more".to_string(),
            size: 9
        }
    );
}
#[test]
fn test_file_content_conversion() {
    let result = FileReadResult::from(FileContent::ReadError("Permission denied".into()));
    assert_eq!(result.content, "[Permission denied]");
    assert_eq!(result.error.as_deref(), Some("Permission denied"));
    assert_eq!(result.size, 0);
    let result = FileReadResult::from(FileContent::TooLarge { size: 3 * 1024 * 1024 });
    assert_eq!(result.content, "[File too large: 3.0 MB]");
}
#[test]
fn test_format_size_units() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(1023), "1023 B");
    assert_eq!(format_size(1024), "1.0 KB");
    assert_eq!(format_size(1536), "1.5 KB");
    assert_eq!(format_size(1024 * 1024), "1.0 MB");
}
#[test]
fn test_format_size_rounds_halves_up() {
    assert_eq!(format_size(1280), "1.3 KB");
    assert_eq!(format_size(1279), "1.2 KB");
    assert_eq!(format_size(5 * 1024 * 1024 / 4), "1.3 MB");
    assert_eq!(format_size(1024 * 1024 - 1), "1024.0 KB");
}
#[test]
fn test_walk_config_defaults_and_overrides() {
    let config = WalkConfig::from(&TreeOptions::default());
    assert!(config.respect_gitignore);
    assert_eq!(
        DEFAULT_SKIP_NAMES,
        [".git", "node_modules", ".opencode", "dist", "build"]
    );
    for name in DEFAULT_SKIP_NAMES {
        assert!(config.is_skipped(name), "{} should be skipped", name);
    }
    assert!(config.is_skipped("debug.log"));
    assert!(!config.is_skipped("src"));
    let options: TreeOptions =
        serde_json::from_str(r#"{"skipNames":["vendor"],"respectGitignore":false}"#).unwrap();
    let config = WalkConfig::from(&options);
    assert!(!config.respect_gitignore);
    assert!(config.is_skipped("vendor"));
    assert!(!config.is_skipped("node_modules"));
    assert!(config.is_skipped("trace.log"));
}
#[test]
fn test_parse_frontmatter() {
    let text = "---\ndescription: Review a change\nagent: build\nmodel: provider/model:latest\nsubtask: true\nunknown: x\nno colon here\n---\n\n  Look at $ARGUMENTS  \n";
    let (fm, body) = parse_frontmatter(text);
    assert_eq!(fm.description.as_deref(), Some("Review a change"));
    assert_eq!(fm.agent.as_deref(), Some("build"));
    assert_eq!(fm.model.as_deref(), Some("provider/model:latest"));
    assert_eq!(fm.subtask, Some(true));
    assert_eq!(body, "Look at $ARGUMENTS");
}
#[test]
fn test_parse_frontmatter_without_header() {
    let (fm, body) = parse_frontmatter("\n  Just a body\n");
    assert_eq!(fm, Frontmatter::default());
    assert_eq!(body, "Just a body");
    let (fm, _) = parse_frontmatter("---\r\nsubtask: yes\r\n---\r\nbody");
    assert_eq!(fm.subtask, Some(false));
}
