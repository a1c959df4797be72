//! Content triage for root-level files.
//!
//! A file is embedded as text only when it is within the size limit, its
//! extension is not a known binary format and an 8000-byte probe from its
//! start does not look binary. Every outcome, including I/O failure, is a
//! value; nothing here returns an error to the caller.

use crate::fs::{FileSystem, OsFs};
use crate::options::{BinaryDetection, DEFAULT_MAX_FILE_SIZE};
use crate::types::{FileContent, FileReadResult};
use std::io;
use std::path::Path;

pub const PROBE_LENGTH: u64 = 8000;

/// Lowercase extensions treated as binary without looking at the bytes.
const BINARY_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "icns", "tif", "tiff", "webp", "avif", "heic",
    "heif", "psd", "xcf", "raw", "cr2", "nef", "dng", "jxl", "tga",
    // audio / video
    "mp3", "wav", "flac", "ogg", "oga", "opus", "m4a", "aac", "wma", "aiff", "mid", "midi",
    "mp4", "m4v", "mov", "avi", "mkv", "webm", "wmv", "flv", "mpg", "mpeg", "3gp",
    // archives
    "zip", "gz", "tgz", "bz2", "tbz2", "xz", "txz", "zst", "lz", "lz4", "lzma", "7z", "rar",
    "tar", "cab", "ar", "cpio", "deb", "rpm", "dmg", "iso", "img", "apk", "jar", "war", "ear",
    "whl", "crx", "xpi", "vsix", "nupkg",
    // executables, objects, libraries
    "exe", "dll", "so", "dylib", "a", "lib", "o", "obj", "ko", "elf", "bin", "dat", "class",
    "pyc", "pyo", "pyd", "wasm", "rlib", "node", "msi", "sys", "pdb",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "epub", "mobi",
    "pages", "numbers",
    // fonts
    "ttf", "otf", "woff", "woff2", "eot", "fnt",
    // data stores
    "db", "sqlite", "sqlite3", "mdb", "parquet", "arrow", "feather", "npy", "npz", "pkl",
    "pickle", "h5", "hdf5", "onnx", "pt", "pth", "safetensors", "ckpt", "tflite",
    // misc
    "swf", "blend", "fbx", "glb", "3ds", "stl", "dwg", "sketch", "fig",
];

/// True when the file name's extension is in the binary-extension table.
pub fn has_binary_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    BINARY_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Reads `path` for embedding, with the default probe strategy.
///
/// `max_file_size` defaults to 100 KiB.
pub fn read_file_content(path: impl AsRef<Path>, max_file_size: Option<u64>) -> FileReadResult {
    classify_file(
        path.as_ref(),
        max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
        BinaryDetection::Simple,
    )
    .into()
}

/// Classifies `path` into one of the [`FileContent`] outcomes.
pub fn classify_file(path: &Path, max_file_size: u64, detection: BinaryDetection) -> FileContent {
    classify_file_with(&OsFs, path, max_file_size, detection)
}

/// [`classify_file`] over an arbitrary [`FileSystem`].
pub fn classify_file_with<F: FileSystem>(
    fs: &F,
    path: &Path,
    max_file_size: u64,
    detection: BinaryDetection,
) -> FileContent {
    match try_classify(fs, path, max_file_size, detection) {
        Ok(outcome) => outcome,
        Err(e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Failed to read {}: {}", path.display(), e);
            let reason = match e.kind() {
                io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
                _ => e.to_string(),
            };
            FileContent::ReadError(reason)
        }
    }
}

fn try_classify<F: FileSystem>(
    fs: &F,
    path: &Path,
    max_file_size: u64,
    detection: BinaryDetection,
) -> io::Result<FileContent> {
    let size = fs.metadata(path)?.len;
    if size > max_file_size {
        #[cfg(feature = "logging")]
        tracing::debug!(
            "File too large ({} > {}), skipping content",
            size,
            max_file_size
        );
        return Ok(FileContent::TooLarge { size });
    }
    let probe = read_probe(fs, path)?;
    if has_binary_extension(path) || is_binary_probe(&probe, detection) {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary file detected: {}", path.display());
        return Ok(FileContent::Binary { size });
    }
    let bytes = fs.read(path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(FileContent::Text { content, size })
}

/// Reads at most [`PROBE_LENGTH`] bytes from the start of the file.
fn read_probe<F: FileSystem>(fs: &F, path: &Path) -> io::Result<Vec<u8>> {
    fs.read_prefix(path, PROBE_LENGTH)
}

fn is_binary_probe(probe: &[u8], detection: BinaryDetection) -> bool {
    match detection {
        BinaryDetection::Simple => probe.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(probe).is_binary(),
        BinaryDetection::None => false,
    }
}
