// Download trigger: hand a fetched payload to the local filesystem
//
// Each save writes into its own uniquely named `.tubefetch-*.part` file in the
// target directory, then links it into place with no-clobber semantics. The
// transient file is removed on every failure path when it is dropped.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::config::ClientConfig;
use super::errors::SaveError;
use super::models::BinaryPayload;
use super::traits::SaveTarget;

/// NAME_MAX on Linux and macOS
const MAX_NAME_BYTES: usize = 255;

const MAX_SUFFIX_ATTEMPTS: u32 = 10_000;

/// Saves payloads into a download directory without overwriting
pub struct FileSaver {
    dir: PathBuf,
}

impl FileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.download_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn check_filename(filename: &str) -> Result<(), SaveError> {
    let invalid = filename.trim().is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0');
    if invalid {
        return Err(SaveError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Split into stem and `.ext` (empty when there is no extension)
fn split_name(filename: &str) -> (String, String) {
    let as_path = Path::new(filename);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    let ext = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `stem.ext` for n = 0, `stem (n).ext` after that; the stem is cut on a
/// char boundary so the whole name fits in `MAX_NAME_BYTES`.
fn candidate_name(stem: &str, ext: &str, n: u32) -> String {
    let counter = if n == 0 {
        String::new()
    } else {
        format!(" ({})", n)
    };
    let budget = MAX_NAME_BYTES.saturating_sub(counter.len() + ext.len());
    format!("{}{}{}", truncate_bytes(stem, budget), counter, ext)
}

fn write_and_persist(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, SaveError> {
    let mut part = tempfile::Builder::new()
        .prefix(".tubefetch-")
        .suffix(".part")
        .tempfile_in(dir)?;
    part.write_all(bytes)?;
    part.flush()?;

    let (stem, ext) = split_name(filename);
    for n in 0..MAX_SUFFIX_ATTEMPTS {
        let destination = dir.join(candidate_name(&stem, &ext, n));
        match part.persist_noclobber(&destination) {
            Ok(_) => return Ok(destination),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => part = e.file,
            Err(e) => return Err(SaveError::Io(e.error)),
        }
    }

    Err(SaveError::Io(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free name for {} in {}", filename, dir.display()),
    )))
}

#[async_trait]
impl SaveTarget for FileSaver {
    async fn save(&self, payload: &BinaryPayload, filename: &str) -> Result<PathBuf, SaveError> {
        if self.dir.as_os_str().is_empty() {
            return Err(SaveError::NoTargetDirectory);
        }
        check_filename(filename)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let dir = self.dir.clone();
        let name = filename.to_string();
        let bytes = payload.bytes.clone();
        let destination = tokio::task::spawn_blocking(move || write_and_persist(&dir, &name, &bytes))
            .await
            .map_err(|e| SaveError::Io(std::io::Error::new(ErrorKind::Other, e.to_string())))??;

        tracing::info!(
            "[Saver] ✓ Saved {} bytes ({}) to {}",
            payload.bytes.len(),
            payload.content_type,
            destination.display()
        );
        Ok(destination)
    }
}
