//! Key-value file storage over two roots: a writable config area and a
//! read-only bundled-asset area.
//!
//! Every operation answers failures with a sentinel (`None`, an empty list,
//! `false`) and logs the cause. Nothing here returns an error to the caller.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Storage capability consumed by the resolution engine.
pub trait Storage {
    /// Read and parse a JSON file from the writable area.
    fn read_json(&self, path: &str) -> Option<Value>;

    /// Serialize and write a JSON file to the writable area.
    fn write_json(&self, path: &str, value: &Value);

    /// Whether a file exists in the writable area, readable or not.
    fn file_exists(&self, path: &str) -> bool;

    /// File names inside a directory of the writable area.
    fn list_dir(&self, path: &str) -> Vec<String>;

    /// Whether a bundled asset exists.
    fn asset_exists(&self, path: &str) -> bool;

    /// Read at most `max_bytes` of a bundled asset as text. Content past the
    /// bound is not read. An empty or unreadable asset yields `None`.
    fn read_asset_bounded(&self, path: &str, max_bytes: usize) -> Option<BoundedRead>;
}

/// Text of a bounded asset read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedRead {
    pub text: String,

    /// The asset holds more than the bytes that were read
    pub truncated: bool,
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read_json(&self, path: &str) -> Option<Value> {
        (**self).read_json(path)
    }

    fn write_json(&self, path: &str, value: &Value) {
        (**self).write_json(path, value)
    }

    fn file_exists(&self, path: &str) -> bool {
        (**self).file_exists(path)
    }

    fn list_dir(&self, path: &str) -> Vec<String> {
        (**self).list_dir(path)
    }

    fn asset_exists(&self, path: &str) -> bool {
        (**self).asset_exists(path)
    }

    fn read_asset_bounded(&self, path: &str, max_bytes: usize) -> Option<BoundedRead> {
        (**self).read_asset_bounded(path, max_bytes)
    }
}

/// Result of reading a bundled asset that is expected to hold JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPayload {
    Json(Value),
    /// The content did not parse; the raw text is returned instead.
    Text { raw: String, truncated: bool },
}

/// Bounded read of a bundled asset, parsed as JSON when possible.
pub fn read_asset_json<S: Storage + ?Sized>(
    storage: &S,
    path: &str,
    max_bytes: usize,
) -> Option<AssetPayload> {
    let read = storage.read_asset_bounded(path, max_bytes)?;
    match serde_json::from_str(&read.text) {
        Ok(json) => Some(AssetPayload::Json(json)),
        Err(e) => {
            warn!("Failed to parse JSON from asset file {}: {}", path, e);
            Some(AssetPayload::Text {
                raw: read.text,
                truncated: read.truncated,
            })
        }
    }
}

// ==================== Filesystem Backend ====================

/// Storage backed by two directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    data_dir: PathBuf,
    assets_dir: PathBuf,
}

impl FsStorage {
    pub fn new(data_dir: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            assets_dir: assets_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }
}

impl Storage for FsStorage {
    fn read_json(&self, path: &str) -> Option<Value> {
        let full = self.data_dir.join(path);
        let content = match fs::read_to_string(&full) {
            Ok(content) => content,
            Err(e) => {
                debug!("File not readable {}: {}", full.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("Invalid JSON in {}: {}", full.display(), e);
                None
            }
        }
    }

    fn write_json(&self, path: &str, value: &Value) {
        let full = self.data_dir.join(path);

        if let Some(parent) = full.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory {}: {}", parent.display(), e);
                return;
            }
        }

        let content = match serde_json::to_string(value) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize JSON for {}: {}", full.display(), e);
                return;
            }
        };

        match fs::write(&full, content) {
            Ok(()) => debug!("Wrote {}", full.display()),
            Err(e) => warn!("Failed to write {}: {}", full.display(), e),
        }
    }

    fn file_exists(&self, path: &str) -> bool {
        self.data_dir.join(path).is_file()
    }

    fn list_dir(&self, path: &str) -> Vec<String> {
        let full = self.data_dir.join(path);
        let entries = match fs::read_dir(&full) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Error listing directory {}: {}", full.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    fn asset_exists(&self, path: &str) -> bool {
        self.assets_dir.join(path).exists()
    }

    fn read_asset_bounded(&self, path: &str, max_bytes: usize) -> Option<BoundedRead> {
        let full = self.assets_dir.join(path);
        let file = match fs::File::open(&full) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open asset file {}: {}", full.display(), e);
                return None;
            }
        };

        if let Ok(meta) = file.metadata() {
            if meta.len() > max_bytes as u64 {
                warn!(
                    "Asset {} is {} bytes, only the first {} will be read",
                    full.display(),
                    meta.len(),
                    max_bytes
                );
            }
        }

        // one byte past the bound tells a full read from a cut one
        let mut buffer = Vec::with_capacity(max_bytes.min(8192));
        if let Err(e) = file.take(max_bytes as u64 + 1).read_to_end(&mut buffer) {
            warn!("Failed to read asset file {}: {}", full.display(), e);
            return None;
        }

        let truncated = buffer.len() > max_bytes;
        buffer.truncate(max_bytes);
        if buffer.is_empty() {
            debug!("Asset file {} is empty", full.display());
            return None;
        }

        Some(BoundedRead {
            text: String::from_utf8_lossy(&buffer).into_owned(),
            truncated,
        })
    }
}

// ==================== In-Memory Backend ====================

/// Storage held entirely in memory. Counts writes so callers can assert on
/// persistence behaviour.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, String>>,
    assets: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the writable area.
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
        self
    }

    /// Add a bundled asset.
    pub fn with_asset(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        if let Ok(mut assets) = self.assets.lock() {
            assets.insert(path.into(), content.into());
        }
        self
    }

    /// Raw content of a file in the writable area.
    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().ok()?.get(path).cloned()
    }

    /// Number of `write_json` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Storage for MemoryStorage {
    fn read_json(&self, path: &str) -> Option<Value> {
        let content = self.file(path)?;
        serde_json::from_str(&content).ok()
    }

    fn write_json(&self, path: &str, value: &Value) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.to_string(), value.to_string());
        }
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    fn list_dir(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let Ok(files) = self.files.lock() else {
            return Vec::new();
        };

        let names: Vec<String> = files
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .map(str::to_string)
            .collect();
        names
    }

    fn asset_exists(&self, path: &str) -> bool {
        self.assets
            .lock()
            .map(|assets| assets.contains_key(path))
            .unwrap_or(false)
    }

    fn read_asset_bounded(&self, path: &str, max_bytes: usize) -> Option<BoundedRead> {
        let assets = self.assets.lock().ok()?;
        let content = assets.get(path)?;
        let bytes = &content.as_bytes()[..content.len().min(max_bytes)];
        if bytes.is_empty() {
            return None;
        }
        let read = BoundedRead {
            text: String::from_utf8_lossy(bytes).into_owned(),
            truncated: content.len() > max_bytes,
        };
        Some(read)
    }
}
