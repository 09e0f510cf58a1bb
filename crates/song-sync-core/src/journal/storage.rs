use crate::{CoreError, CoreResult};

use std::{
    collections::HashMap,
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use tracing::{info, instrument, warn};

const TAIL_WINDOW: u64 = 512;

/// Persistent storage of named line-oriented files.
///
/// Implementations must make `append` all-or-nothing with respect to earlier
/// lines: a failed or torn write may lose the line being written, never a
/// line committed before it.
pub trait Storage {
    /// Append `line` plus a terminator to the file `name`, creating it if needed.
    fn append(&mut self, name: &str, line: &str) -> CoreResult<()>;

    /// Read the whole file `name`. A missing file reads as empty.
    fn read_all(&self, name: &str) -> CoreResult<String>;

    /// Delete the file `name`. Deleting a missing file succeeds.
    fn remove(&mut self, name: &str) -> CoreResult<()>;
}

/// Directory-backed [`Storage`].
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a store rooted at `root`. Nothing touches the disk until
    /// [`mount`](Self::mount) or the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ensure the root directory exists.
    #[track_caller]
    #[instrument(skip(self), fields(root = ?self.root))]
    pub fn mount(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.root)?;
        info!("Storage mounted");
        Ok(())
    }

    /// Directory holding the files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name.trim_start_matches('/'))
    }
}

impl Storage for FsStorage {
    #[track_caller]
    fn append(&mut self, name: &str, line: &str) -> CoreResult<()> {
        let path = self.path(name);
        let fail = |op: &str, e: std::io::Error| {
            CoreError::storage(format!("{} {}: {}", op, path.display(), e))
        };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| fail("open", e))?;

        // Cut a torn tail left by an interrupted write back to the last
        // complete line before appending.
        let len = file.metadata().map_err(|e| fail("stat", e))?.len();
        if len > 0 {
            let keep =
                complete_prefix_len(&mut file, len).map_err(|e| fail("read tail of", e))?;
            if keep < len {
                warn!(path = ?path, dropped = len - keep, "Truncating torn journal tail");
                file.set_len(keep).map_err(|e| fail("truncate", e))?;
            }
        }

        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        file.write_all(record.as_bytes())
            .map_err(|e| fail("append to", e))?;
        file.sync_data().map_err(|e| fail("sync", e))?;

        Ok(())
    }

    #[track_caller]
    fn read_all(&self, name: &str) -> CoreResult<String> {
        let path = self.path(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(CoreError::storage(format!(
                "read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    #[track_caller]
    fn remove(&mut self, name: &str) -> CoreResult<()> {
        let path = self.path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::storage(format!(
                "remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

// Length of the file up to and including its last line terminator, scanning
// back one window at a time.
fn complete_prefix_len(file: &mut File, len: u64) -> std::io::Result<u64> {
    let mut end = len;
    let mut window = Vec::with_capacity(TAIL_WINDOW as usize);

    while end > 0 {
        let start = end.saturating_sub(TAIL_WINDOW);
        window.clear();
        file.seek(SeekFrom::Start(start))?;
        std::io::Read::by_ref(file).take(end - start).read_to_end(&mut window)?;

        if let Some(pos) = window.iter().rposition(|&b| b == b'\n') {
            return Ok(start + pos as u64 + 1);
        }
        end = start;
    }

    Ok(0)
}

/// In-memory [`Storage`], for tests and hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `name` preloaded with raw `contents`.
    pub fn with_file(name: &str, contents: &str) -> Self {
        let mut files = HashMap::new();
        files.insert(name.to_string(), contents.to_string());
        Self { files }
    }
}

impl Storage for MemoryStorage {
    fn append(&mut self, name: &str, line: &str) -> CoreResult<()> {
        let file = self.files.entry(name.to_string()).or_default();
        file.push_str(line);
        file.push('\n');
        Ok(())
    }

    fn read_all(&self, name: &str) -> CoreResult<String> {
        Ok(self.files.get(name).cloned().unwrap_or_default())
    }

    fn remove(&mut self, name: &str) -> CoreResult<()> {
        self.files.remove(name);
        Ok(())
    }
}
