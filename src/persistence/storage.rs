use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};

/// A single text resource holding the modpack data.
#[cfg_attr(test, mockall::automock)]
pub trait Storage {
    /// Human-readable location, used in logs and errors.
    fn location(&self) -> String;

    /// Open the resource for reading; `Ok(None)` when it does not exist.
    fn open(&self) -> io::Result<Option<Box<dyn BufRead>>>;

    /// Replace the resource contents with `contents`.
    fn write(&self, contents: &str) -> io::Result<()>;
}

/// File-backed storage.
///
/// Writes go to a sibling temp file that is then renamed over the target, so a
/// failed save never leaves a truncated data file behind. The temp file is
/// removed again when the rename fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    path: Utf8PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn temp_path(&self) -> Utf8PathBuf {
        let file_name = self.path.file_name().unwrap_or("modpack_data");
        self.path.with_file_name(format!("{}.tmp", file_name))
    }
}

impl Storage for FileStorage {
    fn location(&self) -> String {
        self.path.to_string()
    }

    fn open(&self) -> io::Result<Option<Box<dyn BufRead>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, contents)?;

        // rename replaces an existing target file, so the old data stays intact
        // until the new copy is complete
        fs::rename(&temp_path, &self.path).inspect_err(|e| {
            tracing::debug!("Rename to {} failed: {}", self.path, e);
            let _ = fs::remove_file(&temp_path);
        })
    }
}
