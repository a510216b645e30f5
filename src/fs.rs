//! Filesystem access behind a trait, so history and config writers can be
//! exercised against an in-memory store.

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write content to a file, creating missing parent directories.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Process-wide real filesystem for commands that do not inject one.
pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}
