//! Scoped temporary resources for one send
//!
//! Attachment content is spilled to temporary files so large payloads need
//! not stay memory-resident and so the transport layer can re-read content
//! when it retries. Every file acquired through a scope is released when
//! the scope closes; dropping the scope closes it, so release happens on
//! every exit path of a send.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempPath};
use tracing::warn;

/// Temp-file manager tied to a single send operation
#[derive(Debug, Default)]
pub struct ResourceScope {
    temp_paths: Vec<TempPath>,
    acquired: usize,
    released: usize,
}

impl ResourceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `content` to a scope-owned temporary file and return its path
    ///
    /// The file exists until the scope closes.
    pub fn spill(&mut self, content: &mut dyn Read) -> io::Result<PathBuf> {
        let mut file = NamedTempFile::with_prefix("courier-part-")?;
        io::copy(content, &mut file)?;
        file.flush()?;

        let temp_path = file.into_temp_path();
        let path = temp_path.to_path_buf();
        self.temp_paths.push(temp_path);
        self.acquired += 1;
        Ok(path)
    }

    /// Number of temporary files acquired so far
    pub fn acquired(&self) -> usize {
        self.acquired
    }

    /// Number of temporary files released so far
    pub fn released(&self) -> usize {
        self.released
    }

    /// Release every temporary file owned by this scope
    pub fn close(&mut self) {
        for temp_path in self.temp_paths.drain(..) {
            if let Err(e) = temp_path.close() {
                warn!("Failed to remove temporary file: {}", e);
            }
            self.released += 1;
        }
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spill_writes_content() {
        let mut scope = ResourceScope::new();
        let path = scope.spill(&mut &b"spilled content"[..]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"spilled content");
        assert_eq!(scope.acquired(), 1);
        assert_eq!(scope.released(), 0);
    }

    #[test]
    fn test_close_releases_every_acquired_file() {
        let mut scope = ResourceScope::new();
        let a = scope.spill(&mut &b"a"[..]).unwrap();
        let b = scope.spill(&mut &b"b"[..]).unwrap();
        assert_eq!(scope.acquired(), 2);

        scope.close();
        assert_eq!(scope.released(), scope.acquired());
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut scope = ResourceScope::new();
        scope.spill(&mut &b"x"[..]).unwrap();
        scope.close();
        scope.close();
        assert_eq!(scope.acquired(), 1);
        assert_eq!(scope.released(), 1);
    }

    #[test]
    fn test_drop_releases_files() {
        let path = {
            let mut scope = ResourceScope::new();
            scope.spill(&mut &b"short lived"[..]).unwrap()
        };
        assert!(!path.exists());
    }
}
