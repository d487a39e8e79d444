//! Whole-file reads and atomic writes.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Write `bytes` to `path` atomically.
///
/// The data goes to a sibling temp file which is then renamed over the
/// target, so readers never observe a partly written file.
pub fn write_atomic(path: &Path, bytes: &[u8], config: &StoreConfig) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::io("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path, &config.temp_suffix);
    if let Err(err) = write_temp(&temp_path, bytes, config.sync_on_save) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

fn write_temp(temp_path: &Path, bytes: &[u8], sync: bool) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| StoreError::io("create", temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| StoreError::io("write", temp_path, e))?;
    if sync {
        file.sync_all()
            .map_err(|e| StoreError::io("sync", temp_path, e))?;
    }
    Ok(())
}

/// `dir/name.ext` becomes `dir/name.ext.<suffix>`.
fn temp_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("untitled"));
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Read a whole file, rejecting empty files.
pub fn read_nonempty(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| StoreError::open(path, e))?;
    if bytes.is_empty() {
        return Err(StoreError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.bin");
        let config = StoreConfig::default();

        write_atomic(&path, b"first", &config).unwrap();
        write_atomic(&path, b"second", &config).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join("nested").join("out.bin.tmp").exists());
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        let temp = temp_path_for(Path::new("/work/game.dis"), "tmp");
        assert_eq!(temp, PathBuf::from("/work/game.dis.tmp"));
    }

    #[test]
    fn test_read_nonempty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.prg");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            read_nonempty(&path),
            Err(StoreError::EmptyInput { .. })
        ));
        assert!(matches!(
            read_nonempty(&dir.path().join("missing.prg")),
            Err(StoreError::NotFound { .. })
        ));
    }
}
