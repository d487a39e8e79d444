//! File-level entry point.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use dasm_model::{Constant, ContainerIndexer, Project};

use crate::codec::{ProjectReader, encode_as};
use crate::compression;
use crate::config::StoreConfig;
use crate::constant_file;
use crate::error::{Result, StoreError};
use crate::files;
use crate::layout::CURRENT_VERSION;
use crate::options::{OptionRecord, read_options, write_options};
use crate::progress::{Completion, ProgressEstimator};

/// Loads and saves project, constant, option and raw files.
///
/// The store holds no file handles between calls; every operation opens,
/// uses and releases its file within the call.
#[derive(Clone, Default)]
pub struct ProjectStore {
    config: StoreConfig,
    indexer: Option<Arc<dyn ContainerIndexer>>,
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("config", &self.config)
            .field("indexer", &self.indexer.is_some())
            .finish()
    }
}

impl ProjectStore {
    /// Create a store, rejecting an unusable configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            indexer: None,
        })
    }

    /// Derive container indexes on load for file types that carry one.
    pub fn with_indexer(mut self, indexer: Arc<dyn ContainerIndexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Load a project file, plain or gzip-compressed.
    pub fn load(&self, path: &Path) -> Result<Project> {
        self.load_with_version(path).map(|(_, project)| project)
    }

    /// Load a project file, also returning its format version.
    pub fn load_with_version(&self, path: &Path) -> Result<(u8, Project)> {
        let stream = compression::open_reader(path)?;
        let mut reader = ProjectReader::new(stream);
        if let Some(indexer) = self.indexer.as_deref() {
            reader = reader.with_indexer(indexer);
        }
        let (version, project) = reader.read_versioned()?;
        tracing::info!(path = %path.display(), version, "Loaded project");
        Ok((version, project))
    }

    /// Load a project file into `target`.
    ///
    /// `target` is replaced only once the whole file decoded; on error it
    /// keeps its previous contents.
    pub fn load_into(&self, path: &Path, target: &mut Project) -> Result<()> {
        *target = self.load(path)?;
        Ok(())
    }

    /// Save a project at the current format version.
    pub fn save(&self, path: &Path, project: &Project) -> Result<()> {
        self.save_as_version(path, project, CURRENT_VERSION)
    }

    /// Save a project at an older format version.
    ///
    /// The body is encoded and compressed in memory, then written with a
    /// single atomic replace.
    pub fn save_as_version(&self, path: &Path, project: &Project, version: u8) -> Result<()> {
        let body = encode_as(project, version)?;
        let packed = compression::compress(&body, self.config.compression())?;
        files::write_atomic(path, &packed, &self.config)?;
        tracing::info!(
            path = %path.display(),
            version,
            raw = body.len(),
            compressed = packed.len(),
            "Saved project"
        );
        Ok(())
    }

    /// Estimate labelling progress of a project file without loading it.
    pub fn read_completion(&self, path: &Path) -> Result<Completion> {
        let stream = compression::open_reader(path)?;
        ProgressEstimator::new(stream).estimate()
    }

    /// Write one constant name column to a constant file.
    pub fn export_constants(&self, path: &Path, constant: &Constant, column: usize) -> Result<()> {
        let mut buf: Vec<u8> = Vec::new();
        constant_file::write_column(&mut buf, constant, column)?;
        files::write_atomic(path, &buf, &self.config)?;
        tracing::info!(path = %path.display(), column, "Exported constant column");
        Ok(())
    }

    /// Replace one constant name column from a constant file.
    ///
    /// `constant` is untouched unless the whole file is valid.
    pub fn import_constants(&self, path: &Path, constant: &mut Constant, column: usize) -> Result<()> {
        let file = File::open(path).map_err(|e| StoreError::open(path, e))?;
        constant_file::read_column(&mut BufReader::new(file), constant, column)?;
        tracing::info!(path = %path.display(), column, "Imported constant column");
        Ok(())
    }

    /// Load an option record.
    ///
    /// Returns `Ok(false)` and leaves `target` alone when the file does not
    /// exist. Any other failure also leaves `target` unchanged.
    pub fn load_options<T>(&self, path: &Path, target: &mut T) -> Result<bool>
    where
        T: OptionRecord + Clone,
    {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No option file, keeping defaults");
                return Ok(false);
            }
            Err(e) => return Err(StoreError::open(path, e)),
        };
        read_options(&mut BufReader::new(file), target)?;
        Ok(true)
    }

    /// Save an option record, uncompressed.
    pub fn save_options<T: OptionRecord + ?Sized>(&self, path: &Path, record: &T) -> Result<()> {
        let bytes = write_options(record)?;
        files::write_atomic(path, &bytes, &self.config)
    }

    /// Read a raw program image.
    pub fn read_input_file(&self, path: &Path) -> Result<Vec<u8>> {
        files::read_nonempty(path)
    }

    /// Write raw bytes, such as an assembled binary.
    pub fn write_binary_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        files::write_atomic(path, bytes, &self.config)
    }

    /// Write text, such as generated source.
    pub fn write_text_file(&self, path: &Path, text: &str) -> Result<()> {
        files::write_atomic(path, text.as_bytes(), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::tests::ListingOptions;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_gzip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.dis");
        let store = ProjectStore::default();

        store.save(&path, &Project::new()).unwrap();

        assert!(compression::is_compressed(&path));
        assert_eq!(store.load_with_version(&path).unwrap().0, CURRENT_VERSION);
    }

    #[test]
    fn test_load_into_failure_keeps_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.dis");
        fs::write(&path, [CURRENT_VERSION, 0x00]).unwrap();

        let store = ProjectStore::default();
        let mut target = Project::new();
        target.name = "keep".into();
        assert!(matches!(
            store.load_into(&path, &mut target),
            Err(StoreError::Truncated)
        ));
        assert_eq!(target.name, "keep");
    }

    #[test]
    fn test_options_missing_file() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::default();
        let mut options = ListingOptions::default();
        let loaded = store
            .load_options(&dir.path().join("listing.opt"), &mut options)
            .unwrap();
        assert!(!loaded);
        assert_eq!(options, ListingOptions::default());
    }

    #[test]
    fn test_options_round_trip_uncompressed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("listing.opt");
        let store = ProjectStore::default();
        let options = ListingOptions {
            lowercase: true,
            bytes_per_line: 4,
            label_prefix: None,
        };

        store.save_options(&path, &options).unwrap();
        assert!(!compression::is_compressed(&path));

        let mut loaded = ListingOptions::default();
        assert!(store.load_options(&path, &mut loaded).unwrap());
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = StoreConfig {
            compression_level: 10,
            ..Default::default()
        };
        assert!(matches!(
            ProjectStore::new(config),
            Err(StoreError::InvalidConfig { .. })
        ));
    }
}
