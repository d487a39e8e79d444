//! Project file codec.
//!
//! A project body is a version byte followed by the sections of
//! [`Section::ORDER`](crate::layout::Section) present at that version. The
//! functions here work on in-memory buffers; [`ProjectStore`](crate::ProjectStore)
//! adds compression and atomic file handling on top.

mod reader;
mod writer;

pub(crate) use reader::read_version;
pub use reader::ProjectReader;
pub use writer::ProjectWriter;

use dasm_model::{ContainerIndexer, Project};

use crate::compression;
use crate::error::{Result, StoreError};
use crate::layout::CURRENT_VERSION;

/// Encode `project` at the current format version, uncompressed.
pub fn encode(project: &Project) -> Result<Vec<u8>> {
    ProjectWriter::new(Vec::new()).write_project(project)
}

/// Encode `project` at an older format version, uncompressed.
///
/// Fields introduced after `version` are dropped. Reading the result back
/// yields those fields at their defaults.
pub fn encode_as(project: &Project, version: u8) -> Result<Vec<u8>> {
    ProjectWriter::with_version(Vec::new(), version)?.write_project(project)
}

/// Decode a project body, plain or gzip-compressed.
pub fn decode(bytes: &[u8]) -> Result<Project> {
    ProjectReader::new(compression::slice_reader(bytes)).read_project()
}

/// Decode a project body, deriving a container index where applicable.
pub fn decode_with_indexer(bytes: &[u8], indexer: &dyn ContainerIndexer) -> Result<Project> {
    ProjectReader::new(compression::slice_reader(bytes))
        .with_indexer(indexer)
        .read_project()
}

/// Format version of an encoded body, without decoding the rest.
pub fn peek_version(bytes: &[u8]) -> Result<u8> {
    read_version(&mut compression::slice_reader(bytes))
}

pub(crate) fn unsupported_version(version: u8) -> StoreError {
    StoreError::UnsupportedVersion {
        format: "project",
        found: i32::from(version),
        max_supported: i32::from(CURRENT_VERSION),
    }
}
