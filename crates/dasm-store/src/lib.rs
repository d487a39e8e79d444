//! Persistent storage for disassembler projects.
//!
//! This crate reads and writes the binary files of a 6502 disassembler
//! session: versioned project files, single-column constant files and
//! flat option records.
//!
//! # Project File Format
//!
//! ```text
//! +---------------------+
//! | gzip wrapper        | optional on read, always written
//! +---------------------+
//! | Version: u8         | 0..=11
//! +---------------------+
//! | Sections            | those introduced at or before the version,
//! |                     | in wire order (see `layout`)
//! +---------------------+
//! ```
//!
//! Integers are big-endian and strings are modified UTF-8 with a 16-bit
//! length prefix.
//!
//! # Example
//!
//! ```ignore
//! use dasm_store::{ProjectStore, StoreConfig};
//!
//! let store = ProjectStore::new(StoreConfig::default())?;
//! let project = store.load(Path::new("game.dis"))?;
//! println!("{}", store.read_completion(Path::new("game.dis"))?);
//! store.save(Path::new("game.dis"), &project)?;
//! ```
//!
//! # Architecture
//!
//! - `wire.rs`, `mutf8.rs` - Primitive codec shared by every format
//! - `layout.rs` - Version gate tables for sections and cell fields
//! - `codec/` - Project reader and writer
//! - `progress.rs` - Labelling progress estimate
//! - `constant_file.rs` - Constant column files
//! - `options.rs` - Option record capability
//! - `store.rs` - File-level service with compression and atomic writes

mod codec;
mod compression;
mod config;
mod constant_file;
mod error;
mod files;
mod hash;
mod layout;
mod mutf8;
mod options;
mod progress;
mod store;
mod wire;

pub use codec::{
    ProjectReader, ProjectWriter, decode, decode_with_indexer, encode, encode_as, peek_version,
};
pub use compression::{GZIP_MAGIC, is_compressed, is_compressed_bytes};
pub use config::StoreConfig;
pub use constant_file::{CONSTANT_FORMAT_VERSION, CONSTANT_HEADER, read_column, write_column};
pub use error::{Result, StoreError};
pub use hash::{compute_file_hash, sha256_hex};
pub use layout::{CURRENT_VERSION, CellField, ConstantGrid, Encoding, Section};
pub use options::{OptionRecord, read_options, write_options};
pub use progress::{Completion, LabelTally, ProgressEstimator, estimate_completion};
pub use store::ProjectStore;
pub use wire::{MAX_STRING_LEN, ReadWireExt, WriteWireExt};
