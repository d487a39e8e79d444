//! Record graph of a disassembly project.
//!
//! A [`Project`] holds the program image being disassembled together with
//! everything the user and the disassembler attached to it:
//!
//! - one [`MemoryCell`] per address of the 64K address space
//! - the [`Constant`] table of symbolic names and comments
//! - edit records: [`Relocate`], [`Patch`] and [`Freeze`] snapshots
//!
//! Persistence lives in `dasm-store`; this crate only defines the values.

mod constant;
mod container;
mod enums;
mod error;
mod memory;
mod project;
mod serde_hex;

pub use constant::{
    COLS, Constant, ConstantEntry, ConstantSnapshot, FULL_SLICE, MIN_COLS, MIN_ROWS,
    NAME_SLICE_BASE, NAME_SLICE_COLUMNS, NAME_SLICE_ROWS, ROWS, Slice,
};
pub use container::{ContainerEntry, ContainerIndex, ContainerIndexer};
pub use enums::{BasicType, DataType, FileType, TargetType};
pub use error::{ModelError, Result};
pub use memory::{DEFAULT_TYPE_CODE, MEMORY_SIZE, Memory, MemoryCell, NO_RELATION};
pub use project::{Freeze, Patch, Project, Relocate};
