//! Auxiliary index over multi-program containers.
//!
//! The container layout belongs to the disassembly engine. The model only
//! defines the derived index and the seam through which the engine supplies
//! it; the index is a pure function of the program image and is never
//! persisted.

use serde::{Deserialize, Serialize};

/// One embedded program inside a container image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    /// Byte offset of the entry inside the program image.
    pub offset: usize,
    /// Entry length in bytes.
    pub len: usize,
}

/// Index of the entries found in a container image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerIndex {
    pub entries: Vec<ContainerEntry>,
}

impl ContainerIndex {
    pub fn new(entries: Vec<ContainerEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes of entry `n` within `image`, if the entry lies inside it.
    pub fn slice<'a>(&self, image: &'a [u8], n: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(n)?;
        image.get(entry.offset..entry.offset.checked_add(entry.len)?)
    }
}

/// Derives a [`ContainerIndex`] from a program image.
pub trait ContainerIndexer: Send + Sync {
    fn index(&self, image: &[u8]) -> ContainerIndex;
}

impl<F> ContainerIndexer for F
where
    F: Fn(&[u8]) -> ContainerIndex + Send + Sync,
{
    fn index(&self, image: &[u8]) -> ContainerIndex {
        self(image)
    }
}
