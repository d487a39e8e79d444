//! Per-address annotations covering the whole 64K address space.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::enums::{BasicType, DataType};
use crate::error::{ModelError, Result};

/// Number of addressable bytes, and so of memory cells, in a project.
pub const MEMORY_SIZE: usize = 0x10000;

/// Marker for "no related address".
pub const NO_RELATION: i32 = -1;

/// Default cell type code (a blank).
pub const DEFAULT_TYPE_CODE: u16 = b' ' as u16;

/// Annotation record for one address.
///
/// Each optional string is independently nullable: `None` and `Some("")`
/// are distinct values and both survive a save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCell {
    pub address: i32,
    pub dasm_comment: Option<String>,
    pub user_comment: Option<String>,
    pub user_block_comment: Option<String>,
    pub dasm_location: Option<String>,
    pub user_location: Option<String>,
    /// Covered by the loaded program image.
    pub is_inside: bool,
    pub is_code: bool,
    pub is_data: bool,
    pub is_garbage: bool,
    pub data_type: DataType,
    pub copy_marker: u8,
    /// Cross-reference address, or [`NO_RELATION`].
    pub related: i32,
    /// UTF-16 code unit describing how the cell relates to `related`.
    #[serde(rename = "type")]
    pub type_code: u16,
    pub index: u8,
    pub related_address_base: i32,
    pub related_address_dest: i32,
    pub basic_type: BasicType,
}

impl MemoryCell {
    /// Create an empty cell for `address`.
    pub fn new(address: i32) -> Self {
        Self {
            address,
            dasm_comment: None,
            user_comment: None,
            user_block_comment: None,
            dasm_location: None,
            user_location: None,
            is_inside: false,
            is_code: false,
            is_data: false,
            is_garbage: false,
            data_type: DataType::default(),
            copy_marker: 0,
            related: NO_RELATION,
            type_code: DEFAULT_TYPE_CODE,
            index: 0,
            related_address_base: NO_RELATION,
            related_address_dest: NO_RELATION,
            basic_type: BasicType::default(),
        }
    }

    /// The type code as a character, if it is a valid scalar value.
    pub fn type_char(&self) -> Option<char> {
        char::from_u32(u32::from(self.type_code))
    }

    /// Whether the cell carries a label, user-defined or generated.
    pub fn has_location(&self) -> bool {
        self.user_location.is_some() || self.dasm_location.is_some()
    }
}

/// The annotation array: exactly [`MEMORY_SIZE`] cells, indexed by address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MemoryCell>", into = "Vec<MemoryCell>")]
pub struct Memory {
    cells: Vec<MemoryCell>,
}

impl Memory {
    /// Create the full address space with empty cells.
    pub fn new() -> Self {
        let cells = (0..MEMORY_SIZE)
            .map(|address| MemoryCell::new(address as i32))
            .collect();
        Self { cells }
    }

    /// Number of cells (always [`MEMORY_SIZE`]).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemoryCell> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, MemoryCell> {
        self.cells.iter_mut()
    }

    pub fn get(&self, address: usize) -> Option<&MemoryCell> {
        self.cells.get(address)
    }

    pub fn get_mut(&mut self, address: usize) -> Option<&mut MemoryCell> {
        self.cells.get_mut(address)
    }

    /// Mark `len` cells starting at `start` as covered by the program image.
    ///
    /// Cells past the end of the address space are ignored.
    pub fn mark_inside(&mut self, start: usize, len: usize) {
        let end = start.saturating_add(len).min(MEMORY_SIZE);
        if start >= end {
            return;
        }
        for cell in &mut self.cells[start..end] {
            cell.is_inside = true;
        }
    }

    /// Count of cells covered by the program image.
    pub fn inside_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_inside).count()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<MemoryCell>> for Memory {
    type Error = ModelError;

    fn try_from(cells: Vec<MemoryCell>) -> Result<Self> {
        if cells.len() != MEMORY_SIZE {
            return Err(ModelError::InvalidMemorySize {
                expected: MEMORY_SIZE,
                actual: cells.len(),
            });
        }
        Ok(Self { cells })
    }
}

impl From<Memory> for Vec<MemoryCell> {
    fn from(memory: Memory) -> Self {
        memory.cells
    }
}

impl Index<usize> for Memory {
    type Output = MemoryCell;

    fn index(&self, address: usize) -> &MemoryCell {
        &self.cells[address]
    }
}

impl IndexMut<usize> for Memory {
    fn index_mut(&mut self, address: usize) -> &mut MemoryCell {
        &mut self.cells[address]
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a MemoryCell;
    type IntoIter = std::slice::Iter<'a, MemoryCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory_covers_address_space() {
        let memory = Memory::new();
        assert_eq!(memory.len(), MEMORY_SIZE);
        assert_eq!(memory[0x0801].address, 0x0801);
        assert_eq!(memory[0xffff].related, NO_RELATION);
        assert_eq!(memory[0].type_char(), Some(' '));
    }

    #[test]
    fn test_try_from_rejects_short_vec() {
        let err = Memory::try_from(vec![MemoryCell::new(0)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidMemorySize {
                expected: MEMORY_SIZE,
                actual: 1
            }
        );
    }

    #[test]
    fn test_mark_inside_clamps_to_address_space() {
        let mut memory = Memory::new();
        memory.mark_inside(0xfffe, 10);
        assert_eq!(memory.inside_count(), 2);
        assert!(memory[0xffff].is_inside);
    }
}
