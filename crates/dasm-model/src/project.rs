//! Root project record.

use serde::{Deserialize, Serialize};

use crate::constant::Constant;
use crate::container::ContainerIndex;
use crate::enums::{FileType, TargetType};
use crate::memory::Memory;

/// An address-range remap applied while disassembling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocate {
    pub from_start: i32,
    pub from_end: i32,
    pub to_start: i32,
    pub to_end: i32,
}

/// A single-byte patch of the program image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub address: i32,
    pub value: i32,
}

/// A named snapshot of generated source text.
///
/// `text` may exceed the 65535-byte limit of ordinary strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freeze {
    pub name: String,
    pub text: String,
}

/// A disassembly session: program image, annotations, constants and edits.
///
/// `relocates`, `patches` and `freezes` are empty when absent; the file
/// format does not distinguish an absent list from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Path of the program image the project was created from.
    #[serde(rename = "file")]
    pub source_file: String,
    pub description: String,
    pub file_type: FileType,
    pub target_type: TargetType,
    /// Raw program image.
    #[serde(with = "crate::serde_hex")]
    pub input_bytes: Vec<u8>,
    /// One flag byte per input byte.
    #[serde(with = "crate::serde_hex")]
    pub memory_flags: Vec<u8>,
    pub memory: Memory,
    pub chip: i32,
    pub constant: Constant,
    #[serde(default)]
    pub relocates: Vec<Relocate>,
    #[serde(default)]
    pub patches: Vec<Patch>,
    #[serde(default)]
    pub freezes: Vec<Freeze>,
    pub bin_address: i32,
    /// Derived from `input_bytes` for container file types; not persisted.
    #[serde(skip)]
    pub container_index: Option<ContainerIndex>,
}

impl Project {
    /// Create an empty project covering the full address space.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            source_file: String::new(),
            description: String::new(),
            file_type: FileType::default(),
            target_type: TargetType::default(),
            input_bytes: Vec::new(),
            memory_flags: Vec::new(),
            memory: Memory::new(),
            chip: 0,
            constant: Constant::new(),
            relocates: Vec::new(),
            patches: Vec::new(),
            freezes: Vec::new(),
            bin_address: 0,
            container_index: None,
        }
    }

    /// Replace the program image, resetting the per-byte flags to zero.
    pub fn set_input(&mut self, bytes: Vec<u8>) {
        self.memory_flags = vec![0; bytes.len()];
        self.input_bytes = bytes;
    }

    /// Load address stored in the first two image bytes (little-endian).
    ///
    /// Only meaningful for file types that carry one, such as PRG.
    pub fn header_load_address(&self) -> Option<u16> {
        match self.input_bytes.as_slice() {
            [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MEMORY_SIZE;

    #[test]
    fn test_new_project() {
        let project = Project::new();
        assert_eq!(project.memory.len(), MEMORY_SIZE);
        assert_eq!(project.target_type, TargetType::C64);
        assert!(project.relocates.is_empty());
        assert_eq!(project.bin_address, 0);
    }

    #[test]
    fn test_set_input_resets_flags() {
        let mut project = Project::new();
        project.memory_flags = vec![1, 1];
        project.set_input(vec![0x01, 0x08, 0xa9, 0x00]);
        assert_eq!(project.memory_flags, vec![0; 4]);
        assert_eq!(project.header_load_address(), Some(0x0801));
    }
}
