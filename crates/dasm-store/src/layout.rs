//! Version gates of the project file layout.
//!
//! Every section of a project file and every field of a memory cell was
//! introduced by some format version. The two tables below list them in
//! wire order together with that version; the writer, the reader and the
//! progress estimator all walk these tables, so a new field is added in
//! exactly one place.
//!
//! A reader that meets a file older than an entry skips it and keeps the
//! value of a freshly created [`Project`](dasm_model::Project) or
//! [`MemoryCell`](dasm_model::MemoryCell):
//!
//! | Entry | Since | Default |
//! |-------|-------|---------|
//! | target type | 1 | `C64` |
//! | `is_garbage`, `data_type` | 1 | `false`, `NONE` |
//! | chip | 2 | 0 |
//! | `index` | 3 | 0 |
//! | relocates, patches, freezes | 4, 5, 7 | empty |
//! | constant slices | 3, 6, 8, 10 | null |
//! | `related_address_base/dest` | 9 | -1 |
//! | `basic_type` | 10 | `NONE` |
//! | bin address | 11 | 0 |

use std::io::Read;

use dasm_model::{FULL_SLICE, NAME_SLICE_BASE, NAME_SLICE_COLUMNS, NAME_SLICE_ROWS, Slice};

use crate::error::Result;
use crate::wire::ReadWireExt;

/// Newest format version; always used when saving.
pub const CURRENT_VERSION: u8 = 11;

/// Top-level sections of a project file, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Name, source file, description and file type.
    Identity,
    TargetType,
    InputBytes,
    MemoryFlags,
    /// Cell count followed by every memory cell.
    Memory,
    Chip,
    /// Constant names, original columns and rows.
    ConstantBase,
    Relocates,
    Patches,
    /// Constant names, original columns and added rows.
    ConstantRows,
    Freezes,
    /// Constant names, added columns.
    ConstantColumns,
    /// Constant comments, whole grid.
    ConstantComments,
    BinAddress,
}

/// Which grid a constant section carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantGrid {
    Names,
    Comments,
}

impl Section {
    /// All sections in wire order.
    pub const ORDER: [Section; 14] = [
        Self::Identity,
        Self::TargetType,
        Self::InputBytes,
        Self::MemoryFlags,
        Self::Memory,
        Self::Chip,
        Self::ConstantBase,
        Self::Relocates,
        Self::Patches,
        Self::ConstantRows,
        Self::Freezes,
        Self::ConstantColumns,
        Self::ConstantComments,
        Self::BinAddress,
    ];

    /// First format version containing this section.
    pub const fn since(self) -> u8 {
        match self {
            Self::Identity | Self::InputBytes | Self::MemoryFlags | Self::Memory => 0,
            Self::TargetType => 1,
            Self::Chip => 2,
            Self::ConstantBase => 3,
            Self::Relocates => 4,
            Self::Patches => 5,
            Self::ConstantRows => 6,
            Self::Freezes => 7,
            Self::ConstantColumns => 8,
            Self::ConstantComments => 10,
            Self::BinAddress => 11,
        }
    }

    /// Sections present in a file of `version`, in wire order.
    pub fn for_version(version: u8) -> impl Iterator<Item = Section> {
        Self::ORDER
            .into_iter()
            .filter(move |section| section.since() <= version)
    }

    /// The grid and region carried by a constant section.
    pub fn constant_slice(self) -> Option<(ConstantGrid, &'static Slice)> {
        match self {
            Self::ConstantBase => Some((ConstantGrid::Names, &NAME_SLICE_BASE)),
            Self::ConstantRows => Some((ConstantGrid::Names, &NAME_SLICE_ROWS)),
            Self::ConstantColumns => Some((ConstantGrid::Names, &NAME_SLICE_COLUMNS)),
            Self::ConstantComments => Some((ConstantGrid::Comments, &FULL_SLICE)),
            _ => None,
        }
    }
}

/// Fields of one memory cell, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellField {
    Address,
    DasmComment,
    UserComment,
    UserBlockComment,
    DasmLocation,
    UserLocation,
    IsInside,
    IsCode,
    IsData,
    IsGarbage,
    DataType,
    CopyMarker,
    Related,
    TypeCode,
    Index,
    RelatedAddressBase,
    RelatedAddressDest,
    BasicType,
}

impl CellField {
    /// All fields in wire order.
    pub const ORDER: [CellField; 18] = [
        Self::Address,
        Self::DasmComment,
        Self::UserComment,
        Self::UserBlockComment,
        Self::DasmLocation,
        Self::UserLocation,
        Self::IsInside,
        Self::IsCode,
        Self::IsData,
        Self::IsGarbage,
        Self::DataType,
        Self::CopyMarker,
        Self::Related,
        Self::TypeCode,
        Self::Index,
        Self::RelatedAddressBase,
        Self::RelatedAddressDest,
        Self::BasicType,
    ];

    /// First format version containing this field.
    pub const fn since(self) -> u8 {
        match self {
            Self::IsGarbage | Self::DataType => 1,
            Self::Index => 3,
            Self::RelatedAddressBase | Self::RelatedAddressDest => 9,
            Self::BasicType => 10,
            _ => 0,
        }
    }

    /// How the field is laid out on the wire.
    pub const fn encoding(self) -> Encoding {
        match self {
            Self::Address | Self::Related | Self::RelatedAddressBase | Self::RelatedAddressDest => {
                Encoding::Int
            }
            Self::DasmComment
            | Self::UserComment
            | Self::UserBlockComment
            | Self::DasmLocation
            | Self::UserLocation => Encoding::NullableString,
            Self::IsInside | Self::IsCode | Self::IsData | Self::IsGarbage => Encoding::Bool,
            Self::DataType | Self::BasicType => Encoding::Name,
            Self::CopyMarker | Self::Index => Encoding::Byte,
            Self::TypeCode => Encoding::Char,
        }
    }

    /// Fields present in a file of `version`, in wire order.
    pub fn for_version(version: u8) -> Vec<CellField> {
        Self::ORDER
            .into_iter()
            .filter(|field| field.since() <= version)
            .collect()
    }
}

/// Wire shape of a cell field.
///
/// There is no long-string shape. The progress estimator skips cells field
/// by field, which needs every cell field to have a fixed or 16-bit-prefixed
/// size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Int,
    Bool,
    Byte,
    Char,
    Name,
    NullableString,
}

impl Encoding {
    /// Consume one value of this shape without decoding it.
    pub fn skip<R: Read + ?Sized>(self, reader: &mut R) -> Result<()> {
        match self {
            Self::Int => reader.skip_exact(4),
            Self::Bool | Self::Byte => reader.skip_exact(1),
            Self::Char => reader.skip_exact(2),
            Self::Name => reader.skip_string(),
            Self::NullableString => reader.skip_nullable_string().map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WriteWireExt;

    #[test]
    fn test_version_zero_layout() {
        let sections: Vec<_> = Section::for_version(0).collect();
        assert_eq!(
            sections,
            [
                Section::Identity,
                Section::InputBytes,
                Section::MemoryFlags,
                Section::Memory
            ]
        );
        let fields = CellField::for_version(0);
        assert_eq!(fields.len(), 12);
        assert!(!fields.contains(&CellField::IsGarbage));
    }

    #[test]
    fn test_current_version_has_everything() {
        assert_eq!(Section::for_version(CURRENT_VERSION).count(), Section::ORDER.len());
        assert_eq!(CellField::for_version(CURRENT_VERSION), CellField::ORDER);
    }

    #[test]
    fn test_order_is_monotonic_within_slices() {
        let constant: Vec<_> = Section::ORDER
            .into_iter()
            .filter(|section| section.constant_slice().is_some())
            .map(Section::since)
            .collect();
        assert_eq!(constant, [3, 6, 8, 10]);
    }

    #[test]
    fn test_skip_each_encoding() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_int(-1).unwrap();
        buf.write_bool(true).unwrap();
        buf.write_char(0x20).unwrap();
        buf.write_name("NONE").unwrap();
        buf.write_nullable_string(Some("loop")).unwrap();
        buf.write_int(42).unwrap();

        let mut reader = buf.as_slice();
        for encoding in [
            Encoding::Int,
            Encoding::Bool,
            Encoding::Char,
            Encoding::Name,
            Encoding::NullableString,
        ] {
            encoding.skip(&mut reader).unwrap();
        }
        assert_eq!(reader.read_int().unwrap(), 42);
    }
}
