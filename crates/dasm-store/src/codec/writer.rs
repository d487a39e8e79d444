//! Project file writer.

use std::io::Write;

use dasm_model::{Constant, Memory, MemoryCell, Project, Slice};

use crate::codec::unsupported_version;
use crate::error::Result;
use crate::layout::{CURRENT_VERSION, CellField, ConstantGrid, Section};
use crate::wire::WriteWireExt;

/// Writes a project body at a chosen format version.
///
/// The output is the uncompressed body; compression happens in the store.
pub struct ProjectWriter<W: Write> {
    writer: W,
    version: u8,
}

impl<W: Write> ProjectWriter<W> {
    /// Create a writer for the current format version.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            version: CURRENT_VERSION,
        }
    }

    /// Create a writer for an older format version.
    ///
    /// Fields introduced after `version` are omitted from the output.
    pub fn with_version(writer: W, version: u8) -> Result<Self> {
        if version > CURRENT_VERSION {
            return Err(unsupported_version(version));
        }
        Ok(Self { writer, version })
    }

    /// Write the whole project and return the underlying writer.
    pub fn write_project(mut self, project: &Project) -> Result<W> {
        self.writer.write_byte(self.version)?;
        for section in Section::for_version(self.version) {
            self.write_section(section, project)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_section(&mut self, section: Section, project: &Project) -> Result<()> {
        match section {
            Section::Identity => {
                self.writer.write_string(&project.name)?;
                self.writer.write_string(&project.source_file)?;
                self.writer.write_string(&project.description)?;
                self.writer.write_name(project.file_type.as_str())
            }
            Section::TargetType => self.writer.write_name(project.target_type.as_str()),
            Section::InputBytes => self
                .writer
                .write_byte_array(&project.input_bytes, "input bytes"),
            Section::MemoryFlags => self
                .writer
                .write_byte_array(&project.memory_flags, "memory flags"),
            Section::Memory => self.write_memory(&project.memory),
            Section::Chip => self.writer.write_int(project.chip),
            Section::Relocates => {
                self.writer
                    .write_length(project.relocates.len(), "relocates")?;
                for relocate in &project.relocates {
                    self.writer.write_int(relocate.from_start)?;
                    self.writer.write_int(relocate.from_end)?;
                    self.writer.write_int(relocate.to_start)?;
                    self.writer.write_int(relocate.to_end)?;
                }
                Ok(())
            }
            Section::Patches => {
                self.writer.write_length(project.patches.len(), "patches")?;
                for patch in &project.patches {
                    self.writer.write_int(patch.address)?;
                    self.writer.write_int(patch.value)?;
                }
                Ok(())
            }
            Section::Freezes => {
                self.writer.write_length(project.freezes.len(), "freezes")?;
                for freeze in &project.freezes {
                    self.writer.write_string(&freeze.name)?;
                    self.writer.write_long_string(&freeze.text)?;
                }
                Ok(())
            }
            Section::ConstantBase
            | Section::ConstantRows
            | Section::ConstantColumns
            | Section::ConstantComments => match section.constant_slice() {
                Some((grid, slice)) => self.write_constant(grid, slice, &project.constant),
                None => Ok(()),
            },
            Section::BinAddress => self.writer.write_int(project.bin_address),
        }
    }

    fn write_memory(&mut self, memory: &Memory) -> Result<()> {
        let fields = CellField::for_version(self.version);
        self.writer.write_length(memory.len(), "memory")?;
        for cell in memory {
            for &field in &fields {
                self.write_cell_field(field, cell)?;
            }
        }
        Ok(())
    }

    fn write_cell_field(&mut self, field: CellField, cell: &MemoryCell) -> Result<()> {
        let w = &mut self.writer;
        match field {
            CellField::Address => w.write_int(cell.address),
            CellField::DasmComment => w.write_nullable_string(cell.dasm_comment.as_deref()),
            CellField::UserComment => w.write_nullable_string(cell.user_comment.as_deref()),
            CellField::UserBlockComment => {
                w.write_nullable_string(cell.user_block_comment.as_deref())
            }
            CellField::DasmLocation => w.write_nullable_string(cell.dasm_location.as_deref()),
            CellField::UserLocation => w.write_nullable_string(cell.user_location.as_deref()),
            CellField::IsInside => w.write_bool(cell.is_inside),
            CellField::IsCode => w.write_bool(cell.is_code),
            CellField::IsData => w.write_bool(cell.is_data),
            CellField::IsGarbage => w.write_bool(cell.is_garbage),
            CellField::DataType => w.write_name(cell.data_type.as_str()),
            CellField::CopyMarker => w.write_byte(cell.copy_marker),
            CellField::Related => w.write_int(cell.related),
            CellField::TypeCode => w.write_char(cell.type_code),
            CellField::Index => w.write_byte(cell.index),
            CellField::RelatedAddressBase => w.write_int(cell.related_address_base),
            CellField::RelatedAddressDest => w.write_int(cell.related_address_dest),
            CellField::BasicType => w.write_name(cell.basic_type.as_str()),
        }
    }

    fn write_constant(&mut self, grid: ConstantGrid, slice: &Slice, constant: &Constant) -> Result<()> {
        for (column, row) in slice.cells() {
            let value = match grid {
                ConstantGrid::Names => constant.get(column, row),
                ConstantGrid::Comments => constant.comment(column, row),
            };
            self.writer.write_nullable_string(value)?;
        }
        Ok(())
    }
}
