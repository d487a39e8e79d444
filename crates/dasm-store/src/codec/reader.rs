//! Project file reader.

use std::io::Read;

use dasm_model::{
    Constant, ContainerIndexer, Freeze, MEMORY_SIZE, Memory, MemoryCell, Patch, Project, Relocate,
    Slice,
};

use crate::codec::unsupported_version;
use crate::error::{Result, StoreError};
use crate::layout::{CURRENT_VERSION, CellField, ConstantGrid, Section};
use crate::wire::ReadWireExt;

/// Reads a project body of any supported format version.
///
/// Decoding fills a fresh [`Project`]; fields older files lack keep the
/// defaults of a new project. Nothing is returned unless the whole body
/// decodes.
pub struct ProjectReader<'a, R: Read> {
    reader: R,
    indexer: Option<&'a dyn ContainerIndexer>,
}

impl<'a, R: Read> ProjectReader<'a, R> {
    /// Create a reader over an uncompressed project body.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            indexer: None,
        }
    }

    /// Derive a container index for file types that carry one.
    pub fn with_indexer(mut self, indexer: &'a dyn ContainerIndexer) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Read the whole project.
    pub fn read_project(self) -> Result<Project> {
        self.read_versioned().map(|(_, project)| project)
    }

    /// Read the whole project, also returning the file's format version.
    pub fn read_versioned(mut self) -> Result<(u8, Project)> {
        let version = read_version(&mut self.reader)?;
        let mut project = Project::new();
        for section in Section::for_version(version) {
            self.read_section(section, version, &mut project)?;
        }

        if project.file_type.has_container_index()
            && let Some(indexer) = self.indexer
        {
            let index = indexer.index(&project.input_bytes);
            tracing::debug!(entries = index.len(), "derived container index");
            project.container_index = Some(index);
        }

        tracing::debug!(version, name = %project.name, "decoded project");
        Ok((version, project))
    }

    fn read_section(&mut self, section: Section, version: u8, project: &mut Project) -> Result<()> {
        let r = &mut self.reader;
        match section {
            Section::Identity => {
                project.name = r.read_string()?;
                project.source_file = r.read_string()?;
                project.description = r.read_string()?;
                project.file_type = r.read_name()?;
            }
            Section::TargetType => project.target_type = r.read_name()?,
            Section::InputBytes => project.input_bytes = r.read_byte_array("input bytes")?,
            Section::MemoryFlags => project.memory_flags = r.read_byte_array("memory flags")?,
            Section::Memory => read_memory(r, version, &mut project.memory)?,
            Section::Chip => project.chip = r.read_int()?,
            Section::Relocates => {
                let count = r.read_length("relocates")?;
                for _ in 0..count {
                    project.relocates.push(Relocate {
                        from_start: r.read_int()?,
                        from_end: r.read_int()?,
                        to_start: r.read_int()?,
                        to_end: r.read_int()?,
                    });
                }
            }
            Section::Patches => {
                let count = r.read_length("patches")?;
                for _ in 0..count {
                    project.patches.push(Patch {
                        address: r.read_int()?,
                        value: r.read_int()?,
                    });
                }
            }
            Section::Freezes => {
                let count = r.read_length("freezes")?;
                for _ in 0..count {
                    project.freezes.push(Freeze {
                        name: r.read_string()?,
                        text: r.read_long_string()?,
                    });
                }
            }
            Section::ConstantBase
            | Section::ConstantRows
            | Section::ConstantColumns
            | Section::ConstantComments => {
                if let Some((grid, slice)) = section.constant_slice() {
                    read_constant(r, grid, slice, &mut project.constant)?;
                }
            }
            Section::BinAddress => project.bin_address = r.read_int()?,
        }
        Ok(())
    }
}

/// Read and check the leading version byte.
pub(crate) fn read_version<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    let version = reader.read_byte()?;
    if version > CURRENT_VERSION {
        return Err(unsupported_version(version));
    }
    Ok(version)
}

fn read_memory<R: Read>(reader: &mut R, version: u8, memory: &mut Memory) -> Result<()> {
    let count = reader.read_int()?;
    if usize::try_from(count).ok() != Some(MEMORY_SIZE) {
        return Err(StoreError::InvalidMemoryCount { found: count });
    }
    let fields = CellField::for_version(version);
    for cell in memory.iter_mut() {
        for &field in &fields {
            read_cell_field(reader, field, cell)?;
        }
    }
    Ok(())
}

fn read_cell_field<R: Read>(r: &mut R, field: CellField, cell: &mut MemoryCell) -> Result<()> {
    match field {
        CellField::Address => cell.address = r.read_int()?,
        CellField::DasmComment => cell.dasm_comment = r.read_nullable_string()?,
        CellField::UserComment => cell.user_comment = r.read_nullable_string()?,
        CellField::UserBlockComment => cell.user_block_comment = r.read_nullable_string()?,
        CellField::DasmLocation => cell.dasm_location = r.read_nullable_string()?,
        CellField::UserLocation => cell.user_location = r.read_nullable_string()?,
        CellField::IsInside => cell.is_inside = r.read_bool()?,
        CellField::IsCode => cell.is_code = r.read_bool()?,
        CellField::IsData => cell.is_data = r.read_bool()?,
        CellField::IsGarbage => cell.is_garbage = r.read_bool()?,
        CellField::DataType => cell.data_type = r.read_name()?,
        CellField::CopyMarker => cell.copy_marker = r.read_byte()?,
        CellField::Related => cell.related = r.read_int()?,
        CellField::TypeCode => cell.type_code = r.read_char()?,
        CellField::Index => cell.index = r.read_byte()?,
        CellField::RelatedAddressBase => cell.related_address_base = r.read_int()?,
        CellField::RelatedAddressDest => cell.related_address_dest = r.read_int()?,
        CellField::BasicType => cell.basic_type = r.read_name()?,
    }
    Ok(())
}

fn read_constant<R: Read>(
    reader: &mut R,
    grid: ConstantGrid,
    slice: &Slice,
    constant: &mut Constant,
) -> Result<()> {
    for (column, row) in slice.cells() {
        if let Some(value) = reader.read_nullable_string()? {
            match grid {
                ConstantGrid::Names => constant.set(column, row, Some(value))?,
                ConstantGrid::Comments => constant.set_comment(column, row, Some(value))?,
            }
        }
    }
    Ok(())
}
