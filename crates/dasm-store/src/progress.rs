//! Labelling progress read straight from a project file.
//!
//! The estimate only needs the memory cells, so the walk stops at the end
//! of the memory section and skips every field it does not count instead of
//! building a [`Project`](dasm_model::Project).

use std::fmt;
use std::io::Read;

use crate::codec::read_version;
use crate::compression;
use crate::error::Result;
use crate::layout::{CellField, Section};
use crate::wire::ReadWireExt;

/// Share of labelled addresses that carry a user-chosen label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Whole percent, rounded down.
    Percent(u8),
    /// The project has no labelled addresses inside the program image.
    NotApplicable,
}

impl Completion {
    /// The percentage, if there is one.
    pub fn percent(self) -> Option<u8> {
        match self {
            Self::Percent(value) => Some(value),
            Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{value}%"),
            Self::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// Running tally of labelled cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabelTally {
    /// Cells inside the image, not garbage, with any label.
    pub total: u64,
    /// Those among `total` whose label is user-chosen.
    pub done: u64,
}

impl LabelTally {
    fn count(&mut self, cell: &CellSummary) {
        if !cell.is_inside || cell.is_garbage {
            return;
        }
        if cell.user_location {
            self.total += 1;
            self.done += 1;
        } else if cell.dasm_location {
            self.total += 1;
        }
    }

    /// Collapse the tally to a completion figure.
    pub fn completion(self) -> Completion {
        if self.total == 0 {
            return Completion::NotApplicable;
        }
        let percent = self.done * 100 / self.total;
        Completion::Percent(u8::try_from(percent).unwrap_or(100))
    }
}

#[derive(Debug, Default)]
struct CellSummary {
    is_inside: bool,
    is_garbage: bool,
    dasm_location: bool,
    user_location: bool,
}

/// Walks a project body far enough to tally labels.
pub struct ProgressEstimator<R: Read> {
    reader: R,
}

impl<R: Read> ProgressEstimator<R> {
    /// Create an estimator over an uncompressed project body.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Tally the memory cells of the project.
    ///
    /// Unlike the full decoder, any cell count is accepted.
    pub fn tally(mut self) -> Result<LabelTally> {
        let version = read_version(&mut self.reader)?;
        for section in Section::for_version(version).take_while(|s| *s != Section::Memory) {
            self.skip_header_section(section)?;
        }
        self.tally_cells(version)
    }

    /// Estimate the completion of the project.
    pub fn estimate(self) -> Result<Completion> {
        Ok(self.tally()?.completion())
    }

    fn skip_header_section(&mut self, section: Section) -> Result<()> {
        let r = &mut self.reader;
        match section {
            Section::Identity => {
                for _ in 0..4 {
                    r.skip_string()?;
                }
                Ok(())
            }
            Section::TargetType => r.skip_string(),
            Section::InputBytes => r.skip_byte_array("input bytes"),
            Section::MemoryFlags => r.skip_byte_array("memory flags"),
            // Only the sections above precede the memory cells.
            _ => Ok(()),
        }
    }

    fn tally_cells(&mut self, version: u8) -> Result<LabelTally> {
        let count = self.reader.read_length("memory")?;
        let fields = CellField::for_version(version);
        let mut tally = LabelTally::default();
        for _ in 0..count {
            let mut cell = CellSummary::default();
            for &field in &fields {
                let r = &mut self.reader;
                match field {
                    CellField::DasmLocation => cell.dasm_location = r.skip_nullable_string()?,
                    CellField::UserLocation => cell.user_location = r.skip_nullable_string()?,
                    CellField::IsInside => cell.is_inside = r.read_bool()?,
                    CellField::IsGarbage => cell.is_garbage = r.read_bool()?,
                    other => other.encoding().skip(r)?,
                }
            }
            tally.count(&cell);
        }
        Ok(tally)
    }
}

/// Estimate completion from an encoded project, plain or gzip-compressed.
pub fn estimate_completion(bytes: &[u8]) -> Result<Completion> {
    ProgressEstimator::new(compression::slice_reader(bytes)).estimate()
}
