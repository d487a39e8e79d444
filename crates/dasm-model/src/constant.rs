//! User-defined symbolic constants.
//!
//! The table is a fixed `COLS x ROWS` grid of nullable names with a parallel
//! grid of nullable comments. Almost every slot is empty, so both grids are
//! stored sparsely; an absent key is the null value.
//!
//! The grid grew over time, first in rows and then in columns, which is why
//! project files carry it as several rectangular slices:
//!
//! ```text
//!            rows 0..MIN_ROWS     rows MIN_ROWS..ROWS
//! cols 0..MIN_COLS    [slice 1]            [slice 2]
//! cols MIN_COLS..COLS          [slice 3, all rows]
//! ```

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Number of constant columns.
pub const COLS: usize = 20;
/// Number of rows per column.
pub const ROWS: usize = 0x10000;
/// Columns present before the table was widened.
pub const MIN_COLS: usize = 10;
/// Rows present before the table was lengthened.
pub const MIN_ROWS: usize = 256;

/// A rectangular region of the constant grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub columns: Range<usize>,
    pub rows: Range<usize>,
}

impl Slice {
    pub const fn new(columns: Range<usize>, rows: Range<usize>) -> Self {
        Self { columns, rows }
    }

    /// Iterate the slice column-major, as it is laid out on disk.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns
            .clone()
            .flat_map(move |column| self.rows.clone().map(move |row| (column, row)))
    }

    /// Number of cells in the slice.
    pub fn len(&self) -> usize {
        self.columns.len() * self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The original `MIN_COLS x MIN_ROWS` block.
pub static NAME_SLICE_BASE: Slice = Slice::new(0..MIN_COLS, 0..MIN_ROWS);
/// Rows added to the original columns.
pub static NAME_SLICE_ROWS: Slice = Slice::new(0..MIN_COLS, MIN_ROWS..ROWS);
/// Columns added later, all rows.
pub static NAME_SLICE_COLUMNS: Slice = Slice::new(MIN_COLS..COLS, 0..ROWS);
/// The whole grid, used for the comment table.
pub static FULL_SLICE: Slice = Slice::new(0..COLS, 0..ROWS);

/// Constant names and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConstantSnapshot", into = "ConstantSnapshot")]
pub struct Constant {
    table: BTreeMap<(usize, usize), String>,
    comment: BTreeMap<(usize, usize), String>,
}

impl Constant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name stored at (`column`, `row`), if any.
    pub fn get(&self, column: usize, row: usize) -> Option<&str> {
        self.table.get(&(column, row)).map(String::as_str)
    }

    /// Store or clear the name at (`column`, `row`).
    pub fn set(&mut self, column: usize, row: usize, value: Option<String>) -> Result<()> {
        check_bounds(column, row)?;
        put(&mut self.table, (column, row), value);
        Ok(())
    }

    /// Comment stored at (`column`, `row`), if any.
    pub fn comment(&self, column: usize, row: usize) -> Option<&str> {
        self.comment.get(&(column, row)).map(String::as_str)
    }

    /// Store or clear the comment at (`column`, `row`).
    pub fn set_comment(&mut self, column: usize, row: usize, value: Option<String>) -> Result<()> {
        check_bounds(column, row)?;
        put(&mut self.comment, (column, row), value);
        Ok(())
    }

    /// All rows of one name column, nulls included.
    pub fn column(&self, column: usize) -> Result<Vec<Option<String>>> {
        check_bounds(column, 0)?;
        Ok((0..ROWS)
            .map(|row| self.get(column, row).map(str::to_string))
            .collect())
    }

    /// Overwrite one name column in place with `values`.
    ///
    /// `values` must hold exactly [`ROWS`] entries.
    pub fn replace_column(&mut self, column: usize, values: Vec<Option<String>>) -> Result<()> {
        check_bounds(column, 0)?;
        if values.len() != ROWS {
            return Err(ModelError::ColumnLength {
                expected: ROWS,
                actual: values.len(),
            });
        }
        self.table.retain(|&(col, _), _| col != column);
        for (row, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                self.table.insert((column, row), value);
            }
        }
        Ok(())
    }

    /// Number of non-null names.
    pub fn name_count(&self) -> usize {
        self.table.len()
    }

    /// Number of non-null comments.
    pub fn comment_count(&self) -> usize {
        self.comment.len()
    }

}

fn check_bounds(column: usize, row: usize) -> Result<()> {
    if column >= COLS || row >= ROWS {
        return Err(ModelError::CellOutOfRange { column, row });
    }
    Ok(())
}

fn put(map: &mut BTreeMap<(usize, usize), String>, key: (usize, usize), value: Option<String>) {
    match value {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

/// Sparse interchange form of [`Constant`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstantSnapshot {
    #[serde(default)]
    pub table: Vec<ConstantEntry>,
    #[serde(default)]
    pub comment: Vec<ConstantEntry>,
}

/// One non-null slot of the constant grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantEntry {
    pub column: usize,
    pub row: usize,
    pub value: String,
}

impl From<Constant> for ConstantSnapshot {
    fn from(constant: Constant) -> Self {
        let entries = |map: BTreeMap<(usize, usize), String>| -> Vec<ConstantEntry> {
            map.into_iter()
                .map(|((column, row), value)| ConstantEntry { column, row, value })
                .collect()
        };
        Self {
            table: entries(constant.table),
            comment: entries(constant.comment),
        }
    }
}

impl TryFrom<ConstantSnapshot> for Constant {
    type Error = ModelError;

    fn try_from(snapshot: ConstantSnapshot) -> Result<Self> {
        let mut constant = Constant::new();
        for entry in snapshot.table {
            constant.set(entry.column, entry.row, Some(entry.value))?;
        }
        for entry in snapshot.comment {
            constant.set_comment(entry.column, entry.row, Some(entry.value))?;
        }
        Ok(constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut constant = Constant::new();
        constant.set(3, 0x100, Some("BORDER".into())).unwrap();
        assert_eq!(constant.get(3, 0x100), Some("BORDER"));
        constant.set(3, 0x100, None).unwrap();
        assert_eq!(constant.get(3, 0x100), None);
        assert_eq!(constant.name_count(), 0);
    }

    #[test]
    fn test_empty_string_is_not_null() {
        let mut constant = Constant::new();
        constant.set_comment(0, 0, Some(String::new())).unwrap();
        assert_eq!(constant.comment(0, 0), Some(""));
    }

    #[test]
    fn test_bounds() {
        let mut constant = Constant::new();
        assert!(constant.set(COLS, 0, Some("X".into())).is_err());
        assert!(constant.set(0, ROWS, Some("X".into())).is_err());
        assert!(constant.column(COLS).is_err());
    }

    #[test]
    fn test_slices_tile_the_grid() {
        let names = NAME_SLICE_BASE.len() + NAME_SLICE_ROWS.len() + NAME_SLICE_COLUMNS.len();
        assert_eq!(names, COLS * ROWS);
        assert_eq!(FULL_SLICE.len(), COLS * ROWS);
        let first: Vec<_> = NAME_SLICE_BASE.cells().take(2).collect();
        assert_eq!(first, vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_replace_column() {
        let mut constant = Constant::new();
        constant.set(2, 5, Some("OLD".into())).unwrap();
        constant.set(3, 5, Some("KEEP".into())).unwrap();
        let mut values = vec![None; ROWS];
        values[7] = Some("NEW".to_string());
        constant.replace_column(2, values).unwrap();
        assert_eq!(constant.get(2, 5), None);
        assert_eq!(constant.get(2, 7), Some("NEW"));
        assert_eq!(constant.get(3, 5), Some("KEEP"));
        assert!(constant.replace_column(2, vec![None; 3]).is_err());
    }

    #[test]
    fn test_column_keeps_nulls() {
        let mut constant = Constant::new();
        constant.set(3, 0xd020, Some("BORDER".into())).unwrap();
        constant.set(4, 0xd020, Some("OTHER".into())).unwrap();
        let column = constant.column(3).unwrap();
        assert_eq!(column.len(), ROWS);
        assert_eq!(column[0xd020].as_deref(), Some("BORDER"));
        assert_eq!(column.iter().flatten().count(), 1);
    }
}
