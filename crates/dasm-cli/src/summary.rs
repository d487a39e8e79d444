//! Terminal tables.

use std::path::{Path, PathBuf};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dasm_model::{FileType, Project, TargetType};
use dasm_store::{Completion, sha256_hex};

/// What `dasm info` reports about one project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub path: PathBuf,
    /// SHA-256 of the project file as stored on disk.
    pub file_digest: String,
    pub version: u8,
    pub name: String,
    pub source_file: String,
    pub file_type: FileType,
    pub target_type: TargetType,
    pub input_len: usize,
    /// SHA-256 of the program image, lowercase hex.
    pub input_digest: String,
    pub load_address: Option<u16>,
    pub inside_cells: usize,
    pub labelled_cells: usize,
    pub constant_names: usize,
    pub constant_comments: usize,
    pub relocates: usize,
    pub patches: usize,
    pub freezes: usize,
    pub bin_address: i32,
    pub completion: Completion,
}

impl ProjectSummary {
    pub fn new(
        path: &Path,
        file_digest: String,
        version: u8,
        project: &Project,
        completion: Completion,
    ) -> Self {
        let load_address = if project.file_type == FileType::Prg {
            project.header_load_address()
        } else {
            None
        };
        Self {
            path: path.to_path_buf(),
            file_digest,
            version,
            name: project.name.clone(),
            source_file: project.source_file.clone(),
            file_type: project.file_type,
            target_type: project.target_type,
            input_len: project.input_bytes.len(),
            input_digest: sha256_hex(&project.input_bytes),
            load_address,
            inside_cells: project.memory.inside_count(),
            labelled_cells: project.memory.iter().filter(|c| c.has_location()).count(),
            constant_names: project.constant.name_count(),
            constant_comments: project.constant.comment_count(),
            relocates: project.relocates.len(),
            patches: project.patches.len(),
            freezes: project.freezes.len(),
            bin_address: project.bin_address,
            completion,
        }
    }
}

pub fn print_info(summary: &ProjectSummary) {
    println!("Project: {}", summary.path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);

    let or_dash = |text: &str| {
        if text.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(text)
        }
    };
    table.add_row(vec![Cell::new("Format version"), Cell::new(summary.version)]);
    table.add_row(vec![Cell::new("File SHA-256"), Cell::new(&summary.file_digest)]);
    table.add_row(vec![Cell::new("Name"), or_dash(&summary.name)]);
    table.add_row(vec![Cell::new("Source file"), or_dash(&summary.source_file)]);
    table.add_row(vec![Cell::new("File type"), Cell::new(summary.file_type)]);
    table.add_row(vec![Cell::new("Target"), Cell::new(summary.target_type)]);
    table.add_row(vec![
        Cell::new("Image size"),
        Cell::new(format!("{} bytes", summary.input_len)),
    ]);
    table.add_row(vec![Cell::new("Image SHA-256"), Cell::new(&summary.input_digest)]);
    table.add_row(vec![
        Cell::new("Load address"),
        match summary.load_address {
            Some(address) => Cell::new(format!("${address:04X}")),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![Cell::new("Cells inside image"), Cell::new(summary.inside_cells)]);
    table.add_row(vec![Cell::new("Labelled cells"), Cell::new(summary.labelled_cells)]);
    table.add_row(vec![
        Cell::new("Constants"),
        Cell::new(format!(
            "{} names, {} comments",
            summary.constant_names, summary.constant_comments
        )),
    ]);
    table.add_row(vec![Cell::new("Relocations"), Cell::new(summary.relocates)]);
    table.add_row(vec![Cell::new("Patches"), Cell::new(summary.patches)]);
    table.add_row(vec![Cell::new("Freezes"), Cell::new(summary.freezes)]);
    table.add_row(vec![
        Cell::new("Binary address"),
        Cell::new(format!("${:04X}", summary.bin_address)),
    ]);
    table.add_row(vec![Cell::new("Progress"), completion_cell(summary.completion)]);
    println!("{table}");
}

pub fn print_progress(rows: &[(PathBuf, Completion)]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Project"), header_cell("Progress")]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (path, completion) in rows {
        table.add_row(vec![
            Cell::new(path.display()),
            completion_cell(*completion),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn completion_cell(completion: Completion) -> Cell {
    match completion.percent() {
        Some(100) => Cell::new(completion).fg(Color::Green),
        Some(_) => Cell::new(completion).fg(Color::Yellow),
        None => dim_cell(completion),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
