//! Command implementations.
//!
//! Each command takes a configured [`ProjectStore`] and plain paths so it can
//! be driven from tests without argument parsing.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use dasm_model::{COLS, FileType, Project, TargetType};
use dasm_store::{CURRENT_VERSION, Completion, ProjectStore, compute_file_hash};

use crate::summary::ProjectSummary;

/// Options for creating a project from a program image.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub image: PathBuf,
    pub output: PathBuf,
    /// Defaults to the image file stem.
    pub name: Option<String>,
    pub file_type: FileType,
    pub target_type: TargetType,
}

pub fn run_info(store: &ProjectStore, path: &Path) -> Result<ProjectSummary> {
    let (version, project) = store
        .load_with_version(path)
        .with_context(|| format!("load {}", path.display()))?;
    let completion = store
        .read_completion(path)
        .with_context(|| format!("estimate progress of {}", path.display()))?;
    let file_digest = compute_file_hash(path)?;
    Ok(ProjectSummary::new(path, file_digest, version, &project, completion))
}

pub fn run_progress(store: &ProjectStore, paths: &[PathBuf]) -> Result<Vec<(PathBuf, Completion)>> {
    paths
        .iter()
        .map(|path| {
            let completion = store
                .read_completion(path)
                .with_context(|| format!("estimate progress of {}", path.display()))?;
            Ok((path.clone(), completion))
        })
        .collect()
}

/// Write a project as JSON to `output`, or to stdout when `None`.
pub fn run_to_json(store: &ProjectStore, path: &Path, output: Option<&Path>) -> Result<()> {
    let project = store
        .load(path)
        .with_context(|| format!("load {}", path.display()))?;
    let json = serde_json::to_string_pretty(&project).context("serialize project")?;
    match output {
        Some(output) => store
            .write_text_file(output, &json)
            .with_context(|| format!("write {}", output.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Read a JSON project and save it as a project file.
pub fn run_from_json(store: &ProjectStore, json: &Path, output: &Path) -> Result<()> {
    let text = fs::read_to_string(json).with_context(|| format!("read {}", json.display()))?;
    let project: Project =
        serde_json::from_str(&text).with_context(|| format!("parse {}", json.display()))?;
    store
        .save(output, &project)
        .with_context(|| format!("save {}", output.display()))?;
    info!(from = %json.display(), to = %output.display(), "Converted JSON project");
    Ok(())
}

/// Create a project around a program image.
///
/// PRG images mark the cells covered by the image, starting at the load
/// address in their first two bytes.
pub fn run_new(store: &ProjectStore, args: &NewProject) -> Result<Project> {
    let image = store
        .read_input_file(&args.image)
        .with_context(|| format!("read {}", args.image.display()))?;

    let mut project = Project::new();
    project.name = args.name.clone().unwrap_or_else(|| {
        args.image
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    project.source_file = args.image.display().to_string();
    project.file_type = args.file_type;
    project.target_type = args.target_type;
    project.set_input(image);

    if project.file_type == FileType::Prg
        && let Some(load_address) = project.header_load_address()
    {
        let body_len = project.input_bytes.len() - 2;
        project.memory.mark_inside(usize::from(load_address), body_len);
        project.bin_address = i32::from(load_address);
    }

    store
        .save(&args.output, &project)
        .with_context(|| format!("save {}", args.output.display()))?;
    Ok(project)
}

/// Rewrite a project at `version`, in place or to `output`.
///
/// Returns the version the file had before.
pub fn run_rewrite(
    store: &ProjectStore,
    path: &Path,
    output: Option<&Path>,
    version: u8,
) -> Result<u8> {
    if version > CURRENT_VERSION {
        bail!("format version {version} is newer than the supported {CURRENT_VERSION}");
    }
    let span = info_span!("rewrite", path = %path.display(), version);
    let _guard = span.enter();

    let (previous, project) = store
        .load_with_version(path)
        .with_context(|| format!("load {}", path.display()))?;
    let target = output.unwrap_or(path);
    store
        .save_as_version(target, &project, version)
        .with_context(|| format!("save {}", target.display()))?;
    if version < previous {
        info!(from = previous, to = version, "Fields newer than the target version were dropped");
    }
    Ok(previous)
}

pub fn run_export_constants(
    store: &ProjectStore,
    path: &Path,
    column: usize,
    output: &Path,
) -> Result<()> {
    check_column(column)?;
    let project = store
        .load(path)
        .with_context(|| format!("load {}", path.display()))?;
    store
        .export_constants(output, &project.constant, column)
        .with_context(|| format!("export column {column} to {}", output.display()))
}

/// Replace one constant column of a project from a constant file and save it.
pub fn run_import_constants(
    store: &ProjectStore,
    path: &Path,
    column: usize,
    input: &Path,
) -> Result<()> {
    check_column(column)?;
    let mut project = store
        .load(path)
        .with_context(|| format!("load {}", path.display()))?;
    store
        .import_constants(input, &mut project.constant, column)
        .with_context(|| format!("import column {column} from {}", input.display()))?;
    store
        .save(path, &project)
        .with_context(|| format!("save {}", path.display()))
}

/// Write the program image stored in a project back to a raw file.
pub fn run_extract_input(store: &ProjectStore, path: &Path, output: &Path) -> Result<usize> {
    let project = store
        .load(path)
        .with_context(|| format!("load {}", path.display()))?;
    if project.input_bytes.is_empty() {
        bail!("{} holds no program image", path.display());
    }
    store
        .write_binary_file(output, &project.input_bytes)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(project.input_bytes.len())
}

fn check_column(column: usize) -> Result<()> {
    if column >= COLS {
        bail!("constant column {column} is out of range (0..{COLS})");
    }
    Ok(())
}
