//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use dasm_model::{FileType, TargetType};

#[derive(Parser)]
#[command(
    name = "dasm",
    version,
    about = "Inspect and convert 6502 disassembler project files",
    long_about = "Inspect and convert 6502 disassembler project files.\n\n\
                  Reads every project format version from 0 to the current one, plain or\n\
                  gzip-compressed, and always writes compressed files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file to use instead of the platform default.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a summary of a project file.
    Info {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },

    /// Show labelling progress without loading the whole project.
    Progress {
        #[arg(value_name = "PROJECT", required = true)]
        projects: Vec<PathBuf>,
    },

    /// Export a project as JSON.
    ToJson {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// Output file (default: stdout).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Build a project file from JSON.
    FromJson {
        #[arg(value_name = "JSON")]
        json: PathBuf,

        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },

    /// Create a project from a program image.
    New(NewArgs),

    /// Rewrite a project at the current format version.
    Upgrade(RewriteArgs),

    /// Rewrite a project at an older format version.
    ///
    /// Fields introduced after that version are dropped.
    Downgrade {
        #[command(flatten)]
        rewrite: RewriteArgs,

        /// Target format version.
        #[arg(long = "version", value_name = "N")]
        target_version: u8,
    },

    /// Write one constant column to a constant file.
    ExportConstants(ConstantArgs),

    /// Replace one constant column from a constant file.
    ImportConstants(ConstantArgs),

    /// Write the program image stored in a project to a raw file.
    ExtractInput {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

#[derive(Parser)]
pub struct NewArgs {
    /// Program image to disassemble.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Project file to create.
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Project name (default: image file name).
    #[arg(long)]
    pub name: Option<String>,

    /// Container kind of the image (UND, PRG, SID, ...).
    #[arg(long = "file-type", default_value = "PRG")]
    pub file_type: FileType,

    /// Target machine (C64, C1541, C128, VIC20, PLUS4).
    #[arg(long, default_value = "C64")]
    pub target: TargetType,
}

#[derive(Parser)]
pub struct RewriteArgs {
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Write to this file instead of replacing the project.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConstantArgs {
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Constant column, 0 to 19.
    #[arg(long)]
    pub column: usize,

    /// Constant file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
