//! `dasm` command-line tool.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use dasm_cli::commands::{
    NewProject, run_export_constants, run_extract_input, run_from_json, run_import_constants,
    run_info, run_new, run_progress, run_rewrite, run_to_json,
};
use dasm_cli::logging::{LogConfig, LogFormat, init_logging};
use dasm_cli::settings::load_settings;
use dasm_cli::summary::{print_info, print_progress};
use dasm_store::{CURRENT_VERSION, ProjectStore};

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    let store = ProjectStore::new(settings.store)?;

    match cli.command {
        Command::Info { project } => {
            let summary = run_info(&store, &project)?;
            print_info(&summary);
        }
        Command::Progress { projects } => {
            let rows = run_progress(&store, &projects)?;
            print_progress(&rows);
        }
        Command::ToJson { project, output } => {
            run_to_json(&store, &project, output.as_deref())?;
        }
        Command::FromJson { json, project } => run_from_json(&store, &json, &project)?,
        Command::New(args) => {
            let new = NewProject {
                image: args.image,
                output: args.project,
                name: args.name,
                file_type: args.file_type,
                target_type: args.target,
            };
            let project = run_new(&store, &new)?;
            println!(
                "Created {} ({} bytes, {} cells inside the image)",
                new.output.display(),
                project.input_bytes.len(),
                project.memory.inside_count()
            );
        }
        Command::Upgrade(args) => {
            let previous =
                run_rewrite(&store, &args.project, args.output.as_deref(), CURRENT_VERSION)?;
            println!("Rewrote version {previous} as version {CURRENT_VERSION}");
        }
        Command::Downgrade {
            rewrite,
            target_version,
        } => {
            let previous =
                run_rewrite(&store, &rewrite.project, rewrite.output.as_deref(), target_version)?;
            println!("Rewrote version {previous} as version {target_version}");
        }
        Command::ExportConstants(args) => {
            run_export_constants(&store, &args.project, args.column, &args.file)?;
        }
        Command::ImportConstants(args) => {
            run_import_constants(&store, &args.project, args.column, &args.file)?;
        }
        Command::ExtractInput { project, output } => {
            let len = run_extract_input(&store, &project, &output)?;
            println!("Wrote {len} bytes to {}", output.display());
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
