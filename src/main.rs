//! sheetfn - compile spreadsheet formulas into pure functions

mod cli;
mod config;
mod render;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use render::{RenderOptions, render_unit};
use sheetfn_core::{compile_workbook, open_workbook};
use sheetfn_engine::engine::{CellRange, Dialect};

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested sheet compiled.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let (file_config, warnings) = config::load_config(cli.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let (mut options, warnings) = file_config.compile_options(cli.dialect);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    if cli.min_cell.is_some() || cli.max_cell.is_some() {
        options.range = Some(CellRange::new(cli.min_cell, cli.max_cell));
    }
    if cli.run && options.dialect != Dialect::Rhai {
        anyhow::bail!("--run needs the rhai dialect (got {})", options.dialect);
    }

    let render_options = RenderOptions {
        include_test_code: cli.include_test_code || file_config.include_test_code.unwrap_or(false),
        run: cli.run,
    };

    let workbook = open_workbook(&cli.file)
        .with_context(|| format!("failed to open {}", cli.file.display()))?;

    let outcomes = compile_workbook(&workbook, &cli.selection(), &options);
    let mut all_ok = true;
    for outcome in outcomes {
        let rendered = outcome.result.map_err(anyhow::Error::from).and_then(|unit| {
            render_unit(&outcome.sheet, &unit, render_options).map_err(anyhow::Error::from)
        });
        match rendered {
            Ok(text) => print!("{}", text),
            Err(e) => {
                all_ok = false;
                eprintln!("Error processing sheet {}: {}", outcome.sheet, e);
            }
        }
    }
    Ok(all_ok)
}
