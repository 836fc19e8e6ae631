use crate::cli::Cli;
use crate::summary::{SummaryContext, print_summary};
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use pefunds::export::save_presets_csv;
use pefunds::report::write_presets;
use pefunds::sources::{CALPERS_DATA, SourceKind, SourceOutput, load_source};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{Level, info};

mod cli;
mod summary;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let run_started_at = Local::now();

    let text = read_input(cli.source, cli.input.as_deref())?;
    let output = load_source(cli.source, &text, cli.limit)?;
    info!(
        source = %cli.source,
        exported = output.presets.len(),
        rejected = output.rejected.len(),
        "parsed fund table"
    );

    report_rejected(&output);
    emit(&output)?;

    let csv_path = match cli.save_csv.as_deref() {
        Some(path) => {
            let written =
                save_presets_csv(path, output.kind, &output.presets, cli.archive_csv)?;
            info!(path = %written.display(), "saved fund CSV");
            Some(written)
        }
        None => None,
    };

    if !cli.no_summary {
        print_summary(&SummaryContext {
            output: &output,
            input: cli.input.as_deref(),
            csv: csv_path.as_deref(),
            run_started_at: &run_started_at,
        });
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_input(kind: SourceKind, path: Option<&Path>) -> Result<Cow<'static, str>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "loaded input");
            Ok(Cow::Owned(text))
        }
        None if kind.has_embedded_data() => Ok(Cow::Borrowed(CALPERS_DATA)),
        None => Err(anyhow!(
            "the {kind} source has no embedded data; pass --input <FILE>"
        )),
    }
}

/// One stderr line per input line that had enough columns but did not convert.
fn report_rejected(output: &SourceOutput) {
    for rejected in &output.rejected {
        eprintln!("{} {}", "Error parsing".bright_red().bold(), rejected);
    }
}

fn emit(output: &SourceOutput) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_presets(&mut stdout, output.kind, &output.presets)
        .context("failed to write fund literals")?;
    stdout.flush().context("failed to flush fund literals")
}
