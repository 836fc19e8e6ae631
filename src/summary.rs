use chrono::{DateTime, Local};
use colored::Colorize;
use pefunds::FundPreset;
use pefunds::sources::{SourceOutput, StageCount};
use std::path::Path;

const TOP_FUNDS: usize = 5;

pub struct SummaryContext<'a> {
    pub(crate) output: &'a SourceOutput,
    pub(crate) input: Option<&'a Path>,
    pub(crate) csv: Option<&'a Path>,
    pub(crate) run_started_at: &'a DateTime<Local>,
}

/// Prints the run summary to stderr; stdout carries only the literals.
pub fn print_summary(context: &SummaryContext<'_>) {
    eprintln!();
    print_summary_header(context);
    print_stage_line(&context.output.stages);
    print_path_line("Input", context.input, "embedded table");
    print_path_line("CSV", context.csv, "not saved (use --save-csv)");
    eprintln!();
    eprintln!("{}", "Top funds by TVPI".bold().bright_magenta());
    let table_width = print_top_funds(&context.output.presets);
    if table_width > 0 {
        eprintln!("{}", "=".repeat(table_width).bright_cyan());
    }
}

fn print_summary_header(context: &SummaryContext<'_>) {
    let kind = context.output.kind;
    eprintln!(
        "{}",
        format!("==================== {kind} Preset Export ====================")
            .bold()
            .bright_cyan()
    );
    eprintln!(
        "{} {}",
        "Run started".bright_yellow().bold(),
        context
            .run_started_at
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
            .bright_white()
    );
    if let Some(as_of) = kind.as_of() {
        eprintln!(
            "{} {}",
            "Data as of".bright_yellow().bold(),
            as_of.format("%Y-%m-%d").to_string().bright_white()
        );
    }
}

fn print_stage_line(stages: &[StageCount]) {
    let parts: Vec<String> = stages
        .iter()
        .map(|stage| format!("{}: {}", stage.label, stage.count))
        .collect();
    eprintln!(
        "{} {}",
        "Stages".bright_yellow().bold(),
        parts.join(" | ").bright_white()
    );
}

fn print_path_line(label: &str, path: Option<&Path>, hint: &str) {
    let label_colored = label.bright_yellow().bold();
    match path {
        Some(path) => eprintln!(
            "{} {}",
            label_colored,
            format!("{}", path.display()).bright_white()
        ),
        None => eprintln!("{} {}", label_colored, hint.bright_black()),
    }
}

fn print_top_funds(presets: &[FundPreset]) -> usize {
    if presets.is_empty() {
        let message = "No funds survived filtering.";
        eprintln!("{}", message.bright_black());
        return message.len();
    }

    let header = format!(
        "{:>3} | {:<48} | {:>7} | {:>8} | {:>6}",
        "Pos", "Fund", "Vintage", "Multiple", "IRR%"
    );
    let separator = "----+--------------------------------------------------+---------+----------+-------";
    let mut max_width = header.len().max(separator.len());
    eprintln!("{}", header.bold().bright_white());
    eprintln!("{}", separator.bright_black());

    for (position, preset) in presets.iter().take(TOP_FUNDS).enumerate() {
        let irr = preset
            .irr
            .map_or_else(|| "-".to_string(), |value| format!("{value:.1}"));
        let line = format!(
            "{:>3} | {:<48} | {:>7} | {:>7.2}x | {:>6}",
            position + 1,
            truncate_name(&preset.fund_name, 48),
            preset.vintage,
            preset.multiple,
            irr
        );
        max_width = max_width.max(line.len());
        eprintln!("{}", line.bright_green());
    }
    if presets.len() > TOP_FUNDS {
        let message = format!(
            "... {} more funds in the exported literals.",
            presets.len() - TOP_FUNDS
        );
        max_width = max_width.max(message.len());
        eprintln!("{}", message.bright_black());
    }

    max_width
}

fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut out: String = name.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
