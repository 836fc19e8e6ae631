use crate::{FundPreset, FundSize};
use tracing::debug;

use super::{
    FieldError, RejectedLine, StageCount, parse_money, parse_percent, round_to_cents,
    split_columns,
};

/// CalPERS PEP fund performance table, as of March 31, 2025.
pub const CALPERS_DATA: &str = include_str!("../../data/calpers_pe_2025q1.txt");

const MIN_FIELDS: usize = 7;
/// Multiples above this are treated as transcription errors.
pub const MAX_MULTIPLE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FundRecord {
    pub fund_name: String,
    pub vintage_year: i32,
    pub committed_capital: f64,
    pub cumulative_contributions: f64,
    pub cumulative_distributions: f64,
    pub remaining_value: f64,
    pub reported_irr: Option<f64>,
    pub gross_return_multiple: f64,
}

impl FundRecord {
    pub fn to_preset(&self) -> FundPreset {
        FundPreset {
            fund_name: self.fund_name.clone(),
            vintage: self.vintage_year,
            size: FundSize::Reported(self.committed_capital / 1_000_000.0),
            multiple: self.gross_return_multiple,
            irr: self.reported_irr,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub short_lines: usize,
    pub rejected: usize,
    pub no_contributions: usize,
    pub outliers: usize,
    pub accepted: usize,
}

impl ParseStats {
    pub fn stages(&self) -> Vec<StageCount> {
        vec![
            StageCount::new("Lines", self.lines),
            StageCount::new("Short", self.short_lines),
            StageCount::new("Rejected", self.rejected),
            StageCount::new("No cash in", self.no_contributions),
            StageCount::new("Outliers", self.outliers),
            StageCount::new("Accepted", self.accepted),
        ]
    }
}

#[derive(Debug, Default)]
pub struct CalpersReport {
    pub records: Vec<FundRecord>,
    pub rejected: Vec<RejectedLine>,
    pub stats: ParseStats,
}

enum LineOutcome {
    Accepted(FundRecord),
    NoContributions,
    Outlier(f64),
}

/// Parses the wide-padded CalPERS table. Records come back in input order.
pub fn parse_calpers(text: &str) -> CalpersReport {
    let body = text.trim();
    let leading = &text[..text.len() - text.trim_start().len()];
    let first_line = leading.matches('\n').count() + 1;

    let mut report = CalpersReport::default();
    for (offset, line) in body.lines().enumerate() {
        let line_number = first_line + offset;
        report.stats.lines += 1;

        let fields = split_columns(line);
        if fields.len() < MIN_FIELDS {
            debug!(line_number, fields = fields.len(), "skipping short line");
            report.stats.short_lines += 1;
            continue;
        }

        match parse_fields(&fields) {
            Ok(LineOutcome::Accepted(record)) => {
                report.stats.accepted += 1;
                report.records.push(record);
            }
            Ok(LineOutcome::NoContributions) => {
                debug!(line_number, fund = fields[0], "no contributions yet");
                report.stats.no_contributions += 1;
            }
            Ok(LineOutcome::Outlier(multiple)) => {
                debug!(line_number, fund = fields[0], multiple, "dropping outlier");
                report.stats.outliers += 1;
            }
            Err(error) => {
                report.stats.rejected += 1;
                report.rejected.push(RejectedLine {
                    line_number,
                    raw: line.to_string(),
                    error,
                });
            }
        }
    }
    report
}

fn parse_fields(fields: &[&str]) -> Result<LineOutcome, FieldError> {
    let fund_name = fields[0];
    let vintage_year = fields[1]
        .parse::<i32>()
        .map_err(|source| FieldError::Vintage {
            value: fields[1].to_string(),
            source,
        })?;
    let committed_capital = money(fields[2], "committed")?;
    let cumulative_contributions = money(fields[3], "cash in")?;
    let cumulative_distributions = money(fields[4], "cash out")?;
    let remaining_value = money(fields[5], "remaining value")?;

    if cumulative_contributions.is_nan() || cumulative_contributions <= 0.0 {
        return Ok(LineOutcome::NoContributions);
    }
    let multiple = remaining_value / cumulative_contributions;
    // Written-down, negative and NaN multiples are all out of bounds.
    let in_bounds = multiple > 0.0 && multiple <= MAX_MULTIPLE;
    if !in_bounds {
        return Ok(LineOutcome::Outlier(multiple));
    }

    let reported_irr = parse_percent(fields[6]).map_err(|source| FieldError::Percent {
        value: fields[6].to_string(),
        source,
    })?;

    Ok(LineOutcome::Accepted(FundRecord {
        fund_name: fund_name.to_string(),
        vintage_year,
        committed_capital,
        cumulative_contributions,
        cumulative_distributions,
        remaining_value,
        reported_irr,
        gross_return_multiple: round_to_cents(multiple),
    }))
}

fn money(value: &str, column: &'static str) -> Result<f64, FieldError> {
    parse_money(value).map_err(|source| FieldError::Currency {
        column,
        value: value.to_string(),
        source,
    })
}
