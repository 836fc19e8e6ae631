pub mod calpers;
pub mod opers;

pub use calpers::{CALPERS_DATA, FundRecord, parse_calpers};
pub use opers::{OpersRow, parse_opers};

use crate::FundPreset;
use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use std::cmp::Ordering;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Minimum whitespace run treated as a column boundary.
pub const MIN_DELIMITER_RUN: usize = 4;

pub const DEFAULT_OPERS_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// CalPERS private equity program fund performance review.
    Calpers,
    /// Oregon PERF private equity portfolio CSV export.
    Opers,
}

impl SourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Calpers => "CalPERS",
            Self::Opers => "OPERS",
        }
    }

    pub const fn url(self) -> &'static str {
        match self {
            Self::Calpers => {
                "https://www.calpers.ca.gov/investments/about-investment-office/investment-organization/pep-fund-performance-print"
            }
            Self::Opers => "https://www.opers.org/investments/",
        }
    }

    /// Reporting date of the disclosure the source mirrors.
    pub fn as_of(self) -> Option<NaiveDate> {
        match self {
            Self::Calpers => NaiveDate::from_ymd_opt(2025, 3, 31),
            Self::Opers => NaiveDate::from_ymd_opt(2024, 9, 30),
        }
    }

    /// Whether the source ships with the binary.
    pub const fn has_embedded_data(self) -> bool {
        matches!(self, Self::Calpers)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("invalid vintage year {value:?}")]
    Vintage {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid {column} amount {value:?}")]
    Currency {
        column: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("invalid percentage {value:?}")]
    Percent {
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

/// An input line that had enough columns but could not be converted.
#[derive(Debug)]
pub struct RejectedLine {
    pub line_number: usize,
    pub raw: String,
    pub error: FieldError,
}

impl fmt::Display for RejectedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ({}): {}", self.line_number, self.error, self.raw)
    }
}

/// Everything a source produced, ready for the emitter.
#[derive(Debug)]
pub struct SourceOutput {
    pub kind: SourceKind,
    pub presets: Vec<FundPreset>,
    pub rejected: Vec<RejectedLine>,
    pub stages: Vec<StageCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCount {
    pub label: &'static str,
    pub count: usize,
}

impl StageCount {
    pub const fn new(label: &'static str, count: usize) -> Self {
        Self { label, count }
    }
}

pub fn load_source(kind: SourceKind, text: &str, limit: usize) -> Result<SourceOutput> {
    let output = match kind {
        SourceKind::Calpers => {
            let report = parse_calpers(text);
            let stages = report.stats.stages();
            let mut presets: Vec<FundPreset> =
                report.records.iter().map(FundRecord::to_preset).collect();
            sort_by_multiple(&mut presets);
            SourceOutput {
                kind,
                presets,
                rejected: report.rejected,
                stages,
            }
        }
        SourceKind::Opers => {
            let report = parse_opers(text)?;
            let mut stages = report.stats.stages();
            let mut presets = report.presets;
            sort_by_multiple(&mut presets);
            presets.truncate(limit);
            stages.push(StageCount::new("Exported", presets.len()));
            SourceOutput {
                kind,
                presets,
                rejected: Vec::new(),
                stages,
            }
        }
    };
    Ok(output)
}

/// Highest multiple first; ties keep their input order.
pub fn sort_by_multiple(presets: &mut [FundPreset]) {
    presets.sort_by(|a, b| b.multiple.partial_cmp(&a.multiple).unwrap_or(Ordering::Equal));
}

/// Splits a line on runs of [`MIN_DELIMITER_RUN`] or more whitespace characters.
///
/// Fields are trimmed. Leading or trailing runs produce empty fields, so a
/// padded line still reports its true column count.
pub fn split_columns(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut field_start = 0;
    let mut run_start: Option<usize> = None;
    let mut run_len = 0;

    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            run_start.get_or_insert(idx);
            run_len += 1;
            continue;
        }
        if let Some(start) = run_start.take() {
            if run_len >= MIN_DELIMITER_RUN {
                fields.push(line[field_start..start].trim());
                field_start = idx;
            }
        }
        run_len = 0;
    }

    if let Some(start) = run_start {
        if run_len >= MIN_DELIMITER_RUN {
            fields.push(line[field_start..start].trim());
            field_start = line.len();
        }
    }
    fields.push(line[field_start..].trim());
    fields
}

/// Parses `$1,234,567` style amounts. Empty and `$0` are zero.
pub fn parse_money(value: &str) -> Result<f64, ParseFloatError> {
    if value.is_empty() || value == "$0" {
        return Ok(0.0);
    }
    value.replace(['$', ','], "").trim().parse::<f64>()
}

/// Parses `12.8%` into `12.8`. `N/M` anywhere in the field means not meaningful.
pub fn parse_percent(value: &str) -> Result<Option<f64>, ParseFloatError> {
    if value.is_empty() || value.contains("N/M") {
        return Ok(None);
    }
    value.replace('%', "").trim().parse::<f64>().map(Some)
}

/// Rounds to 2 decimals from the exact binary value, so a true tie such as
/// `1.125` goes to the even digit (`1.12`) and `2.675` (stored just below the
/// tie) goes down to `2.67`.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FundSize;

    #[test]
    fn splits_on_wide_runs_only() {
        let fields = split_columns("Clayton, Dubilier & Rice  Fund X    2018    $150,000,000");
        assert_eq!(
            fields,
            vec!["Clayton, Dubilier & Rice  Fund X", "2018", "$150,000,000"]
        );
    }

    #[test]
    fn keeps_footnote_markers_inside_a_field() {
        let fields = split_columns("Fund    2022    12.6% 1    1");
        assert_eq!(fields, vec!["Fund", "2022", "12.6% 1", "1"]);
    }

    #[test]
    fn padded_edges_yield_empty_fields() {
        assert_eq!(split_columns("    a"), vec!["", "a"]);
        assert_eq!(split_columns("a     "), vec!["a", ""]);
        assert_eq!(split_columns(""), vec![""]);
    }

    #[test]
    fn tabs_count_as_whitespace() {
        assert_eq!(split_columns("a\t\t\t\tb"), vec!["a", "b"]);
        assert_eq!(split_columns("a\tb"), vec!["a\tb"]);
    }

    #[test]
    fn money_sentinels_are_zero() {
        assert_eq!(parse_money("$0"), Ok(0.0));
        assert_eq!(parse_money(""), Ok(0.0));
        assert_eq!(parse_money("$1,006,375,016"), Ok(1_006_375_016.0));
        assert!(parse_money("$12,abc").is_err());
        assert_eq!(parse_money("$ 1,000"), Ok(1_000.0));
        assert_eq!(parse_money(" $250 "), Ok(250.0));
    }

    #[test]
    fn percent_keeps_natural_scale() {
        assert_eq!(parse_percent("12.8%"), Ok(Some(12.8)));
        assert_eq!(parse_percent("-22.7%"), Ok(Some(-22.7)));
        assert_eq!(parse_percent("N/M"), Ok(None));
        assert_eq!(parse_percent("N/M 1"), Ok(None));
        assert_eq!(parse_percent(""), Ok(None));
        assert!(parse_percent("12.6% 1").is_err());
    }

    #[test]
    fn rounds_ties_to_even() {
        assert!((round_to_cents(1.5) - 1.5).abs() < f64::EPSILON);
        assert!((round_to_cents(3.918_4) - 3.92).abs() < f64::EPSILON);
        assert!((round_to_cents(0.004) - 0.0).abs() < f64::EPSILON);
        assert!((round_to_cents(1.125) - 1.12).abs() < f64::EPSILON);
        assert!((round_to_cents(0.375) - 0.38).abs() < f64::EPSILON);
        assert!((round_to_cents(2.675) - 2.67).abs() < f64::EPSILON);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let preset = |name: &str, multiple: f64| FundPreset {
            fund_name: name.to_string(),
            vintage: 2020,
            size: FundSize::Reported(1.0),
            multiple,
            irr: None,
        };
        let mut presets = vec![
            preset("a", 1.2),
            preset("b", 2.5),
            preset("c", 1.2),
            preset("d", 3.0),
        ];
        sort_by_multiple(&mut presets);
        let names: Vec<&str> = presets.iter().map(|p| p.fund_name.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn header_only_opers_csv_is_empty() {
        let output = load_source(SourceKind::Opers, "header\n", DEFAULT_OPERS_LIMIT)
            .expect("header-only csv parses");
        assert!(output.presets.is_empty());
        assert!(output.rejected.is_empty());
    }
}
