use crate::{FundPreset, FundSize};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use tracing::debug;

use super::StageCount;

const MIN_COLUMNS: usize = 9;
const COL_VINTAGE: usize = 1;
const COL_PARTNERSHIP: usize = 2;
const COL_COMMITMENT: usize = 3;
const COL_TVPI: usize = 7;
const COL_IRR: usize = 8;

const STRONG_TVPI: f64 = 2.0;
const MAJOR_COMMITMENT: f64 = 200.0;

const WELL_KNOWN_FAMILIES: [&str; 20] = [
    "Apollo",
    "Blackstone",
    "KKR",
    "TPG",
    "Carlyle",
    "Advent",
    "Hellman",
    "Vista",
    "Thoma Bravo",
    "Silver Lake",
    "Francisco",
    "General Atlantic",
    "Tiger Global",
    "TCV",
    "BOND",
    "Warburg Pincus",
    "CVC",
    "Permira",
    "Apax",
    "Genstar",
];

/// A usable row of the OPERF private equity portfolio export. Amounts in $M.
#[derive(Debug, Clone, PartialEq)]
pub struct OpersRow {
    pub partnership: String,
    pub vintage_year: i32,
    pub commitment: f64,
    pub tvpi: f64,
    pub irr: Option<f64>,
}

impl OpersRow {
    /// Whether the fund makes the export cut.
    pub fn is_interesting(&self) -> bool {
        self.tvpi >= STRONG_TVPI
            || WELL_KNOWN_FAMILIES
                .iter()
                .any(|family| self.partnership.contains(family))
            || self.commitment >= MAJOR_COMMITMENT
    }

    pub fn to_preset(&self) -> FundPreset {
        FundPreset {
            fund_name: self.partnership.clone(),
            vintage: self.vintage_year,
            size: estimate_fund_size(&self.partnership, self.commitment),
            multiple: self.tvpi,
            irr: self.irr,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpersStats {
    pub rows: usize,
    pub skipped: usize,
    pub interesting: usize,
}

impl OpersStats {
    pub fn stages(&self) -> Vec<StageCount> {
        vec![
            StageCount::new("Rows", self.rows),
            StageCount::new("Skipped", self.skipped),
            StageCount::new("Interesting", self.interesting),
        ]
    }
}

#[derive(Debug, Default)]
pub struct OpersReport {
    pub presets: Vec<FundPreset>,
    pub stats: OpersStats,
}

pub fn parse_opers(text: &str) -> Result<OpersReport> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = OpersReport::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read OPERS row {}", idx + 2))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        report.stats.rows += 1;

        let Some(row) = parse_row(&record) else {
            debug!(row = idx + 2, "skipping OPERS row");
            report.stats.skipped += 1;
            continue;
        };
        if row.is_interesting() {
            report.stats.interesting += 1;
            report.presets.push(row.to_preset());
        }
    }
    Ok(report)
}

fn parse_row(record: &csv::StringRecord) -> Option<OpersRow> {
    if record.len() < MIN_COLUMNS {
        return None;
    }
    let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

    let partnership = cell(COL_PARTNERSHIP);
    if partnership.is_empty() || partnership == "Total" {
        return None;
    }
    let vintage_year = cell(COL_VINTAGE).parse::<i32>().ok()?;
    let commitment = cell(COL_COMMITMENT)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())?;
    let tvpi = cell(COL_TVPI)
        .replace('x', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())?;

    Some(OpersRow {
        partnership: partnership.to_string(),
        vintage_year,
        commitment,
        tvpi,
        irr: parse_irr(cell(COL_IRR)),
    })
}

/// `n.m.` marks a fund too young for a meaningful IRR.
fn parse_irr(value: &str) -> Option<f64> {
    if value == "n.m." {
        return None;
    }
    value
        .replace('%', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|irr| irr.is_finite())
}

/// Total fund size in $M: a published figure when known, otherwise the
/// commitment grossed up by the pension's typical ownership share.
pub fn estimate_fund_size(partnership: &str, commitment: f64) -> FundSize {
    let millions = known_fund_sizes().get(partnership).copied().unwrap_or_else(|| {
        let share = if commitment >= 300.0 {
            0.03
        } else if commitment >= 150.0 {
            0.045
        } else if commitment >= 75.0 {
            0.06
        } else {
            0.075
        };
        (commitment / share).round()
    });
    FundSize::Estimated {
        millions,
        commitment,
    }
}

fn known_fund_sizes() -> &'static FxHashMap<&'static str, f64> {
    static KNOWN_FUND_SIZES: OnceLock<FxHashMap<&'static str, f64>> = OnceLock::new();
    KNOWN_FUND_SIZES.get_or_init(|| {
        [
            ("Apollo Investment Fund IX", 24_700.0),
            ("Apollo Investment Fund VIII", 18_400.0),
            ("Blackstone Capital Partners VIII", 26_000.0),
            ("Blackstone Capital Partners VII", 17_600.0),
            ("Blackstone Capital Partners VI", 15_800.0),
            ("KKR North America Fund XI", 13_900.0),
            ("KKR Americas Fund XII", 13_900.0),
            ("KKR Americas Fund XIII", 17_000.0),
            ("Thoma Bravo Fund XIV", 22_800.0),
            ("Francisco Partners IV", 4_000.0),
            ("Francisco Partners V", 5_000.0),
            ("Francisco Partners VI", 6_500.0),
            ("Francisco Partners VII", 5_000.0),
            ("Hellman & Friedman Capital Partners IX", 16_000.0),
            ("Hellman & Friedman Capital Partners X", 24_300.0),
            ("TPG Partners VII", 13_500.0),
            ("TPG Partners VIII", 10_000.0),
            ("Vista Equity Partners Fund VI", 16_000.0),
            ("Vista Equity Partners Fund VII", 16_000.0),
            ("Vista Equity Partners Fund VIII", 15_000.0),
            ("Warburg Pincus Private Equity X", 15_000.0),
            ("Advent International GPE IX", 17_500.0),
            ("Advent International GPE X", 25_000.0),
            ("CVC Capital Partners VII", 18_500.0),
            ("CVC Capital Partners VIII", 26_000.0),
        ]
        .into_iter()
        .collect()
    })
}
