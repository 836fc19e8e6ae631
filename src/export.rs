use crate::FundPreset;
use crate::sources::SourceKind;
use anyhow::{Context, Result};
use csv::Writer;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    source: &'static str,
    fund_name: &'a str,
    vintage: i32,
    size_millions: f64,
    size_estimated: bool,
    commitment_millions: Option<f64>,
    multiple: f64,
    irr: Option<f64>,
}

/// Saves presets as CSV, or as `<path>.gz` when `archive` is set. Returns the
/// path actually written.
pub fn save_presets_csv(
    path: &Path,
    kind: SourceKind,
    presets: &[FundPreset],
    archive: bool,
) -> Result<PathBuf> {
    let serialized = serialize_presets(kind, presets)?;
    if archive {
        let archived = archive_path(path);
        let compressed = gzip(&serialized)
            .with_context(|| format!("failed to compress {}", archived.display()))?;
        write_output_file(&archived, &compressed)?;
        Ok(archived)
    } else {
        write_output_file(path, &serialized)?;
        Ok(path.to_path_buf())
    }
}

pub fn serialize_presets(kind: SourceKind, presets: &[FundPreset]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    for preset in presets {
        let record = CsvRecord {
            source: kind.label(),
            fund_name: preset.fund_name.as_str(),
            vintage: preset.vintage,
            size_millions: preset.size.millions(),
            size_estimated: preset.size.commitment().is_some(),
            commitment_millions: preset.size.commitment(),
            multiple: preset.multiple,
            irr: preset.irr,
        };
        writer
            .serialize(record)
            .context("failed to serialize fund record")?;
    }
    finalize_writer(writer, "fund CSV writer")
}

fn finalize_writer(mut writer: Writer<Vec<u8>>, label: &str) -> Result<Vec<u8>> {
    writer
        .flush()
        .with_context(|| format!("failed to flush {label}"))?;
    writer
        .into_inner()
        .with_context(|| format!("failed to finalize {label}"))
}

fn archive_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

pub fn write_output_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FundSize;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn presets() -> Vec<FundPreset> {
        vec![
            FundPreset {
                fund_name: "AACP India Investors B".to_string(),
                vintage: 2007,
                size: FundSize::Reported(5.0),
                multiple: 4.0,
                irr: Some(12.8),
            },
            FundPreset {
                fund_name: "Young Fund, L.P.".to_string(),
                vintage: 2024,
                size: FundSize::Estimated {
                    millions: 3_333.0,
                    commitment: 150.0,
                },
                multiple: 1.03,
                irr: None,
            },
        ]
    }

    #[test]
    fn serializes_header_and_rows() {
        let bytes = serialize_presets(SourceKind::Calpers, &presets()).expect("serializes");
        let text = String::from_utf8(bytes).expect("utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "source,fund_name,vintage,size_millions,size_estimated,commitment_millions,multiple,irr"
        );
        assert_eq!(lines[1], "CalPERS,AACP India Investors B,2007,5.0,false,,4.0,12.8");
        assert_eq!(
            lines[2],
            "CalPERS,\"Young Fund, L.P.\",2024,3333.0,true,150.0,1.03,"
        );
    }

    #[test]
    fn writes_plain_csv_into_new_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/funds.csv");
        let written =
            save_presets_csv(&path, SourceKind::Calpers, &presets(), false).expect("saves");
        assert_eq!(written, path);
        let text = fs::read_to_string(&path).expect("readable");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn archive_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("funds.csv");
        let written =
            save_presets_csv(&path, SourceKind::Opers, &presets(), true).expect("saves");
        assert_eq!(written, dir.path().join("funds.csv.gz"));
        assert!(!path.exists());

        let compressed = fs::read(&written).expect("readable");
        let mut decoded = String::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_string(&mut decoded)
            .expect("valid gzip");
        assert!(decoded.starts_with("source,fund_name"));
        assert!(decoded.contains("OPERS,AACP India Investors B"));
    }
}
