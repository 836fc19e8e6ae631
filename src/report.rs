use crate::FundPreset;
use crate::formatting::{escape_literal, format_irr, format_size, size_note};
use crate::sources::SourceKind;
use std::io::{self, Write};

pub const STRATEGY: &str = "Private Equity";

/// Writes the header comment and one object literal per preset, in order.
///
/// The output is meant to be pasted into a `PRESET_FUNDS` array as-is, so the
/// layout (field order, precision, trailing commas) is fixed.
pub fn write_presets<W: Write>(
    out: &mut W,
    kind: SourceKind,
    presets: &[FundPreset],
) -> io::Result<()> {
    write_header(out, kind, presets.len())?;
    for preset in presets {
        write_block(out, kind, preset)?;
    }
    Ok(())
}

pub fn render_presets(kind: SourceKind, presets: &[FundPreset]) -> String {
    let mut buf = Vec::new();
    write_presets(&mut buf, kind, presets).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("rendered presets are UTF-8")
}

fn write_header<W: Write>(out: &mut W, kind: SourceKind, count: usize) -> io::Result<()> {
    match kind {
        SourceKind::Calpers => {
            let as_of = kind
                .as_of()
                .map(|date| format!(" (as of {})", date.format("%B %-d, %Y")))
                .unwrap_or_default();
            writeln!(
                out,
                "// {} PE Funds{as_of} - Top {count} funds by TVPI",
                kind.label()
            )?;
        }
        SourceKind::Opers => {
            writeln!(out, "// {} Funds", kind.label())?;
            writeln!(out, "// Add these to PRESET_FUNDS array in presetFunds.ts")?;
        }
    }
    writeln!(out)
}

fn write_block<W: Write>(out: &mut W, kind: SourceKind, preset: &FundPreset) -> io::Result<()> {
    writeln!(out, "  {{")?;
    writeln!(
        out,
        "    displayName: \"{}\",",
        escape_literal(&preset.display_name())
    )?;
    writeln!(
        out,
        "    fundName: \"{}\",",
        escape_literal(&preset.fund_name)
    )?;
    writeln!(out, "    vintage: {},", preset.vintage)?;
    writeln!(out, "    strategy: \"{STRATEGY}\",")?;
    writeln!(out, "    source: \"{}\",", kind.label())?;
    writeln!(out, "    sourceUrl: \"{}\",", kind.url())?;
    let size = format_size(preset.size);
    match size_note(preset.size) {
        Some(note) => writeln!(out, "    size: {size},  {note}")?,
        None => writeln!(out, "    size: {size},")?,
    }
    writeln!(out, "    grossReturnMultiple: {:.2},", preset.multiple)?;
    if let Some(irr) = preset.irr {
        writeln!(out, "    irr: {},", format_irr(kind, irr))?;
    }
    writeln!(out, "  }},")
}
