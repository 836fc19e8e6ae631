use crate::FundSize;
use crate::sources::SourceKind;
use std::borrow::Cow;

/// Escapes a value for a double-quoted TypeScript string literal.
pub fn escape_literal(value: &str) -> Cow<'_, str> {
    if !value.contains(['"', '\\']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

pub fn format_size(size: FundSize) -> String {
    match size {
        FundSize::Reported(millions) => format!("{millions:.1}"),
        FundSize::Estimated { millions, .. } => format!("{millions:.0}"),
    }
}

/// Trailing comment for sizes that were not disclosed directly.
pub fn size_note(size: FundSize) -> Option<String> {
    size.commitment()
        .map(|commitment| format!("// Estimated from ${commitment}M commitment"))
}

/// CalPERS IRRs print in shortest round-trip form (`12.8`, `10.0`); OPERS
/// IRRs are normalized to one decimal.
pub fn format_irr(kind: SourceKind, irr: f64) -> String {
    match kind {
        SourceKind::Calpers => format!("{irr:?}"),
        SourceKind::Opers => format!("{irr:.1}"),
    }
}
