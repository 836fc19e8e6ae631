use pefunds::report::render_presets;
use pefunds::sources::{CALPERS_DATA, DEFAULT_OPERS_LIMIT, SourceKind, load_source};

const EXPECTED: &str = include_str!("fixtures/calpers_expected.ts");

const REJECTED_FUNDS: [&str; 6] = [
    "Advent Global Technology II Limited Partnership",
    "Advent International GPE X Limited Partnership",
    "AlpInvest Secondaries Fund (onshore) VII, L.P.",
    "Ares Corporate Opportunities Fund VI, L.P.",
    "Blackstone Capital Partners VIII, L.P.",
    "Cedar Street Partners LP",
];

#[test]
fn embedded_table_renders_reference_output() {
    let output = load_source(SourceKind::Calpers, CALPERS_DATA, DEFAULT_OPERS_LIMIT)
        .expect("embedded table parses");
    let rendered = render_presets(output.kind, &output.presets);
    assert_eq!(rendered, EXPECTED);
}

#[test]
fn embedded_table_rejects_footnoted_irrs() {
    let output = load_source(SourceKind::Calpers, CALPERS_DATA, DEFAULT_OPERS_LIMIT)
        .expect("embedded table parses");
    let rejected: Vec<&str> = output
        .rejected
        .iter()
        .map(|line| line.raw.split("    ").next().unwrap_or_default())
        .collect();
    assert_eq!(rejected, REJECTED_FUNDS);
}

#[test]
fn exported_funds_are_ordered_and_bounded() {
    let output = load_source(SourceKind::Calpers, CALPERS_DATA, DEFAULT_OPERS_LIMIT)
        .expect("embedded table parses");
    assert_eq!(output.presets.len(), 50);
    assert_eq!(output.presets[0].fund_name, "AACP India Investors B");
    for pair in output.presets.windows(2) {
        assert!(pair[0].multiple >= pair[1].multiple);
    }
    for preset in &output.presets {
        assert!(preset.multiple > 0.0 && preset.multiple <= 50.0);
    }
    assert!(
        output
            .presets
            .iter()
            .all(|preset| preset.fund_name != "Accel-KKR Capital Partners VII, LP")
    );
}

#[test]
fn calpers_limit_does_not_truncate() {
    let output =
        load_source(SourceKind::Calpers, CALPERS_DATA, 3).expect("embedded table parses");
    assert_eq!(output.presets.len(), 50);
}
