//! Integration tests for the complete reference → transform → render pipeline
//!
//! Tests use the fixture documents under `tests/fixtures` to verify:
//! - Reference data loading from disk
//! - Totals, max emissions and heat rates for a realistic document
//! - Output ordering and number formatting
//! - Isolation of failing generators
//! - Byte-for-byte repeatability

use genreport_core::generators::GeneratorKind;
use genreport_core::xml::Element;
use genreport_core::{Engine, ReferenceData, generate, output};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn reference() -> ReferenceData {
    ReferenceData::load(fixture("ReferenceData.xml")).unwrap()
}

fn input() -> String {
    std::fs::read_to_string(fixture("GenerationReport.xml")).unwrap()
}

/// Reference for the worked examples: Low=0.5, Medium=0.8, High=1.0 /
/// Medium=0.4, High=0.9
fn simple_reference() -> ReferenceData {
    ReferenceData::parse(
        r#"<ReferenceData><Factors>
  <ValueFactor><Low>0.5</Low><Medium>0.8</Medium><High>1.0</High></ValueFactor>
  <EmissionsFactor><Medium>0.4</Medium><High>0.9</High></EmissionsFactor>
</Factors></ReferenceData>"#,
    )
    .unwrap()
}

// =============================================================================
// Complete Pipeline Tests
// =============================================================================

#[test]
fn test_fixture_totals() {
    let reference = reference();
    let report = Engine::new(&reference).transform_str(&input()).unwrap();

    let expected = [
        ("Wind[Offshore]", 100.368 * 20.148 * 0.265 + 90.843 * 25.516 * 0.265),
        ("Wind[Onshore]", 56.578 * 29.542 * 0.946 + 48.540 * 22.954 * 0.946),
        ("Gas[1]", 259.235 * 15.837 * 0.696 + 235.975 * 16.556 * 0.696),
        ("Coal[1]", 350.487 * 10.146 * 0.696 + 348.489 * 11.815 * 0.696),
    ];

    assert_eq!(report.totals.len(), expected.len());
    for (total, (name, value)) in report.totals.iter().zip(expected) {
        assert_eq!(total.name, name);
        assert_eq!(
            output::format_fixed(total.total),
            output::format_fixed(value),
            "total for {name}"
        );
    }
    assert!(report.skipped.is_empty());
}

#[test]
fn test_fixture_emissions_and_heat_rates() {
    let reference = reference();
    let report = Engine::new(&reference).transform_str(&input()).unwrap();

    // 2 gas days + 2 coal days
    assert_eq!(report.daily_emissions.len(), 4);

    let maxima: Vec<_> = report
        .max_emissions
        .iter()
        .map(|m| (m.name.as_str(), m.date.as_str()))
        .collect();
    assert_eq!(
        maxima,
        vec![
            ("Coal[1]", "2017-01-01T00:00:00+00:00"),
            ("Coal[1]", "2017-01-02T00:00:00+00:00"),
        ]
    );
    assert_eq!(
        output::format_fixed(report.max_emissions[0].emission),
        output::format_fixed(350.487 * 0.482 * 0.812)
    );

    assert_eq!(report.heat_rates.len(), 1);
    assert_eq!(report.heat_rates[0].heat_rate, 1.0);
}

#[test]
fn test_fixture_rendered_document() {
    let reference = reference();
    let (_, xml) = generate(&input(), &reference).unwrap();
    let root = Element::parse(&xml).unwrap();

    assert_eq!(root.name, "GenerationOutput");
    let names: Vec<_> = root
        .child("Totals")
        .unwrap()
        .children
        .iter()
        .filter_map(|g| g.child_text("Name"))
        .collect();
    assert_eq!(
        names,
        vec!["Wind[Offshore]", "Wind[Onshore]", "Gas[1]", "Coal[1]"]
    );

    for generator in root.descendants("Generator") {
        let total = generator.child_text("Total").unwrap();
        let decimals = total.split('.').nth(1).unwrap();
        assert_eq!(decimals.len(), 9, "total {total} is not fixed to 9 places");
    }

    let heat_rate = root.find("ActualHeatRate").unwrap();
    assert_eq!(heat_rate.child_text("Name"), Some("Coal[1]"));
    assert_eq!(heat_rate.child_text("HeatRate"), Some("1"));
}

#[test]
fn test_generate_is_idempotent() {
    let reference = reference();
    let input = input();

    let (_, first) = generate(&input, &reference).unwrap();
    let (_, second) = generate(&input, &reference).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

// =============================================================================
// Worked Examples
// =============================================================================

#[test]
fn test_offshore_wind_example() {
    let reference = simple_reference();
    let (_, xml) = generate(
        "<GenerationReport><Wind><WindGenerator><Name>W1</Name>\
         <Generation><Day><Date>2024-01-01</Date><Energy>100</Energy><Price>2</Price></Day></Generation>\
         <Location>Offshore</Location></WindGenerator></Wind></GenerationReport>",
        &reference,
    )
    .unwrap();

    assert!(xml.contains("<Name>W1</Name>"));
    assert!(xml.contains("<Total>100.000000000</Total>"));
    assert!(xml.contains("<MaxEmissionGenerators/>"));
    assert!(xml.contains("<ActualHeatRates/>"));
}

#[test]
fn test_coal_example() {
    let reference = simple_reference();
    let (report, xml) = generate(
        "<GenerationReport><Coal><CoalGenerator><Name>C1</Name>\
         <Generation><Day><Date>2024-01-01</Date><Energy>10</Energy><Price>3</Price></Day></Generation>\
         <TotalHeatInput>500</TotalHeatInput><ActualNetGeneration>250</ActualNetGeneration>\
         <EmissionsRating>1.5</EmissionsRating></CoalGenerator></Coal></GenerationReport>",
        &reference,
    )
    .unwrap();

    assert_eq!(report.heat_rates[0].heat_rate, 2.0);
    assert!(xml.contains("<Total>24.000000000</Total>"));
    assert!(xml.contains("<Date>2024-01-01</Date>"));
    assert!(xml.contains("<Emission>13.500000000</Emission>"));
    assert!(xml.contains("<HeatRate>2</HeatRate>"));
}

#[test]
fn test_wind_without_location_uses_high_factor() {
    let reference = simple_reference();
    let (report, _) = generate(
        "<GenerationReport><WindGenerator><Name>W2</Name>\
         <Day><Date>d</Date><Energy>100</Energy><Price>2</Price></Day></WindGenerator></GenerationReport>",
        &reference,
    )
    .unwrap();

    assert_eq!(report.totals[0].total, 200.0);
}

#[test]
fn test_zero_net_generation_renders_infinity() {
    let reference = simple_reference();
    let (report, xml) = generate(
        "<GenerationReport><CoalGenerator><Name>C0</Name><EmissionsRating>1</EmissionsRating>\
         <TotalHeatInput>10</TotalHeatInput><ActualNetGeneration>0</ActualNetGeneration>\
         </CoalGenerator></GenerationReport>",
        &reference,
    )
    .unwrap();

    assert!(report.heat_rates[0].heat_rate.is_infinite());
    assert!(xml.contains("<HeatRate>INF</HeatRate>"));
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

#[test]
fn test_broken_generators_do_not_affect_siblings() {
    let reference = simple_reference();
    let (report, xml) = generate(
        "<GenerationReport>\
         <WindGenerator><Name>W-ok</Name><Day><Date>d1</Date><Energy>1</Energy><Price>1</Price></Day></WindGenerator>\
         <WindGenerator><Name>W-bad</Name><Day><Date>d1</Date><Energy>lots</Energy><Price>1</Price></Day></WindGenerator>\
         <GasGenerator><Name>G-bad</Name><Day><Date>d1</Date><Energy>1</Energy><Price>1</Price></Day></GasGenerator>\
         <GasGenerator><Name>G-ok</Name><EmissionsRating>2</EmissionsRating>\
           <Day><Date>d1</Date><Energy>1</Energy><Price>1</Price></Day></GasGenerator>\
         </GenerationReport>",
        &reference,
    )
    .unwrap();

    let names: Vec<_> = report.totals.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["W-ok", "G-ok"]);

    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| (s.kind, s.name.as_deref().unwrap_or("")))
        .collect();
    assert_eq!(
        skipped,
        vec![(GeneratorKind::Wind, "W-bad"), (GeneratorKind::Gas, "G-bad")]
    );
    assert!(report.skipped[0].reason.contains("Energy"));
    assert!(report.skipped[1].reason.contains("EmissionsRating"));

    assert!(!xml.contains("W-bad"));
    assert!(!xml.contains("G-bad"));
}

#[test]
fn test_malformed_input_document_fails() {
    let reference = simple_reference();
    assert!(generate("<GenerationReport><Wind></GenerationReport>", &reference).is_err());
}

#[test]
fn test_missing_reference_file() {
    let err = ReferenceData::load(fixture("does-not-exist.xml")).unwrap_err();
    assert!(matches!(err, genreport_core::Error::Io(_)));
}
