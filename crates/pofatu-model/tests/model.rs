//! Tests for pofatu-model types.

use pofatu_model::{
    Analysis, Artefact, Location, Measurement, Sample, SampleCategory, Site, Term,
};

fn sample() -> Sample {
    Sample {
        id: "S1".to_string(),
        name: Some("HAKAEA-3".to_string()),
        category: Some(SampleCategory::Artefact),
        comment: None,
        petrography: None,
        source_id: Some("Sinton-1997-Database".to_string()),
        analyzed_material_1: Term::Known("Whole rock"),
        analyzed_material_2: Term::Empty,
        location: Location {
            loc1: Some("Marquesas".to_string()),
            loc2: Some("Nuku Hiva".to_string()),
            loc3: Some("Hatiheu".to_string()),
            latitude: Some(-8.8251),
            longitude: Some(-140.0932),
            ..Location::default()
        },
        artefact: Artefact {
            id: Some("A-12".to_string()),
            name: None,
            category: Term::Known("ADZE"),
            attributes: Term::Unrecognized("Chipped".to_string()),
            comment: None,
            source_ids: vec!["Allen-2010-Marquesas".to_string()],
            collection_type: Term::Empty,
            collector: None,
            collection_comment: None,
        },
        site: Site {
            name: Some("Hatiheu".to_string()),
            code: Some("NH-1".to_string()),
            context: Term::Known("DOMESTIC"),
            comment: None,
            stratigraphic_position: None,
            stratigraphy_comment: None,
            source_ids: vec!["Allen-2010-Marquesas".to_string()],
        },
    }
}

#[test]
fn sample_serializes_terms_as_plain_values() {
    let json = serde_json::to_value(sample()).expect("serialize sample");
    assert_eq!(json["category"], "ARTEFACT");
    assert_eq!(json["analyzed_material_1"], "Whole rock");
    assert!(json["analyzed_material_2"].is_null());
    assert_eq!(json["artefact"]["attributes"], "Chipped");
    assert_eq!(json["location"]["latitude"], -8.8251);
}

#[test]
fn sample_citation_keys_in_sheet_order() {
    let sample = sample();
    let keys: Vec<&str> = sample.citation_keys().collect();
    assert_eq!(
        keys,
        vec![
            "Sinton-1997-Database",
            "Allen-2010-Marquesas",
            "Allen-2010-Marquesas"
        ]
    );
}

#[test]
fn location_display_name() {
    insta::assert_snapshot!(
        sample().location.name(),
        @"Marquesas / Nuku Hiva / Hatiheu (-8.8251, -140.0932, -)"
    );
}

#[test]
fn analysis_collects_measurements_in_order() {
    let mut analysis = Analysis::new("S1", "Sinton-1997-Database_A");
    analysis
        .add_measurement(Measurement::new("SiO2 [wt%]", 45.2))
        .expect("first");
    analysis
        .add_measurement(
            Measurement::new("Rb [ppm]", 2.0)
                .with_less(true)
                .with_method(Some("sinton1997databasea_rb".to_string())),
        )
        .expect("second");
    let rendered: Vec<String> = analysis
        .measurements
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["45.2", "\u{2264}2.0"]);
    assert_eq!(
        analysis.measurement("Rb [ppm]").and_then(|m| m.method_id.as_deref()),
        Some("sinton1997databasea_rb")
    );
}
