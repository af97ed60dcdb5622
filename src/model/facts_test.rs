use super::*;

#[test]
fn unset_fields_are_missing() {
    let facts = InstitutionFacts::default();
    assert_eq!(facts.fact("has_leadership_group"), FactValue::Missing);
    assert_eq!(facts.fact("meeting_activity_count"), FactValue::Missing);
    assert_eq!(facts.fact("management_doc_files"), FactValue::Missing);
}

#[test]
fn zero_and_false_are_answers_not_blanks() {
    let facts = BehaviorFacts {
        visit_count: Some(0),
        ..Default::default()
    };
    assert!(!facts.fact("visit_count").is_blank());
    assert_eq!(facts.fact("visit_count"), FactValue::Int(0));

    let tech = TechnologyFacts {
        has_security_incident: Some(false),
        ..Default::default()
    };
    assert!(!tech.fact("has_security_incident").is_blank());
    assert!(!tech.fact("has_security_incident").truthy());
}

#[test]
fn empty_choice_string_is_missing() {
    let tech = TechnologyFacts {
        data_center_standard: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(tech.fact("data_center_standard"), FactValue::Missing);

    let tech = TechnologyFacts {
        data_center_standard: Some("fully_compliant".to_string()),
        ..Default::default()
    };
    assert_eq!(
        tech.fact("data_center_standard").choice(),
        Some("fully_compliant")
    );
}

#[test]
fn doc_list_reduces_to_length() {
    let facts = InstitutionFacts {
        management_doc_files: vec![DocumentRef {
            name: "制度.txt".to_string(),
            path: "docs/zhidu.txt".to_string(),
            size: None,
            uploaded_at: None,
        }],
        ..Default::default()
    };
    assert_eq!(facts.fact("management_doc_files"), FactValue::Docs(1));
    assert!(!facts.fact("management_doc_files").is_blank());
}

#[test]
fn unknown_field_name_is_missing() {
    let facts = AssetFacts::default();
    assert_eq!(facts.fact("no_such_field"), FactValue::Missing);
    assert_eq!(NoFacts.fact("anything"), FactValue::Missing);
}

#[test]
fn numeric_view_defaults_to_zero() {
    assert_eq!(FactValue::Missing.num(), 0.0);
    assert_eq!(FactValue::Bool(true).num(), 1.0);
    assert_eq!(FactValue::Bool(false).num(), 0.0);
    assert_eq!(FactValue::Int(7).num(), 7.0);
    assert_eq!(FactValue::Num(2.5).num(), 2.5);
    assert_eq!(FactValue::Choice("high".to_string()).num(), 0.0);
}

#[test]
fn total_data_volume_sums_with_unset_as_zero() {
    let facts = AssetFacts {
        management_data_volume: Some(1000.0),
        resource_data_volume: None,
        service_data_volume: Some(500.0),
        other_data_volume: None,
    };
    assert_eq!(facts.total_data_volume(), 1500.0);
    assert_eq!(facts.fact("total_data_volume"), FactValue::Num(1500.0));
}

#[test]
fn doc_analysis_defaults_unscored() {
    let analysis = DocAnalysis::default();
    assert!(!analysis.scored);
    assert_eq!(analysis.score, 0.0);
    assert!(analysis.analysis.is_empty());
}
