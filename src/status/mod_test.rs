use std::collections::BTreeMap;

use serde_json::json;

use super::*;
use crate::model::Assessment;
use crate::model::facts::{
    AssetFacts, BehaviorFacts, DocumentRef, InstitutionFacts, TechnologyFacts,
};
use crate::model::survey::{SurveyInstance, SurveyResponse};

fn full_institution() -> InstitutionFacts {
    InstitutionFacts {
        has_leadership_group: Some(true),
        meeting_activity_count: Some(8),
        has_data_staff: Some(true),
        fulltime_staff_count: Some(1),
        parttime_staff_count: Some(2),
        has_clear_responsibilities: Some(true),
        has_training: Some(false),
        training_count: None,
        national_cert_count: None,
        provincial_cert_count: None,
        city_cert_count: None,
        has_management_doc: Some(true),
        management_doc_count: Some(2),
        management_doc_files: vec![DocumentRef {
            name: "制度".to_string(),
            path: "docs/zhidu.txt".to_string(),
            size: None,
            uploaded_at: None,
        }],
        management_doc_analysis: Default::default(),
        has_practice_doc: Some(false),
        practice_doc_count: None,
        practice_doc_files: Vec::new(),
        practice_doc_analysis: Default::default(),
    }
}

fn full_behavior() -> BehaviorFacts {
    BehaviorFacts {
        teacher_login_freq: Some(150),
        student_login_freq: Some(60),
        manager_login_freq: Some(120),
        visit_count: Some(2),
        published_paper_count: Some(0),
        published_book_count: Some(0),
        case_national_count: Some(0),
        case_provincial_count: Some(1),
        case_city_count: Some(2),
        award_national_count: Some(0),
        award_provincial_count: Some(0),
        award_city_count: Some(1),
        media_national_count: Some(0),
        media_provincial_count: Some(0),
        media_city_count: Some(1),
        conference_national_count: Some(0),
        conference_provincial_count: Some(0),
        conference_city_count: Some(2),
    }
}

fn full_asset() -> AssetFacts {
    AssetFacts {
        management_data_volume: Some(5000.0),
        resource_data_volume: Some(20000.0),
        service_data_volume: Some(8000.0),
        other_data_volume: Some(0.0),
    }
}

fn full_technology() -> TechnologyFacts {
    TechnologyFacts {
        data_center_standard: Some("fully_compliant".to_string()),
        cloud_dedicated_service: Some("partially_meets".to_string()),
        student_device_ratio: Some("medium".to_string()),
        teacher_device_ratio: Some("low".to_string()),
        has_data_platform: Some(true),
        security_certified_count: Some(3),
        security_certified_ratio: Some("medium".to_string()),
        has_security_incident: Some(false),
    }
}

fn survey(kind: crate::model::survey::SurveyKind) -> SurveyInstance {
    SurveyInstance {
        kind,
        token: None,
        responses: vec![SurveyResponse {
            answers: BTreeMap::from([("q1".to_string(), json!("D"))]),
        }],
    }
}

fn full_bundle() -> Bundle {
    Bundle {
        assessment: Assessment {
            id: "a-1".to_string(),
            school: "实验小学".to_string(),
            status: Status::Draft,
            literacy_score: None,
            institution_score: None,
            behavior_score: None,
            asset_score: None,
            technology_score: None,
            total_score: None,
            maturity_level: None,
            started_at: None,
            completed_at: None,
        },
        institution: Some(full_institution()),
        behavior: Some(full_behavior()),
        asset: Some(full_asset()),
        technology: Some(full_technology()),
        surveys: SurveyKind::ALL.iter().map(|k| survey(*k)).collect(),
    }
}

#[test]
fn complete_bundle_reports_full_progress() {
    let status = compute(&full_bundle());
    assert!(status.literacy);
    assert!(status.institution);
    assert!(status.behavior);
    assert!(status.asset);
    assert!(status.technology);
    assert_eq!(status.complete_count(), 5);
    assert_eq!(status.progress, 100);
}

#[test]
fn missing_sub_record_is_incomplete() {
    let mut bundle = full_bundle();
    bundle.asset = None;
    let status = compute(&bundle);
    assert!(!status.asset);
    assert_eq!(status.progress, 80);
}

#[test]
fn zero_counts_as_an_answer() {
    // published_paper_count stays Some(0) in the full fixture; blanking it
    // out is what flips the dimension.
    let mut bundle = full_bundle();
    let status = compute(&bundle);
    assert!(status.behavior);

    bundle.behavior.as_mut().unwrap().published_paper_count = None;
    let status = compute(&bundle);
    assert!(!status.behavior);
}

#[test]
fn literacy_requires_all_three_audiences() {
    let mut bundle = full_bundle();
    bundle.surveys.retain(|s| s.kind != SurveyKind::Student);
    let status = compute(&bundle);
    assert!(!status.literacy);
}

#[test]
fn survey_instance_without_responses_does_not_count() {
    let mut bundle = full_bundle();
    for instance in &mut bundle.surveys {
        if instance.kind == SurveyKind::Student {
            instance.responses.clear();
        }
    }
    assert!(!compute(&bundle).literacy);
}

#[test]
fn gated_fields_only_required_when_gate_is_true() {
    // has_training is false, so the training detail fields may stay blank.
    let status = compute(&full_bundle());
    assert!(status.institution);

    let mut bundle = full_bundle();
    let inst = bundle.institution.as_mut().unwrap();
    inst.has_training = Some(true);
    let status = compute(&bundle);
    assert!(!status.institution);

    let inst = bundle.institution.as_mut().unwrap();
    inst.training_count = Some(4);
    inst.national_cert_count = Some(0);
    inst.provincial_cert_count = Some(1);
    inst.city_cert_count = Some(2);
    assert!(compute(&bundle).institution);
}

#[test]
fn document_gate_requires_count_and_files() {
    let mut bundle = full_bundle();
    bundle
        .institution
        .as_mut()
        .unwrap()
        .management_doc_files
        .clear();
    assert!(!compute(&bundle).institution);
}

#[test]
fn base_fields_are_required_unconditionally() {
    let mut bundle = full_bundle();
    bundle.institution.as_mut().unwrap().has_leadership_group = None;
    assert!(!compute(&bundle).institution);
}

#[test]
fn completed_assessment_pins_progress_at_100() {
    let mut bundle = full_bundle();
    bundle.asset = None;
    bundle.assessment.status = Status::Completed;
    let status = compute(&bundle);
    assert!(!status.asset);
    assert_eq!(status.progress, 100);
}
