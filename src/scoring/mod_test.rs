use std::collections::BTreeMap;

use serde_json::json;

use super::*;
use crate::docqual::Verdict;
use crate::model::Status;
use crate::model::facts::{
    AssetFacts, BehaviorFacts, DocumentRef, InstitutionFacts, TechnologyFacts,
};
use crate::model::survey::{SurveyInstance, SurveyKind, SurveyResponse};
use crate::rules::strategy::DocCategory;

fn assessment() -> crate::model::Assessment {
    crate::model::Assessment {
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
    }
}

fn survey(kind: SurveyKind, answers: &[(&str, &str)]) -> SurveyInstance {
    SurveyInstance {
        kind,
        token: None,
        responses: vec![SurveyResponse {
            answers: answers
                .iter()
                .map(|(q, v)| (q.to_string(), json!(v)))
                .collect(),
        }],
    }
}

fn fixture_bundle() -> Bundle {
    Bundle {
        assessment: assessment(),
        institution: Some(InstitutionFacts {
            has_leadership_group: Some(true),
            meeting_activity_count: Some(8),
            has_data_staff: Some(true),
            fulltime_staff_count: Some(1),
            parttime_staff_count: Some(2),
            has_clear_responsibilities: Some(true),
            has_training: Some(true),
            training_count: Some(6),
            national_cert_count: Some(0),
            provincial_cert_count: Some(1),
            city_cert_count: Some(3),
            has_management_doc: Some(true),
            management_doc_count: Some(2),
            management_doc_files: vec![DocumentRef {
                name: "数据管理制度".to_string(),
                path: "zhidu.txt".to_string(),
                size: None,
                uploaded_at: None,
            }],
            management_doc_analysis: Default::default(),
            has_practice_doc: Some(false),
            practice_doc_count: None,
            practice_doc_files: Vec::new(),
            practice_doc_analysis: Default::default(),
        }),
        behavior: Some(BehaviorFacts {
            teacher_login_freq: Some(150),
            student_login_freq: Some(60),
            manager_login_freq: Some(220),
            visit_count: Some(2),
            published_paper_count: Some(3),
            published_book_count: Some(0),
            case_national_count: Some(0),
            case_provincial_count: Some(1),
            case_city_count: Some(2),
            award_national_count: Some(0),
            award_provincial_count: Some(0),
            award_city_count: Some(1),
            media_national_count: Some(0),
            media_provincial_count: Some(1),
            media_city_count: Some(1),
            conference_national_count: Some(0),
            conference_provincial_count: Some(0),
            conference_city_count: Some(2),
        }),
        asset: Some(AssetFacts {
            management_data_volume: Some(5000.0),
            resource_data_volume: Some(20000.0),
            service_data_volume: Some(8000.0),
            other_data_volume: Some(0.0),
        }),
        technology: Some(TechnologyFacts {
            data_center_standard: Some("fully_compliant".to_string()),
            cloud_dedicated_service: Some("partially_meets".to_string()),
            student_device_ratio: Some("medium".to_string()),
            teacher_device_ratio: Some("low".to_string()),
            has_data_platform: Some(true),
            security_certified_count: Some(3),
            security_certified_ratio: Some("medium".to_string()),
            has_security_incident: Some(false),
        }),
        surveys: vec![
            survey(SurveyKind::Teacher, &[("q6", "D"), ("q7", "E"), ("q14", "C")]),
            survey(SurveyKind::Manager, &[("q7", "D"), ("q15", "C")]),
            survey(SurveyKind::Student, &[("q4", "C"), ("q5", "D")]),
        ],
    }
}

fn rules() -> RuleTable {
    RuleTable::embedded().unwrap()
}

#[test]
fn run_completes_and_persists_consistently() {
    let mut bundle = fixture_bundle();
    let rules = rules();
    let outcome = run(&mut bundle, &rules, None, std::path::Path::new(".")).unwrap();

    assert_eq!(bundle.assessment.status, Status::Completed);
    assert!(bundle.assessment.scores_consistent());
    assert!(bundle.assessment.completed_at.is_some());
    assert_eq!(
        bundle.assessment.total_score,
        Some(normalize::round4(outcome.total))
    );
    assert_eq!(bundle.assessment.maturity_level, Some(outcome.level));

    assert_eq!(outcome.observation.len(), rules.observations.len());
    for (code, score) in &outcome.observation {
        assert!(
            (0.0..=5.0).contains(score),
            "observation {code} out of band: {score}"
        );
    }
    for score in outcome.dimension.values() {
        assert!((0.0..=5.0).contains(score));
    }
    assert!((0.0..=5.0).contains(&outcome.total));
}

#[test]
fn run_rejects_a_record_already_analyzing() {
    let mut bundle = fixture_bundle();
    bundle.assessment.status = Status::Analyzing;
    let rules = rules();
    assert!(run(&mut bundle, &rules, None, std::path::Path::new(".")).is_err());
    assert_eq!(bundle.assessment.status, Status::Analyzing);
}

#[test]
fn rerun_overwrites_with_the_same_result() {
    let mut bundle = fixture_bundle();
    let rules = rules();
    let first = run(&mut bundle, &rules, None, std::path::Path::new(".")).unwrap();
    let second = run(&mut bundle, &rules, None, std::path::Path::new(".")).unwrap();
    assert_eq!(first.total, second.total);
    assert_eq!(first.level, second.level);
    assert_eq!(bundle.assessment.status, Status::Completed);
}

#[test]
fn missing_sub_record_scores_its_dimension_zero() {
    let mut bundle = fixture_bundle();
    bundle.behavior = None;
    let rules = rules();
    let (outcome, _) =
        compute_scores(&bundle, &rules, None, std::path::Path::new(".")).unwrap();
    assert_eq!(outcome.dimension["C"], 0.0);
    // The other dimensions still score.
    assert!(outcome.dimension["B"] > 0.0);
}

#[test]
fn asset_dimension_matches_hand_computation() {
    // Manager survey answers miss the D1 ranges, so D1 = 0. Total volume
    // 33000 GB lands in the 10000..55000 bracket: 4 of 10 → 2.0 normalized.
    // D = 0 × 0.4795 + 2.0 × 0.5205.
    let bundle = fixture_bundle();
    let rules = rules();
    let (outcome, _) =
        compute_scores(&bundle, &rules, None, std::path::Path::new(".")).unwrap();
    assert!((outcome.dimension["D"] - 1.041).abs() < 1e-9);
}

#[test]
fn management_docs_score_at_half_weight_offline() {
    // B31: count 2 × 5 = 10, quality falls back to 20/2 = 10, raw 20 of 40.
    let bundle = fixture_bundle();
    let rules = rules();
    let (outcome, _) =
        compute_scores(&bundle, &rules, None, std::path::Path::new(".")).unwrap();
    assert_eq!(outcome.observation["B31"], 2.5);
    // has_practice_doc is false: the gate zeroes B32.
    assert_eq!(outcome.observation["B32"], 0.0);
}

#[test]
fn weightless_secondary_group_does_not_move_its_dimension() {
    let rules = rules();
    let mut bundle = fixture_bundle();
    let (outcome, _) =
        compute_scores(&bundle, &rules, None, std::path::Path::new(".")).unwrap();
    // The group is scored and reported...
    assert_eq!(outcome.secondary["E3"], 3.0);

    // ...but carries no weight, so changing it leaves the dimension alone.
    bundle.technology.as_mut().unwrap().cloud_dedicated_service =
        Some("fully_meets".to_string());
    let (changed, _) =
        compute_scores(&bundle, &rules, None, std::path::Path::new(".")).unwrap();
    assert_eq!(changed.secondary["E3"], 5.0);
    assert_eq!(changed.dimension["E"], outcome.dimension["E"]);
}

#[test]
fn clean_security_record_scores_full_band() {
    let bundle = fixture_bundle();
    let rules = rules();
    let (outcome, _) =
        compute_scores(&bundle, &rules, None, std::path::Path::new(".")).unwrap();
    assert_eq!(outcome.observation["E22"], 5.0);

    let mut incident = fixture_bundle();
    incident.technology.as_mut().unwrap().has_security_incident = Some(true);
    let (outcome, _) =
        compute_scores(&incident, &rules, None, std::path::Path::new(".")).unwrap();
    assert_eq!(outcome.observation["E22"], 0.0);
}

#[test]
fn total_aggregates_the_five_dimensions() {
    let rules = rules();
    let dimension: BTreeMap<String, f64> = [
        ("A", 4.2),
        ("B", 3.8),
        ("C", 4.0),
        ("D", 3.5),
        ("E", 4.5),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), *v))
    .collect();
    let codes: Vec<String> = dimension.keys().cloned().collect();
    let total = aggregate(&dimension, &rules.dimension_weights, &codes);
    assert!((total - 4.03185).abs() < 1e-9);
    assert_eq!(rules.classify(total), crate::model::MaturityLevel::Mature);
}

#[test]
fn score_fields_round_to_storage_precision() {
    let outcome = ScoreOutcome {
        observation: BTreeMap::new(),
        secondary: BTreeMap::new(),
        dimension: [("A", 4.123456), ("B", 3.0)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
        total: 2.567891,
        level: crate::model::MaturityLevel::Growing,
    };
    let fields = outcome.score_fields();
    assert_eq!(fields.literacy, 4.1235);
    assert_eq!(fields.institution, 3.0);
    // Absent dimensions persist as 0.
    assert_eq!(fields.behavior, 0.0);
    assert_eq!(fields.total, 2.5679);
}

struct FixedAssessor(f64);

impl QualityAssessor for FixedAssessor {
    fn assess(
        &self,
        _text: &str,
        _category: DocCategory,
        _max_score: f64,
    ) -> Result<Verdict, Box<dyn std::error::Error>> {
        Ok(Verdict {
            score: self.0,
            analysis: "结构完整，覆盖面良好".to_string(),
        })
    }
}

#[test]
fn run_writes_document_caches_back_to_the_institution() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("zhidu.txt"), "数据管理制度正文").unwrap();

    let mut bundle = fixture_bundle();
    let rules = rules();
    let assessor = FixedAssessor(16.0);
    run(&mut bundle, &rules, Some(&assessor), dir.path()).unwrap();

    let analysis = &bundle.institution.as_ref().unwrap().management_doc_analysis;
    assert!(analysis.scored);
    assert_eq!(analysis.score, 16.0);
    assert!(analysis.analysis.contains("数据管理制度"));

    // A re-run keeps the cached verdict even if the assessor now disagrees.
    let disagreeing = FixedAssessor(2.0);
    run(&mut bundle, &rules, Some(&disagreeing), dir.path()).unwrap();
    assert_eq!(
        bundle
            .institution
            .as_ref()
            .unwrap()
            .management_doc_analysis
            .score,
        16.0
    );
}
