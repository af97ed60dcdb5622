//! Completeness checker: a readiness predicate per dimension, independent
//! of scoring. Drives the submission progress indicator only.
//!
//! "Blank" means unset, empty string, or empty list; `0`, `false`, and
//! `0.0` are deliberate answers and count as filled. Some fields are
//! required unconditionally; others only when a gating boolean is true.

mod report;

use serde::Serialize;

use crate::model::Status;
use crate::model::facts::FactSource;
use crate::model::survey::{SurveyKind, SurveyPool};
use crate::store::Bundle;

pub use report::{print_json, print_report};

/// Always-required institution fields.
const INSTITUTION_BASE: &[&str] = &[
    "has_leadership_group",
    "meeting_activity_count",
    "has_data_staff",
    "has_clear_responsibilities",
    "has_training",
    "has_management_doc",
    "has_practice_doc",
];

// Conditionally required groups, each gated by the named boolean.
const STAFF_FIELDS: &[&str] = &["fulltime_staff_count", "parttime_staff_count"];
const TRAINING_FIELDS: &[&str] = &[
    "training_count",
    "national_cert_count",
    "provincial_cert_count",
    "city_cert_count",
];
const MANAGEMENT_DOC_FIELDS: &[&str] = &["management_doc_count", "management_doc_files"];
const PRACTICE_DOC_FIELDS: &[&str] = &["practice_doc_count", "practice_doc_files"];

const BEHAVIOR_FIELDS: &[&str] = &[
    "teacher_login_freq",
    "student_login_freq",
    "manager_login_freq",
    "visit_count",
    "published_paper_count",
    "published_book_count",
    "case_national_count",
    "case_provincial_count",
    "case_city_count",
    "award_national_count",
    "award_provincial_count",
    "award_city_count",
    "media_national_count",
    "media_provincial_count",
    "media_city_count",
    "conference_national_count",
    "conference_provincial_count",
    "conference_city_count",
];

const ASSET_FIELDS: &[&str] = &[
    "management_data_volume",
    "resource_data_volume",
    "service_data_volume",
    "other_data_volume",
];

const TECHNOLOGY_FIELDS: &[&str] = &[
    "data_center_standard",
    "cloud_dedicated_service",
    "student_device_ratio",
    "teacher_device_ratio",
    "has_data_platform",
    "security_certified_count",
    "security_certified_ratio",
    "has_security_incident",
];

/// Per-dimension readiness plus the derived progress percentage.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModuleStatus {
    pub literacy: bool,
    pub institution: bool,
    pub behavior: bool,
    pub asset: bool,
    pub technology: bool,
    pub progress: u32,
}

impl ModuleStatus {
    pub fn complete_count(&self) -> u32 {
        [
            self.literacy,
            self.institution,
            self.behavior,
            self.asset,
            self.technology,
        ]
        .iter()
        .filter(|m| **m)
        .count() as u32
    }
}

/// Evaluate readiness for every dimension of a bundle.
pub fn compute(bundle: &Bundle) -> ModuleStatus {
    let pool = SurveyPool::from_instances(&bundle.surveys);
    let literacy = SurveyKind::ALL
        .iter()
        .all(|kind| !pool.responses(*kind).is_empty());

    let institution = institution_complete(bundle.institution.as_ref());
    let behavior = require(
        bundle.behavior.as_ref().map(|f| f as &dyn FactSource),
        BEHAVIOR_FIELDS,
    );
    let asset = require(
        bundle.asset.as_ref().map(|f| f as &dyn FactSource),
        ASSET_FIELDS,
    );
    let technology = require(
        bundle.technology.as_ref().map(|f| f as &dyn FactSource),
        TECHNOLOGY_FIELDS,
    );

    let mut status = ModuleStatus {
        literacy,
        institution,
        behavior,
        asset,
        technology,
        progress: 0,
    };
    status.progress = if bundle.assessment.status == Status::Completed {
        100
    } else {
        (status.complete_count() * 20).min(100)
    };
    status
}

/// The record exists and none of the fields are blank.
fn require(facts: Option<&dyn FactSource>, fields: &[&str]) -> bool {
    match facts {
        Some(facts) => fields.iter().all(|f| !facts.fact(f).is_blank()),
        None => false,
    }
}

fn institution_complete(facts: Option<&crate::model::facts::InstitutionFacts>) -> bool {
    let Some(inst) = facts else {
        return false;
    };
    let src = inst as &dyn FactSource;
    if !require(Some(src), INSTITUTION_BASE) {
        return false;
    }
    let gated = [
        ("has_data_staff", STAFF_FIELDS),
        ("has_training", TRAINING_FIELDS),
        ("has_management_doc", MANAGEMENT_DOC_FIELDS),
        ("has_practice_doc", PRACTICE_DOC_FIELDS),
    ];
    gated
        .iter()
        .all(|(gate, fields)| !src.fact(gate).truthy() || require(Some(src), fields))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
