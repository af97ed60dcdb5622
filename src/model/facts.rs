//! Raw fact sub-records, one per structured dimension, and the typed
//! accessor that centralizes the unset-field policy.
//!
//! Every field is optional: a school fills these in over time while the
//! assessment is in `draft`. The scoring engine never reads the structs
//! field by field; it goes through [`FactSource::fact`], which maps unset
//! options, empty strings, and empty lists to [`FactValue::Missing`] and
//! leaves the zero/false defaults to the callers that want them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptor of one uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Cached document-quality result for one document category.
///
/// `scored` is the authoritative "already ran" marker; the rationale text
/// may legitimately be empty (e.g. every per-document call failed), which
/// is why the marker is not the text itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocAnalysis {
    #[serde(default)]
    pub scored: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub analysis: String,
}

/// A raw fact value as seen by the rule engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FactValue {
    /// Unset option, empty string, or empty list.
    Missing,
    Bool(bool),
    Int(i64),
    Num(f64),
    Choice(String),
    /// Document list, reduced to its length (the quality pipeline gets the
    /// actual descriptors through its own channel).
    Docs(usize),
}

impl FactValue {
    /// Numeric view with the unset-means-zero policy.
    pub fn num(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Num(v) => *v,
            Self::Bool(true) => 1.0,
            _ => 0.0,
        }
    }

    /// Boolean view; anything unset or non-boolean gates to false.
    pub fn truthy(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    pub fn choice(&self) -> Option<&str> {
        match self {
            Self::Choice(c) => Some(c.as_str()),
            _ => None,
        }
    }

    /// Completeness semantics: only `Missing` counts as blank.
    /// `0`, `false`, and `0.0` are answers.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Uniform fact lookup by field name. Unknown names resolve to `Missing`,
/// which downstream degrades to a zero contribution.
pub trait FactSource {
    fn fact(&self, name: &str) -> FactValue;
}

fn from_bool(v: Option<bool>) -> FactValue {
    v.map(FactValue::Bool).unwrap_or(FactValue::Missing)
}

fn from_int(v: Option<i64>) -> FactValue {
    v.map(FactValue::Int).unwrap_or(FactValue::Missing)
}

fn from_num(v: Option<f64>) -> FactValue {
    v.map(FactValue::Num).unwrap_or(FactValue::Missing)
}

fn from_choice(v: &Option<String>) -> FactValue {
    match v {
        Some(s) if !s.trim().is_empty() => FactValue::Choice(s.clone()),
        _ => FactValue::Missing,
    }
}

fn from_docs(v: &[DocumentRef]) -> FactValue {
    if v.is_empty() {
        FactValue::Missing
    } else {
        FactValue::Docs(v.len())
    }
}

/// Institution dimension (B): organization, staffing, governing documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstitutionFacts {
    // Organization
    pub has_leadership_group: Option<bool>,
    pub meeting_activity_count: Option<i64>,

    // Staffing
    pub has_data_staff: Option<bool>,
    pub fulltime_staff_count: Option<i64>,
    pub parttime_staff_count: Option<i64>,
    pub has_clear_responsibilities: Option<bool>,

    // Training
    pub has_training: Option<bool>,
    pub training_count: Option<i64>,
    pub national_cert_count: Option<i64>,
    pub provincial_cert_count: Option<i64>,
    pub city_cert_count: Option<i64>,

    // Management documents
    pub has_management_doc: Option<bool>,
    pub management_doc_count: Option<i64>,
    #[serde(default)]
    pub management_doc_files: Vec<DocumentRef>,
    #[serde(default)]
    pub management_doc_analysis: DocAnalysis,

    // Practice-guidance documents
    pub has_practice_doc: Option<bool>,
    pub practice_doc_count: Option<i64>,
    #[serde(default)]
    pub practice_doc_files: Vec<DocumentRef>,
    #[serde(default)]
    pub practice_doc_analysis: DocAnalysis,
}

impl FactSource for InstitutionFacts {
    fn fact(&self, name: &str) -> FactValue {
        match name {
            "has_leadership_group" => from_bool(self.has_leadership_group),
            "meeting_activity_count" => from_int(self.meeting_activity_count),
            "has_data_staff" => from_bool(self.has_data_staff),
            "fulltime_staff_count" => from_int(self.fulltime_staff_count),
            "parttime_staff_count" => from_int(self.parttime_staff_count),
            "has_clear_responsibilities" => from_bool(self.has_clear_responsibilities),
            "has_training" => from_bool(self.has_training),
            "training_count" => from_int(self.training_count),
            "national_cert_count" => from_int(self.national_cert_count),
            "provincial_cert_count" => from_int(self.provincial_cert_count),
            "city_cert_count" => from_int(self.city_cert_count),
            "has_management_doc" => from_bool(self.has_management_doc),
            "management_doc_count" => from_int(self.management_doc_count),
            "management_doc_files" => from_docs(&self.management_doc_files),
            "has_practice_doc" => from_bool(self.has_practice_doc),
            "practice_doc_count" => from_int(self.practice_doc_count),
            "practice_doc_files" => from_docs(&self.practice_doc_files),
            _ => FactValue::Missing,
        }
    }
}

/// Behavior dimension (C): platform usage monitoring and application outcomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorFacts {
    // Monitoring
    pub teacher_login_freq: Option<i64>,
    pub student_login_freq: Option<i64>,
    pub manager_login_freq: Option<i64>,
    pub visit_count: Option<i64>,

    // Published outcomes
    pub published_paper_count: Option<i64>,
    pub published_book_count: Option<i64>,

    // Selected exemplar cases
    pub case_national_count: Option<i64>,
    pub case_provincial_count: Option<i64>,
    pub case_city_count: Option<i64>,

    // Honors and awards
    pub award_national_count: Option<i64>,
    pub award_provincial_count: Option<i64>,
    pub award_city_count: Option<i64>,

    // Media coverage
    pub media_national_count: Option<i64>,
    pub media_provincial_count: Option<i64>,
    pub media_city_count: Option<i64>,

    // Conference exchanges
    pub conference_national_count: Option<i64>,
    pub conference_provincial_count: Option<i64>,
    pub conference_city_count: Option<i64>,
}

impl FactSource for BehaviorFacts {
    fn fact(&self, name: &str) -> FactValue {
        match name {
            "teacher_login_freq" => from_int(self.teacher_login_freq),
            "student_login_freq" => from_int(self.student_login_freq),
            "manager_login_freq" => from_int(self.manager_login_freq),
            "visit_count" => from_int(self.visit_count),
            "published_paper_count" => from_int(self.published_paper_count),
            "published_book_count" => from_int(self.published_book_count),
            "case_national_count" => from_int(self.case_national_count),
            "case_provincial_count" => from_int(self.case_provincial_count),
            "case_city_count" => from_int(self.case_city_count),
            "award_national_count" => from_int(self.award_national_count),
            "award_provincial_count" => from_int(self.award_provincial_count),
            "award_city_count" => from_int(self.award_city_count),
            "media_national_count" => from_int(self.media_national_count),
            "media_provincial_count" => from_int(self.media_provincial_count),
            "media_city_count" => from_int(self.media_city_count),
            "conference_national_count" => from_int(self.conference_national_count),
            "conference_provincial_count" => from_int(self.conference_provincial_count),
            "conference_city_count" => from_int(self.conference_city_count),
            _ => FactValue::Missing,
        }
    }
}

/// Asset dimension (D): accumulated data volumes in GB.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetFacts {
    pub management_data_volume: Option<f64>,
    pub resource_data_volume: Option<f64>,
    pub service_data_volume: Option<f64>,
    pub other_data_volume: Option<f64>,
}

impl AssetFacts {
    /// Sum of the four volume fields, unset counting as 0.
    pub fn total_data_volume(&self) -> f64 {
        self.management_data_volume.unwrap_or(0.0)
            + self.resource_data_volume.unwrap_or(0.0)
            + self.service_data_volume.unwrap_or(0.0)
            + self.other_data_volume.unwrap_or(0.0)
    }
}

impl FactSource for AssetFacts {
    fn fact(&self, name: &str) -> FactValue {
        match name {
            "management_data_volume" => from_num(self.management_data_volume),
            "resource_data_volume" => from_num(self.resource_data_volume),
            "service_data_volume" => from_num(self.service_data_volume),
            "other_data_volume" => from_num(self.other_data_volume),
            // Derived: the rule table brackets the combined volume.
            "total_data_volume" => FactValue::Num(self.total_data_volume()),
            _ => FactValue::Missing,
        }
    }
}

/// Technology dimension (E): infrastructure and security posture.
///
/// Choice fields hold the enumerated codes the rule table's choice maps
/// key on (`fully_compliant`, `high`, ...); values outside the map score 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnologyFacts {
    pub data_center_standard: Option<String>,
    pub cloud_dedicated_service: Option<String>,
    pub student_device_ratio: Option<String>,
    pub teacher_device_ratio: Option<String>,
    pub has_data_platform: Option<bool>,

    pub security_certified_count: Option<i64>,
    pub security_certified_ratio: Option<String>,
    pub has_security_incident: Option<bool>,
}

impl FactSource for TechnologyFacts {
    fn fact(&self, name: &str) -> FactValue {
        match name {
            "data_center_standard" => from_choice(&self.data_center_standard),
            "cloud_dedicated_service" => from_choice(&self.cloud_dedicated_service),
            "student_device_ratio" => from_choice(&self.student_device_ratio),
            "teacher_device_ratio" => from_choice(&self.teacher_device_ratio),
            "has_data_platform" => from_bool(self.has_data_platform),
            "security_certified_count" => from_int(self.security_certified_count),
            "security_certified_ratio" => from_choice(&self.security_certified_ratio),
            "has_security_incident" => from_bool(self.has_security_incident),
            _ => FactValue::Missing,
        }
    }
}

/// Fact source for dimensions with no structured sub-record (Literacy is
/// survey-only) and for absent sub-records.
pub struct NoFacts;

impl FactSource for NoFacts {
    fn fact(&self, _name: &str) -> FactValue {
        FactValue::Missing
    }
}

#[cfg(test)]
#[path = "facts_test.rs"]
mod tests;
