//! Survey instances, anonymous responses, and the 5-point scale lookup.
//!
//! Answer maps are free-form `q<N> → value` where the value is a letter
//! code `A`–`E`, the literal ordinal word, or a bare number. Letter and
//! word forms are interchangeable by contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three survey audiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyKind {
    Teacher,
    Manager,
    Student,
}

impl SurveyKind {
    pub const ALL: [SurveyKind; 3] = [Self::Teacher, Self::Manager, Self::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Manager => "manager",
            Self::Student => "student",
        }
    }
}

/// One survey template bound to an assessment via an external token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyInstance {
    pub kind: SurveyKind,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub responses: Vec<SurveyResponse>,
}

/// One anonymous respondent's answer map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
}

/// Fixed 5-point ordinal scale: letter codes and literal words map to the
/// same point values; unknown strings score 0, numbers are taken literally.
const SCALE: &[(&str, f64)] = &[
    ("A", 1.0),
    ("非常不符合", 1.0),
    ("B", 2.0),
    ("不符合", 2.0),
    ("C", 3.0),
    ("一般", 3.0),
    ("D", 4.0),
    ("符合", 4.0),
    ("E", 5.0),
    ("非常符合", 5.0),
];

/// Point value of a single raw answer.
pub fn scale_points(value: &Value) -> f64 {
    match value {
        Value::String(s) => {
            let s = s.trim();
            SCALE
                .iter()
                .find(|(code, _)| *code == s)
                .map(|(_, pts)| *pts)
                .or_else(|| s.parse::<f64>().ok())
                .unwrap_or(0.0)
        }
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// All responses for an assessment, pooled by audience across instances.
#[derive(Debug, Default)]
pub struct SurveyPool {
    teacher: Vec<SurveyResponse>,
    manager: Vec<SurveyResponse>,
    student: Vec<SurveyResponse>,
}

impl SurveyPool {
    pub fn from_instances(instances: &[SurveyInstance]) -> Self {
        let mut pool = Self::default();
        for inst in instances {
            let bucket = match inst.kind {
                SurveyKind::Teacher => &mut pool.teacher,
                SurveyKind::Manager => &mut pool.manager,
                SurveyKind::Student => &mut pool.student,
            };
            bucket.extend(inst.responses.iter().cloned());
        }
        pool
    }

    pub fn responses(&self, kind: SurveyKind) -> &[SurveyResponse] {
        match kind {
            SurveyKind::Teacher => &self.teacher,
            SurveyKind::Manager => &self.manager,
            SurveyKind::Student => &self.student,
        }
    }

    /// Mean, across responses, of the per-response point sum over a
    /// contiguous question range (inclusive). A missing answer contributes
    /// 0 to that response's sum; the denominator stays the response count.
    /// No responses at all → 0.
    pub fn raw_score(&self, kind: SurveyKind, start: u32, end: u32) -> f64 {
        let responses = self.responses(kind);
        if responses.is_empty() {
            return 0.0;
        }
        let total: f64 = responses
            .iter()
            .map(|r| {
                (start..=end)
                    .filter_map(|q| r.answers.get(&format!("q{q}")))
                    .map(scale_points)
                    .sum::<f64>()
            })
            .sum();
        total / responses.len() as f64
    }
}

#[cfg(test)]
#[path = "survey_test.rs"]
mod tests;
