//! Raw-score strategies: the tagged sum type behind every observation
//! point in the rule table.
//!
//! The original published rule set dispatched on free-form string tags; an
//! unrecognized tag silently scored 0. Here the tag set is closed (a rule
//! file with an unknown `type` fails at load time) and each variant
//! carries its own typed parameters.

use serde::{Deserialize, Serialize};

use crate::model::survey::SurveyKind;

/// Document category for the quality assessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocCategory {
    Management,
    Practice,
}

impl DocCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Management => "management",
            Self::Practice => "practice",
        }
    }
}

/// Comparison operator of one threshold-bracket row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Between,
}

/// One row of an ordered threshold table. Rows are evaluated in authored
/// order and the first match wins; overlapping brackets are resolved by
/// that priority, never by numeric range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketRule {
    pub op: BracketOp,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub points: f64,
}

impl BracketRule {
    /// Whether `value` satisfies this row. `between` bounds are inclusive;
    /// an absent bound is open.
    pub fn matches(&self, value: f64) -> bool {
        match self.op {
            BracketOp::Lt => self.value.is_some_and(|b| value < b),
            BracketOp::Lte => self.value.is_some_and(|b| value <= b),
            BracketOp::Gt => self.value.is_some_and(|b| value > b),
            BracketOp::Gte => self.value.is_some_and(|b| value >= b),
            BracketOp::Between => {
                let lo = self.min.unwrap_or(f64::NEG_INFINITY);
                let hi = self.max.unwrap_or(f64::INFINITY);
                lo <= value && value <= hi
            }
        }
    }
}

/// One `count × per_unit` term of a capped sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTerm {
    pub field: String,
    pub per_unit: f64,
}

/// One question range of a survey aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySection {
    pub kind: SurveyKind,
    pub start: u32,
    pub end: u32,
}

/// How an observation point turns raw facts into a raw score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
    /// Yes/no structural fact: `true → points`, anything else → 0.
    Boolean { field: String, points: f64 },

    /// Ordered threshold table over a numeric fact, first match wins.
    Bracket {
        field: String,
        rules: Vec<BracketRule>,
    },

    /// Enumerated fact mapped through a points table; unknown or unset
    /// choices score 0.
    Choice {
        field: String,
        points: std::collections::BTreeMap<String, f64>,
    },

    /// `min(Σ count_i × per_unit_i, cap)`.
    UnitSum { terms: Vec<UnitTerm>, cap: f64 },

    /// Sum of independently computed child strategies, optionally capped.
    Sum {
        items: Vec<Strategy>,
        #[serde(default)]
        cap: Option<f64>,
    },

    /// Boolean gate over a sum: a false (or unset) gate zeroes the whole
    /// observation point regardless of populated sub-items.
    Cascade {
        gate: String,
        items: Vec<Strategy>,
    },

    /// Mean-of-response-sums over one or more survey question ranges.
    Survey { sections: Vec<SurveySection> },

    /// Document count contribution plus assessor quality contribution,
    /// each independently capped, behind a boolean gate.
    DocQuality {
        gate: String,
        category: DocCategory,
        count_field: String,
        per_doc: f64,
        count_cap: f64,
        quality_cap: f64,
    },

    /// Adverse-event item: occurrence yields normalized 0, absence yields
    /// normalized 5, bypassing normalization entirely.
    Penalty { field: String },
}

impl Strategy {
    pub fn is_penalty(&self) -> bool {
        matches!(self, Self::Penalty { .. })
    }
}
