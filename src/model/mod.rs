//! Core data model: the assessment record, its lifecycle states, and the
//! derived maturity level.
//!
//! Scores live on the assessment as optional fields so that an unscored
//! record is distinguishable from a scored one: either all five dimension
//! scores plus the total are set, or none are. The maturity level is set
//! iff the total is.

pub mod facts;
pub mod survey;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of one assessment cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Collecting,
    Analyzing,
    Completed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Collecting => "collecting",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
        }
    }

    /// Sub-records and survey responses may only change while drafting.
    pub fn allows_edits(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical maturity band derived from the total 0–5 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaturityLevel {
    Initial,
    Growing,
    Mature,
    Leading,
}

impl MaturityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Growing => "growing",
            Self::Mature => "mature",
            Self::Leading => "leading",
        }
    }

    /// Display name used on published reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Initial => "初始级",
            Self::Growing => "成长级",
            Self::Mature => "成熟级",
            Self::Leading => "引领级",
        }
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evaluation cycle for one school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub school: String,
    #[serde(default)]
    pub status: Status,

    pub literacy_score: Option<f64>,
    pub institution_score: Option<f64>,
    pub behavior_score: Option<f64>,
    pub asset_score: Option<f64>,
    pub technology_score: Option<f64>,
    pub total_score: Option<f64>,
    pub maturity_level: Option<MaturityLevel>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// All six persisted score fields, rounded for storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreFields {
    pub literacy: f64,
    pub institution: f64,
    pub behavior: f64,
    pub asset: f64,
    pub technology: f64,
    pub total: f64,
}

impl Assessment {
    /// Enter the compute phase. Scoring may start from `draft` or
    /// `collecting` (a first submission) and from `completed` (a re-run,
    /// which overwrites the previous scores). A record already `analyzing`
    /// is rejected so two runs cannot interleave.
    pub fn begin_scoring(&mut self) -> Result<(), String> {
        match self.status {
            Status::Analyzing => Err(format!(
                "assessment {} is already being scored",
                self.id
            )),
            _ => {
                self.status = Status::Analyzing;
                Ok(())
            }
        }
    }

    /// Persist a successful scoring run: all score fields together, the
    /// derived level, the completion timestamp, and the status flip.
    pub fn complete_scoring(
        &mut self,
        scores: ScoreFields,
        level: MaturityLevel,
        completed_at: DateTime<Utc>,
    ) {
        self.literacy_score = Some(scores.literacy);
        self.institution_score = Some(scores.institution);
        self.behavior_score = Some(scores.behavior);
        self.asset_score = Some(scores.asset);
        self.technology_score = Some(scores.technology);
        self.total_score = Some(scores.total);
        self.maturity_level = Some(level);
        self.completed_at = Some(completed_at);
        self.status = Status::Completed;
    }

    /// Failure path: restore editability instead of leaving the record
    /// stuck in `analyzing`. Previously persisted scores are untouched.
    pub fn rollback_scoring(&mut self) {
        self.status = Status::Draft;
    }

    /// Scores are either all present or all absent.
    pub fn scores_consistent(&self) -> bool {
        let fields = [
            self.literacy_score,
            self.institution_score,
            self.behavior_score,
            self.asset_score,
            self.technology_score,
            self.total_score,
        ];
        let set = fields.iter().filter(|f| f.is_some()).count();
        let all_or_none = set == 0 || set == fields.len();
        all_or_none && (self.maturity_level.is_some() == self.total_score.is_some())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
