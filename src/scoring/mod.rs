//! Scoring orchestrator: sequences the five dimensions through the
//! three-tier aggregation hierarchy and drives the assessment state
//! machine around the compute phase.
//!
//! Per dimension: pull raw facts → raw score per observation point via its
//! rule-table strategy → normalize to 0–5 → aggregate observation scores
//! into secondary indicators → aggregate those into the dimension score.
//! The total is the weighted sum of the five dimension scores, and the
//! maturity level is read off the band table.

pub mod eval;
pub mod normalize;
pub mod report;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::docqual::{DocScorer, QualityAssessor};
use crate::model::facts::{FactSource, NoFacts};
use crate::model::survey::{SurveyKind, SurveyPool};
use crate::model::{MaturityLevel, ScoreFields};
use crate::rules::RuleTable;
use crate::store::Bundle;

use eval::{EvalCtx, eval_observation};
use normalize::{aggregate, round4};

/// Full result of one scoring run: every level of the hierarchy, for
/// reporting and persistence.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreOutcome {
    pub observation: BTreeMap<String, f64>,
    pub secondary: BTreeMap<String, f64>,
    pub dimension: BTreeMap<String, f64>,
    pub total: f64,
    pub level: MaturityLevel,
}

impl ScoreOutcome {
    fn dimension_score(&self, code: &str) -> f64 {
        self.dimension.get(code).copied().unwrap_or(0.0)
    }

    /// The six persisted fields, rounded to storage precision.
    pub fn score_fields(&self) -> ScoreFields {
        ScoreFields {
            literacy: round4(self.dimension_score("A")),
            institution: round4(self.dimension_score("B")),
            behavior: round4(self.dimension_score("C")),
            asset: round4(self.dimension_score("D")),
            technology: round4(self.dimension_score("E")),
            total: round4(self.total),
        }
    }
}

/// Human-readable dimension name for a letter code.
pub fn dimension_name(code: &str) -> &'static str {
    match code {
        "A" => "Literacy",
        "B" => "Institution",
        "C" => "Behavior",
        "D" => "Asset",
        "E" => "Technology",
        _ => "Unknown",
    }
}

/// Run the state machine around one scoring attempt: flip to `analyzing`,
/// compute, persist scores + `completed` on success; roll the status back
/// to `draft` on failure so the record never sticks mid-flight.
pub fn run(
    bundle: &mut Bundle,
    rules: &RuleTable,
    assessor: Option<&dyn QualityAssessor>,
    docs_root: &Path,
) -> Result<ScoreOutcome, Box<dyn Error>> {
    bundle.assessment.begin_scoring()?;
    info!(
        "scoring assessment {} ({})",
        bundle.assessment.id, bundle.assessment.school
    );

    match compute_scores(bundle, rules, assessor, docs_root) {
        Ok((outcome, caches)) => {
            if let (Some(inst), Some((management, practice))) = (&mut bundle.institution, caches) {
                inst.management_doc_analysis = management;
                inst.practice_doc_analysis = practice;
            }
            bundle.assessment.complete_scoring(
                outcome.score_fields(),
                outcome.level,
                Utc::now(),
            );
            info!(
                "assessment {} scored: total {:.4}, level {}",
                bundle.assessment.id, outcome.total, outcome.level
            );
            Ok(outcome)
        }
        Err(e) => {
            warn!(
                "scoring assessment {} failed, rolling back to draft: {e}",
                bundle.assessment.id
            );
            bundle.assessment.rollback_scoring();
            Err(e)
        }
    }
}

type DocCaches = Option<(
    crate::model::facts::DocAnalysis,
    crate::model::facts::DocAnalysis,
)>;

/// Pure compute phase: no status changes, no persistence. Returns the
/// outcome plus the (possibly updated) document-analysis caches.
pub fn compute_scores(
    bundle: &Bundle,
    rules: &RuleTable,
    assessor: Option<&dyn QualityAssessor>,
    docs_root: &Path,
) -> Result<(ScoreOutcome, DocCaches), Box<dyn Error>> {
    let surveys = SurveyPool::from_instances(&bundle.surveys);
    for kind in SurveyKind::ALL {
        if surveys.responses(kind).is_empty() {
            warn!(
                "no {} survey responses collected; {} survey items score 0",
                kind.as_str(),
                kind.as_str()
            );
        }
    }
    let mut docqual = DocScorer::new(bundle.institution.as_ref(), assessor, docs_root);

    let mut observation: BTreeMap<String, f64> = BTreeMap::new();
    let mut secondary: BTreeMap<String, f64> = BTreeMap::new();
    let mut dimension: BTreeMap<String, f64> = BTreeMap::new();

    for dim in rules.dimension_codes() {
        let facts = dimension_facts(bundle, dim);
        let score = match facts {
            Some(facts) => score_dimension(
                dim,
                facts,
                rules,
                &surveys,
                &mut docqual,
                &mut observation,
                &mut secondary,
            ),
            None => {
                warn!(
                    "no {} sub-record for assessment {}; dimension scores 0",
                    dimension_name(dim),
                    bundle.assessment.id
                );
                0.0
            }
        };
        info!("dimension {dim} ({}) = {score:.4}", dimension_name(dim));
        dimension.insert(dim.to_string(), score);
    }

    let dimension_codes: Vec<String> = dimension.keys().cloned().collect();
    let total = aggregate(&dimension, &rules.dimension_weights, &dimension_codes);
    let level = rules.classify(total);
    info!("total = {total:.4}, maturity level = {level}");

    let caches = bundle.institution.as_ref().map(|_| docqual.into_caches());
    Ok((
        ScoreOutcome {
            observation,
            secondary,
            dimension,
            total,
            level,
        },
        caches,
    ))
}

/// Fact source for one dimension. Literacy is survey-only and always has
/// an (empty) source; the other four require their sub-record.
fn dimension_facts<'a>(bundle: &'a Bundle, dim: &str) -> Option<&'a dyn FactSource> {
    static NO_FACTS: NoFacts = NoFacts;
    match dim {
        "A" => Some(&NO_FACTS),
        "B" => bundle.institution.as_ref().map(|f| f as &dyn FactSource),
        "C" => bundle.behavior.as_ref().map(|f| f as &dyn FactSource),
        "D" => bundle.asset.as_ref().map(|f| f as &dyn FactSource),
        "E" => bundle.technology.as_ref().map(|f| f as &dyn FactSource),
        _ => None,
    }
}

fn score_dimension(
    dim: &str,
    facts: &dyn FactSource,
    rules: &RuleTable,
    surveys: &SurveyPool,
    docqual: &mut DocScorer,
    observation: &mut BTreeMap<String, f64>,
    secondary: &mut BTreeMap<String, f64>,
) -> f64 {
    let mut ctx = EvalCtx {
        facts,
        surveys,
        docqual,
    };

    for rule in rules.observations_for(dim) {
        let score = eval_observation(rule, &mut ctx);
        debug!("observation {} ({}) = {score:.4}", rule.code, rule.name);
        observation.insert(rule.code.clone(), score);
    }

    let groups = rules.secondary_groups(dim);
    for (group, members) in &groups {
        let score = aggregate(observation, &rules.observation_weights, members);
        debug!("secondary {group} = {score:.4}");
        secondary.insert(group.clone(), score);
    }

    let group_codes: Vec<String> = groups.keys().cloned().collect();
    aggregate(secondary, &rules.secondary_weights, &group_codes)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
