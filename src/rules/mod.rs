//! The rule table: a versioned, immutable configuration object describing
//! how every observation point is scored and how scores roll up.
//!
//! Loaded once at startup (embedded default or `--rules` file) and passed
//! by reference into the scoring orchestrator, so tests can substitute
//! alternate tables without global state.

pub mod strategy;

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::MaturityLevel;
use strategy::Strategy;

/// The published default rule set, shipped inside the binary.
const DEFAULT_RULES: &str = include_str!("default.toml");

/// Weight-sum tolerance for group validation.
const WEIGHT_EPSILON: f64 = 1e-6;

/// One maturity band: totals at or above `min` classify as `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityBand {
    pub min: f64,
    pub level: MaturityLevel,
}

/// One scored observation point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRule {
    /// Observation-point code, e.g. `B31`.
    pub code: String,
    /// Secondary-indicator group this point aggregates into, e.g. `B3`.
    /// Explicit because grouping does not always follow the code prefix
    /// (the dedicated-cloud item `E13` sits in its own group `E3`).
    pub secondary: String,
    pub name: String,
    /// Maximum attainable raw score; 0 only for penalty items, which
    /// bypass normalization.
    pub max_score: f64,
    pub strategy: Strategy,
}

impl ObservationRule {
    /// Dimension letter, the first character of the secondary code. An
    /// empty or non-ASCII secondary code (rejected by `validate`) yields
    /// an empty dimension rather than panicking mid-validation.
    pub fn dimension(&self) -> &str {
        self.secondary.get(..1).unwrap_or("")
    }
}

/// Whether a group code starts with an ASCII dimension letter, which is
/// what makes the one-byte prefix slices below well-defined.
fn valid_group_code(code: &str) -> bool {
    code.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    pub dimension_weights: BTreeMap<String, f64>,
    pub secondary_weights: BTreeMap<String, f64>,
    pub observation_weights: BTreeMap<String, f64>,
    pub maturity_bands: Vec<MaturityBand>,
    pub observations: Vec<ObservationRule>,
}

/// Validation outcome: hard errors block loading, warnings describe
/// degrade-to-zero gaps (e.g. a secondary group with no weight entry).
#[derive(Debug, Default)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RuleTable {
    /// Parse and validate the embedded default table.
    pub fn embedded() -> Result<Self, Box<dyn Error>> {
        Self::parse(DEFAULT_RULES, "<embedded>")
    }

    /// Parse and validate an alternate table from disk.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, Box<dyn Error>> {
        let mut table: RuleTable =
            toml::from_str(text).map_err(|e| format!("invalid rule table {origin}: {e}"))?;
        // Highest band first, so classification is a simple scan.
        table
            .maturity_bands
            .sort_by(|a, b| b.min.total_cmp(&a.min));
        let findings = table.validate();
        if let Some(err) = findings.errors.first() {
            return Err(format!("rule table {origin}: {err}").into());
        }
        for warning in &findings.warnings {
            tracing::warn!("rule table {origin}: {warning}");
        }
        Ok(table)
    }

    /// Dimension letters in table order.
    pub fn dimension_codes(&self) -> Vec<&str> {
        self.dimension_weights.keys().map(String::as_str).collect()
    }

    pub fn observations_for(&self, dimension: &str) -> impl Iterator<Item = &ObservationRule> {
        self.observations
            .iter()
            .filter(move |o| o.dimension() == dimension)
    }

    /// Secondary groups of a dimension: group code → member observation
    /// codes. Groups come back in code order; members within a group keep
    /// their table order.
    pub fn secondary_groups(&self, dimension: &str) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for obs in self.observations_for(dimension) {
            groups
                .entry(obs.secondary.clone())
                .or_default()
                .push(obs.code.clone());
        }
        groups
    }

    pub fn rule(&self, code: &str) -> Option<&ObservationRule> {
        self.observations.iter().find(|o| o.code == code)
    }

    /// Maturity level for a 0–5 total: first band whose floor the total
    /// reaches; totals below every floor take the lowest band.
    pub fn classify(&self, total: f64) -> MaturityLevel {
        self.maturity_bands
            .iter()
            .find(|b| total >= b.min)
            .or_else(|| self.maturity_bands.last())
            .map(|b| b.level)
            .unwrap_or(MaturityLevel::Initial)
    }

    /// Check every structural invariant of the table.
    pub fn validate(&self) -> Findings {
        let mut f = Findings::default();

        check_weight_sum(
            "dimension_weights",
            self.dimension_weights.values().sum(),
            &mut f.errors,
        );

        // Secondary weights must sum to 1 within each dimension group.
        let mut by_dimension: BTreeMap<&str, f64> = BTreeMap::new();
        for (code, weight) in &self.secondary_weights {
            if !valid_group_code(code) {
                f.errors.push(format!(
                    "secondary weight key {code:?} does not start with an ASCII dimension letter"
                ));
                continue;
            }
            *by_dimension.entry(&code[..1]).or_default() += weight;
        }
        for (dim, sum) in by_dimension {
            check_weight_sum(&format!("secondary_weights[{dim}]"), sum, &mut f.errors);
        }

        // Observation weights must sum to 1 within each secondary group.
        for dim in self.dimension_codes() {
            for (group, members) in self.secondary_groups(dim) {
                let sum: f64 = members
                    .iter()
                    .map(|code| self.observation_weights.get(code).copied().unwrap_or(0.0))
                    .sum();
                check_weight_sum(&format!("observation_weights[{group}]"), sum, &mut f.errors);
                if !self.secondary_weights.contains_key(&group) {
                    f.warnings.push(format!(
                        "secondary group {group} has no weight entry; it will contribute 0"
                    ));
                }
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for obs in &self.observations {
            if !seen.insert(obs.code.as_str()) {
                f.errors.push(format!("duplicate observation code {}", obs.code));
            }
            if obs.max_score <= 0.0 && !obs.strategy.is_penalty() {
                f.errors.push(format!(
                    "observation {} has max_score {} (must be > 0 unless penalty)",
                    obs.code, obs.max_score
                ));
            }
            if !valid_group_code(&obs.secondary) {
                f.errors.push(format!(
                    "observation {} has secondary code {:?}; group codes must \
                     start with an ASCII dimension letter",
                    obs.code, obs.secondary
                ));
            } else {
                if !obs.code.starts_with(obs.dimension()) {
                    f.warnings.push(format!(
                        "observation {} is grouped under {} outside its code prefix",
                        obs.code, obs.secondary
                    ));
                }
                if !self.dimension_weights.contains_key(obs.dimension()) {
                    f.errors.push(format!(
                        "observation {} belongs to dimension {} which has no weight",
                        obs.code,
                        obs.dimension()
                    ));
                }
            }
            if !self.observation_weights.contains_key(&obs.code) {
                f.warnings.push(format!(
                    "observation {} has no weight entry; it will contribute 0",
                    obs.code
                ));
            }
        }
        for code in self.observation_weights.keys() {
            if self.rule(code).is_none() {
                f.warnings
                    .push(format!("observation weight {code} has no matching rule"));
            }
        }

        if self.maturity_bands.is_empty() {
            f.errors.push("maturity_bands is empty".to_string());
        } else if self.maturity_bands.last().is_some_and(|b| b.min > 0.0) {
            f.errors
                .push("maturity_bands does not cover totals down to 0".to_string());
        }

        f
    }
}

fn check_weight_sum(group: &str, sum: f64, errors: &mut Vec<String>) {
    if (sum - 1.0).abs() > WEIGHT_EPSILON {
        errors.push(format!("{group} sums to {sum:.6}, expected 1.0"));
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
