//! Document-quality scoring: the one asynchronous, non-deterministic input
//! to the pipeline, fenced off behind a cache and layered fallbacks so it
//! can never corrupt or block the deterministic part.
//!
//! Quality scoring for a given (assessment, category) runs at most once:
//! the result is cached on the institution record and every later run
//! short-circuits to the stored score without touching the assessor.

mod client;
mod extract;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

pub use client::LlmAssessor;

use crate::model::facts::{DocAnalysis, DocumentRef, InstitutionFacts};
use crate::rules::strategy::DocCategory;

/// Assessor reply: a bounded numeric score plus free-text rationale.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub score: f64,
    pub analysis: String,
}

/// External text-quality oracle. Implementations must return within a
/// bounded window or error; the caller decides the fallback.
pub trait QualityAssessor {
    fn assess(
        &self,
        text: &str,
        category: DocCategory,
        max_score: f64,
    ) -> Result<Verdict, Box<dyn std::error::Error>>;
}

#[derive(Debug, Default)]
struct CategoryState {
    docs: Vec<DocumentRef>,
    cache: DocAnalysis,
}

/// Per-run document scorer. Owns copies of the two category caches; the
/// orchestrator writes them back onto the institution record afterwards.
pub struct DocScorer<'a> {
    assessor: Option<&'a dyn QualityAssessor>,
    docs_root: PathBuf,
    management: CategoryState,
    practice: CategoryState,
}

impl<'a> DocScorer<'a> {
    pub fn new(
        institution: Option<&InstitutionFacts>,
        assessor: Option<&'a dyn QualityAssessor>,
        docs_root: &Path,
    ) -> Self {
        let (management, practice) = match institution {
            Some(inst) => (
                CategoryState {
                    docs: inst.management_doc_files.clone(),
                    cache: inst.management_doc_analysis.clone(),
                },
                CategoryState {
                    docs: inst.practice_doc_files.clone(),
                    cache: inst.practice_doc_analysis.clone(),
                },
            ),
            None => Default::default(),
        };
        Self {
            assessor,
            docs_root: docs_root.to_path_buf(),
            management,
            practice,
        }
    }

    fn state_mut(&mut self, category: DocCategory) -> &mut CategoryState {
        match category {
            DocCategory::Management => &mut self.management,
            DocCategory::Practice => &mut self.practice,
        }
    }

    /// Aggregate quality score for one category, capped at `cap`.
    ///
    /// Resolution order: cached result → no documents (0) → assessor
    /// disabled (half cap) → per-document assessment with per-document
    /// half-cap fallback, averaged and cached. One bad document never
    /// blocks scoring the rest; nothing here raises.
    pub fn quality_score(&mut self, category: DocCategory, cap: f64) -> f64 {
        let docs_root = self.docs_root.clone();
        let assessor = self.assessor;
        let state = self.state_mut(category);

        if state.cache.scored {
            info!(
                "using cached {} document analysis (score {:.2})",
                category.as_str(),
                state.cache.score
            );
            return state.cache.score.min(cap);
        }
        if state.docs.is_empty() {
            return 0.0;
        }
        let Some(assessor) = assessor else {
            warn!(
                "document-quality assessor disabled; scoring {} documents at half weight",
                category.as_str()
            );
            return cap / 2.0;
        };

        let mut total = 0.0;
        let mut scored = 0usize;
        let mut rationales: Vec<String> = Vec::new();

        for doc in &state.docs {
            if doc.path.trim().is_empty() {
                continue;
            }
            let text = match extract::read_document(&docs_root, &doc.path) {
                Ok(t) => t,
                Err(e) => {
                    warn!("cannot read document {}: {e}", doc.name);
                    total += cap / 2.0;
                    scored += 1;
                    continue;
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            match assessor.assess(&text, category, cap) {
                Ok(verdict) => {
                    total += verdict.score;
                    scored += 1;
                    rationales.push(format!("【{}】\n{}", doc.name, verdict.analysis));
                }
                Err(e) => {
                    warn!("assessor failed on document {}: {e}", doc.name);
                    total += cap / 2.0;
                    scored += 1;
                }
            }
        }

        let score = if scored > 0 {
            (total / scored as f64).min(cap)
        } else {
            cap / 2.0
        };

        state.cache = DocAnalysis {
            scored: true,
            score,
            analysis: rationales.join("\n\n"),
        };
        score
    }

    /// Updated category caches, for write-back onto the institution record.
    pub fn into_caches(self) -> (DocAnalysis, DocAnalysis) {
        (self.management.cache, self.practice.cache)
    }
}

/// Extract the assessor's score from its free-form reply.
///
/// Patterns are tried in priority order (the labelled 总评分 first, a bare
/// `N分` last) and the value is clamped to `[0, max_score]`. No match
/// falls back to half the maximum.
pub fn extract_score(text: &str, max_score: f64) -> f64 {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r"总评分[:：]\s*(\d+(?:\.\d+)?)\s*分",
            r"总分[:：]\s*(\d+(?:\.\d+)?)\s*分",
            r"评分[:：]\s*(\d+(?:\.\d+)?)\s*分",
            r"得分[:：]\s*(\d+(?:\.\d+)?)\s*分",
            r"(\d+(?:\.\d+)?)\s*分",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    for pattern in patterns {
        if let Some(caps) = pattern.captures(text)
            && let Ok(score) = caps[1].parse::<f64>()
        {
            return score.clamp(0.0, max_score);
        }
    }
    warn!("no score found in assessor reply; using half of max");
    max_score / 2.0
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
