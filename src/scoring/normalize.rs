//! Normalization and weighted aggregation, the two pure functions the
//! whole pipeline is built from.
//!
//! Every observation point normalizes to the common 0–5 band, and every
//! aggregation is a weighted sum whose group weights sum to 1, so the
//! result stays on the 0–5 band at every level. Violating that invariant
//! takes a configuration bug (weight sum ≠ 1), which `validate` catches.

use std::collections::BTreeMap;

use tracing::warn;

/// Map a raw score on an item-specific scale to the canonical 0–5 band:
/// `(raw / max) × 5`, clamped to `[0, 5]`. A non-positive max yields 0.
///
/// No published strategy produces a negative raw score (the penalty item
/// bypasses this function entirely), but the rule table does not
/// type-guarantee it, so the clamp covers both ends.
pub fn normalize(raw: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (raw / max * 5.0).clamp(0.0, 5.0)
}

/// Weighted sum of child scores over a group's codes. A code with no score
/// contributes 0; a code with no weight entry contributes 0 and is logged,
/// since that usually means a rule-table gap.
pub fn aggregate(
    scores: &BTreeMap<String, f64>,
    weights: &BTreeMap<String, f64>,
    codes: &[String],
) -> f64 {
    let mut total = 0.0;
    for code in codes {
        let score = scores.get(code).copied().unwrap_or(0.0);
        let weight = match weights.get(code) {
            Some(w) => *w,
            None => {
                warn!("no weight entry for {code}; contributing 0");
                0.0
            }
        };
        total += score * weight;
    }
    total
}

/// Round to the 4-decimal precision the score fields persist at.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
