//! Strategy evaluation: one exhaustive match turning raw facts into the
//! raw score of an observation point.

use crate::docqual::DocScorer;
use crate::model::facts::FactSource;
use crate::model::survey::SurveyPool;
use crate::rules::ObservationRule;
use crate::rules::strategy::Strategy;

use super::normalize::normalize;

/// Everything a strategy may consult: the dimension's fact sub-record, the
/// pooled survey responses, and the document-quality scorer.
pub struct EvalCtx<'a, 'b> {
    pub facts: &'a dyn FactSource,
    pub surveys: &'a SurveyPool,
    pub docqual: &'a mut DocScorer<'b>,
}

/// Normalized 0–5 score of one observation point.
///
/// The penalty strategy is the one structural special case: it assigns the
/// band endpoints directly (occurrence → 0, absence → 5) instead of going
/// through `normalize`.
pub fn eval_observation(rule: &ObservationRule, ctx: &mut EvalCtx) -> f64 {
    match &rule.strategy {
        Strategy::Penalty { field } => {
            if ctx.facts.fact(field).truthy() {
                0.0
            } else {
                5.0
            }
        }
        strategy => normalize(eval_raw(strategy, ctx), rule.max_score),
    }
}

/// Raw score of a strategy on its item-specific scale.
pub fn eval_raw(strategy: &Strategy, ctx: &mut EvalCtx) -> f64 {
    match strategy {
        Strategy::Boolean { field, points } => {
            if ctx.facts.fact(field).truthy() {
                *points
            } else {
                0.0
            }
        }

        Strategy::Bracket { field, rules } => {
            let value = ctx.facts.fact(field).num();
            rules
                .iter()
                .find(|r| r.matches(value))
                .map(|r| r.points)
                .unwrap_or(0.0)
        }

        Strategy::Choice { field, points } => ctx
            .facts
            .fact(field)
            .choice()
            .and_then(|c| points.get(c))
            .copied()
            .unwrap_or(0.0),

        Strategy::UnitSum { terms, cap } => {
            let sum: f64 = terms
                .iter()
                .map(|t| ctx.facts.fact(&t.field).num() * t.per_unit)
                .sum();
            sum.min(*cap)
        }

        Strategy::Sum { items, cap } => {
            let sum: f64 = items.iter().map(|item| eval_raw(item, ctx)).sum();
            match cap {
                Some(c) => sum.min(*c),
                None => sum,
            }
        }

        Strategy::Cascade { gate, items } => {
            if !ctx.facts.fact(gate).truthy() {
                return 0.0;
            }
            items.iter().map(|item| eval_raw(item, ctx)).sum()
        }

        Strategy::Survey { sections } => sections
            .iter()
            .map(|s| ctx.surveys.raw_score(s.kind, s.start, s.end))
            .sum(),

        Strategy::DocQuality {
            gate,
            category,
            count_field,
            per_doc,
            count_cap,
            quality_cap,
        } => {
            if !ctx.facts.fact(gate).truthy() {
                return 0.0;
            }
            let count_score = (ctx.facts.fact(count_field).num() * per_doc).min(*count_cap);
            let quality_score = ctx.docqual.quality_score(*category, *quality_cap);
            count_score + quality_score
        }

        // Handled in eval_observation; raw-score evaluation never sees it.
        Strategy::Penalty { .. } => 0.0,
    }
}

#[cfg(test)]
#[path = "eval_test.rs"]
mod tests;
