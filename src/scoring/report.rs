use std::error::Error;

use super::{ScoreOutcome, dimension_name};
use crate::model::Assessment;
use crate::report_helpers;
use crate::rules::RuleTable;

/// Print the scoring result as a formatted table: per-dimension weights
/// and scores, the total with its maturity level, and the full
/// observation-point breakdown per dimension.
pub fn print_report(outcome: &ScoreOutcome, assessment: &Assessment, rules: &RuleTable) {
    let separator = report_helpers::separator(58);

    println!("Data-Culture Maturity Score: {}", assessment.school);
    println!("{separator}");
    println!(
        " {:<14} {:<6} {:>7} {:>8}",
        "Dimension", "Code", "Weight", "Score"
    );
    println!("{separator}");

    for code in rules.dimension_codes() {
        let weight = rules.dimension_weights.get(code).copied().unwrap_or(0.0);
        let score = outcome.dimension.get(code).copied().unwrap_or(0.0);
        println!(
            " {:<14} {:<6} {:>6.1}% {:>8.4}",
            dimension_name(code),
            code,
            weight * 100.0,
            score
        );
    }

    println!("{separator}");
    println!(" {:<21} {:>15.4}", "Total (0-5)", outcome.total);
    println!(
        " {:<21} {:>15}",
        "Maturity level",
        format!("{} ({})", outcome.level, outcome.level.label())
    );
    println!("{separator}");

    for code in rules.dimension_codes() {
        println!();
        println!(" {} ({code})", dimension_name(code));
        for (group, members) in rules.secondary_groups(code) {
            let group_score = outcome.secondary.get(&group).copied().unwrap_or(0.0);
            println!("   {group:<6} {group_score:>8.4}");
            for member in members {
                let score = outcome.observation.get(&member).copied().unwrap_or(0.0);
                let name = rules.rule(&member).map(|r| r.name.as_str()).unwrap_or("");
                println!("     {member:<6} {score:>8.4}  {name}");
            }
        }
    }
}

pub fn print_json(outcome: &ScoreOutcome) -> Result<(), Box<dyn Error>> {
    report_helpers::print_json_stdout(outcome)
}
