use std::error::Error;

use super::ModuleStatus;
use crate::model::Assessment;
use crate::report_helpers;

/// Print per-dimension readiness and the overall progress percentage.
pub fn print_report(status: &ModuleStatus, assessment: &Assessment) {
    let separator = report_helpers::separator(40);

    println!("Submission Progress: {}", assessment.school);
    println!("{separator}");
    println!(" Status:   {}", assessment.status);
    println!(" Progress: {}%", status.progress);
    println!("{separator}");

    let rows = [
        ("Literacy (surveys)", status.literacy),
        ("Institution", status.institution),
        ("Behavior", status.behavior),
        ("Asset", status.asset),
        ("Technology", status.technology),
    ];
    for (name, complete) in rows {
        let mark = if complete { "complete" } else { "missing data" };
        println!(" {name:<20} {mark}");
    }
}

pub fn print_json(status: &ModuleStatus) -> Result<(), Box<dyn Error>> {
    report_helpers::print_json_stdout(status)
}
