mod cli;
mod docqual;
mod model;
mod report_helpers;
mod rules;
mod scoring;
mod status;
mod store;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use docqual::{LlmAssessor, QualityAssessor};
use rules::RuleTable;
use store::Bundle;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            bundle,
            rules,
            docs_root,
            offline,
            retries,
            dry_run,
            json,
        } => cmd_score(
            &bundle, rules.as_deref(), &docs_root, offline, retries, dry_run, json,
        ),
        Commands::Status { bundle, json } => cmd_status(&bundle, json),
        Commands::Validate { rules } => cmd_validate(rules.as_deref()),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_rules(path: Option<&Path>) -> Result<RuleTable, Box<dyn Error>> {
    match path {
        Some(p) => RuleTable::load(p),
        None => RuleTable::embedded(),
    }
}

fn cmd_score(
    bundle_path: &PathBuf,
    rules_path: Option<&Path>,
    docs_root: &Path,
    offline: bool,
    retries: u32,
    dry_run: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let rules = load_rules(rules_path)?;
    let mut bundle = Bundle::load(bundle_path)?;

    let assessor: Option<LlmAssessor> = if offline { None } else { LlmAssessor::from_env() };
    if assessor.is_none() && !offline {
        warn!("DATACULT_API_KEY not set; document quality falls back to half weight");
    }
    let assessor_ref = assessor.as_ref().map(|a| a as &dyn QualityAssessor);

    // Bounded re-attempts stand in for the external task queue's retry
    // policy; each failure has already rolled the record back to draft.
    let mut attempt = 0;
    let outcome = loop {
        match scoring::run(&mut bundle, &rules, assessor_ref, docs_root) {
            Ok(outcome) => break outcome,
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!("scoring attempt {attempt} failed, retrying: {e}");
                if !dry_run {
                    bundle.save(bundle_path)?;
                }
            }
            Err(e) => {
                if !dry_run {
                    bundle.save(bundle_path)?;
                }
                return Err(e);
            }
        }
    };

    if !dry_run {
        bundle.save(bundle_path)?;
    }

    if json {
        scoring::report::print_json(&outcome)?;
    } else {
        scoring::report::print_report(&outcome, &bundle.assessment, &rules);
    }
    Ok(())
}

fn cmd_status(bundle_path: &PathBuf, json: bool) -> Result<(), Box<dyn Error>> {
    let bundle = Bundle::load(bundle_path)?;
    let status = status::compute(&bundle);
    if json {
        status::print_json(&status)?;
    } else {
        status::print_report(&status, &bundle.assessment);
    }
    Ok(())
}

fn cmd_validate(rules_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    // Load without the load-time error cutoff so every finding is shown.
    let table = match rules_path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| format!("cannot read {}: {e}", p.display()))?;
            toml::from_str::<RuleTable>(&text)
                .map_err(|e| format!("invalid rule table {}: {e}", p.display()))?
        }
        None => RuleTable::embedded()?,
    };

    let findings = table.validate();
    for warning in &findings.warnings {
        println!("warning: {warning}");
    }
    if findings.errors.is_empty() {
        println!(
            "rule table ok: {} observation points, {} dimensions",
            table.observations.len(),
            table.dimension_weights.len()
        );
        Ok(())
    } else {
        for error in &findings.errors {
            println!("error: {error}");
        }
        Err(format!("{} validation error(s)", findings.errors.len()).into())
    }
}
