/// CLI argument definitions for the `dcm` command.
///
/// Defines all subcommands and their arguments using the `clap` derive
/// macros.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(
    name = "dcm",
    version,
    about = "School data-culture maturity assessment tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Score an assessment bundle and persist the results
    #[command(long_about = "\
Score an assessment bundle and persist the results.

Runs the full scoring pipeline: every observation point is computed from
the raw facts via the rule table, normalized to the 0-5 band, and rolled
up through secondary indicators and dimensions into a weighted total.
The five dimension scores, the total, the derived maturity level, and the
completion timestamp are written back into the bundle file together.

Document-quality observation points call an external assessor (configure
DATACULT_API_KEY, and optionally DATACULT_API_BASE / DATACULT_MODEL);
without a key, or with --offline, they fall back to half weight. On a
transient failure the assessment is rolled back to draft and re-attempted
up to --retries times.")]
    Score {
        /// Assessment bundle file (JSON)
        bundle: PathBuf,

        /// Alternate rule table (TOML); default: the embedded table
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Base directory for uploaded-document paths
        #[arg(long, default_value = ".")]
        docs_root: PathBuf,

        /// Disable the external document-quality assessor
        #[arg(long)]
        offline: bool,

        /// Re-attempts after a transient scoring failure
        #[arg(long, default_value = "3")]
        retries: u32,

        /// Compute and print without persisting
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-dimension completeness and submission progress
    Status {
        /// Assessment bundle file (JSON)
        bundle: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a rule table: weight sums, strategy parameters, bands
    Validate {
        /// Rule table to check (TOML); default: the embedded table
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}
