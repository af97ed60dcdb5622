//! File-backed assessment bundle: one JSON document holding the assessment
//! record, its four fact sub-records, and the collected survey responses.
//!
//! The whole document is written in a single call, so a scoring run either
//! persists all score fields together or none of them.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Assessment;
use crate::model::facts::{AssetFacts, BehaviorFacts, InstitutionFacts, TechnologyFacts};
use crate::model::survey::SurveyInstance;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub assessment: Assessment,
    #[serde(default)]
    pub institution: Option<InstitutionFacts>,
    #[serde(default)]
    pub behavior: Option<BehaviorFacts>,
    #[serde(default)]
    pub asset: Option<AssetFacts>,
    #[serde(default)]
    pub technology: Option<TechnologyFacts>,
    #[serde(default)]
    pub surveys: Vec<SurveyInstance>,
}

impl Bundle {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let bundle: Bundle = serde_json::from_str(&text)
            .map_err(|e| format!("invalid assessment bundle {}: {e}", path.display()))?;
        Ok(bundle)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
