//! Catalog of basecalling models accepted by the alignment stage

use crate::core::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used when the caller does not name one
pub const DEFAULT_MODEL: &str = "dna_r10.4.1_e8.2_4khz_stereo@v1.1";

/// Known dorado model names, in display order
const MODELS: &[&str] = &[
    "dna_r10.4.1_e8.2_260bps_fast@v3.5.2",
    "dna_r10.4.1_e8.2_260bps_fast@v3.5.2_5mCG@v2",
    "dna_r10.4.1_e8.2_260bps_fast@v4.0.0",
    "dna_r10.4.1_e8.2_260bps_fast@v4.0.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_260bps_fast@v4.1.0",
    "dna_r10.4.1_e8.2_260bps_fast@v4.1.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_260bps_hac@v3.5.2",
    "dna_r10.4.1_e8.2_260bps_hac@v3.5.2_5mCG@v2",
    "dna_r10.4.1_e8.2_260bps_hac@v4.0.0",
    "dna_r10.4.1_e8.2_260bps_hac@v4.0.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_260bps_hac@v4.1.0",
    "dna_r10.4.1_e8.2_260bps_hac@v4.1.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_260bps_sup@v3.5.2",
    "dna_r10.4.1_e8.2_260bps_sup@v3.5.2_5mCG@v2",
    "dna_r10.4.1_e8.2_260bps_sup@v4.0.0",
    "dna_r10.4.1_e8.2_260bps_sup@v4.0.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_260bps_sup@v4.1.0",
    "dna_r10.4.1_e8.2_260bps_sup@v4.1.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_fast@v3.5.2",
    "dna_r10.4.1_e8.2_400bps_fast@v3.5.2_5mCG@v2",
    "dna_r10.4.1_e8.2_400bps_fast@v4.0.0",
    "dna_r10.4.1_e8.2_400bps_fast@v4.0.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_fast@v4.1.0",
    "dna_r10.4.1_e8.2_400bps_fast@v4.1.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_fast@v4.2.0",
    "dna_r10.4.1_e8.2_400bps_fast@v4.2.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_fast@v4.3.0",
    "dna_r10.4.1_e8.2_400bps_fast@v5.0.0",
    "dna_r10.4.1_e8.2_400bps_hac@v3.5.2",
    "dna_r10.4.1_e8.2_400bps_hac@v3.5.2_5mCG@v2",
    "dna_r10.4.1_e8.2_400bps_hac@v4.0.0",
    "dna_r10.4.1_e8.2_400bps_hac@v4.0.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_hac@v4.1.0",
    "dna_r10.4.1_e8.2_400bps_hac@v4.1.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_hac@v4.2.0",
    "dna_r10.4.1_e8.2_400bps_hac@v4.2.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_hac@v4.3.0",
    "dna_r10.4.1_e8.2_400bps_hac@v4.3.0_5mC_5hmC@v1",
    "dna_r10.4.1_e8.2_400bps_hac@v4.3.0_5mCG_5hmCG@v1",
    "dna_r10.4.1_e8.2_400bps_hac@v4.3.0_6mA@v1",
    "dna_r10.4.1_e8.2_400bps_hac@v4.3.0_6mA@v2",
    "dna_r10.4.1_e8.2_400bps_hac@v5.0.0",
    "dna_r10.4.1_e8.2_400bps_hac@v5.0.0_4mC_5mC@v1",
    "dna_r10.4.1_e8.2_400bps_hac@v5.0.0_5mC_5hmC@v1",
    "dna_r10.4.1_e8.2_400bps_hac@v5.0.0_5mCG_5hmCG@v1",
    "dna_r10.4.1_e8.2_400bps_hac@v5.0.0_6mA@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v3.5.2",
    "dna_r10.4.1_e8.2_400bps_sup@v3.5.2_5mCG@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v4.0.0",
    "dna_r10.4.1_e8.2_400bps_sup@v4.0.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v4.1.0",
    "dna_r10.4.1_e8.2_400bps_sup@v4.1.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0_5mC_5hmC@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0_5mCG_5hmCG@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0_5mCG_5hmCG@v3.1",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0_5mC@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0_6mA@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v4.2.0_6mA@v3",
    "dna_r10.4.1_e8.2_400bps_sup@v4.3.0",
    "dna_r10.4.1_e8.2_400bps_sup@v4.3.0_5mC_5hmC@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v4.3.0_5mCG_5hmCG@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v4.3.0_6mA@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v4.3.0_6mA@v2",
    "dna_r10.4.1_e8.2_400bps_sup@v5.0.0",
    "dna_r10.4.1_e8.2_400bps_sup@v5.0.0_4mC_5mC@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v5.0.0_5mC_5hmC@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v5.0.0_5mCG_5hmCG@v1",
    "dna_r10.4.1_e8.2_400bps_sup@v5.0.0_6mA@v1",
    "dna_r10.4.1_e8.2_4khz_stereo@v1.1",
    "dna_r10.4.1_e8.2_5khz_stereo@v1.1",
    "dna_r10.4.1_e8.2_5khz_stereo@v1.2",
    "dna_r10.4.1_e8.2_5khz_stereo@v1.3",
    "dna_r10.4.1_e8.2_apk_sup@v5.0.0",
    "dna_r9.4.1_e8_fast@v3.4",
    "dna_r9.4.1_e8_fast@v3.4_5mCG_5hmCG@v0",
    "dna_r9.4.1_e8_fast@v3.4_5mCG@v0.1",
    "dna_r9.4.1_e8_hac@v3.3",
    "dna_r9.4.1_e8_hac@v3.3_5mCG_5hmCG@v0",
    "dna_r9.4.1_e8_hac@v3.3_5mCG@v0.1",
    "dna_r9.4.1_e8_sup@v3.3",
    "dna_r9.4.1_e8_sup@v3.3_5mCG_5hmCG@v0",
    "dna_r9.4.1_e8_sup@v3.3_5mCG@v0.1",
    "dna_r9.4.1_e8_sup@v3.6",
    "rna002_70bps_fast@v3",
    "rna002_70bps_hac@v3",
    "rna004_130bps_fast@v3.0.1",
    "rna004_130bps_fast@v5.0.0",
    "rna004_130bps_hac@v3.0.1",
    "rna004_130bps_hac@v5.0.0",
    "rna004_130bps_hac@v5.0.0_m6A@v1",
    "rna004_130bps_hac@v5.0.0_pseU@v1",
    "rna004_130bps_sup@v3.0.1",
    "rna004_130bps_sup@v3.0.1_m6A_DRACH@v1",
    "rna004_130bps_sup@v5.0.0",
    "rna004_130bps_sup@v5.0.0_m6A@v1",
    "rna004_130bps_sup@v5.0.0_pseU@v1",
];

/// A model name that is known to be a catalog member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelIdentifier(String);

impl ModelIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable, compiled-in model catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCatalog;

impl ModelCatalog {
    /// All model names in display order
    pub fn list(&self) -> &'static [&'static str] {
        MODELS
    }

    /// Exact, case-sensitive membership
    pub fn validate(&self, candidate: &str) -> bool {
        MODELS.contains(&candidate)
    }

    pub fn default_model(&self) -> ModelIdentifier {
        ModelIdentifier(DEFAULT_MODEL.to_string())
    }

    /// Resolve the requested model, falling back to the default when none is given
    pub fn resolve(&self, requested: Option<&str>) -> Result<ModelIdentifier, PipelineError> {
        match requested {
            None => Ok(self.default_model()),
            Some(name) if self.validate(name) => Ok(ModelIdentifier(name.to_string())),
            Some(name) => Err(PipelineError::configuration(format!(
                "model name '{}' not found in the list of available models",
                name
            ))),
        }
    }

    /// Render the catalog for display
    pub fn render(&self) -> String {
        let mut out = String::from("Available dorado model names:\n");
        for model in MODELS {
            out.push_str(model);
            out.push('\n');
        }
        out
    }
}
