use serde::{Deserialize, Serialize};

/// Disclaimer attached to every result the service hands out.
pub const DISCLAIMER: &str = "This result is not an official assessment. \
    The score is not guaranteed and is for entertainment and educational purposes only. \
    No legal or career decisions should be made based on this analysis.";

/// The structured outcome of one successful analysis run.
///
/// Field names follow the JSON contract requested from the model. The model
/// has historically misspelled the competitive analysis key, so both legacy
/// spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    /// 0 – 100, romantic compatibility from career alignment.
    pub match_score: f64,
    /// 0 – 100, likelihood of professional referrals.
    pub referral_score: f64,
    pub love_compatibility: String,
    pub professional_synergy: String,
    #[serde(alias = "competativeAnalysis", alias = "CompatativeAnalysis")]
    pub competitive_analysis: String,
    pub recommendation: String,
}
