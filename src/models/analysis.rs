use serde::{Deserialize, Serialize};

use super::enums::RiskLevel;

/// Inferred genotype for one pharmacogene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneProfile {
    pub gene: String,
    pub diplotype: String,
    pub phenotype: String,
    pub variants: Vec<String>,
}

impl GeneProfile {
    /// `GENE (diplotype) - phenotype`, as quoted in explanation prompts.
    pub fn summary(&self) -> String {
        format!("{} ({}) - {}", self.gene, self.diplotype, self.phenotype)
    }
}

/// Classifier output for a single drug, optionally annotated with an
/// AI explanation once the text-generation call resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugAnalysis {
    pub drug: String,
    pub risk: RiskLevel,
    pub confidence: f64,
    pub gene_profiles: Vec<GeneProfile>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_explanation: Option<String>,
}

/// Placeholder shown while an explanation is still outstanding.
pub const EXPLANATION_PENDING_TEXT: &str = "Generating clinical context...";

/// Placeholder shown when a drug has no actionable variants.
pub const NO_VARIANTS_TEXT: &str =
    "No significant high-risk variants detected for this drug interaction.";

impl DrugAnalysis {
    /// Explanation text for display; pending until the call resolves.
    pub fn explanation_or_pending(&self) -> &str {
        self.ai_explanation
            .as_deref()
            .unwrap_or(EXPLANATION_PENDING_TEXT)
    }

    pub fn has_explanation(&self) -> bool {
        self.ai_explanation.is_some()
    }
}
