//! Mock Risk Classifier.
//!
//! Drug name in, risk tier plus gene profiles out. The rule source sits
//! behind `RiskRules` so a real rules engine can replace the demo table
//! without touching callers.

pub mod rules;

pub use rules::*;

use rand::Rng;

use crate::models::{DrugAnalysis, GeneProfile, RiskLevel};

/// Lower bound of the mock confidence band (inclusive).
pub const CONFIDENCE_MIN: f64 = 0.94;
/// Upper bound of the mock confidence band (exclusive).
pub const CONFIDENCE_MAX: f64 = 0.99;

/// Rule lookup result, before confidence is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub risk: RiskLevel,
    pub gene_profiles: Vec<GeneProfile>,
    pub recommendation: String,
}

/// Pluggable drug-to-risk rule source.
pub trait RiskRules: Send + Sync {
    fn lookup(&self, drug: &str) -> ClassificationResult;
}

/// Attaches a confidence score to whatever the rule source returns.
pub struct RiskClassifier<R: RiskRules = MockRuleTable> {
    rules: R,
}

impl Default for RiskClassifier<MockRuleTable> {
    fn default() -> Self {
        Self::new(MockRuleTable)
    }
}

impl<R: RiskRules> RiskClassifier<R> {
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Classify with an explicit RNG (deterministic in tests).
    pub fn classify_with_rng<G: Rng + ?Sized>(&self, drug: &str, rng: &mut G) -> DrugAnalysis {
        let result = self.rules.lookup(drug);
        DrugAnalysis {
            drug: drug.to_string(),
            risk: result.risk,
            confidence: rng.gen_range(CONFIDENCE_MIN..CONFIDENCE_MAX),
            gene_profiles: result.gene_profiles,
            recommendation: result.recommendation,
            ai_explanation: None,
        }
    }

    pub fn classify(&self, drug: &str) -> DrugAnalysis {
        self.classify_with_rng(drug, &mut rand::thread_rng())
    }

    /// Classify a batch, preserving input order.
    pub fn classify_all(&self, drugs: &[String]) -> Vec<DrugAnalysis> {
        let mut rng = rand::thread_rng();
        let analyses: Vec<DrugAnalysis> = drugs
            .iter()
            .map(|drug| self.classify_with_rng(drug, &mut rng))
            .collect();
        let flagged = analyses.iter().filter(|a| a.risk != RiskLevel::Safe).count();
        tracing::debug!(count = analyses.len(), flagged, "Classified drug batch");
        analyses
    }
}

/// Classify one drug with the built-in demo table.
pub fn classify(drug: &str) -> DrugAnalysis {
    RiskClassifier::new(MockRuleTable).classify(drug)
}
