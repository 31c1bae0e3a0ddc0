use super::{ClassificationResult, RiskRules};
use crate::models::{GeneProfile, RiskLevel};

/// Recommendation for drugs with no actionable gene interaction.
pub const STANDARD_DOSING_RECOMMENDATION: &str = "Standard dosing per label guidelines.";

/// Drugs offered as quick picks on the analysis screen.
pub const AVAILABLE_DRUGS: &[&str] = &[
    "CODEINE",
    "WARFARIN",
    "CLOPIDOGREL",
    "SIMVASTATIN",
    "AZATHIOPRINE",
    "FLUOROURACIL",
    "TAMOXIFEN",
    "ABACAVIR",
    "TACROLIMUS",
    "PHENYTOIN",
    "AMITRIPTYLINE",
    "CAPECITABINE",
];

struct RuleEntry {
    drug: &'static str,
    risk: RiskLevel,
    gene: &'static str,
    diplotype: &'static str,
    phenotype: &'static str,
    variant: &'static str,
    recommendation: &'static str,
}

const RULES: &[RuleEntry] = &[
    RuleEntry {
        drug: "CLOPIDOGREL",
        risk: RiskLevel::Toxic,
        gene: "CYP2C19",
        diplotype: "*2/*2",
        phenotype: "Poor Metabolizer",
        variant: "rs12248560",
        recommendation: "Recommend alternative antiplatelet (Prasugrel/Ticagrelor).",
    },
    RuleEntry {
        drug: "WARFARIN",
        risk: RiskLevel::AdjustDosage,
        gene: "CYP2C9",
        diplotype: "*1/*3",
        phenotype: "Intermediate Metabolizer",
        variant: "rs1799853",
        recommendation: "Reduction in starting dose (3-5mg) is warranted.",
    },
    RuleEntry {
        drug: "SIMVASTATIN",
        risk: RiskLevel::AdjustDosage,
        gene: "SLCO1B1",
        diplotype: "*5/*5",
        phenotype: "Low Function",
        variant: "rs4149056",
        recommendation: "Limit Simvastatin dose to 20mg or switch to Rosuvastatin.",
    },
];

/// Hard-coded demo table. Names must match exactly; drug entry upper-cases
/// before classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRuleTable;

impl MockRuleTable {
    /// Drugs with a non-default entry.
    pub fn known_drugs(&self) -> impl Iterator<Item = &'static str> {
        RULES.iter().map(|r| r.drug)
    }
}

impl RiskRules for MockRuleTable {
    fn lookup(&self, drug: &str) -> ClassificationResult {
        match RULES.iter().find(|r| r.drug == drug) {
            Some(rule) => ClassificationResult {
                risk: rule.risk,
                gene_profiles: vec![GeneProfile {
                    gene: rule.gene.to_string(),
                    diplotype: rule.diplotype.to_string(),
                    phenotype: rule.phenotype.to_string(),
                    variants: vec![rule.variant.to_string()],
                }],
                recommendation: rule.recommendation.to_string(),
            },
            None => ClassificationResult {
                risk: RiskLevel::Safe,
                gene_profiles: Vec::new(),
                recommendation: STANDARD_DOSING_RECOMMENDATION.to_string(),
            },
        }
    }
}
