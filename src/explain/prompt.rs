use crate::models::{DrugAnalysis, NarrativeDetail};

/// Per-level instruction appended to the clinical prompt.
pub fn detail_instruction(detail: NarrativeDetail) -> &'static str {
    match detail {
        NarrativeDetail::Concise => {
            "Provide a very brief summary, focusing only on the primary risk and the core recommendation."
        }
        NarrativeDetail::Standard => {
            "Provide a balanced explanation including the interaction summary, clinical implications, and actionable recommendations."
        }
        NarrativeDetail::Exhaustive => {
            "Provide a deep clinical dive including biochemical pathways, specific CPIC guideline references, and multi-step management strategies."
        }
    }
}

/// Build the physician-facing explanation prompt for one drug.
pub fn build_prompt(analysis: &DrugAnalysis, detail: NarrativeDetail) -> String {
    let genes = analysis
        .gene_profiles
        .iter()
        .map(|g| g.summary())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a professional clinical pharmacogeneticist.\n\
         Explain the following pharmacogenomic risk to a physician:\n\
         Drug: {drug}\n\
         Risk Level: {risk}\n\
         Genes Involved: {genes}\n\
         \n\
         Detail Level Preference: {detail}\n\
         Instruction: {instruction}\n\
         \n\
         Please provide:\n\
         1. A clear summary of the interaction.\n\
         2. Clinical implications.\n\
         3. Actionable dosage or alternative drug recommendations based on CPIC or DPWG guidelines.\n\
         Keep the tone professional and trustworthy.\n",
        drug = analysis.drug,
        risk = analysis.risk.as_str(),
        detail = detail.as_str(),
        instruction = detail_instruction(detail),
    )
}
