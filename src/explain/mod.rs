//! Clinical explanations for classified drugs.
//!
//! Explanations never fail from the caller's point of view: any
//! text-generation error or timeout degrades to a fixed fallback string.

pub mod fanout;
pub mod prompt;

pub use fanout::{explain_batch, ExplanationSession};
pub use prompt::build_prompt;

use std::time::Duration;

use crate::llm::LlmClient;
use crate::models::{DrugAnalysis, NarrativeDetail};

/// Shown when the text-generation call fails or times out.
pub const EXPLANATION_FALLBACK: &str =
    "Error generating clinical explanation. Please refer to manual CPIC guidelines.";

/// Shown when the service answers with no text.
pub const EMPTY_EXPLANATION: &str = "No explanation generated.";

/// Produce the explanation text for one analysis.
pub async fn explain<C: LlmClient>(
    client: &C,
    analysis: &DrugAnalysis,
    detail: NarrativeDetail,
    timeout: Duration,
) -> String {
    let prompt = build_prompt(analysis, detail);

    match tokio::time::timeout(timeout, client.generate(&prompt)).await {
        Ok(Ok(text)) if text.is_empty() => {
            tracing::debug!(backend = client.backend_name(), "Empty explanation returned");
            EMPTY_EXPLANATION.to_string()
        }
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!(
                backend = client.backend_name(),
                error = %e,
                "Explanation generation failed"
            );
            EXPLANATION_FALLBACK.to_string()
        }
        Err(_) => {
            tracing::warn!(
                backend = client.backend_name(),
                timeout_secs = timeout.as_secs_f64(),
                "Explanation generation timed out"
            );
            EXPLANATION_FALLBACK.to_string()
        }
    }
}
