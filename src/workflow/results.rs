use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::WorkflowError;
use crate::classifier::{MockRuleTable, RiskClassifier, RiskRules};
use crate::explain::fanout::annotate_all;
use crate::explain::ExplanationSession;
use crate::llm::LlmClient;
use crate::models::{DrugAnalysis, NarrativeDetail};
use crate::storage::{state, KeyValueStore};

/// Clinical results for the drugs of the last analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    generated_at: DateTime<Utc>,
    analyses: Vec<DrugAnalysis>,
    #[serde(skip)]
    expanded: Option<String>,
}

impl ResultsReport {
    /// Classify every drug, in input order. Explanations start pending and
    /// the first drug is expanded.
    pub fn classify<R: RiskRules>(classifier: &RiskClassifier<R>, drugs: &[String]) -> Self {
        let analyses = classifier.classify_all(drugs);
        let expanded = analyses.first().map(|a| a.drug.clone());
        Self {
            generated_at: Utc::now(),
            analyses,
            expanded,
        }
    }

    pub fn analyses(&self) -> &[DrugAnalysis] {
        &self.analyses
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    /// True once every analysis has its explanation.
    pub fn is_fully_explained(&self) -> bool {
        self.analyses.iter().all(DrugAnalysis::has_explanation)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Expand a drug card; expanding the open card collapses it.
    pub fn toggle_expanded(&mut self, drug: &str) {
        if self.expanded.as_deref() == Some(drug) {
            self.expanded = None;
        } else {
            self.expanded = Some(drug.to_string());
        }
    }

    /// Request explanations for every analysis.
    pub async fn annotate<C: LlmClient>(
        &mut self,
        client: &C,
        detail: NarrativeDetail,
        timeout: Duration,
        session: &ExplanationSession,
    ) -> usize {
        annotate_all(client, &mut self.analyses, detail, timeout, session).await
    }

    /// Pretty-printed JSON export of the report.
    pub fn to_json(&self) -> Result<String, WorkflowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the annotated results for the stored `lastAnalysis`.
///
/// Returns `None` when there is nothing to show. The narrative detail
/// level comes from the persisted settings.
pub async fn load_results<C: LlmClient>(
    store: &dyn KeyValueStore,
    client: &C,
    timeout: Duration,
    session: &ExplanationSession,
) -> Option<ResultsReport> {
    let last = state::load_last_analysis(store)?;
    let detail = state::load_settings(store).ai_narrative_detail;

    let mut report = ResultsReport::classify(&RiskClassifier::new(MockRuleTable), &last.drugs);
    let explained = report.annotate(client, detail, timeout, session).await;

    tracing::debug!(
        count = report.analyses.len(),
        explained,
        detail = detail.as_str(),
        "Results generated"
    );
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::EXPLANATION_FALLBACK;
    use crate::llm::MockLlmClient;
    use crate::models::{LastAnalysis, RiskLevel, SystemSettings};
    use crate::storage::MemoryStore;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn store_with(drugs: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        let last = LastAnalysis {
            drugs: drugs.iter().map(|d| d.to_string()).collect(),
        };
        state::save_last_analysis(&store, &last).unwrap();
        store
    }

    #[tokio::test]
    async fn nothing_stored_yields_none() {
        let store = MemoryStore::new();
        let client = MockLlmClient::new("x");
        let session = ExplanationSession::new();
        assert!(load_results(&store, &client, TIMEOUT, &session).await.is_none());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn results_are_classified_and_explained_in_order() {
        let store = store_with(&["CLOPIDOGREL", "WARFARIN", "ASPIRIN"]);
        let client = MockLlmClient::new("context");
        let session = ExplanationSession::new();

        let report = load_results(&store, &client, TIMEOUT, &session).await.unwrap();

        let risks: Vec<RiskLevel> = report.analyses().iter().map(|a| a.risk).collect();
        assert_eq!(
            risks,
            vec![RiskLevel::Toxic, RiskLevel::AdjustDosage, RiskLevel::Safe]
        );
        assert!(report.is_fully_explained());
        assert_eq!(report.expanded(), Some("CLOPIDOGREL"));
    }

    #[tokio::test]
    async fn stored_detail_level_reaches_prompt() {
        let store = store_with(&["WARFARIN"]);
        let settings = SystemSettings {
            ai_narrative_detail: NarrativeDetail::Exhaustive,
            ..SystemSettings::default()
        };
        state::save_settings(&store, &settings).unwrap();
        let client = MockLlmClient::new("context");

        load_results(&store, &client, TIMEOUT, &ExplanationSession::new())
            .await
            .unwrap();

        assert!(client.prompts()[0].contains("Detail Level Preference: Exhaustive"));
    }

    #[tokio::test]
    async fn failed_explanations_fall_back() {
        let store = store_with(&["CODEINE"]);
        let client = MockLlmClient::failing();

        let report = load_results(&store, &client, TIMEOUT, &ExplanationSession::new())
            .await
            .unwrap();

        assert_eq!(
            report.analyses()[0].ai_explanation.as_deref(),
            Some(EXPLANATION_FALLBACK)
        );
    }

    #[test]
    fn classified_report_starts_pending() {
        let drugs = vec!["SIMVASTATIN".to_string()];
        let report = ResultsReport::classify(&RiskClassifier::new(MockRuleTable), &drugs);
        assert!(!report.is_fully_explained());
        assert_eq!(
            report.analyses()[0].explanation_or_pending(),
            "Generating clinical context..."
        );
    }

    #[test]
    fn toggle_expanded_collapses_open_card() {
        let drugs = vec!["WARFARIN".to_string(), "CODEINE".to_string()];
        let mut report = ResultsReport::classify(&RiskClassifier::new(MockRuleTable), &drugs);
        report.toggle_expanded("WARFARIN");
        assert_eq!(report.expanded(), None);
        report.toggle_expanded("CODEINE");
        assert_eq!(report.expanded(), Some("CODEINE"));
    }

    #[test]
    fn json_export_uses_camel_case() {
        let drugs = vec!["CLOPIDOGREL".to_string()];
        let report = ResultsReport::classify(&RiskClassifier::new(MockRuleTable), &drugs);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"geneProfiles\""));
        assert!(!json.contains("expanded"));
    }
}
