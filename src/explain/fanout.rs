use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::llm::LlmClient;
use crate::models::{DrugAnalysis, NarrativeDetail};

use super::explain;

/// Liveness handle for one results view.
///
/// Clones share the flag. Once abandoned, outstanding explanations are
/// discarded instead of applied.
#[derive(Debug, Clone)]
pub struct ExplanationSession {
    alive: Arc<AtomicBool>,
}

impl ExplanationSession {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the owning view as gone.
    pub fn abandon(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

impl Default for ExplanationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Request one explanation per analysis concurrently and hand each result
/// to `sink(index, text)` as it resolves, in completion order.
///
/// Returns how many results were delivered. Stops delivering (and drops
/// the in-flight requests) as soon as the session is abandoned.
pub async fn explain_batch<C, F>(
    client: &C,
    analyses: &[DrugAnalysis],
    detail: NarrativeDetail,
    timeout: Duration,
    session: &ExplanationSession,
    mut sink: F,
) -> usize
where
    C: LlmClient,
    F: FnMut(usize, String),
{
    if !session.is_alive() {
        return 0;
    }

    let mut pending: FuturesUnordered<_> = analyses
        .iter()
        .enumerate()
        .map(|(index, analysis)| async move {
            (index, explain(client, analysis, detail, timeout).await)
        })
        .collect();

    let mut delivered = 0;
    while let Some((index, text)) = pending.next().await {
        if !session.is_alive() {
            tracing::debug!(
                delivered,
                dropped = pending.len() + 1,
                "Explanation session abandoned"
            );
            return delivered;
        }
        sink(index, text);
        delivered += 1;
    }

    tracing::debug!(delivered, "Explanation batch complete");
    delivered
}

/// Fill `ai_explanation` on each analysis in place.
pub async fn annotate_all<C: LlmClient>(
    client: &C,
    analyses: &mut [DrugAnalysis],
    detail: NarrativeDetail,
    timeout: Duration,
    session: &ExplanationSession,
) -> usize {
    let snapshot = analyses.to_vec();
    explain_batch(client, &snapshot, detail, timeout, session, |index, text| {
        if let Some(analysis) = analyses.get_mut(index) {
            analysis.ai_explanation = Some(text);
        }
    })
    .await
}
