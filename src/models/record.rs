use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::enums::RecordStatus;
use super::ModelError;

static RECORD_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ANL-[0-9]{5}$").expect("valid record id pattern"));

static PATIENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PX-[0-9]{4}$").expect("valid patient id pattern"));

/// One persisted run of the analysis workflow.
///
/// Stored newest first. Never updated in place; the only mutation is
/// deletion from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub patient_id: String,
    pub drugs: Vec<String>,
    pub status: RecordStatus,
}

impl AnalysisRecord {
    /// Check the format and non-empty-drugs invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !RECORD_ID_RE.is_match(&self.id) {
            return Err(ModelError::InvalidRecordId(self.id.clone()));
        }
        if !PATIENT_ID_RE.is_match(&self.patient_id) {
            return Err(ModelError::InvalidPatientId(self.patient_id.clone()));
        }
        if self.drugs.is_empty() {
            return Err(ModelError::EmptyDrugList(self.id.clone()));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.status == RecordStatus::Complete
    }
}

/// Generate a report id in the `ANL-NNNNN` format.
pub fn generate_record_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("ANL-{}", rng.gen_range(10_000..=99_999))
}

/// Generate a patient id in the `PX-NNNN` format.
pub fn generate_patient_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("PX-{}", rng.gen_range(1_000..=9_999))
}

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 token, used for session and user ids.
pub fn generate_base36_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect()
}
