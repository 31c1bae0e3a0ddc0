use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::WorkflowError;
use crate::models::{generate_patient_id, generate_record_id, AnalysisRecord, LastAnalysis, RecordStatus};
use crate::storage::{state, KeyValueStore};

/// Extensions accepted by the genomic upload control.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["vcf", "txt"];

/// Genomic data file chosen on the analysis screen.
///
/// Only the metadata is kept; the content is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicUpload {
    pub file_name: String,
    pub size_bytes: u64,
}

impl GenomicUpload {
    pub fn new(file_name: &str, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.to_string(),
            size_bytes,
        }
    }

    /// Whether the file has a `.vcf` or `.txt` extension (case-insensitive).
    pub fn is_accepted(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| e.eq_ignore_ascii_case(accepted))
            })
            .unwrap_or(false)
    }
}

/// Run an analysis with fresh random ids stamped now.
pub fn run_analysis(
    store: &dyn KeyValueStore,
    upload: Option<&GenomicUpload>,
    drugs: &[String],
) -> Result<AnalysisRecord, WorkflowError> {
    run_analysis_with(store, upload, drugs, &mut rand::thread_rng(), Utc::now())
}

/// Run an analysis: validate inputs, create a Complete record, hand the
/// drug list to the results view and prepend the record to history.
pub fn run_analysis_with<R: Rng + ?Sized>(
    store: &dyn KeyValueStore,
    upload: Option<&GenomicUpload>,
    drugs: &[String],
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<AnalysisRecord, WorkflowError> {
    let upload = upload.ok_or(WorkflowError::MissingFile)?;
    if !upload.is_accepted() {
        return Err(WorkflowError::UnsupportedFile(upload.file_name.clone()));
    }
    if drugs.is_empty() {
        return Err(WorkflowError::NoDrugsSelected);
    }

    let record = AnalysisRecord {
        id: generate_record_id(rng),
        date: now,
        patient_id: generate_patient_id(rng),
        drugs: drugs.to_vec(),
        status: RecordStatus::Complete,
    };

    state::save_last_analysis(
        store,
        &LastAnalysis {
            drugs: record.drugs.clone(),
        },
    )?;
    state::prepend_record(store, record.clone())?;

    tracing::info!(
        record_id = %record.id,
        drug_count = record.drugs.len(),
        upload_bytes = upload.size_bytes,
        "Analysis recorded"
    );
    Ok(record)
}

/// Open a stored report in the results view.
///
/// Pending records have no report yet.
pub fn view_report(store: &dyn KeyValueStore, record: &AnalysisRecord) -> Result<(), WorkflowError> {
    if !record.is_complete() {
        return Err(WorkflowError::ReportNotComplete(record.id.clone()));
    }
    state::save_last_analysis(
        store,
        &LastAnalysis {
            drugs: record.drugs.clone(),
        },
    )?;
    tracing::debug!(record_id = %record.id, "Report opened");
    Ok(())
}
