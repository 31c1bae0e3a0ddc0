//! Analysis workflow: pick drugs, run an analysis, open a report and
//! build the annotated results for it.

pub mod analysis;
pub mod results;
pub mod selection;

pub use analysis::{run_analysis, run_analysis_with, view_report, GenomicUpload};
pub use results::{load_results, ResultsReport};
pub use selection::DrugSelection;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("No genomic data file provided")]
    MissingFile,

    #[error("Unsupported genomic data file: {0} (expected .vcf or .txt)")]
    UnsupportedFile(String),

    #[error("Select at least one drug to analyze")]
    NoDrugsSelected,

    #[error("Report {0} is not complete yet")]
    ReportNotComplete(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
