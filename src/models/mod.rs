pub mod analysis;
pub mod enums;
pub mod notification;
pub mod record;
pub mod settings;

pub use analysis::*;
pub use enums::*;
pub use notification::*;
pub use record::*;
pub use settings::*;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("Invalid patient id: {0}")]
    InvalidPatientId(String),

    #[error("Analysis record {0} has no drugs")]
    EmptyDrugList(String),
}
