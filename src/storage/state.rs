//! Typed accessors over the key-value store.
//!
//! Missing or malformed documents are treated as absent: defaults are
//! substituted and a warning is logged. Only write failures surface.

use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, StorageError};
use crate::models::{AnalysisRecord, LastAnalysis, RecordStatus, SystemSettings, User};

pub const USER_KEY: &str = "pharmaGuardUser";
pub const SETTINGS_KEY: &str = "pharmaGuardSettings";
pub const LAST_ANALYSIS_KEY: &str = "lastAnalysis";
pub const HISTORY_KEY: &str = "pharmaGuardHistory";

// ═══════════════════════════════════════════
// Generic JSON helpers
// ═══════════════════════════════════════════

/// Read and decode a JSON document. Any failure reads as `None`.
fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored state, treating as absent");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Malformed stored state, treating as absent");
            None
        }
    }
}

fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

// ═══════════════════════════════════════════
// User / settings / last analysis
// ═══════════════════════════════════════════

pub fn load_user(store: &dyn KeyValueStore) -> Option<User> {
    load_json(store, USER_KEY)
}

pub fn save_user(store: &dyn KeyValueStore, user: &User) -> Result<(), StorageError> {
    save_json(store, USER_KEY, user)
}

pub fn clear_user(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(USER_KEY)
}

pub fn load_settings(store: &dyn KeyValueStore) -> SystemSettings {
    load_json(store, SETTINGS_KEY).unwrap_or_default()
}

pub fn save_settings(
    store: &dyn KeyValueStore,
    settings: &SystemSettings,
) -> Result<(), StorageError> {
    save_json(store, SETTINGS_KEY, settings)
}

pub fn load_last_analysis(store: &dyn KeyValueStore) -> Option<LastAnalysis> {
    load_json(store, LAST_ANALYSIS_KEY)
}

pub fn save_last_analysis(
    store: &dyn KeyValueStore,
    last: &LastAnalysis,
) -> Result<(), StorageError> {
    save_json(store, LAST_ANALYSIS_KEY, last)
}

// ═══════════════════════════════════════════
// History
// ═══════════════════════════════════════════

/// Demo history written the first time the history is opened.
pub fn seed_history() -> Vec<AnalysisRecord> {
    let seed = |id: &str, (y, mo, d, h, mi): (i32, u32, u32, u32, u32), patient: &str, drugs: &[&str], status| {
        AnalysisRecord {
            id: id.to_string(),
            date: Utc
                .with_ymd_and_hms(y, mo, d, h, mi, 0)
                .single()
                .unwrap_or_default(),
            patient_id: patient.to_string(),
            drugs: drugs.iter().map(|d| d.to_string()).collect(),
            status,
        }
    };

    vec![
        seed("ANL-92381", (2024, 5, 20, 10, 30), "PX-1029", &["CLOPIDOGREL", "WARFARIN"], RecordStatus::Complete),
        seed("ANL-92382", (2024, 5, 21, 14, 45), "PX-2041", &["SIMVASTATIN"], RecordStatus::Complete),
        seed("ANL-92383", (2024, 5, 21, 16, 20), "PX-9921", &["CODEINE", "AMITRIPTYLINE"], RecordStatus::Pending),
        seed("ANL-92384", (2024, 5, 18, 9, 15), "PX-5501", &["TAMOXIFEN"], RecordStatus::Complete),
        seed("ANL-92385", (2024, 5, 17, 11, 0), "PX-4421", &["ABACAVIR"], RecordStatus::Complete),
        seed("ANL-92386", (2024, 5, 16, 15, 30), "PX-3312", &["TACROLIMUS", "PHENYTOIN"], RecordStatus::Complete),
    ]
}

/// Read the stored history without seeding.
///
/// `None` when the key is missing or not a JSON array. Individual
/// entries that fail to decode or validate are dropped.
pub fn read_history(store: &dyn KeyValueStore) -> Option<Vec<AnalysisRecord>> {
    let entries: Vec<serde_json::Value> = load_json(store, HISTORY_KEY)?;
    let total = entries.len();

    let records: Vec<AnalysisRecord> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<AnalysisRecord>(entry) {
            Ok(record) => match record.validate() {
                Ok(()) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping invalid history entry");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable history entry");
                None
            }
        })
        .collect();

    if records.len() != total {
        tracing::warn!(kept = records.len(), total, "History contained invalid entries");
    }
    Some(records)
}

/// History for display. Seeds and persists the demo history when absent.
pub fn load_history(store: &dyn KeyValueStore) -> Vec<AnalysisRecord> {
    if let Some(records) = read_history(store) {
        return records;
    }

    let seeded = seed_history();
    if let Err(e) = save_history(store, &seeded) {
        tracing::warn!(error = %e, "Failed to persist seeded history");
    } else {
        tracing::info!(count = seeded.len(), "Seeded analysis history");
    }
    seeded
}

pub fn save_history(
    store: &dyn KeyValueStore,
    records: &[AnalysisRecord],
) -> Result<(), StorageError> {
    save_json(store, HISTORY_KEY, records)
}

/// Whether any history document is currently persisted.
pub fn has_history(store: &dyn KeyValueStore) -> bool {
    matches!(store.get(HISTORY_KEY), Ok(Some(_)))
}

/// Insert a new record at the front (newest first).
pub fn prepend_record(
    store: &dyn KeyValueStore,
    record: AnalysisRecord,
) -> Result<Vec<AnalysisRecord>, StorageError> {
    let mut records = read_history(store).unwrap_or_default();
    records.insert(0, record);
    save_history(store, &records)?;
    Ok(records)
}

/// Remove a record by id. Returns whether anything was removed.
pub fn delete_record(store: &dyn KeyValueStore, id: &str) -> Result<bool, StorageError> {
    let mut records = load_history(store);
    let before = records.len();
    records.retain(|r| r.id != id);
    let removed = records.len() != before;
    if removed {
        save_history(store, &records)?;
        tracing::info!(record_id = %id, "Analysis record deleted");
    }
    Ok(removed)
}

/// Purge cached analyses and history after explicit confirmation.
///
/// Profile and settings survive. Returns `Ok(false)` when unconfirmed.
pub fn wipe_cache(store: &dyn KeyValueStore, confirmed: bool) -> Result<bool, StorageError> {
    if !confirmed {
        return Ok(false);
    }
    store.remove(LAST_ANALYSIS_KEY)?;
    store.remove(HISTORY_KEY)?;
    tracing::info!("Local analysis cache purged");
    Ok(true)
}
