//! Security audit log export.
//!
//! Two renderings of the same session report: the downloadable plain-text
//! file and the on-screen preview. Both are canned compliance text around
//! a few session fields.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use rand::Rng;
use thiserror::Error;

use crate::models::{generate_base36_token, User};

const SESSION_ID_PREFIX: &str = "PHARM-";
const SESSION_ID_LEN: usize = 9;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// `PHARM-` followed by nine uppercase base-36 characters.
pub fn generate_session_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{SESSION_ID_PREFIX}{}",
        generate_base36_token(rng, SESSION_ID_LEN).to_uppercase()
    )
}

/// en-US locale rendering, e.g. `5/20/2024, 2:05:09 PM`.
pub fn format_generated_at(at: NaiveDateTime) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// File name for an export made at `epoch_millis`.
pub fn audit_file_name(epoch_millis: i64) -> String {
    format!("pharma_guard_audit_{epoch_millis}.txt")
}

// ═══════════════════════════════════════════════════════════
// Downloadable log
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLog {
    pub session_id: String,
    /// Local wall-clock time of generation.
    pub generated_at: NaiveDateTime,
    pub epoch_millis: i64,
    pub auditor_name: String,
    pub auditor_email: String,
}

impl AuditLog {
    /// Log for `user` stamped now with a fresh session id.
    pub fn for_user(user: &User) -> Self {
        let now = Utc::now();
        Self {
            session_id: generate_session_id(&mut rand::thread_rng()),
            generated_at: now.with_timezone(&Local).naive_local(),
            epoch_millis: now.timestamp_millis(),
            auditor_name: user.name.clone(),
            auditor_email: user.email.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        audit_file_name(self.epoch_millis)
    }

    /// Plain-text body. Starts with a newline and ends with a newline
    /// followed by four spaces.
    pub fn render(&self) -> String {
        format!(
            "\n\
PHARMAGUARD SECURITY AUDIT LOG\n\
------------------------------\n\
Generated: {generated}\n\
Session ID: {session}\n\
Auditor: {name} ({email})\n\
\n\
[SUCCESS] HIPAA COMPLIANCE HANDSHAKE VERIFIED\n\
[INFO] AUTH_LOG: ACCESS GRANTED FROM IP 192.168.1.104\n\
[INFO] PRIVACY_LOG: GENOMIC DATA TRANSMISSION OBFUSCATED\n\
[INFO] API_LOG: GEMINI AI ENDPOINT SECURED [SHA-256 VERIFIED]\n\
[INFO] CRYPTO_LOG: ENCRYPTION LAYER [AES-256-GCM] VERIFIED AT REST\n\
[INFO] SYSTEM_INTEGRITY: CLINICALLY COMPLIANT / NO BREACHES DETECTED\n\
\n\
This document serves as an official clinical audit record for institutional review.\n    ",
            generated = format_generated_at(self.generated_at),
            session = self.session_id,
            name = self.auditor_name,
            email = self.auditor_email,
        )
    }
}

/// Write the log into `dir` (created if missing). Returns the file path.
pub fn write_audit_log(dir: &Path, log: &AuditLog) -> Result<PathBuf, AuditError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(log.file_name());
    std::fs::write(&path, log.render())?;
    tracing::info!(session_id = %log.session_id, "Audit log exported");
    Ok(path)
}

// ═══════════════════════════════════════════════════════════
// On-screen preview
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPreview {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    /// Mirrors the HIPAA-mode setting.
    pub pii_masking: bool,
    /// Whether a history document is currently persisted.
    pub records_persisted: bool,
}

impl AuditPreview {
    pub fn new(user: &User, pii_masking: bool, records_persisted: bool) -> Self {
        Self {
            session_id: generate_session_id(&mut rand::thread_rng()),
            timestamp: Utc::now(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            pii_masking,
            records_persisted,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let masking = if self.pii_masking { "TRUE" } else { "FALSE" };
        let governance = if self.records_persisted {
            "PERSISTENT RECORDS DETECTED"
        } else {
            "LOCAL CACHE ZEROED"
        };

        vec![
            "[SUCCESS] HIPAA COMPLIANCE HANDSHAKE VERIFIED".to_string(),
            format!("SESSION_ID: {}", self.session_id),
            format!(
                "TIMESTAMP: {}",
                self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ")
            ),
            format!(
                "[INFO] AUTH_LOG: USER {} ({}) ACCESS GRANTED FROM IP: 192.168.1.104",
                self.user_id, self.user_name
            ),
            format!(
                "[INFO] PRIVACY_LOG: GENOMIC DATA TRANSMISSION OBFUSCATED (LOCAL PII MASKING ENABLED: {masking})"
            ),
            "[INFO] API_LOG: GEMINI AI ENDPOINT SECURED WITH CLINICAL TOKEN [SHA-256 VERIFIED]".to_string(),
            "[WARN] THREAT_MITIGATION: ATTEMPTED ACCESS TO RAW VCF BY UNAUTHORIZED PROCESS 'browser_extension_x' BLOCKED AT SOURCE".to_string(),
            "[INFO] CRYPTO_LOG: ENCRYPTION LAYER [AES-256-GCM] VERIFIED AT REST".to_string(),
            format!("[INFO] DATA_GOVERNANCE: {governance}"),
            "[INFO] SYSTEM_INTEGRITY: CLINICALLY COMPLIANT / NO BREACHES DETECTED".to_string(),
            "--- END OF CRYPTOGRAPHIC AUDIT LOG ---".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_log() -> AuditLog {
        AuditLog {
            session_id: "PHARM-ABC123XYZ".into(),
            generated_at: NaiveDate::from_ymd_opt(2024, 5, 20)
                .unwrap()
                .and_hms_opt(14, 5, 9)
                .unwrap(),
            epoch_millis: 1_716_213_909_000,
            auditor_name: "Dr. Sarah Smith".into(),
            auditor_email: "dr.smith@pharma-guard.io".into(),
        }
    }

    fn user() -> User {
        User {
            id: "k3j9x0q2w".into(),
            name: "Dr. Sarah Smith".into(),
            role: "Chief Medical Geneticist".into(),
            email: "dr.smith@pharma-guard.io".into(),
            avatar_url: None,
        }
    }

    #[test]
    fn render_matches_template_exactly() {
        let expected = "\nPHARMAGUARD SECURITY AUDIT LOG\n------------------------------\nGenerated: 5/20/2024, 2:05:09 PM\nSession ID: PHARM-ABC123XYZ\nAuditor: Dr. Sarah Smith (dr.smith@pharma-guard.io)\n\n[SUCCESS] HIPAA COMPLIANCE HANDSHAKE VERIFIED\n[INFO] AUTH_LOG: ACCESS GRANTED FROM IP 192.168.1.104\n[INFO] PRIVACY_LOG: GENOMIC DATA TRANSMISSION OBFUSCATED\n[INFO] API_LOG: GEMINI AI ENDPOINT SECURED [SHA-256 VERIFIED]\n[INFO] CRYPTO_LOG: ENCRYPTION LAYER [AES-256-GCM] VERIFIED AT REST\n[INFO] SYSTEM_INTEGRITY: CLINICALLY COMPLIANT / NO BREACHES DETECTED\n\nThis document serves as an official clinical audit record for institutional review.\n    ";
        assert_eq!(fixed_log().render(), expected);
    }

    #[test]
    fn morning_times_use_am_without_padding() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_opt(0, 7, 0)
            .unwrap();
        assert_eq!(format_generated_at(at), "1/3/2024, 12:07:00 AM");
    }

    #[test]
    fn session_id_format() {
        let mut rng = StdRng::seed_from_u64(42);
        let id = generate_session_id(&mut rng);
        assert!(id.starts_with("PHARM-"));
        let suffix = &id[6..];
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn file_name_uses_epoch_millis() {
        assert_eq!(fixed_log().file_name(), "pharma_guard_audit_1716213909000.txt");
    }

    #[test]
    fn write_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let log = fixed_log();

        let path = write_audit_log(&dir, &log).unwrap();

        assert_eq!(path, dir.join("pharma_guard_audit_1716213909000.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), log.render());
    }

    #[test]
    fn for_user_copies_auditor_fields() {
        let log = AuditLog::for_user(&user());
        assert_eq!(log.auditor_name, "Dr. Sarah Smith");
        assert_eq!(log.auditor_email, "dr.smith@pharma-guard.io");
        assert!(log.session_id.starts_with("PHARM-"));
    }

    #[test]
    fn preview_reflects_masking_and_governance() {
        let mut preview = AuditPreview::new(&user(), true, true);
        preview.timestamp = "2024-05-20T10:30:00Z".parse().unwrap();
        let lines = preview.lines();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[2], "TIMESTAMP: 2024-05-20T10:30:00.000Z");
        assert_eq!(
            lines[3],
            "[INFO] AUTH_LOG: USER k3j9x0q2w (Dr. Sarah Smith) ACCESS GRANTED FROM IP: 192.168.1.104"
        );
        assert!(lines[4].ends_with("(LOCAL PII MASKING ENABLED: TRUE)"));
        assert_eq!(lines[8], "[INFO] DATA_GOVERNANCE: PERSISTENT RECORDS DETECTED");

        let zeroed = AuditPreview::new(&user(), false, false).lines();
        assert!(zeroed[4].ends_with("(LOCAL PII MASKING ENABLED: FALSE)"));
        assert_eq!(zeroed[8], "[INFO] DATA_GOVERNANCE: LOCAL CACHE ZEROED");
        assert_eq!(zeroed[10], "--- END OF CRYPTOGRAPHIC AUDIT LOG ---");
    }
}
