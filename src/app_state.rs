//! Session-wide application state.
//!
//! `AppState` owns what every screen reads: the signed-in user, system
//! settings, the header search term and the notification list. Profile
//! and settings changes are written through to the key-value store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

use crate::audit::{write_audit_log, AuditError, AuditLog, AuditPreview};
use crate::history::HistoryView;
use crate::models::{
    generate_base36_token, initial_notifications, unread_count, NarrativeDetail, Notification,
    SettingToggle, SystemSettings, User,
};
use crate::storage::{state, KeyValueStore, StorageError};

/// Length of generated user ids.
const USER_ID_LEN: usize = 9;

/// Profile assigned on demo login.
pub const DEMO_USER_NAME: &str = "Dr. Sarah Smith";
pub const DEMO_USER_ROLE: &str = "Chief Medical Geneticist";

/// Sign-up fallbacks for blank form fields.
pub const DEFAULT_SIGNUP_NAME: &str = "New User";
pub const DEFAULT_SIGNUP_ROLE: &str = "Clinical Pharmacist";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No signed-in user")]
    NoActiveSession,
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Audit export error: {0}")]
    Audit(#[from] AuditError),
}

// ═══════════════════════════════════════════════════════════
// AppState
// ═══════════════════════════════════════════════════════════

pub struct AppState {
    store: Arc<dyn KeyValueStore>,
    user: RwLock<Option<User>>,
    settings: RwLock<SystemSettings>,
    search_term: RwLock<String>,
    notifications: Mutex<Vec<Notification>>,
}

impl AppState {
    /// Restore user and settings from the store. Missing or malformed
    /// documents read as signed-out and default settings.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let user = state::load_user(&*store);
        let settings = state::load_settings(&*store);
        Self {
            store,
            user: RwLock::new(user),
            settings: RwLock::new(settings),
            search_term: RwLock::new(String::new()),
            notifications: Mutex::new(initial_notifications()),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // ── User session ────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        self.user.read().map(|u| u.is_some()).unwrap_or(false)
    }

    /// Signed-in user (owned copy).
    pub fn current_user(&self) -> Result<User, AppError> {
        let guard = self.user.read().map_err(|_| AppError::LockPoisoned)?;
        guard.clone().ok_or(AppError::NoActiveSession)
    }

    /// Demo login: any credentials are accepted.
    pub fn login(&self, email: &str) -> Result<User, AppError> {
        let user = User {
            id: generate_base36_token(&mut rand::thread_rng(), USER_ID_LEN),
            name: DEMO_USER_NAME.to_string(),
            role: DEMO_USER_ROLE.to_string(),
            email: email.to_string(),
            avatar_url: None,
        };
        self.set_user(user.clone())?;
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    /// Create an account and sign in with it.
    pub fn sign_up(&self, name: &str, role: &str, email: &str) -> Result<User, AppError> {
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        let user = User {
            id: generate_base36_token(&mut rand::thread_rng(), USER_ID_LEN),
            name: or_default(name, DEFAULT_SIGNUP_NAME),
            role: or_default(role, DEFAULT_SIGNUP_ROLE),
            email: email.to_string(),
            avatar_url: None,
        };
        self.set_user(user.clone())?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Replace the profile of the signed-in user.
    pub fn update_profile(&self, user: User) -> Result<(), AppError> {
        if !self.is_authenticated() {
            return Err(AppError::NoActiveSession);
        }
        self.set_user(user)?;
        tracing::debug!("Profile updated");
        Ok(())
    }

    /// Sign out. Safe to call when already signed out.
    pub fn logout(&self) -> Result<(), AppError> {
        let mut guard = self.user.write().map_err(|_| AppError::LockPoisoned)?;
        *guard = None;
        state::clear_user(self.store())?;
        tracing::info!("User signed out");
        Ok(())
    }

    fn set_user(&self, user: User) -> Result<(), AppError> {
        state::save_user(self.store(), &user)?;
        let mut guard = self.user.write().map_err(|_| AppError::LockPoisoned)?;
        *guard = Some(user);
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────

    pub fn settings(&self) -> SystemSettings {
        self.settings.read().map(|s| *s).unwrap_or_default()
    }

    pub fn update_settings(&self, settings: SystemSettings) -> Result<(), AppError> {
        state::save_settings(self.store(), &settings)?;
        let mut guard = self.settings.write().map_err(|_| AppError::LockPoisoned)?;
        *guard = settings;
        Ok(())
    }

    /// Flip one boolean setting and persist the result.
    pub fn toggle_setting(&self, key: SettingToggle) -> Result<SystemSettings, AppError> {
        let next = self.settings().toggled(key);
        self.update_settings(next)?;
        tracing::debug!(setting = ?key, "Setting toggled");
        Ok(next)
    }

    pub fn set_narrative_detail(&self, detail: NarrativeDetail) -> Result<(), AppError> {
        let next = SystemSettings {
            ai_narrative_detail: detail,
            ..self.settings()
        };
        self.update_settings(next)
    }

    // ── Search ──────────────────────────────────────────────

    pub fn search_term(&self) -> String {
        self.search_term
            .read()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    pub fn set_search_term(&self, term: &str) -> Result<(), AppError> {
        let mut guard = self.search_term.write().map_err(|_| AppError::LockPoisoned)?;
        *guard = term.to_string();
        Ok(())
    }

    /// History view over the persisted records, filtered by the header
    /// search term.
    pub fn history_view(&self) -> HistoryView {
        let mut view = HistoryView::load(self.store());
        view.set_search_term(&self.search_term());
        view
    }

    // ── Notifications ───────────────────────────────────────

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications
            .lock()
            .map(|n| unread_count(&n))
            .unwrap_or(0)
    }

    pub fn mark_notifications_read(&self) -> Result<(), AppError> {
        let mut guard = self.notifications.lock().map_err(|_| AppError::LockPoisoned)?;
        for notification in guard.iter_mut() {
            notification.read = true;
        }
        Ok(())
    }

    // ── Data governance ─────────────────────────────────────

    /// Purge cached analyses and history once confirmed.
    pub fn wipe_cache(&self, confirmed: bool) -> Result<bool, AppError> {
        Ok(state::wipe_cache(self.store(), confirmed)?)
    }

    /// On-screen audit report for the signed-in user.
    pub fn audit_preview(&self) -> Result<AuditPreview, AppError> {
        let user = self.current_user()?;
        Ok(AuditPreview::new(
            &user,
            self.settings().hipaa_mode,
            state::has_history(self.store()),
        ))
    }

    /// Write the downloadable audit log into `dir`.
    pub fn export_audit_log(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let user = self.current_user()?;
        Ok(write_audit_log(dir, &AuditLog::for_user(&user))?)
    }
}
