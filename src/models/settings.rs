use serde::{Deserialize, Serialize};

use super::enums::NarrativeDetail;

/// Signed-in clinician profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Avatar to display: the explicit URL or a deterministic placeholder.
    pub fn avatar_src(&self) -> String {
        self.avatar_url
            .clone()
            .unwrap_or_else(|| format!("https://picsum.photos/seed/{}/200/200", self.id))
    }
}

/// Clinical environment preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub guideline_sync: bool,
    pub ai_narrative_detail: NarrativeDetail,
    pub hipaa_mode: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            guideline_sync: true,
            ai_narrative_detail: NarrativeDetail::Standard,
            hipaa_mode: true,
        }
    }
}

/// Boolean settings that can be flipped from the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    GuidelineSync,
    HipaaMode,
}

impl SystemSettings {
    /// Return a copy with one boolean flag flipped.
    pub fn toggled(self, key: SettingToggle) -> Self {
        let mut next = self;
        match key {
            SettingToggle::GuidelineSync => next.guideline_sync = !next.guideline_sync,
            SettingToggle::HipaaMode => next.hipaa_mode = !next.hipaa_mode,
        }
        next
    }
}

/// Drugs handed from the analysis (or history) view to the results view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LastAnalysis {
    pub drugs: Vec<String>,
}
