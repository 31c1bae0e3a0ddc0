use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// The literal doubles as the serde name so persisted JSON stays
/// compatible with the browser build.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(RiskLevel {
    Safe => "SAFE",
    AdjustDosage => "ADJUST_DOSAGE",
    Toxic => "TOXIC",
});

str_enum!(RecordStatus {
    Complete => "Complete",
    Pending => "Pending",
});

str_enum!(StatusFilter {
    All => "All",
    Complete => "Complete",
    Pending => "Pending",
});

str_enum!(SortField {
    Date => "date",
    Id => "id",
    PatientId => "patientId",
    Status => "status",
});

str_enum!(SortOrder {
    Asc => "asc",
    Desc => "desc",
});

str_enum!(NarrativeDetail {
    Concise => "Concise",
    Standard => "Standard",
    Exhaustive => "Exhaustive",
});

str_enum!(NotificationKind {
    Alert => "alert",
    Info => "info",
    Success => "success",
});

impl RiskLevel {
    /// Badge label shown next to a drug result.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe - Standard Dose",
            Self::AdjustDosage => "Adjust Dosage Required",
            Self::Toxic => "Toxic - Alternative Required",
        }
    }
}

impl StatusFilter {
    /// `All` is the identity filter.
    pub fn matches(&self, status: RecordStatus) -> bool {
        match self {
            Self::All => true,
            Self::Complete => status == RecordStatus::Complete,
            Self::Pending => status == RecordStatus::Pending,
        }
    }
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl Default for NarrativeDetail {
    fn default() -> Self {
        Self::Standard
    }
}
