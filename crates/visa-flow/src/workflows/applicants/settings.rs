use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_PREFIX: &str = "BCA-";
pub const DEFAULT_FIRST_NUMBER: u64 = 100;

/// Numbering scheme for applicant ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSettings {
    pub id_prefix: String,
    /// Number assigned when no existing id carries the prefix.
    pub first_number: u64,
}

impl Default for ApplicantSettings {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            first_number: DEFAULT_FIRST_NUMBER,
        }
    }
}

impl ApplicantSettings {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Numeric suffix of `raw` when it carries the configured prefix.
    pub fn sequence_of(&self, raw: &str) -> Option<u64> {
        raw.strip_prefix(self.id_prefix.as_str())?.parse().ok()
    }

    pub fn format_id(&self, number: u64) -> String {
        format!("{}{}", self.id_prefix, number)
    }
}
