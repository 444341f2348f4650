use crate::model::{AllCandidatesExhausted, FailureKind};

#[derive(Debug, thiserror::Error)]
pub enum WikiTruthError {
    #[error("Must select between {min} and {max} languages for comparison (got {count})")]
    InvalidLanguageCount { count: usize, min: usize, max: usize },

    #[error("Could not fetch articles for at least {required} languages (fetched {fetched})")]
    InsufficientLanguages { fetched: usize, required: usize },

    #[error("Generation limit reached ({used} of {limit} used)")]
    GenerationLimitExceeded { used: u32, limit: u32 },

    #[error("Upstream generation failed: {0}")]
    UpstreamGenerationFailed(#[from] AllCandidatesExhausted),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WikiTruthError {
    /// Actionable sentence suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidLanguageCount { min, max, count } if count > max => {
                format!("Please select fewer languages (at most {max}, at least {min}).")
            }
            Self::InvalidLanguageCount { min, max, .. } => {
                format!("Please select between {min} and {max} languages.")
            }
            Self::InsufficientLanguages { required, .. } => format!(
                "The article could not be loaded in at least {required} of the selected languages. \
                 Please pick other languages."
            ),
            Self::GenerationLimitExceeded { .. } => {
                "You have used all free comparisons. Upgrade to continue.".to_string()
            }
            Self::UpstreamGenerationFailed(exhausted) => exhausted.user_message().to_string(),
            Self::InvalidRequest(reason) => reason.clone(),
            _ => "Something went wrong. Please try again later.".to_string(),
        }
    }

    /// True when the caller should be redirected to an upgrade flow.
    pub fn is_upgrade_required(&self) -> bool {
        matches!(self, Self::GenerationLimitExceeded { .. })
    }

    /// The dominant upstream failure kind, if this error came from generation.
    pub fn upstream_failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::UpstreamGenerationFailed(exhausted) => Some(exhausted.dominant_kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WikiTruthError>;
