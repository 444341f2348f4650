use crate::WikiTruthError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = WikiTruthError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    other => Err(WikiTruthError::InvalidRequest(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

/// Persona and goal governing the prompt tone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    #[default]
    Academic,
    Biography,
    Funny,
}

wire_enum!(AnalysisMode { Academic => "academic", Biography => "biography", Funny => "funny" });

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    BulletPoints,
    #[default]
    Narrative,
}

wire_enum!(OutputFormat { BulletPoints => "bullet-points", Narrative => "narrative" });

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formality {
    Academic,
    #[default]
    Formal,
    Casual,
}

wire_enum!(Formality { Academic => "academic", Formal => "formal", Casual => "casual" });

/// Which candidate chain serves comparison generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelTier {
    #[default]
    Free,
    Premium,
}

wire_enum!(ModelTier { Free => "free", Premium => "premium" });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonConfig {
    pub output_language: String,
    #[serde(default)]
    pub analysis_mode: AnalysisMode,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    pub formality: Formality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_points: Option<String>,
    #[serde(default)]
    pub ai_model: ModelTier,
}

impl ComparisonConfig {
    pub fn new(output_language: impl Into<String>) -> Self {
        Self {
            output_language: output_language.into(),
            analysis_mode: AnalysisMode::default(),
            output_format: OutputFormat::default(),
            formality: Formality::default(),
            focus_points: None,
            ai_model: ModelTier::default(),
        }
    }

    /// Config for callers that only carry the legacy funny-mode switch.
    pub fn from_funny_flag(output_language: impl Into<String>, is_funny_mode: bool) -> Self {
        let mode = if is_funny_mode { AnalysisMode::Funny } else { AnalysisMode::Academic };
        Self::new(output_language).with_analysis_mode(mode)
    }

    pub fn with_analysis_mode(mut self, analysis_mode: AnalysisMode) -> Self {
        self.analysis_mode = analysis_mode;
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = formality;
        self
    }

    pub fn with_focus_points(mut self, focus_points: impl Into<String>) -> Self {
        self.focus_points = Some(focus_points.into());
        self
    }

    pub fn with_ai_model(mut self, ai_model: ModelTier) -> Self {
        self.ai_model = ai_model;
        self
    }

    /// Focus text with surrounding whitespace removed, if any remains.
    pub fn focus(&self) -> Option<&str> {
        self.focus_points.as_deref().map(str::trim).filter(|focus| !focus.is_empty())
    }

    pub fn is_funny_mode(&self) -> bool {
        self.analysis_mode == AnalysisMode::Funny
    }
}

/// Title of the article in one language edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTitle {
    pub language: String,
    pub title: String,
}

impl LanguageTitle {
    pub fn new(language: impl Into<String>, title: impl Into<String>) -> Self {
        Self { language: language.into(), title: title.into() }
    }
}

/// Inbound comparison request. Language order is presentation order and is
/// carried into the prompt unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub article_title: String,
    pub language_titles: Vec<LanguageTitle>,
    pub config: ComparisonConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
}

impl ComparisonRequest {
    pub fn new(
        article_title: impl Into<String>,
        language_titles: Vec<LanguageTitle>,
        config: ComparisonConfig,
    ) -> Self {
        Self { article_title: article_title.into(), language_titles, config, caller_id: None }
    }

    pub fn with_caller(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub language: String,
    pub title: String,
    pub content_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub id: String,
    pub article_title: String,
    pub selected_languages: Vec<String>,
    pub output_language: String,
    pub comparison_result_text: String,
    pub is_funny_mode: bool,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub articles: Vec<ArticleSummary>,
}
