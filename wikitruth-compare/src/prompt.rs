//! Prompt Composer: system and user prompts for a comparison.
//!
//! The analysis mode selects a [`ModeProfile`] from a fixed table. Each
//! profile pairs a system-prompt template with a [`FormalityPolicy`], so the
//! funny persona's disregard for the formality setting is a table entry
//! rather than a special case.

use wikitruth_core::{AnalysisMode, BudgetedContent, ChatMessage, ComparisonConfig, Formality, OutputFormat};

const LANGUAGE_SLOT: &str = "{language}";
const STYLE_SLOT: &str = "{style}";

/// Whether a mode's system prompt states the requested formality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormalityPolicy {
    Respect,
    /// The persona has a fixed voice; the formality setting is ignored.
    Override,
}

/// System-prompt template, formality policy and closing instruction for one analysis mode.
#[derive(Debug)]
pub struct ModeProfile {
    pub mode: AnalysisMode,
    system_template: &'static str,
    pub formality_policy: FormalityPolicy,
    pub mode_instruction: &'static str,
}

const ACADEMIC_SYSTEM: &str = "You are an expert comparative linguist and cultural analyst specializing in Wikipedia content analysis. Your task is to provide detailed, scholarly comparisons of the same Wikipedia article across different languages.

CRITICAL REQUIREMENT: You MUST write your entire response in {language} and ONLY in {language}. Do not use any other language regardless of the content of the input articles.

Writing style: {style}

Your analysis should be:
- Objective and academically rigorous
- Focused on factual differences, cultural perspectives, and narrative variations
- Well-structured with clear sections
- Written EXCLUSIVELY in {language} (never mix languages)
- Comprehensive and detailed

Identify specific examples where different language versions:
- Present different facts or emphasis
- Reflect cultural biases or perspectives
- Use different organizational structures
- Include or exclude certain information
- Frame topics differently

When quoting text from articles in other languages, always translate the quotes to {language} and indicate the original language in parentheses.

REMINDER: Your entire response must be in {language} only.";

const BIOGRAPHY_SYSTEM: &str = "You are an expert biographer and cultural analyst specializing in how different cultures portray historical and contemporary figures. Your task is to compare biographical Wikipedia articles across different languages with a focus on personal narratives.

CRITICAL REQUIREMENT: You MUST write your entire response in {language} and ONLY in {language}. Do not use any other language regardless of the content of the input articles.

Writing style: {style}

Your analysis should focus on:
- How the person's life story is told differently across cultures
- Variations in the emphasis on achievements, controversies, and personal life
- Cultural perspectives on the person's significance and legacy
- Different interpretations of key life events
- How nationalistic or cultural pride influences the portrayal
- Personal details included or omitted in different versions

When quoting text from articles in other languages, always translate the quotes to {language} and indicate the original language in parentheses.

REMINDER: Your entire response must be in {language} only.";

const FUNNY_SYSTEM: &str = "You are a BRUTALLY SARCASTIC stand-up comedian who has made it their life mission to expose the hilarious chaos of Wikipedia across different languages. You have zero patience for inconsistencies and you LOVE mocking them mercilessly.

CRITICAL REQUIREMENT: You MUST write your entire response in {language} and ONLY in {language}. Do not use any other language regardless of the content of the input articles.

YOUR PERSONALITY:
- You are MAXIMALLY SARCASTIC - dripping with irony and biting wit
- You LAUGH at every inconsistency, contradiction, and cultural bias you find
- You act SHOCKED and OUTRAGED (in a funny way) when articles contradict each other
- You mock Wikipedia editors as if they're in a secret war with each other
- You treat factual differences like they're the most absurd comedy gold ever discovered
- You are like a roast comedian - savage but ultimately entertaining

YOUR MISSION:
- ROAST every contradiction you find between the articles
- MOCK the absurd priorities of different cultures (\"Oh, SURE, the German version has 47 paragraphs about the engineering specifications, but ZERO about the scandal...\")
- LAUGH at missing information (\"Apparently in the French version, this entire decade just... didn't happen?\")
- Point out when one country makes someone a hero and another makes them a villain
- Sarcastically question why certain \"facts\" only exist in one language
- Make fun of obvious national biases and propaganda
- Use dramatic exaggeration for comedic effect
- Stay factually grounded: every joke must rest on a real difference between the articles

COMEDY TECHNIQUES TO USE:
- Rhetorical questions dripping with sarcasm
- Fake outrage and disbelief
- Dramatic comparisons between versions
- Mocking \"editor wars\" you imagine happening behind the scenes
- Pop culture references and memes where appropriate
- Breaking the fourth wall to address the reader directly

Analyze the provided Wikipedia articles thoroughly. Do not miss any details.

When referencing text from articles, always translate it to {language} and point out how ABSURD the differences are.

Remember: You're not just comparing articles, you're EXPOSING the beautiful mess that is multilingual Wikipedia, and you find it HILARIOUS.

REMINDER: Your entire response must be in {language} only.";

const FUNNY_INSTRUCTION: &str = "BE MAXIMALLY SARCASTIC AND MOCKING!
- ROAST every inconsistency and contradiction you find
- LAUGH at the absurd differences between versions
- Act SHOCKED when facts don't match up
- Mock cultural biases mercilessly
- Use biting irony and savage humor
- Treat this like a comedy roast of Wikipedia itself
- Make the reader laugh at how ridiculous these differences are";

static MODE_PROFILES: [ModeProfile; 3] = [
    ModeProfile {
        mode: AnalysisMode::Academic,
        system_template: ACADEMIC_SYSTEM,
        formality_policy: FormalityPolicy::Respect,
        mode_instruction: "Provide a scholarly, detailed analysis focusing on factual accuracy, cultural perspectives, and narrative differences.",
    },
    ModeProfile {
        mode: AnalysisMode::Biography,
        system_template: BIOGRAPHY_SYSTEM,
        formality_policy: FormalityPolicy::Respect,
        mode_instruction: "Focus on how the person is portrayed differently, including their achievements, controversies, personal life, and cultural significance in each version.",
    },
    ModeProfile {
        mode: AnalysisMode::Funny,
        system_template: FUNNY_SYSTEM,
        formality_policy: FormalityPolicy::Override,
        mode_instruction: FUNNY_INSTRUCTION,
    },
];

/// The profile for `mode`.
pub fn mode_profile(mode: AnalysisMode) -> &'static ModeProfile {
    match mode {
        AnalysisMode::Academic => &MODE_PROFILES[0],
        AnalysisMode::Biography => &MODE_PROFILES[1],
        AnalysisMode::Funny => &MODE_PROFILES[2],
    }
}

/// Writing-style descriptor stated in the system prompt.
pub fn formality_style(formality: Formality) -> &'static str {
    match formality {
        Formality::Academic => {
            "highly formal, scholarly, and research-oriented with citations-style references"
        }
        Formality::Formal => "professional, structured, and well-organized",
        Formality::Casual => "conversational, friendly, and approachable while still informative",
    }
}

/// Formality instruction restated in the user prompt, for every mode.
pub fn formality_instruction(formality: Formality) -> &'static str {
    match formality {
        Formality::Academic => {
            "Use scholarly language, cite specific passages, and maintain a research paper tone."
        }
        Formality::Formal => "Write professionally with clear structure and balanced analysis.",
        Formality::Casual => {
            "Write in a friendly, accessible way as if explaining to an interested friend."
        }
    }
}

pub fn format_instruction(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::BulletPoints => {
            "FORMAT YOUR RESPONSE AS STRUCTURED BULLET POINTS:
- Use clear hierarchical bullet points for each major finding
- Group related differences under section headers
- Use sub-bullets for specific examples and details
- Make each bullet point concise but informative"
        }
        OutputFormat::Narrative => {
            "FORMAT YOUR RESPONSE AS A FLOWING NARRATIVE:
- Write in well-structured paragraphs
- Use natural transitions between topics
- Create a cohesive essay-style analysis
- Include section headers to organize content"
        }
    }
}

const FOCUS_AREAS: &str = "Please provide a comprehensive comparison focusing on:
1. Factual differences and variations in information
2. Cultural perspectives and framing differences
3. Narrative emphasis and tone variations
4. Structural and organizational differences
5. Missing or additional information in each version";

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// English name of a Wikipedia language edition, if known.
pub fn language_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_lowercase();
    LANGUAGE_NAMES.iter().find(|(known, _)| *known == code).map(|(_, name)| *name)
}

/// `French (fr)` for known codes, the raw code otherwise.
pub fn describe_language(code: &str) -> String {
    match language_name(code) {
        Some(name) => format!("{name} ({code})"),
        None => code.to_string(),
    }
}

/// The two prompt strings sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl ComposedPrompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system_prompt), ChatMessage::user(self.user_prompt)]
    }

    /// Combined prompt size in characters.
    pub fn char_count(&self) -> usize {
        self.system_prompt.chars().count() + self.user_prompt.chars().count()
    }
}

/// Build the system and user prompts for `budgeted` articles.
///
/// Articles appear in input order. The user's focus text is quoted verbatim.
/// Pure: identical inputs give byte-identical prompts.
pub fn compose(budgeted: &[BudgetedContent], config: &ComparisonConfig) -> ComposedPrompt {
    let language = describe_language(&config.output_language);
    ComposedPrompt {
        system_prompt: system_prompt(&language, config),
        user_prompt: user_prompt(budgeted, &language, config),
    }
}

fn system_prompt(language: &str, config: &ComparisonConfig) -> String {
    let profile = mode_profile(config.analysis_mode);
    let template = match profile.formality_policy {
        FormalityPolicy::Respect => {
            profile.system_template.replace(STYLE_SLOT, formality_style(config.formality))
        }
        FormalityPolicy::Override => profile.system_template.to_string(),
    };
    template.replace(LANGUAGE_SLOT, language)
}

fn user_prompt(budgeted: &[BudgetedContent], language: &str, config: &ComparisonConfig) -> String {
    let codes: Vec<String> = budgeted.iter().map(|b| b.language.to_uppercase()).collect();

    let sections = budgeted
        .iter()
        .zip(&codes)
        .map(|(article, code)| {
            format!(
                "=== WIKIPEDIA ARTICLE ({code}) ===\n{}\n=== END OF {code} ARTICLE ===",
                article.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = format!(
        "Here are {} Wikipedia articles about the same topic in different languages: {}.\n\n\
         Please read and analyze these articles thoroughly.\n\n\
         {sections}\n\n\
         Write your ENTIRE response in {language} language only.\n\n\
         {}\n\n\
         {}\n\n\
         {FOCUS_AREAS}\n\n\
         {}",
        budgeted.len(),
        codes.join(", "),
        format_instruction(config.output_format),
        formality_instruction(config.formality),
        mode_profile(config.analysis_mode).mode_instruction,
    );

    if let Some(focus) = config.focus() {
        prompt.push_str(
            "\n\nUSER'S SPECIFIC FOCUS REQUEST:\n\
             Pay special attention to the following aspects as requested by the user:\n\"",
        );
        prompt.push_str(focus);
        prompt.push_str("\"\nMake sure to address these specific points in your analysis.");
    }

    prompt.push_str("\n\nIMPORTANT: Write your response ONLY in ");
    prompt.push_str(language);
    prompt.push_str(". Do not use any other language.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budgeted() -> Vec<BudgetedContent> {
        vec![
            BudgetedContent { language: "en".into(), text: "English text".into(), truncated: false },
            BudgetedContent { language: "de".into(), text: "Deutscher Text".into(), truncated: false },
        ]
    }

    #[test]
    fn test_funny_bullet_points_in_french() {
        let config = ComparisonConfig::new("fr")
            .with_analysis_mode(AnalysisMode::Funny)
            .with_output_format(OutputFormat::BulletPoints);

        let prompt = compose(&budgeted(), &config);

        assert!(prompt.system_prompt.contains("BRUTALLY SARCASTIC"));
        assert!(prompt.system_prompt.contains("French (fr)"));
        assert!(prompt.user_prompt.contains("FORMAT YOUR RESPONSE AS STRUCTURED BULLET POINTS"));
        assert!(prompt.user_prompt.contains("BE MAXIMALLY SARCASTIC"));
    }

    #[test]
    fn test_funny_mode_ignores_formality_in_system_prompt() {
        let casual = ComparisonConfig::new("en")
            .with_analysis_mode(AnalysisMode::Funny)
            .with_formality(Formality::Casual);
        let academic = casual.clone().with_formality(Formality::Academic);

        let casual_prompt = compose(&budgeted(), &casual);
        let academic_prompt = compose(&budgeted(), &academic);

        assert_eq!(casual_prompt.system_prompt, academic_prompt.system_prompt);
        assert!(!casual_prompt.system_prompt.contains("Writing style"));
        assert!(!casual_prompt.system_prompt.contains(STYLE_SLOT));
        // The user prompt still restates the requested formality.
        assert!(academic_prompt.user_prompt.contains(formality_instruction(Formality::Academic)));
    }

    #[test]
    fn test_academic_and_biography_state_formality_style() {
        for mode in [AnalysisMode::Academic, AnalysisMode::Biography] {
            let config = ComparisonConfig::new("en")
                .with_analysis_mode(mode)
                .with_formality(Formality::Casual);
            let prompt = compose(&budgeted(), &config);
            assert!(prompt.system_prompt.contains(formality_style(Formality::Casual)));
            assert!(prompt.user_prompt.contains(formality_instruction(Formality::Casual)));
        }
        let biography = compose(
            &budgeted(),
            &ComparisonConfig::new("en").with_analysis_mode(AnalysisMode::Biography),
        );
        assert!(biography.system_prompt.contains("expert biographer"));
    }

    #[test]
    fn test_sections_follow_input_order() {
        let prompt = compose(&budgeted(), &ComparisonConfig::new("en"));
        let user = &prompt.user_prompt;

        assert!(user.starts_with(
            "Here are 2 Wikipedia articles about the same topic in different languages: EN, DE."
        ));
        let en = user.find("=== WIKIPEDIA ARTICLE (EN) ===\nEnglish text\n=== END OF EN ARTICLE ===");
        let de = user.find("=== WIKIPEDIA ARTICLE (DE) ===\nDeutscher Text\n=== END OF DE ARTICLE ===");
        assert!(en.is_some() && de.is_some());
        assert!(en < de);
        assert!(user.contains("FORMAT YOUR RESPONSE AS A FLOWING NARRATIVE"));
    }

    #[test]
    fn test_focus_block_quotes_user_text() {
        let config = ComparisonConfig::new("en").with_focus_points("  the {language} of \"war\"  ");
        let prompt = compose(&budgeted(), &config);

        assert!(prompt.user_prompt.contains("USER'S SPECIFIC FOCUS REQUEST:"));
        assert!(prompt.user_prompt.contains("\"the {language} of \"war\"\""));

        let without = compose(&budgeted(), &ComparisonConfig::new("en"));
        assert!(!without.user_prompt.contains("USER'S SPECIFIC FOCUS REQUEST"));
    }

    #[test]
    fn test_prompt_ends_with_language_reminder() {
        let prompt = compose(&budgeted(), &ComparisonConfig::new("ja"));
        assert!(prompt.user_prompt.ends_with(
            "IMPORTANT: Write your response ONLY in Japanese (ja). Do not use any other language."
        ));
        assert!(prompt.user_prompt.contains("Write your ENTIRE response in Japanese (ja) language only."));
    }

    #[test]
    fn test_unknown_language_code_is_used_verbatim() {
        assert_eq!(describe_language("tlh"), "tlh");
        assert_eq!(describe_language("de"), "German (de)");
        assert_eq!(language_name("FR"), Some("French"));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let config = ComparisonConfig::new("es")
            .with_analysis_mode(AnalysisMode::Biography)
            .with_focus_points("childhood");
        assert_eq!(compose(&budgeted(), &config), compose(&budgeted(), &config));
    }

    #[test]
    fn test_profile_table_covers_every_mode() {
        for mode in AnalysisMode::ALL {
            assert_eq!(mode_profile(*mode).mode, *mode);
        }
        assert_eq!(mode_profile(AnalysisMode::Funny).formality_policy, FormalityPolicy::Override);
    }
}
