//! Property tests for per-language content budgeting.

use proptest::prelude::*;
use wikitruth_compare::budget::{TRUNCATION_MARKER, budget, per_language_budget};
use wikitruth_core::ArticleContent;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Article text mixing ASCII and multi-byte characters.
fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just('a'), Just('é'), Just('東'), Just(' ')], 0..400)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Between one and five language editions.
fn arb_articles() -> impl Strategy<Value = Vec<ArticleContent>> {
    prop::collection::vec(arb_text(), 1..=5).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| ArticleContent::new(format!("l{index}"), "Topic", text))
            .collect()
    })
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Output length never exceeds the total budget plus one marker per truncated article.
    #[test]
    fn prop_budget_is_conserved(articles in arb_articles(), total in 0usize..2_000) {
        let budgeted = budget(&articles, total);

        let used: usize = budgeted.iter().map(|b| char_len(&b.text)).sum();
        let truncated = budgeted.iter().filter(|b| b.truncated).count();

        prop_assert!(used <= total + char_len(TRUNCATION_MARKER) * truncated);
    }

    /// Truncated text starts with the input's head share and ends with its tail share.
    #[test]
    fn prop_truncation_preserves_edges(articles in arb_articles(), total in 0usize..2_000) {
        let share = per_language_budget(total, articles.len());
        let budgeted = budget(&articles, total);

        for (input, output) in articles.iter().zip(&budgeted) {
            prop_assert_eq!(&input.language, &output.language);

            if !output.truncated {
                prop_assert_eq!(&input.text, &output.text);
                continue;
            }

            let head: String = input.text.chars().take(share * 7 / 10).collect();
            let tail_len = share * 3 / 10;
            let tail: String = input.text.chars().skip(char_len(&input.text) - tail_len).collect();

            prop_assert!(char_len(&input.text) > share);
            prop_assert_eq!(output.text.clone(), format!("{head}{TRUNCATION_MARKER}{tail}"));
        }
    }

    /// Every input language yields exactly one output.
    #[test]
    fn prop_one_output_per_language(articles in arb_articles(), total in 0usize..2_000) {
        prop_assert_eq!(budget(&articles, total).len(), articles.len());
    }
}
