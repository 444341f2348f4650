//! Content Budgeter: fair per-language truncation of article text.

use wikitruth_core::{ArticleContent, BudgetedContent};

/// Inserted between the kept head and tail of a truncated article.
pub const TRUNCATION_MARKER: &str = "\n\n[... CONTENT TRUNCATED FOR SIZE ...]\n\n";

/// Default total character budget across all languages of one comparison.
pub const DEFAULT_TOTAL_BUDGET_CHARS: usize = 25_000;

/// Share of a language's budget kept from the start of the article, in tenths.
const HEAD_TENTHS: usize = 7;
/// Share kept from the end of the article, in tenths.
const TAIL_TENTHS: usize = 3;

/// Characters each language may use when `count` languages share `total_budget_chars`.
///
/// Integer division; the remainder is left unused.
pub fn per_language_budget(total_budget_chars: usize, count: usize) -> usize {
    if count == 0 { 0 } else { total_budget_chars / count }
}

/// Truncate every article to an equal share of `total_budget_chars`.
///
/// Articles within their share pass through unchanged. Longer ones keep
/// their first 70% and last 30% of the share, joined by
/// [`TRUNCATION_MARKER`]. Lengths are counted in characters, never bytes.
/// Output order matches input order.
pub fn budget(contents: &[ArticleContent], total_budget_chars: usize) -> Vec<BudgetedContent> {
    let share = per_language_budget(total_budget_chars, contents.len());
    contents.iter().map(|article| truncate_to_share(article, share)).collect()
}

fn truncate_to_share(article: &ArticleContent, share: usize) -> BudgetedContent {
    let length = article.text.chars().count();
    if length <= share {
        return BudgetedContent {
            language: article.language.clone(),
            text: article.text.clone(),
            truncated: false,
        };
    }

    let head_chars = share * HEAD_TENTHS / 10;
    let tail_chars = share * TAIL_TENTHS / 10;

    let head_end = byte_offset(&article.text, head_chars);
    let tail_start = byte_offset(&article.text, length - tail_chars);

    let mut text =
        String::with_capacity(head_end + TRUNCATION_MARKER.len() + article.text.len() - tail_start);
    text.push_str(&article.text[..head_end]);
    text.push_str(TRUNCATION_MARKER);
    text.push_str(&article.text[tail_start..]);

    BudgetedContent { language: article.language.clone(), text, truncated: true }
}

// Byte offset of the `chars`-th character, or the end of the string.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map(|(offset, _)| offset).unwrap_or(text.len())
}
