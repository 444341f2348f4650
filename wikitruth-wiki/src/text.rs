//! Markup cleanup for article text.

use regex::Regex;
use std::sync::OnceLock;

struct WikitextPatterns {
    innermost_template: Regex,
    category: Regex,
    piped_link: Regex,
    plain_link: Regex,
    titled_external_link: Regex,
    bare_external_link: Regex,
    reference: Regex,
    self_closing_reference: Regex,
    comment: Regex,
    html_tag: Regex,
    heading: Regex,
    emphasis: Regex,
    magic_word: Regex,
    blank_lines: Regex,
    spaces: Regex,
}

struct HtmlPatterns {
    removed_blocks: Vec<Regex>,
    block_boundary: Regex,
    tag: Regex,
    numeric_entity: Regex,
    blank_lines: Regex,
    spaces: Regex,
}

static WIKITEXT_PATTERNS: OnceLock<WikitextPatterns> = OnceLock::new();
static HTML_PATTERNS: OnceLock<HtmlPatterns> = OnceLock::new();

fn patterns() -> &'static WikitextPatterns {
    WIKITEXT_PATTERNS.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("Invalid regex pattern");
        WikitextPatterns {
            innermost_template: re(r"\{\{[^{}]*\}\}"),
            category: re(r"(?i)\[\[(?:Category|Kategorie|Catégorie|Categoría|Категория):[^\]]+\]\]"),
            piped_link: re(r"\[\[[^\]|]+\|([^\]]+)\]\]"),
            plain_link: re(r"\[\[([^\]]+)\]\]"),
            titled_external_link: re(r"\[https?://[^\s\]]+ ([^\]]+)\]"),
            bare_external_link: re(r"\[https?://[^\]]+\]"),
            reference: re(r"(?s)<ref[^>]*>.*?</ref>"),
            self_closing_reference: re(r"<ref[^>]*/>"),
            comment: re(r"(?s)<!--.*?-->"),
            html_tag: re(r"<[^>]+>"),
            heading: re(r"(?m)^=+\s*([^=]+?)\s*=+\s*$"),
            emphasis: re(r"'{2,}"),
            magic_word: re(r"__[A-Z]+__"),
            blank_lines: re(r"\n{3,}"),
            spaces: re(r"[ \t]+"),
        }
    })
}

fn html_patterns() -> &'static HtmlPatterns {
    HTML_PATTERNS.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("Invalid regex pattern");
        HtmlPatterns {
            removed_blocks: vec![
                re(r"(?is)<script[^>]*>.*?</script>"),
                re(r"(?is)<style[^>]*>.*?</style>"),
                re(r#"(?is)<sup[^>]*class="[^"]*reference[^"]*"[^>]*>.*?</sup>"#),
                re(r#"(?is)<span[^>]*class="[^"]*mw-editsection[^"]*"[^>]*>.*?</span>"#),
                re(r#"(?is)<div[^>]*class="[^"]*navbox[^"]*"[^>]*>.*?</div>"#),
                re(r#"(?is)<table[^>]*class="[^"]*navbox[^"]*"[^>]*>.*?</table>"#),
                re(r#"(?is)<table[^>]*class="[^"]*infobox[^"]*"[^>]*>.*?</table>"#),
                re(r#"(?is)<div[^>]*id="toc"[^>]*>.*?</div>"#),
            ],
            block_boundary: re(r"(?i)</?(?:p|div|h[1-6]|li|tr|br)[^>]*>"),
            tag: re(r"<[^>]+>"),
            numeric_entity: re(r"&#\d+;"),
            blank_lines: re(r"\n{3,}"),
            spaces: re(r"[ \t]+"),
        }
    })
}

/// Convert rendered article HTML to plain text.
///
/// Scripts, reference markers, edit links, navboxes, infoboxes and the table
/// of contents are dropped; block elements become line breaks.
pub fn html_to_plain_text(html: &str) -> String {
    let p = html_patterns();

    let mut text = html.to_string();
    for block in &p.removed_blocks {
        text = block.replace_all(&text, "").into_owned();
    }
    text = p.block_boundary.replace_all(&text, "\n").into_owned();
    text = p.tag.replace_all(&text, "").into_owned();

    // &amp; last so escaped entities are not decoded twice.
    text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text = p.numeric_entity.replace_all(&text, "").into_owned();
    text = p.blank_lines.replace_all(&text, "\n\n").into_owned();
    text = p.spaces.replace_all(&text, " ").into_owned();

    text.trim().to_string()
}

/// Convert raw wikitext to readable plain text.
///
/// Templates are removed innermost-first so nested infoboxes disappear
/// entirely; links keep their visible label.
pub fn wikitext_to_plain_text(wikitext: &str) -> String {
    let p = patterns();

    let mut text = p.comment.replace_all(wikitext, "").into_owned();
    text = p.self_closing_reference.replace_all(&text, "").into_owned();
    text = p.reference.replace_all(&text, "").into_owned();

    loop {
        let stripped = p.innermost_template.replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    text = p.category.replace_all(&text, "").into_owned();
    text = p.piped_link.replace_all(&text, "$1").into_owned();
    text = p.plain_link.replace_all(&text, "$1").into_owned();
    text = p.titled_external_link.replace_all(&text, "$1").into_owned();
    text = p.bare_external_link.replace_all(&text, "").into_owned();
    text = p.html_tag.replace_all(&text, "").into_owned();
    text = p.heading.replace_all(&text, "\n$1\n").into_owned();
    text = p.emphasis.replace_all(&text, "").into_owned();
    text = p.magic_word.replace_all(&text, "").into_owned();
    text = p.spaces.replace_all(&text, " ").into_owned();
    text = p.blank_lines.replace_all(&text, "\n\n").into_owned();

    text.trim().to_string()
}
