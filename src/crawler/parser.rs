//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Anchor hrefs, raw and in document order
//! - Page title

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use scraper::{Html, Selector};

/// Schemes that never point at a checkable web resource
const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw href values of every anchor, in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts links and metadata
///
/// Parsing never fails. Anchors are read from the token stream, so each
/// `<a>` start tag in the markup yields exactly one link; the tree builder's
/// repair of misnested formatting elements would otherwise clone unclosed
/// anchors.
///
/// # Link Extraction Rules
///
/// **Include:**
/// - Every `<a href="...">`, duplicates included
/// - Empty and fragment-only hrefs (they resolve to the page itself)
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Anything inside `<script>`, `<style>` and other raw text elements
///
/// # Example
///
/// ```
/// use deadlink::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(html),
    }
}

/// Extracts anchor hrefs from an HTML string, in document order
pub fn extract_links(html: &str) -> Vec<String> {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));

    let mut tokenizer = Tokenizer::new(AnchorSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.hrefs
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects `href` values from anchor start tags
#[derive(Default)]
struct AnchorSink {
    hrefs: Vec<String>,
}

impl TokenSink for AnchorSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        if !matches!(tag.kind, TagKind::StartTag) {
            return TokenSinkResult::Continue;
        }

        // Without a tree builder the tokenizer must be told which elements
        // hold raw text, or markup inside scripts would be read as tags
        match &*tag.name {
            "a" => {
                let href = tag
                    .attrs
                    .iter()
                    .find(|attr| &*attr.name.local == "href")
                    .map(|attr| attr.value.to_string());
                if let Some(href) = href.filter(|href| !is_skipped_href(href)) {
                    self.hrefs.push(href);
                }
                TokenSinkResult::Continue
            }
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }
}

/// Returns true for hrefs with a non-web scheme
fn is_skipped_href(href: &str) -> bool {
    let href = href.trim_start();
    SKIPPED_SCHEMES.iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
