use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::Item;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("anchor selector"));

/// Headline-ish descendants preferred over the anchor's own text.
static TITLE_HINT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"h1, h2, h3, h4, [class*="title"], [class*="headline"]"#)
        .expect("title hint selector")
});

/// Generic anchor harvester for sites without a bespoke parser.
///
/// Every `<a>` with a usable href yields one candidate item; hrefs are
/// resolved against the source URL and deduplicated within this single call
/// (first occurrence wins).
pub fn parse_generic_html(html: &str, base_url: &str) -> Vec<Item> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for anchor in document.select(&ANCHOR) {
        let href = match anchor.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        if href.trim().is_empty() || href.trim() == "#" || href.starts_with("javascript:") {
            continue;
        }

        let heading = anchor
            .select(&TITLE_HINT)
            .next()
            .map(|el| el.text().collect::<String>());
        let text = heading.unwrap_or_else(|| anchor.text().collect::<String>());
        let title = collapse_whitespace(text.trim());
        if title.is_empty() {
            continue;
        }

        let url = match resolve_url(href, base.as_ref()) {
            Some(url) => url,
            None => continue,
        };
        if seen.insert(url.clone()) {
            items.push(Item { title, url });
        }
    }

    items
}

/// Resolve an href against the page it came from; relative references
/// without a usable base are dropped.
pub(crate) fn resolve_url(reference: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = reference.trim();
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(trimmed).ok()).map(Url::into)
}

/// Collapse runs of two or more whitespace characters into a single space;
/// a lone whitespace character is kept as-is.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = None;
    let mut run = 0usize;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending = Some(ch);
            run += 1;
        } else {
            match run {
                0 => {}
                1 => out.push(pending.take().unwrap_or(' ')),
                _ => out.push(' '),
            }
            run = 0;
            out.push(ch);
        }
    }
    out
}
