use once_cell::sync::Lazy;
use regex::Regex;

use crate::Item;

/// Article records embedded in the site's inline script payload.
static ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{id:(\d+),fetch_url:".*?",title:"(.*?)",description:"(.*?)""#)
        .expect("article pattern")
});

const ARTICLE_URL_PREFIX: &str = "https://news.owlting.com/articles/";

/// Bespoke extractor for news.owlting.com.
///
/// The article list lives in script text rather than markup, so records are
/// pattern-matched out of the raw body. A layout change degrades to zero
/// items rather than an error.
pub fn parse_owlting(body: &str) -> Vec<Item> {
    let mut items = Vec::new();
    for caps in ARTICLE.captures_iter(body) {
        let id = &caps[1];
        let title = unescape_slashes(&caps[2]);
        let description = unescape_slashes(&caps[3]);
        let title = if title.is_empty() {
            title_from_description(&description)
        } else {
            title
        };
        if id.is_empty() || title.is_empty() {
            continue;
        }
        items.push(Item {
            title,
            url: format!("{ARTICLE_URL_PREFIX}{id}"),
        });
    }
    items
}

fn unescape_slashes(text: &str) -> String {
    text.replace("\\u002F", "/")
}

/// Headline fallback: the description up to its first sentence-ending
/// punctuation mark, or the first 50 characters with an ellipsis.
fn title_from_description(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }
    if let Some((idx, ch)) = description
        .char_indices()
        .find(|(_, ch)| matches!(ch, '。' | '？' | '！'))
    {
        return description[..idx + ch.len_utf8()].trim().to_string();
    }
    let truncated: String = description.chars().take(50).collect();
    format!("{}...", truncated.trim())
}
