use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use super::html::resolve_url;
use crate::Item;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse(".card-parent").expect("card selector"));
static CARD_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".card-title.list-title").expect("card title selector"));
static CARD_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.stretched-link").expect("card link selector"));

/// Bespoke extractor for life.tw card listings. Cards missing a title or a
/// link are dropped.
pub fn parse_life_tw(html: &str, base_url: &str) -> Vec<Item> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();
    let mut items = Vec::new();

    for card in document.select(&CARD) {
        let title = card
            .select(&CARD_TITLE)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());
        let href = card
            .select(&CARD_LINK)
            .next()
            .and_then(|el| el.value().attr("href"));

        if let (Some(title), Some(href)) = (title, href) {
            if title.is_empty() {
                continue;
            }
            if let Some(url) = resolve_url(href, base.as_ref()) {
                items.push(Item { title, url });
            }
        }
    }

    items
}
