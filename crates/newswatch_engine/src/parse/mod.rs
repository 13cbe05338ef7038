//! Per-source content parsers and the strategy dispatcher.
mod html;
mod lifetw;
mod owlting;
mod rss;

pub use html::parse_generic_html;
pub use lifetw::parse_life_tw;
pub use owlting::parse_owlting;
pub use rss::parse_rss;

use url::Url;

use crate::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Owlting,
    LifeTw,
    Rss,
    GenericHtml,
}

enum Rule {
    HostContains(&'static str),
    ContentTypeContains(&'static str),
}

/// Priority-ordered dispatch table; supporting a new bespoke site is one row.
const STRATEGY_TABLE: &[(Rule, ParseStrategy)] = &[
    (Rule::HostContains("owlting.com"), ParseStrategy::Owlting),
    (Rule::HostContains("life.tw"), ParseStrategy::LifeTw),
    (Rule::ContentTypeContains("xml"), ParseStrategy::Rss),
];

/// Pick the parser for a source's response. A source URL that does not parse
/// falls through to the generic HTML strategy.
pub fn select_strategy(source_url: &str, content_type: Option<&str>) -> ParseStrategy {
    let host = match Url::parse(source_url) {
        Ok(url) => url.host_str().unwrap_or_default().to_owned(),
        Err(_) => return ParseStrategy::GenericHtml,
    };
    let content_type = content_type.unwrap_or_default();

    for (rule, strategy) in STRATEGY_TABLE {
        let hit = match rule {
            Rule::HostContains(needle) => host.contains(needle),
            Rule::ContentTypeContains(needle) => content_type.contains(needle),
        };
        if hit {
            return *strategy;
        }
    }
    ParseStrategy::GenericHtml
}

/// Run the selected parser over the fetched text.
pub fn parse_items(strategy: ParseStrategy, body: &str, source_url: &str) -> Vec<Item> {
    match strategy {
        ParseStrategy::Owlting => parse_owlting(body),
        ParseStrategy::LifeTw => parse_life_tw(body, source_url),
        ParseStrategy::Rss => parse_rss(body),
        ParseStrategy::GenericHtml => parse_generic_html(body, source_url),
    }
}
