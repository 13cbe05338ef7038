use std::sync::atomic::{AtomicU64, Ordering};

use crate::{CrawlRecord, Item, RecordStatus};

/// Source names carrying this marker get the vendor's generic
/// search-landing page filtered out of their matches.
const SELF_MATCH_MARKER: &str = "PChome";

/// Filter parsed items against the keyword and mint the final records.
///
/// Matching is a pure case-insensitive substring test on the title. When no
/// match survives, a single no-match record is emitted so every source
/// produces exactly one batch.
pub fn match_items(
    items: &[Item],
    keyword: &str,
    source_name: &str,
    ids: &AtomicU64,
) -> Vec<CrawlRecord> {
    let needle = keyword.to_lowercase();
    let suppress_self_match = source_name.contains(SELF_MATCH_MARKER);

    let survivors: Vec<&Item> = items
        .iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .filter(|item| !suppress_self_match || item.title.to_lowercase().trim() != needle)
        .collect();

    if survivors.is_empty() {
        return vec![CrawlRecord {
            id: next_id(ids),
            website: source_name.to_owned(),
            title: String::new(),
            url: String::new(),
            status: RecordStatus::NoMatch,
            error: None,
        }];
    }

    survivors
        .into_iter()
        .map(|item| CrawlRecord {
            id: next_id(ids),
            website: source_name.to_owned(),
            title: item.title.clone(),
            url: item.url.clone(),
            status: RecordStatus::Success,
            error: None,
        })
        .collect()
}

/// Record a failed source as a single error outcome.
pub fn error_record(source_name: &str, message: String, ids: &AtomicU64) -> CrawlRecord {
    CrawlRecord {
        id: next_id(ids),
        website: source_name.to_owned(),
        title: String::new(),
        url: String::new(),
        status: RecordStatus::Error,
        error: Some(message),
    }
}

fn next_id(ids: &AtomicU64) -> u64 {
    ids.fetch_add(1, Ordering::Relaxed)
}
