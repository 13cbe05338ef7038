use roxmltree::Document;

use crate::Item;

/// Collect every `item` element's `title` and `link` child text; an item
/// lacking either is dropped. Malformed XML degrades to zero items.
pub fn parse_rss(xml: &str) -> Vec<Item> {
    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(_) => return Vec::new(),
    };

    let mut items = Vec::new();
    for node in doc.descendants() {
        if !node.has_tag_name("item") {
            continue;
        }
        let title = child_text(&node, "title");
        let link = child_text(&node, "link");
        if let (Some(title), Some(link)) = (title, link) {
            items.push(Item { title, url: link });
        }
    }
    items
}

fn child_text(node: &roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    for child in node.children() {
        if !child.is_element() || !child.tag_name().name().eq_ignore_ascii_case(name) {
            continue;
        }
        if let Some(text) = child.text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}
