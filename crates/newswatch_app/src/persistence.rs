//! Flat-text source list persistence.
//!
//! The list format is one source per line, `Name：URL` with a full-width
//! colon. Bare `http…` lines are accepted too and take their hostname as the
//! display name.

use std::fs;
use std::io;
use std::path::Path;

use newswatch_core::SourceEntry;
use thiserror::Error;
use url::Url;

/// Built-in list written out on first run when no source file exists.
const DEFAULT_SOURCES: &str = "\
Yahoo：https://tw.stock.yahoo.com/rss?q=sunmedia
Line：https://today.line.me/tw/v2/publisher/104464
蕃新聞：https://n.yam.com/RealTime/sunmedia?page=1
奧丁丁：https://news.owlting.com/vendor/77
火報：https://firenews.com.tw/page/2/?s=%%KEYWORD%%
Life生活網：https://m.life.tw/?app=author&act=detail&id=127133
PChome：https://news.pchome.com.tw/media/sunmedia
記者爆料網：https://new-reporter.com/?s=%%KEYWORD%%
獨家報導：https://www.scooptw.com/category/sunmedia/
YES新聞：https://www.yesmedia.com.tw/?s=%%KEYWORD%%
樂聯網：https://leho.com.tw/author/sunmedia
台灣電報：https://enn.tw/author/enn009/
台灣線報：https://twline365.com/feed/sunmedia/
民生電子報：https://lifenews.com.tw/page/1/?s=%%KEYWORD%%
警政時報：https://www.tcpttw.com/?s=%%KEYWORD%%
墨新聞：https://more-news.tw/author/sunmedia/
";

#[derive(Debug, Error)]
pub enum SourceListError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("source list {0} contains no usable entries")]
    Empty(String),
}

/// Load the source list, seeding the file with the built-in defaults when it
/// does not exist yet.
pub fn load_or_seed(path: &Path) -> Result<Vec<SourceEntry>, SourceListError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::write(path, DEFAULT_SOURCES)?;
            log::info!("seeded default source list at {}", path.display());
            DEFAULT_SOURCES.to_owned()
        }
        Err(err) => return Err(err.into()),
    };

    let sources = parse_source_list(&content);
    if sources.is_empty() {
        return Err(SourceListError::Empty(path.display().to_string()));
    }
    Ok(sources)
}

/// Parse the flat-text format. Blank and malformed lines are skipped.
pub fn parse_source_list(text: &str) -> Vec<SourceEntry> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<SourceEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some((name, url)) = line.split_once('：') {
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            log::warn!("skipping malformed source line: {line}");
            return None;
        }
        return Some(SourceEntry {
            name: name.to_owned(),
            url: url.to_owned(),
            enabled: true,
        });
    }
    if line.starts_with("http") {
        return match Url::parse(line) {
            Ok(parsed) => parsed.host_str().map(|host| SourceEntry {
                name: host.to_owned(),
                url: line.to_owned(),
                enabled: true,
            }),
            Err(_) => {
                log::warn!("skipping invalid URL line: {line}");
                None
            }
        };
    }
    log::warn!("skipping malformed source line: {line}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_entries_and_bare_urls() {
        let text = "\
Yahoo：https://tw.news.yahoo.com/rss

https://example.com/news?page=1
nonsense line
：https://no-name.example.com
";
        let sources = parse_source_list(text);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "Yahoo");
        assert_eq!(sources[0].url, "https://tw.news.yahoo.com/rss");
        assert!(sources[0].enabled);
        assert_eq!(sources[1].name, "example.com");
        assert_eq!(sources[1].url, "https://example.com/news?page=1");
    }

    #[test]
    fn load_seeds_defaults_when_file_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sources.txt");

        let sources = load_or_seed(&path).expect("seeded list");
        assert!(path.exists());
        assert!(!sources.is_empty());
        assert!(sources.iter().any(|s| s.name.contains("PChome")));

        // Second load reads the file it just wrote.
        let again = load_or_seed(&path).expect("reload");
        assert_eq!(sources, again);
    }

    #[test]
    fn load_rejects_list_without_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sources.txt");
        std::fs::write(&path, "junk\n\n").expect("write");

        assert!(matches!(
            load_or_seed(&path),
            Err(SourceListError::Empty(_))
        ));
    }
}
