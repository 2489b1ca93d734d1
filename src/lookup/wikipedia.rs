use std::collections::BTreeMap;

use serde::Deserialize;

use crate::lookup::{ImageLookup, ImageRef};

#[cfg(feature = "network")]
const USER_AGENT: &str = concat!("anatolexic/", env!("CARGO_PKG_VERSION"));

const COMMONS_API_URL: &str = "https://commons.wikimedia.org/w/api.php";

/// Extra terms appended to a Commons file search to keep hits anatomical.
const COMMONS_QUERY_SUFFIX: &str = "anatomie OR anatomy OR os OR squelette OR muscle OR organe";

/// Commons files whose title contains one of these are never used.
const OFF_TOPIC_FILE_WORDS: &[&str] = &[
    "sacre", "jesus", "religion", "church", "icon", "bible", "croix",
];

/// MediaWiki page-image search with fallbacks.
///
/// Titles are tried in order: `"<term> <topic hint>"`, then `"<term>"`. If
/// neither page has an image, a full-text search supplies the best matching
/// title and its page image is used. Last, Wikimedia Commons is searched for
/// files and the first on-topic one is taken.
pub struct WikipediaLookup {
    api_url: String,
    commons_url: String,
    topic_hint: String,
}

impl WikipediaLookup {
    pub fn new(language: &str, topic_hint: &str) -> Self {
        Self {
            api_url: format!("https://{language}.wikipedia.org/w/api.php"),
            commons_url: COMMONS_API_URL.to_string(),
            topic_hint: topic_hint.trim().to_string(),
        }
    }

    pub fn commons_query(term: &str) -> String {
        format!("{} {COMMONS_QUERY_SUFFIX}", term.trim())
    }

    pub fn candidate_titles(&self, term: &str) -> Vec<String> {
        let term = term.trim();
        let mut titles = Vec::with_capacity(2);
        if !self.topic_hint.is_empty() {
            titles.push(format!("{term} {}", self.topic_hint).replace(' ', "_"));
        }
        titles.push(term.replace(' ', "_"));
        titles
    }

    fn page_image(&self, title: &str) -> Option<ImageRef> {
        let body = fetch_api(
            &self.api_url,
            &[
                ("action", "query"),
                ("format", "json"),
                ("prop", "pageimages"),
                ("piprop", "thumbnail|original"),
                ("pithumbsize", "500"),
                ("redirects", "1"),
                ("titles", title),
            ],
        )?;
        parse_page_image(&body)
    }

    fn search_title(&self, term: &str) -> Option<String> {
        let body = fetch_api(
            &self.api_url,
            &[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", "1"),
            ],
        )?;
        parse_search_title(&body)
    }

    fn commons_image(&self, term: &str) -> Option<ImageRef> {
        let query = Self::commons_query(term);
        let body = fetch_api(
            &self.commons_url,
            &[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("srnamespace", "6"),
                ("srlimit", "5"),
            ],
        )?;

        parse_search_titles(&body)
            .into_iter()
            .filter(|title| {
                let off_topic = is_off_topic_file(title);
                if off_topic {
                    log::debug!("skipping commons file '{title}'");
                }
                !off_topic
            })
            .find_map(|title| {
                let body = fetch_api(
                    &self.commons_url,
                    &[
                        ("action", "query"),
                        ("format", "json"),
                        ("titles", title.as_str()),
                        ("prop", "imageinfo"),
                        ("iiprop", "url"),
                    ],
                )?;
                parse_commons_image(&body)
            })
    }
}

impl ImageLookup for WikipediaLookup {
    fn find_image(&self, term: &str) -> Option<ImageRef> {
        for title in self.candidate_titles(term) {
            if let Some(image) = self.page_image(&title) {
                log::debug!("image for '{term}' found on page '{}'", image.page_title);
                return Some(image);
            }
        }

        if let Some(title) = self.search_title(term) {
            log::debug!("falling back to search hit '{title}' for '{term}'");
            if let Some(image) = self.page_image(&title) {
                return Some(image);
            }
        }

        let image = self.commons_image(term)?;
        log::debug!("image for '{term}' found on commons as '{}'", image.page_title);
        Some(image)
    }
}

#[derive(Deserialize)]
struct ApiResponse<Q> {
    query: Option<Q>,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: BTreeMap<String, PageInfo>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(default)]
    title: String,
    thumbnail: Option<ImageSource>,
    original: Option<ImageSource>,
}

#[derive(Deserialize)]
struct ImageSource {
    source: String,
}

#[derive(Deserialize)]
struct FilePagesQuery {
    #[serde(default)]
    pages: BTreeMap<String, FilePage>,
}

#[derive(Deserialize)]
struct FilePage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    imageinfo: Vec<FileInfo>,
}

#[derive(Deserialize)]
struct FileInfo {
    url: String,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

/// First existing page carrying an image. Thumbnails win over originals.
pub fn parse_page_image(body: &str) -> Option<ImageRef> {
    let response: ApiResponse<PagesQuery> = serde_json::from_str(body)
        .inspect_err(|e| log::warn!("unexpected page image response: {e}"))
        .ok()?;
    response
        .query?
        .pages
        .into_iter()
        .filter(|(id, _)| !id.starts_with('-'))
        .find_map(|(_, page)| {
            let source = page.thumbnail.or(page.original)?;
            Some(ImageRef {
                page_title: page.title,
                url: source.source,
            })
        })
}

pub fn parse_search_title(body: &str) -> Option<String> {
    let response: ApiResponse<SearchQuery> = serde_json::from_str(body)
        .inspect_err(|e| log::warn!("unexpected search response: {e}"))
        .ok()?;
    response.query?.search.into_iter().next().map(|hit| hit.title)
}

/// Every hit title, in ranking order.
pub fn parse_search_titles(body: &str) -> Vec<String> {
    serde_json::from_str::<ApiResponse<SearchQuery>>(body)
        .inspect_err(|e| log::warn!("unexpected search response: {e}"))
        .ok()
        .and_then(|response| response.query)
        .map(|query| query.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default()
}

pub fn is_off_topic_file(title: &str) -> bool {
    let title = title.to_lowercase();
    OFF_TOPIC_FILE_WORDS.iter().any(|word| title.contains(word))
}

/// Direct file URL from a Commons `imageinfo` query.
pub fn parse_commons_image(body: &str) -> Option<ImageRef> {
    let response: ApiResponse<FilePagesQuery> = serde_json::from_str(body)
        .inspect_err(|e| log::warn!("unexpected imageinfo response: {e}"))
        .ok()?;
    response.query?.pages.into_values().find_map(|page| {
        let info = page.imageinfo.into_iter().next()?;
        Some(ImageRef {
            page_title: page.title,
            url: info.url,
        })
    })
}

#[cfg(feature = "network")]
fn fetch_api(api_url: &str, params: &[(&str, &str)]) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()
        .ok()?;
    let response = client
        .get(api_url)
        .query(params)
        .send()
        .inspect_err(|e| log::warn!("wikipedia request failed: {e}"))
        .ok()?;
    if response.status().is_success() {
        response.text().ok()
    } else {
        log::warn!("wikipedia answered {}", response.status());
        None
    }
}

#[cfg(not(feature = "network"))]
fn fetch_api(_api_url: &str, _params: &[(&str, &str)]) -> Option<String> {
    None
}
