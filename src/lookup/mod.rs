pub mod wikipedia;

use serde::{Deserialize, Serialize};

pub use wikipedia::WikipediaLookup;

/// Where an illustration for a term can be found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub page_title: String,
    pub url: String,
}

/// Best-effort image search for a term. Implementations block, so callers
/// run them off the UI thread.
pub trait ImageLookup: Send + Sync {
    fn find_image(&self, term: &str) -> Option<ImageRef>;
}

/// Lookup used when network access is disabled.
pub struct NoLookup;

impl ImageLookup for NoLookup {
    fn find_image(&self, _term: &str) -> Option<ImageRef> {
        None
    }
}

pub fn encyclopedia_url(language: &str, term: &str) -> String {
    format!(
        "https://{language}.wikipedia.org/wiki/{}",
        percent_encode(&term.replace(' ', "_"))
    )
}

pub fn video_search_url(term: &str) -> String {
    let query: Vec<String> = term.split_whitespace().map(percent_encode).collect();
    format!(
        "https://www.youtube.com/results?search_query={}",
        query.join("+")
    )
}

/// Percent-encode every byte except ASCII letters, digits and `-_.~`.
fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encyclopedia_url_uses_underscores() {
        assert_eq!(
            encyclopedia_url("fr", "os coxal"),
            "https://fr.wikipedia.org/wiki/os_coxal"
        );
    }

    #[test]
    fn test_encyclopedia_url_encodes_accents_and_apostrophes() {
        assert_eq!(
            encyclopedia_url("fr", "arc de l'aorte"),
            "https://fr.wikipedia.org/wiki/arc_de_l%27aorte"
        );
        assert_eq!(
            encyclopedia_url("fr", "fémur"),
            "https://fr.wikipedia.org/wiki/f%C3%A9mur"
        );
    }

    #[test]
    fn test_video_search_url_joins_with_plus() {
        assert_eq!(
            video_search_url("nerf  sciatique"),
            "https://www.youtube.com/results?search_query=nerf+sciatique"
        );
    }

    #[test]
    fn test_no_lookup_finds_nothing() {
        assert_eq!(NoLookup.find_image("tibia"), None);
    }
}
