use std::collections::HashSet;

use serde::Serialize;

pub const NO_TITLE: &str = "no title";
pub const NO_ADDRESS: &str = "no address";
pub const NO_REGION: &str = "no region";
pub const NO_DESCRIPTION: &str = "no description";
pub const NO_IMAGES: &str = "no images";
pub const NO_PRICE: &str = "no price";
pub const NO_AREA: &str = "no area";
pub const NO_BATHROOMS: &str = "no bathrooms";
pub const NO_BEDROOMS: &str = "no bedrooms";

/// Ordered, deduplicating table of discovered detail-page links.
///
/// Keys are synthetic (`ad_0`, `ad_1`, ...) in discovery order and stay
/// contiguous because duplicates are rejected before a key is assigned.
#[derive(Debug, Default)]
pub struct LinkTable {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved URL; returns false if it was already present.
    pub fn insert(&mut self, url: String) -> bool {
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.urls.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Entries as `(key, url)` pairs in discovery order.
    pub fn entries(&self) -> impl Iterator<Item = (String, &str)> {
        self.urls
            .iter()
            .enumerate()
            .map(|(i, url)| (format!("ad_{i}"), url.as_str()))
    }
}

/// Gallery images: either the extracted URL list or the sentinel string,
/// matching the heterogeneous shape of the output JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImageUrls {
    Found(Vec<String>),
    Missing(&'static str),
}

impl ImageUrls {
    pub fn missing() -> Self {
        ImageUrls::Missing(NO_IMAGES)
    }
}

/// One scraped rental listing. Field order here is the serialized order.
/// Every field is always present; absent source nodes degrade to the
/// sentinels above instead of dropping the key.
#[derive(Debug, Clone, Serialize)]
pub struct ListingRecord {
    pub link: String,
    pub title: String,
    pub address: String,
    pub region: String,
    pub description: String,
    pub img_urls: ImageUrls,
    pub date: String,
    pub price: String,
    pub rooms: String,
    pub area: String,
}
