use chrono::Local;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::crawler::models::{
    ImageUrls, ListingRecord, NO_ADDRESS, NO_AREA, NO_BATHROOMS, NO_BEDROOMS, NO_DESCRIPTION,
    NO_PRICE, NO_REGION, NO_TITLE,
};

/// Marker class the site puts on every detail-page anchor.
const DETAIL_LINK_SELECTOR: &str = "a.a-more-detail";

/// Collect detail-page links from one listing page, resolved against
/// `base_url`, in document order. Anchors without an href are skipped.
/// Deduplication is the walker's job, not ours.
pub fn extract_listing_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(DETAIL_LINK_SELECTOR).unwrap();

    let base = match Url::parse(base_url) {
        Ok(b) => b,
        Err(_) => return Vec::new(),
    };

    let mut links = Vec::new();
    for el in document.select(&selector) {
        if let Some(href) = el.value().attr("href") {
            if let Ok(resolved) = base.join(href) {
                links.push(resolved.to_string());
            }
        }
    }

    links
}

/// Scrape one detail page into the fixed ten-field record.
///
/// Each field is looked up independently; a missing node degrades to
/// that field's sentinel and never blocks the others.
pub fn extract_record(html: &str, link: &str) -> ListingRecord {
    let doc = Html::parse_document(html);

    // Selectors are part of the site's markup contract; literal parses
    // cannot fail.
    let sel = |s: &str| Selector::parse(s).unwrap();

    let title = doc
        .select(&sel(r#"span[data-id="PageTitle"]"#))
        .next()
        .map(|el| node_text(el))
        .unwrap_or_else(|| NO_TITLE.to_string());

    let (address, region) = doc
        .select(&sel(r#"h2[itemprop="address"].pt-1"#))
        .next()
        .map(|el| split_address(&node_text(el)))
        .unwrap_or_else(|| (NO_ADDRESS.to_string(), NO_REGION.to_string()));

    let description = doc
        .select(&sel(r#"div[itemprop="description"]"#))
        .next()
        .map(|el| node_text(el))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let img_urls = doc
        .select(&sel("div.thumbnail.last-child.first-child"))
        .next()
        .and_then(|gallery| gallery.select(&sel("script")).next())
        .map(|script| extract_image_urls(&script.inner_html()))
        .unwrap_or_else(ImageUrls::missing);

    // Source markup prefixes the amount with a currency glyph and a
    // space; drop those two characters.
    let price = doc
        .select(&sel(r#"div[itemprop="offers"][itemtype="http://schema.org/Offer"]"#))
        .next()
        .map(|el| node_text(el).chars().skip(2).collect())
        .unwrap_or_else(|| NO_PRICE.to_string());

    let bathrooms = doc
        .select(&sel("div.col-lg-3.col-sm-6.sdb"))
        .next()
        .map(|el| node_text(el))
        .unwrap_or_else(|| NO_BATHROOMS.to_string());
    let bedrooms = doc
        .select(&sel("div.col-lg-3.col-sm-6.cac"))
        .next()
        .map(|el| node_text(el))
        .unwrap_or_else(|| NO_BEDROOMS.to_string());
    let rooms = format!("Num of rooms: {bathrooms}, {bedrooms}");

    let area = doc
        .select(&sel("div.carac-value"))
        .next()
        .and_then(|el| el.select(&sel("span")).next())
        .map(|span| node_text(span))
        .unwrap_or_else(|| NO_AREA.to_string());

    ListingRecord {
        link: link.to_string(),
        title,
        address,
        region,
        description,
        img_urls,
        date: Local::now().format("%d.%m.%Y").to_string(),
        price,
        rooms,
        area,
    }
}

/// Concatenate the element's text nodes, each stripped of surrounding
/// whitespace.
fn node_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split the address node's text on commas: `address` is everything but
/// the last segment, `region` the last two segments. With fewer than two
/// segments both sides degrade to the whole text.
fn split_address(text: &str) -> (String, String) {
    let segments: Vec<&str> = text.split(',').map(str::trim).collect();
    if segments.len() < 2 {
        return (text.trim().to_string(), text.trim().to_string());
    }
    let address = segments[..segments.len() - 1].join(", ");
    let region = segments[segments.len() - 2..].join(", ");
    (address, region)
}

/// The gallery node embeds a script whose body carries the photo URLs as
/// quoted `https://` literals.
fn extract_image_urls(script_text: &str) -> ImageUrls {
    let re = Regex::new(r#"https://[^"]+"#).unwrap();
    let urls: Vec<String> = re
        .find_iter(script_text)
        .map(|m| m.as_str().to_string())
        .collect();
    if urls.is_empty() {
        ImageUrls::missing()
    } else {
        ImageUrls::Found(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"
        <html><body>
          <a class="a-more-detail" href="/en/rental/123"></a>
          <a class="a-more-detail" href="https://other.example/en/rental/456"></a>
          <a class="a-more-detail"><span>no href</span></a>
          <a class="something-else" href="/en/rental/789"></a>
        </body></html>
    "#;

    #[test]
    fn listing_links_are_resolved_in_document_order() {
        let links = extract_listing_links(LISTING_PAGE, "https://realty.example");
        assert_eq!(
            links,
            vec![
                "https://realty.example/en/rental/123",
                "https://other.example/en/rental/456",
            ]
        );
    }

    #[test]
    fn listing_page_without_markers_yields_nothing() {
        let links = extract_listing_links("<html><body></body></html>", "https://realty.example");
        assert!(links.is_empty());
    }

    fn detail_page() -> String {
        r#"
        <html><body>
          <span data-id="PageTitle">Bright 2-bed apartment</span>
          <h2 itemprop="address" class="pt-1">123 Main St, Springfield, IL, USA</h2>
          <div itemprop="description">  Spacious and sunny.  </div>
          <div class="thumbnail last-child first-child">
            <script>var photos = [src: "https://img.example.com/a.jpg", "https://img.example.com/b.jpg"];</script>
          </div>
          <div itemprop="offers" itemtype="http://schema.org/Offer">$ 1,200 / month</div>
          <div class="col-lg-3 col-sm-6 sdb">1 bathroom</div>
          <div class="col-lg-3 col-sm-6 cac">2 bedrooms</div>
          <div class="carac-value"><span>75 sqft</span></div>
        </body></html>
        "#
        .to_string()
    }

    #[test]
    fn full_detail_page_extracts_every_field() {
        let record = extract_record(&detail_page(), "https://realty.example/en/rental/123");

        assert_eq!(record.link, "https://realty.example/en/rental/123");
        assert_eq!(record.title, "Bright 2-bed apartment");
        assert_eq!(record.address, "123 Main St, Springfield, IL");
        assert_eq!(record.region, "IL, USA");
        assert_eq!(record.description, "Spacious and sunny.");
        assert_eq!(
            record.img_urls,
            ImageUrls::Found(vec![
                "https://img.example.com/a.jpg".to_string(),
                "https://img.example.com/b.jpg".to_string(),
            ])
        );
        assert_eq!(record.price, "1,200 / month");
        assert_eq!(record.rooms, "Num of rooms: 1 bathroom, 2 bedrooms");
        assert_eq!(record.area, "75 sqft");
    }

    #[test]
    fn empty_detail_page_degrades_to_sentinels() {
        let record = extract_record("<html><body></body></html>", "https://realty.example/x");

        assert_eq!(record.title, "no title");
        assert_eq!(record.address, "no address");
        assert_eq!(record.region, "no region");
        assert_eq!(record.description, "no description");
        assert_eq!(record.img_urls, ImageUrls::missing());
        assert_eq!(record.price, "no price");
        assert_eq!(record.rooms, "Num of rooms: no bathrooms, no bedrooms");
        assert_eq!(record.area, "no area");
    }

    #[test]
    fn record_serializes_with_all_ten_keys_in_order() {
        let record = extract_record(&detail_page(), "https://realty.example/x");
        let json = serde_json::to_string(&record).unwrap();

        let keys = [
            "link", "title", "address", "region", "description", "img_urls", "date", "price",
            "rooms", "area",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| {
                json.find(&format!("\"{k}\":"))
                    .unwrap_or_else(|| panic!("missing key {k}"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn date_uses_dotted_day_month_year() {
        let record = extract_record("<html></html>", "https://realty.example/x");
        let re = Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap();
        assert!(re.is_match(&record.date), "got {}", record.date);
    }

    #[test]
    fn address_with_single_segment_degrades_to_whole_text() {
        let (address, region) = split_address("Springfield");
        assert_eq!(address, "Springfield");
        assert_eq!(region, "Springfield");
    }

    #[test]
    fn address_with_two_segments() {
        let (address, region) = split_address("Main St, Springfield");
        assert_eq!(address, "Main St");
        assert_eq!(region, "Main St, Springfield");
    }

    #[test]
    fn gallery_script_without_urls_is_missing() {
        assert_eq!(extract_image_urls("var photos = [];"), ImageUrls::missing());
    }
}
