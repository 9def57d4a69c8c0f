//! HTML extraction rules
//!
//! The crawl loop never looks at markup itself. It asks an `ExtractionRules`
//! implementation for:
//! - Subcategory links on a category page
//! - Detail-page links on a listing page
//! - Business fields on a detail page
//!
//! `DirectoryRules` implements these for the Thai Yellow Pages layout.

use crate::record::{DetailFields, Subcategory};
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Path fragment identifying subcategory ("heading") links
const HEADING_PATH: &str = "/heading/";

/// Label preceding the address block ("address")
const ADDRESS_LABEL: &str = "ที่อยู่";

/// Text of the navigation link ("directions")
const MAP_LABEL: &str = "นำทาง";

/// Heading preceding the description ("products and services")
const DESCRIPTION_LABEL: &str = "สินค้าและบริการ";

/// Descriptions must be longer than this many characters
const MIN_DESCRIPTION_CHARS: usize = 10;

/// Pluggable parsing rules for one directory layout
///
/// Implementations are pure functions of the page content; they must not
/// perform I/O.
pub trait ExtractionRules: Send + Sync {
    /// Extracts subcategory links from a category page, in document order
    ///
    /// Duplicates may be returned; the caller deduplicates by URL.
    fn subcategories(&self, html: &str, page_url: &Url) -> Vec<Subcategory>;

    /// Extracts absolute detail-page URLs from a listing page, in document order
    fn listings(&self, html: &str, page_url: &Url) -> Vec<String>;

    /// Extracts business fields from a detail page
    ///
    /// Returns None when the mandatory name is missing.
    fn detail(&self, html: &str, page_url: &Url) -> Option<DetailFields>;
}

/// Extraction rules for the Yellow Pages Thailand markup
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryRules;

impl ExtractionRules for DirectoryRules {
    /// Anchors whose href contains `/heading/` and whose text is not blank
    fn subcategories(&self, html: &str, page_url: &Url) -> Vec<Subcategory> {
        let document = Html::parse_document(html);
        let Some(anchor) = selector("a[href]") else {
            return Vec::new();
        };

        document
            .select(&anchor)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                if !href.contains(HEADING_PATH) {
                    return None;
                }
                let name = element_text(&element)?;
                let url = resolve_link(href, page_url)?;
                Some(Subcategory::new(name, url))
            })
            .collect()
    }

    /// `div.yp-listing-title > h3 > a[href]`, first anchor per title block
    fn listings(&self, html: &str, page_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let (Some(title), Some(link)) = (selector("div.yp-listing-title"), selector("h3 a[href]"))
        else {
            return Vec::new();
        };

        document
            .select(&title)
            .filter_map(|block| {
                let anchor = block.select(&link).next()?;
                let href = anchor.value().attr("href")?;
                resolve_link(href, page_url)
            })
            .collect()
    }

    fn detail(&self, html: &str, _page_url: &Url) -> Option<DetailFields> {
        let document = Html::parse_document(html);

        let name = selector("h1")
            .and_then(|h1| document.select(&h1).next())
            .and_then(|h1| element_text(&h1))?;

        Some(DetailFields {
            name,
            address: extract_address(&document),
            phone: extract_phone(&document),
            map_link: extract_map_link(&document),
            description: extract_description(&document),
        })
    }
}

/// Text of the first `div` following the parent of the "address" label
fn extract_address(document: &Html) -> Option<String> {
    let strong = selector("strong")?;
    let label = document
        .select(&strong)
        .find(|element| element.text().any(|t| t.contains(ADDRESS_LABEL)))?;
    let container = label.parent().and_then(ElementRef::wrap)?;

    container
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "div")
        .and_then(|div| element_text(&div))
}

/// Text of the first `tel:` link
fn extract_phone(document: &Html) -> Option<String> {
    let tel = selector(r#"a[href^="tel:"]"#)?;
    document
        .select(&tel)
        .next()
        .and_then(|anchor| element_text(&anchor))
}

/// Target of the "directions" link, falling back to any Google Maps link
fn extract_map_link(document: &Html) -> Option<String> {
    let anchor = selector("a[href]")?;

    let labelled = document
        .select(&anchor)
        .find(|element| element.text().any(|t| t.contains(MAP_LABEL)));
    let link = labelled.or_else(|| {
        document.select(&anchor).find(|element| {
            element
                .value()
                .attr("href")
                .is_some_and(|href| href.contains("google.com/maps"))
        })
    })?;

    link.value()
        .attr("href")
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// First substantial sibling block after the "products and services" heading
///
/// Siblings mentioning "Share" (social buttons) and short fragments are
/// skipped.
fn extract_description(document: &Html) -> Option<String> {
    let heading = document
        .root_element()
        .descendants()
        .find(|node| {
            node.value()
                .as_text()
                .is_some_and(|text| text.contains(DESCRIPTION_LABEL))
        })?;
    let container = heading.parent().and_then(ElementRef::wrap)?;

    container
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter_map(|sibling| element_text(&sibling))
        .find(|text| !text.contains("Share") && text.chars().count() > MIN_DESCRIPTION_CHARS)
}

/// Whitespace-normalized text content, None when blank
fn element_text(element: &ElementRef) -> Option<String> {
    let text = element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}
