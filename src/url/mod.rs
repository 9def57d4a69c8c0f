//! URL handling module for Sumi-Gather
//!
//! This module builds the three URL shapes the harvester requests (category
//! page, paginated listing page, detail page) and resolves links found in
//! fetched HTML against the page they came from.

use crate::{UrlError, UrlResult};
use url::Url;

/// Query parameter carrying the listing page number
pub const PAGE_PARAM: &str = "page";

/// Builds the category page URL for a root category label
///
/// Non-ASCII labels are percent-encoded by the URL parser.
///
/// # Examples
///
/// ```
/// use sumi_gather::url::category_url;
///
/// let url = category_url("https://directory.example.com/", "sport").unwrap();
/// assert_eq!(url, "https://directory.example.com/category/sport");
/// ```
pub fn category_url(base_url: &str, category: &str) -> UrlResult<String> {
    let mut url = parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase(base_url.to_string()))?
        .pop_if_empty()
        .push("category")
        .push(category);
    Ok(url.to_string())
}

/// Builds the URL of a listing page
///
/// Page 1 is the subcategory URL itself; later pages append `page=<n>` to
/// the query string.
///
/// # Examples
///
/// ```
/// use sumi_gather::url::page_url;
///
/// let base = "https://directory.example.com/heading/tennis";
/// assert_eq!(page_url(base, 1).unwrap(), base);
/// assert_eq!(
///     page_url(base, 3).unwrap(),
///     "https://directory.example.com/heading/tennis?page=3"
/// );
/// ```
pub fn page_url(subcategory_url: &str, page_number: u32) -> UrlResult<String> {
    if page_number <= 1 {
        return Ok(subcategory_url.to_string());
    }

    let mut url = parse(subcategory_url)?;
    url.query_pairs_mut()
        .append_pair(PAGE_PARAM, &page_number.to_string());
    Ok(url.to_string())
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - fragment-only and empty hrefs
/// - Invalid URLs or non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

fn parse(raw: &str) -> UrlResult<Url> {
    Url::parse(raw).map_err(|source| UrlError::Parse {
        url: raw.to_string(),
        source,
    })
}
