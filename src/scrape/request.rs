//! Page request construction
//!
//! Builds the fully-formed request for one result page: endpoint URL with
//! observer and pagination query parameters, plus the session cookie. The
//! place name reaches us as plain UTF-8 and is percent-encoded here by the
//! URL serializer; a wrong encoding does not fail, it silently serves a
//! different-locale page, so encoding fidelity is the main hazard.

use crate::config::{ObserverConfig, TargetConfig};
use crate::{PasswatchError, Result};
use url::Url;

/// A fully-formed request for one result page
///
/// Pure value derived from target + observer + page index + session token;
/// recomputed per page and discarded after the fetch.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Complete request URL including all query parameters
    pub url: Url,

    /// 1-based page index this request addresses
    pub page: u32,

    /// Session/locale cookie value, attached verbatim when non-empty
    pub cookie: Option<String>,
}

/// Builds the request for one page of pass predictions
///
/// Query parameters: satid, lat, lng, loc (percent-encoded place name),
/// alt, tz, page.
///
/// # Arguments
///
/// * `target` - The satellite being scraped
/// * `observer` - Observer location context
/// * `page` - 1-based page index
/// * `max_pages` - Configured page count; `page` must not exceed it
/// * `endpoint` - Upstream endpoint URL
/// * `session_token` - Opaque cookie value, possibly empty
///
/// # Returns
///
/// * `Ok(PageRequest)` - The request descriptor for this page
/// * `Err(PasswatchError::InvalidTarget)` - Satellite id is not positive
/// * `Err(PasswatchError::InvalidPage)` - Page index outside 1..=max_pages
pub fn build_page_request(
    target: &TargetConfig,
    observer: &ObserverConfig,
    page: u32,
    max_pages: u32,
    endpoint: &Url,
    session_token: &str,
) -> Result<PageRequest> {
    if target.sat_id == 0 {
        return Err(PasswatchError::InvalidTarget(i64::from(target.sat_id)));
    }

    if page < 1 || page > max_pages {
        return Err(PasswatchError::InvalidPage {
            page,
            max: max_pages,
        });
    }

    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("satid", &target.sat_id.to_string())
        .append_pair("lat", &format_coordinate(observer.latitude))
        .append_pair("lng", &format_coordinate(observer.longitude))
        .append_pair("loc", &observer.place_name)
        .append_pair("alt", &observer.altitude.to_string())
        .append_pair("tz", &observer.timezone)
        .append_pair("page", &page.to_string());

    let cookie = if session_token.is_empty() {
        None
    } else {
        Some(session_token.to_string())
    };

    Ok(PageRequest { url, page, cookie })
}

/// Formats a coordinate without trailing float noise
///
/// The upstream compares coordinates textually when resolving cached
/// observer locations, so "39.9042" must not become "39.904200000000003".
fn format_coordinate(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
