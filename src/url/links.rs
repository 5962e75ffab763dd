use crate::url::extract_domain;
use url::Url;

/// Sanitizes a discovered link for frontier admission
///
/// Accepts only absolute hrefs whose host matches `domain` exactly
/// (case-insensitive). The fragment is stripped so `#section` variants of a
/// page collapse to a single frontier entry. Relative hrefs, other hosts, and
/// hostless schemes (mailto:, javascript:, tel:) are rejected.
///
/// # Arguments
///
/// * `href` - The href as reported by the rendering service
/// * `domain` - The crawl job's lowercase domain
///
/// # Returns
///
/// * `Some(String)` - The cleaned absolute URL, ready to enqueue
/// * `None` - The link is out of scope for this job
pub fn same_domain_link(href: &str, domain: &str) -> Option<String> {
    let mut url = Url::parse(href).ok()?;

    let host = extract_domain(&url)?;
    if host != domain {
        return None;
    }

    url.set_fragment(None);
    Some(url.into())
}
