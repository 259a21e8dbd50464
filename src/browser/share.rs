//! Share links

/// Canonical link to a resource: the base URL without query or fragment,
/// plus `?resource=<id>`
pub fn share_link(base_url: &str, resource_id: &str) -> String {
    let end = base_url.find(|c| c == '?' || c == '#').unwrap_or(base_url.len());
    format!(
        "{}?resource={}",
        &base_url[..end],
        urlencoding::encode(resource_id)
    )
}

/// Facebook sharer URL for a share link
pub fn facebook_share_url(link: &str, title: &str) -> String {
    let quote = format!("I found this resource in the AI learning community: {}", title);
    format!(
        "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
        urlencoding::encode(link),
        urlencoding::encode(&quote)
    )
}
