//! Web app URL validation

use url::Url;

/// Returns true only for absolute `http`/`https` URLs with a non-empty host.
///
/// Parse failures are reported as `false`, never as an error. Scheme
/// comparison happens after parsing, so `HTTPS://` is accepted the same way
/// the parser normalises it.
pub fn is_valid_webapp_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| !host.is_empty())
}

/// True when the URL is valid but not served over TLS.
pub fn is_insecure_webapp_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| url.scheme() != "https")
}
