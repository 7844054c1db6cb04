//! Data-center selection
//!
//! Books accounts live in one data center. The accounts server the refresh
//! token was issued by tells which one, by its domain suffix.

use url::Url;

/// Commercial (US) API base, used when no other region matches
pub const DEFAULT_API_BASE: &str = "https://books.zoho.com/api/v3";

/// Host suffix → API base. Longer suffixes come first so `.com.au` wins over `.com`.
const REGIONS: &[(&str, &str)] = &[
    (".com.au", "https://books.zoho.com.au/api/v3"),
    (".eu", "https://books.zoho.eu/api/v3"),
    (".in", "https://books.zoho.in/api/v3"),
    (".jp", "https://books.zoho.jp/api/v3"),
    (".com", DEFAULT_API_BASE),
];

/// Returns the API base URL for an accounts server URL
///
/// Unparsable URLs and unknown suffixes fall back to [`DEFAULT_API_BASE`].
///
/// # Examples
///
/// ```
/// use ledgerbridge::adapters::books::region::api_base_for;
///
/// assert_eq!(api_base_for("https://accounts.zoho.eu"), "https://books.zoho.eu/api/v3");
/// assert_eq!(api_base_for("https://accounts.zoho.com"), "https://books.zoho.com/api/v3");
/// ```
pub fn api_base_for(accounts_server: &str) -> &'static str {
    let host = match Url::parse(accounts_server) {
        Ok(url) => match url.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return DEFAULT_API_BASE,
        },
        Err(_) => return DEFAULT_API_BASE,
    };

    REGIONS
        .iter()
        .find(|(suffix, _)| host.ends_with(suffix))
        .map(|(_, base)| *base)
        .unwrap_or(DEFAULT_API_BASE)
}
