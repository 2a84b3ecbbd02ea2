//! Query string decoding
//!
//! Splits `k1=v1&k2` style query strings and applies URL form decoding
//! (`%XX` escapes and `+` as space) to keys and values independently.

use std::collections::HashMap;

/// Decode a raw query string into a key/value map
///
/// Segments without `=` get an empty value. A repeated key keeps the last
/// value seen. Empty input yields an empty map.
///
/// # Examples
/// ```
/// use rust_microserver::http::query::parse_query;
/// let params = parse_query("name=Ana%20Mar%C3%ADa&x=1");
/// assert_eq!(params["name"], "Ana María");
/// assert_eq!(params["x"], "1");
/// ```
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    // form_urlencoded already splits on the first '=' and skips empty segments
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
