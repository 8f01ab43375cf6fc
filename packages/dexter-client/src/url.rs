//! Base URL normalization and syntactic validation.
//!
//! No DNS lookup or connectivity check happens here; the pattern only
//! accepts http(s) URLs whose host is a domain name, `localhost`, an IPv4
//! literal or an IPv6 literal, with an optional port and path/query.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{DexterError, Result};

/// Every Dexter API call lives under this prefix.
pub const REST: &str = "/rest/";

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(concat!(
        r"(?i)^(?:http)s?://",
        // domain
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"localhost|",
        // ipv4
        r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}|",
        // ipv6
        r"\[?[A-F0-9]*:[A-F0-9:]+\]?)",
        // port
        r"(?::[0-9]+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .unwrap();
}

/// Strip trailing slashes, append [`REST`] and validate the result.
pub fn rest_base(url: &str) -> Result<String> {
    let base = format!("{}{}", url.trim_end_matches('/'), REST);
    if !is_valid(&base) {
        return Err(DexterError::InvalidUrl(base));
    }
    Ok(base)
}

/// Whether `url` matches the accepted URL pattern.
pub fn is_valid(url: &str) -> bool {
    URL_REGEX.is_match(url)
}
