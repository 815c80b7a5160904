//! Client details from incoming HTTP request headers.

use std::collections::BTreeMap;
use std::net::IpAddr;

use http::HeaderMap;
use serde::Serialize;

/// Returned when nothing identifies the client.
pub const UNKNOWN: &str = "Unknown";

/// Headers that may carry the original client address, most trusted first.
const IP_HEADERS: [&str; 5] = [
    "x-forwarded-for",
    "proxy-client-ip",
    "wl-proxy-client-ip",
    "http_client_ip",
    "http_x_forwarded_for",
];

/// Checked in order; the first substring found in the lower-cased user agent
/// names the operating system.
const OS_TABLE: [(&str, &str); 21] = [
    ("windows nt 10.0", "Windows 10"),
    ("windows nt 11.0", "Windows 11"),
    ("windows nt 6.3", "Windows 8.1"),
    ("windows nt 6.2", "Windows 8"),
    ("windows nt 6.1", "Windows 7"),
    ("windows nt 6.0", "Windows Vista"),
    ("windows nt 5.1", "Windows XP"),
    ("windows nt 5.0", "Windows 2000"),
    ("windows nt 4.0", "Windows NT"),
    ("windows 98", "Windows 98"),
    ("windows 95", "Windows 95"),
    ("iphone", "iPhone"),
    ("ipad", "iPad"),
    ("ipod", "iPod"),
    ("android", "Android"),
    ("mac os x", "Mac OS X"),
    ("mac", "Mac"),
    ("linux", "Linux"),
    ("ubuntu", "Ubuntu"),
    ("fedora", "Fedora"),
    ("debian", "Debian"),
];

/// Edge and Opera embed "chrome/" in their user agents, so they come first.
const BROWSER_TABLE: [(&str, &str); 13] = [
    ("edg/", "Edge"),
    ("edge/", "Edge Legacy"),
    ("trident/7.0", "IE 11"),
    ("msie 10", "IE 10"),
    ("msie 9", "IE 9"),
    ("msie 8", "IE 8"),
    ("msie 7", "IE 7"),
    ("msie 6", "IE 6"),
    ("opr/", "Opera"),
    ("opera/", "Opera"),
    ("chrome/", "Chrome"),
    ("safari/", "Safari"),
    ("firefox/", "Firefox"),
];

const BROWSER_FALLBACKS: [(&str, &str); 2] =
    [("samsung", "Samsung Internet"), ("ucbrowser", "UC Browser")];

const MOBILE_MARKERS: [&str; 11] = [
    "mobile",
    "iphone",
    "ipad",
    "ipod",
    "android",
    "blackberry",
    "windows phone",
    "webos",
    "opera mini",
    "iemobile",
    "mobile safari",
];

const BOT_MARKERS: [&str; 8] = [
    "bot",
    "crawl",
    "spider",
    "slurp",
    "googlebot",
    "bingbot",
    "yandex",
    "baidu",
];

/// The parts of an incoming request these helpers look at.
#[derive(Debug, Clone, Default)]
pub struct ClientRequest {
    pub headers: HeaderMap,
    /// Peer address of the connection, if known.
    pub remote_addr: Option<IpAddr>,
}

impl ClientRequest {
    #[must_use]
    pub const fn new(headers: HeaderMap, remote_addr: Option<IpAddr>) -> Self {
        Self {
            headers,
            remote_addr,
        }
    }
}

/// Summary of the client behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserInfo {
    pub ip: String,
    /// The raw `User-Agent` header.
    pub header: String,
    pub os: String,
    pub browser: String,
}

/// First value of a header as text; names are case-insensitive.
#[must_use]
pub fn header<'a>(request: &'a ClientRequest, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|value| value.to_str().ok())
}

#[must_use]
pub fn has_header(request: &ClientRequest, name: &str) -> bool {
    header(request, name).is_some()
}

/// Every header with a text value, first value per name.
#[must_use]
pub fn all_headers(request: &ClientRequest) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    for name in request.headers.keys() {
        if let Some(value) = header(request, name.as_str()) {
            result.insert(name.as_str().to_string(), value.to_string());
        }
    }
    result
}

fn is_usable_ip(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.eq_ignore_ascii_case("unknown")
}

/// Maps loopback and IPv4-mapped IPv6 forms to plain IPv4 text.
fn normalize_ip(ip: &str) -> String {
    if ip == "::1" || ip == "::ffff:127.0.0.1" {
        return "127.0.0.1".to_string();
    }
    ip.strip_prefix("::ffff:").unwrap_or(ip).to_string()
}

/// ## Summary
/// Best guess at the client address.
///
/// Proxy headers are consulted first (`X-Forwarded-For` contributes its first
/// hop), skipping empty and `unknown` values, then the peer address.
/// Returns `"Unknown"` when nothing is available.
#[must_use]
pub fn get_client_ip(request: &ClientRequest) -> String {
    let from_headers = IP_HEADERS.iter().find_map(|name| {
        let value = header(request, name)?;
        let candidate = if *name == "x-forwarded-for" {
            value.split(',').next().unwrap_or_default().trim()
        } else {
            value.trim()
        };
        is_usable_ip(candidate).then(|| candidate.to_string())
    });

    let ip = from_headers.or_else(|| request.remote_addr.map(|addr| addr.to_string()));
    match ip {
        Some(ip) => normalize_ip(&ip),
        None => UNKNOWN.to_string(),
    }
}

/// Operating system named by a user agent, `"Other"` when unrecognized.
#[must_use]
pub fn client_os(user_agent: &str) -> String {
    if user_agent.is_empty() {
        return UNKNOWN.to_string();
    }
    let ua = user_agent.to_lowercase();
    OS_TABLE
        .iter()
        .find(|(marker, _)| ua.contains(marker))
        .map_or("Other", |(_, os)| *os)
        .to_string()
}

/// Browser named by a user agent, `"Other"` when unrecognized.
#[must_use]
pub fn client_browser(user_agent: &str) -> String {
    if user_agent.is_empty() {
        return UNKNOWN.to_string();
    }
    let ua = user_agent.to_lowercase();
    BROWSER_TABLE
        .iter()
        .find(|(marker, name)| {
            ua.contains(marker) && !(*name == "Safari" && ua.contains("chrome"))
        })
        .or_else(|| BROWSER_FALLBACKS.iter().find(|(marker, _)| ua.contains(marker)))
        .map_or("Other", |(_, browser)| *browser)
        .to_string()
}

fn user_agent(request: &ClientRequest) -> Option<String> {
    header(request, http::header::USER_AGENT.as_str()).map(str::to_lowercase)
}

/// Address, user agent, OS and browser of the client.
#[must_use]
pub fn get_browser_info(request: &ClientRequest) -> BrowserInfo {
    let agent = header(request, http::header::USER_AGENT.as_str()).unwrap_or_default();
    BrowserInfo {
        ip: get_client_ip(request),
        header: agent.to_string(),
        os: client_os(agent),
        browser: client_browser(agent),
    }
}

/// The token of an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(request: &ClientRequest) -> Option<String> {
    header(request, http::header::AUTHORIZATION.as_str())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[must_use]
pub fn is_mobile_request(request: &ClientRequest) -> bool {
    user_agent(request).is_some_and(|ua| MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)))
}

/// iPads, Android devices without "mobile", and anything calling itself a
/// tablet.
#[must_use]
pub fn is_tablet_request(request: &ClientRequest) -> bool {
    user_agent(request).is_some_and(|ua| {
        ua.contains("ipad")
            || (ua.contains("android") && !ua.contains("mobile"))
            || ua.contains("tablet")
    })
}

#[must_use]
pub fn is_bot_request(request: &ClientRequest) -> bool {
    user_agent(request).is_some_and(|ua| BOT_MARKERS.iter().any(|marker| ua.contains(marker)))
}
