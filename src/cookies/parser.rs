//! `Set-Cookie` header parsing
//!
//! Several cookies may arrive folded into one header value, separated by commas. Commas also
//! appear inside `Expires` dates, so splitting only happens at a comma that is followed by a
//! `name=` token.

use crate::cookies::Cookie;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Fallback formats for cookie dates that are not strict RFC 2822
const COOKIE_DATE_FORMATS: &[&str] = &[
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%a, %d %b %Y %H:%M:%S GMT",
    "%a %b %e %H:%M:%S %Y",
];

/// Splits a combined `Set-Cookie` header value into individual cookie strings
///
/// # Examples
///
/// ```
/// use cookie_tracker::cookies::split_cookies_string;
///
/// let parts = split_cookies_string("a=1; Expires=Wed, 21 Oct 2099 07:28:00 GMT, b=2");
/// assert_eq!(parts, vec!["a=1; Expires=Wed, 21 Oct 2099 07:28:00 GMT", "b=2"]);
/// ```
pub fn split_cookies_string(header: &str) -> Vec<String> {
    let bytes = header.as_bytes();
    let mut cookies = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b',' {
            pos += 1;
            continue;
        }

        let comma = pos;
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let next_start = pos;

        while pos < bytes.len() && !matches!(bytes[pos], b'=' | b';' | b',') {
            pos += 1;
        }

        if pos < bytes.len() && bytes[pos] == b'=' && pos > next_start {
            push_trimmed(&mut cookies, &header[start..comma]);
            start = next_start;
        } else {
            pos = comma + 1;
        }
    }

    push_trimmed(&mut cookies, &header[start..]);
    cookies
}

fn push_trimmed(cookies: &mut Vec<String>, part: &str) {
    let part = part.trim();
    if !part.is_empty() {
        cookies.push(part.to_string());
    }
}

/// Parses a single cookie string, using the current time for `Max-Age`
pub fn parse_cookie(input: &str) -> Option<Cookie> {
    parse_cookie_at(input, Utc::now())
}

/// Parses a single cookie string
///
/// A `Max-Age` without `Expires` is turned into an absolute expiry relative to `now`.
/// Returns None for strings without a `name=value` pair.
pub fn parse_cookie_at(input: &str, now: DateTime<Utc>) -> Option<Cookie> {
    let mut parts = input.split(';');
    let (name, value) = parts.next()?.split_once('=')?;

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie::new(name, decode_value(value.trim()));

    for attribute in parts {
        let (key, value) = attribute.split_once('=').unwrap_or((attribute, ""));
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "expires" => {
                cookie.expires = parse_cookie_date(value);
                if cookie.expires.is_none() {
                    tracing::debug!("Ignoring unparsable Expires '{}' on cookie {}", value, name);
                }
            }
            "max-age" => cookie.max_age = value.parse().ok(),
            "domain" => cookie.domain = Some(value.to_string()),
            "path" => cookie.path = Some(value.to_string()),
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "samesite" => cookie.same_site = Some(value.to_string()),
            _ => {}
        }
    }

    if cookie.expires.is_none() {
        if let Some(max_age) = cookie.max_age {
            cookie.expires = chrono::Duration::try_seconds(max_age)
                .and_then(|delta| now.checked_add_signed(delta));
        }
    }

    Some(cookie)
}

/// Parses every cookie from a list of `Set-Cookie` header values
///
/// Malformed cookie strings are skipped.
pub fn parse_set_cookie_headers<'a, I>(values: I) -> Vec<Cookie>
where
    I: IntoIterator<Item = &'a str>,
{
    let now = Utc::now();

    values
        .into_iter()
        .flat_map(split_cookies_string)
        .filter_map(|raw| {
            let cookie = parse_cookie_at(&raw, now);
            if cookie.is_none() {
                tracing::warn!("Skipping malformed cookie '{}'", raw);
            }
            cookie
        })
        .collect()
}

fn decode_value(value: &str) -> String {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in COOKIE_DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}
