//! `Cookie` / `Set-Cookie` helpers.

use http::HeaderMap;
use http::header::{COOKIE, SET_COOKIE};
use mediq_config::SessionConfig;

/// Split a `Cookie` header value into `(name, value)` pairs.
///
/// Segments without `=` are skipped. Values keep any surrounding quotes.
#[must_use]
pub fn parse_cookie_header(header: &str) -> Vec<(&str, &str)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then_some((name, value.trim()))
        })
        .collect()
}

/// Find a named cookie across every `Cookie` header on a request.
#[must_use]
pub fn find(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(parse_cookie_header)
        .find(|(cookie, _)| *cookie == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Pull a named cookie's value out of a set of `Set-Cookie` header values.
///
/// Only the leading `name=value` pair of each header is considered; attributes
/// like `Path` or `HttpOnly` are ignored.
#[must_use]
pub fn from_set_cookie<'a, I>(values: I, name: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().find_map(|header| {
        let first = header.split(';').next()?;
        let (cookie, value) = first.trim().split_once('=')?;
        (cookie.trim() == name && !value.trim().is_empty()).then(|| value.trim().to_string())
    })
}

/// Same as [`from_set_cookie`], reading from a response header map.
#[must_use]
pub fn from_set_cookie_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    from_set_cookie(
        headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
        name,
    )
}

/// Build a `Set-Cookie` value that expires `name` immediately.
#[must_use]
pub fn clearing(name: &str) -> String {
    format!(
        "{name}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax"
    )
}

/// Clearing headers for both the session and refresh cookies.
#[must_use]
pub fn clear_session_cookies(config: &SessionConfig) -> Vec<String> {
    vec![
        clearing(&config.cookie_name),
        clearing(&config.refresh_cookie_name),
    ]
}
