//! HTTP headers abstraction for a message.
//!
//! Headers are stored in an ordered map from a canonical header name to the
//! list of values given for it, so repeatable headers such as `Set-Cookie`
//! keep every value in insertion order.
//!
//! Every name passed in is first run through [`canonical_name`]: lookups and
//! inserts made with `content-type`, `Content-Type` or `CONTENT_TYPE` all
//! resolve to the same `Content-Type` entry.
//!
//! No validation is performed on names or values. Canonicalization is total,
//! so any string, including an empty one, is accepted as a header name.

use std::time::SystemTime;

use indexmap::IndexMap;

/// Converts a header name to its canonical casing.
///
/// Words are delimited by space, hyphen or underscore. Each word starts with
/// an upper-case letter followed by lower-case ones, and every delimiter is
/// rendered as a single hyphen (`content type` becomes `Content-Type`).
/// `ETag` and `WWW-Authenticate` are spelled the way HTTP defines them.
pub fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut word_start = true;

    for c in name.chars() {
        if matches!(c, ' ' | '-' | '_') {
            canonical.push('-');
            word_start = true;
        } else if word_start {
            canonical.extend(c.to_uppercase());
            word_start = false;
        } else {
            canonical.extend(c.to_lowercase());
        }
    }

    match canonical.as_str() {
        "Etag" => "ETag".to_string(),
        "Www-Authenticate" => "WWW-Authenticate".to_string(),
        _ => canonical,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    headers: IndexMap<String, Vec<String>>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    /// All values stored for `name`, or `None` when the header is absent.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.headers.get(&canonical_name(name)).map(Vec::as_slice)
    }

    /// Like [`get`](Self::get), but answers with `default` when the header is absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a [String]) -> &'a [String] {
        self.get(name).unwrap_or(default)
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Values of `name` joined by a comma, the way they travel on a single header line.
    pub fn line(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| values.join(", "))
    }

    pub fn has(&self, name: &str) -> bool {
        self.headers.contains_key(&canonical_name(name))
    }

    /// Removes `name` and returns its values. Removing an absent header does nothing.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.headers.shift_remove(&canonical_name(name))
    }

    /// Stores `value` under `name`.
    ///
    /// Without `append`, any previous values are replaced by `[value]`. With
    /// `append`, `value` is pushed after the existing values, creating the
    /// header when it does not exist yet.
    pub fn set(&mut self, name: &str, value: impl Into<String>, append: bool) {
        let key = canonical_name(name);

        if !append {
            self.headers.insert(key, vec![value.into()]);
            return;
        }

        self.headers.entry(key).or_default().push(value.into());
    }

    /// Replaces the values of `name` with `values`.
    pub fn set_many<I>(&mut self, name: &str, values: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.headers.insert(canonical_name(name), values);
    }

    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.set(name, value, true);
    }

    /// Stores `time` formatted as an HTTP-date (`Sun, 06 Nov 1994 08:49:37 GMT`).
    pub fn set_date(&mut self, name: &str, time: SystemTime) {
        self.set(name, httpdate::fmt_http_date(time), false);
    }

    /// Parses the first value of `name` as an HTTP-date.
    pub fn get_date(&self, name: &str) -> Option<SystemTime> {
        self.first(name)
            .and_then(|value| httpdate::parse_http_date(value).ok())
    }

    /// Merges every header of `other` into this collection, replacing the
    /// values of names present in both.
    pub fn extend_from(&mut self, other: HttpHeaders) {
        for (name, values) in other.headers {
            self.headers.insert(name, values);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Renders one `Name: value\r\n` line per stored value.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, values) in &self.headers {
            for value in values {
                result.push_str(&format!("{}: {}\r\n", name, value));
            }
        }
        result
    }
}

impl<N, V> FromIterator<(N, V)> for HttpHeaders
where
    N: AsRef<str>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    /// Seeds a collection from `(name, values)` pairs. Names that
    /// canonicalize to the same key are merged in order.
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HttpHeaders::new();
        for (name, values) in iter {
            for value in values {
                headers.append(name.as_ref(), value);
            }
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn canonical_name_title_cases_words() {
        assert_eq!(canonical_name("content type"), "Content-Type");
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("CONTENT_TYPE"), "Content-Type");
        assert_eq!(canonical_name("x-forwarded-for"), "X-Forwarded-For");
    }

    #[test]
    fn canonical_name_irregular_headers() {
        assert_eq!(canonical_name("etag"), "ETag");
        assert_eq!(canonical_name("ETAG"), "ETag");
        assert_eq!(canonical_name("www-authenticate"), "WWW-Authenticate");
        assert_eq!(canonical_name("WWW_AUTHENTICATE"), "WWW-Authenticate");
        assert_eq!(canonical_name("x-etag"), "X-Etag");
    }

    #[test]
    fn canonical_name_separator_variants_converge() {
        let variants = ["accept encoding", "Accept-Encoding", "ACCEPT_ENCODING", "aCcEpT eNcOdInG"];
        for v in variants {
            assert_eq!(canonical_name(v), "Accept-Encoding", "variant {v:?}");
        }
    }

    #[test]
    fn canonical_name_is_total() {
        assert_eq!(canonical_name(""), "");
        assert_eq!(canonical_name("-"), "-");
        assert_eq!(canonical_name(" _-"), "---");
        assert_eq!(canonical_name("a__b"), "A--B");
        assert_eq!(canonical_name("über-größe"), "Über-Größe");
    }

    #[test]
    fn set_replaces_and_wraps_scalar() {
        let mut headers = HttpHeaders::new();
        headers.set("Content-Type", "text/plain", false);
        headers.set("content-type", "text/html", false);

        assert_eq!(headers.get("CONTENT_TYPE"), Some(&["text/html".to_string()][..]));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn set_append_merges_variants() {
        let mut headers = HttpHeaders::new();
        headers.set("X-Custom", "a", false);
        headers.set("x custom", "b", true);

        assert_eq!(
            headers.get("X-Custom"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["X-Custom"]);
    }

    #[test]
    fn append_creates_missing_header() {
        let mut headers = HttpHeaders::new();
        headers.append("set-cookie", "a=1");
        headers.append("Set-Cookie", "b=2");

        assert_eq!(headers.first("set_cookie"), Some("a=1"));
        assert_eq!(headers.line("Set-Cookie").as_deref(), Some("a=1, b=2"));
    }

    #[test]
    fn get_or_answers_default_when_absent() {
        let headers = HttpHeaders::new();
        let default = vec!["fallback".to_string()];

        assert_eq!(headers.get_or("Accept", &default), default.as_slice());
        assert!(headers.get_or("Accept", &[]).is_empty());
        assert_eq!(headers.get("Accept"), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut headers = HttpHeaders::new();
        headers.set("Host", "example.com", false);

        assert_eq!(headers.remove("HOST"), Some(vec!["example.com".to_string()]));
        assert!(!headers.has("host"));
        assert_eq!(headers.remove("host"), None);
        assert!(!headers.has("host"));
    }

    #[test]
    fn set_many_replaces_list() {
        let mut headers = HttpHeaders::new();
        headers.set("Vary", "Accept", false);
        headers.set_many("vary", ["Origin", "Cookie"]);

        assert_eq!(headers.line("Vary").as_deref(), Some("Origin, Cookie"));
    }

    #[test]
    fn date_headers_round_trip_whole_seconds() {
        let mut headers = HttpHeaders::new();
        let time = UNIX_EPOCH + Duration::from_secs(784111777);
        headers.set_date("last modified", time);

        assert_eq!(headers.first("Last-Modified"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
        assert_eq!(headers.get_date("Last-Modified"), Some(time));
    }

    #[test]
    fn get_date_ignores_garbage() {
        let mut headers = HttpHeaders::new();
        headers.set("Date", "yesterday", false);
        assert_eq!(headers.get_date("Date"), None);
    }

    #[test]
    fn seeded_from_iterator_and_extended() {
        let mut headers: HttpHeaders = vec![
            ("host", vec!["example.com"]),
            ("accept", vec!["text/html"]),
            ("ACCEPT", vec!["*/*"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.line("Accept").as_deref(), Some("text/html, */*"));

        let mut other = HttpHeaders::new();
        other.set("Host", "other.org", false);
        other.set("etag", "\"v1\"", false);
        headers.extend_from(other);

        assert_eq!(headers.first("host"), Some("other.org"));
        assert!(headers.has("ETag"));
        assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["Host", "Accept", "ETag"]);
    }

    #[test]
    fn stringify_one_line_per_value() {
        let mut headers = HttpHeaders::new();
        headers.set("content-length", "5", false);
        headers.append("set-cookie", "a=1");
        headers.append("set-cookie", "b=2");

        assert_eq!(
            headers.stringify(),
            "Content-Length: 5\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n"
        );
    }

    #[test]
    fn clear_empties_collection() {
        let mut headers = HttpHeaders::new();
        headers.set("a", "1", false);
        headers.clear();
        assert!(headers.is_empty());
        assert_eq!(headers.iter().count(), 0);
    }
}
