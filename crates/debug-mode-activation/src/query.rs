//! Query-string handling
//!
//! Splits a URL (absolute or path-only) into base, query and fragment, and
//! reads or removes parameters the way browsers' `URLSearchParams` decode
//! them: `+` is a space and `%XX` is a percent-encoded byte.

/// A URL split at its first `?` and `#`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    /// Everything before the query (scheme, host and path, or just the path)
    pub base: &'a str,

    /// Query without the leading `?`
    pub query: Option<&'a str>,

    /// Fragment without the leading `#`
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Split `url`; a `?` inside the fragment is not a query separator
    #[must_use]
    pub fn parse(url: &'a str) -> Self {
        let (before_fragment, fragment) = match url.split_once('#') {
            Some((head, tail)) => (head, Some(tail)),
            None => (url, None),
        };
        let (base, query) = match before_fragment.split_once('?') {
            Some((head, tail)) => (head, Some(tail)),
            None => (before_fragment, None),
        };
        Self {
            base,
            query,
            fragment,
        }
    }

    /// Reassemble with a different query; an empty query drops the `?`
    #[must_use]
    pub fn with_query(&self, query: &str) -> String {
        let mut url = String::with_capacity(
            self.base.len() + query.len() + self.fragment.map_or(0, |f| f.len() + 1) + 1,
        );
        url.push_str(self.base);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// One `name=value` segment of a query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair<'a> {
    /// Segment exactly as it appeared
    pub raw: &'a str,

    /// Decoded name
    pub name: String,

    /// Decoded value; empty when the segment has no `=`
    pub value: String,
}

/// Iterate over the non-empty segments of `query`
///
/// A leading `?` is ignored. Malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
pub fn pairs(query: &str) -> impl Iterator<Item = QueryPair<'_>> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter_map(|raw| {
            let (name, value) = form_urlencoded::parse(raw.as_bytes()).next()?;
            Some(QueryPair {
                raw,
                name: name.into_owned(),
                value: value.into_owned(),
            })
        })
}

/// First decoded value of `name`, if present
#[must_use]
pub fn get_param(query: &str, name: &str) -> Option<String> {
    pairs(query)
        .find(|pair| pair.name == name)
        .map(|pair| pair.value)
}

/// Query with every `name` segment removed
///
/// Remaining segments keep their original encoding and order.
#[must_use]
pub fn without_param(query: &str, name: &str) -> String {
    pairs(query)
        .filter(|pair| pair.name != name)
        .map(|pair| pair.raw)
        .collect::<Vec<_>>()
        .join("&")
}
