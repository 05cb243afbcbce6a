use std::fmt::Display;

/// Query parameter name carrying the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "_t";

/// Ordered query-string pairs for a single request.
/// Lists are sent as repeated keys (`platforms=a&platforms=b`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Add a single key/value pair
    pub fn push<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Add a pair only when a value is present
    pub fn push_opt<K: Into<String>, V: Display>(self, key: K, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Add one pair per list item under the same key
    pub fn push_all<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let key = key.into();
        for value in values {
            self.pairs.push((key.clone(), value.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Build the encoded query string, without the leading `?`
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// Replace any existing `key` in `url` with a single `key=value`, keeping
/// every other pair in its original order.
pub fn set_query_param(url: &mut url::Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept.iter())
        .append_pair(key, value);
}
