//! Query string building with `application/x-www-form-urlencoded` encoding.

use serde_json::{Number, Value};
use url::form_urlencoded;

use stz_util::convert::to_display;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl QueryValue {
    /// Empty strings and `Null` are left out of normalized URLs.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Null => true,
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    fn to_query_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::Text(s.clone()),
            nested => Self::Text(to_display(nested)),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for QueryValue {
    /// Non-finite numbers become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A parameter is either one value or a list sent as repeated keys.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    One(QueryValue),
    Many(Vec<QueryValue>),
}

macro_rules! single_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryParam {
                fn from(value: $ty) -> Self {
                    Self::One(value.into())
                }
            }
        )*
    };
}

single_param!(QueryValue, &str, String, bool, i64, i32, u64, f64);

impl<T: Into<QueryValue>> From<Option<T>> for QueryParam {
    fn from(value: Option<T>) -> Self {
        Self::One(value.into())
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryParam {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Named query parameters in insertion order; each key appears once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryParam)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryParam>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryParam>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &QueryParam)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// ## Summary
    /// Reads the members of a JSON object. Arrays become lists; nested
    /// objects are sent as their JSON text. Anything but an object yields no
    /// parameters.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        map.iter().fold(Self::default(), |params, (key, value)| {
            let param = match value {
                Value::Array(items) => {
                    QueryParam::Many(items.iter().map(QueryValue::from_json).collect())
                }
                scalar => QueryParam::One(QueryValue::from_json(scalar)),
            };
            params.with(key.clone(), param)
        })
    }
}

impl<K: Into<String>, V: Into<QueryParam>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |params, (key, value)| params.with(key, value))
    }
}

fn join_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// ## Summary
/// Appends `params` to `url`, skipping `Null` and empty values and sending
/// lists as repeated keys. Joins with `&` when `url` already has a query.
///
/// ```
/// use stz_fetch::{QueryParams, normalize_url};
///
/// let params = QueryParams::new()
///     .with("q", "rust lang")
///     .with("tag", vec!["a", "", "b"])
///     .with("page", Option::<i64>::None);
/// assert_eq!(normalize_url("/search", &params), "/search?q=rust+lang&tag=a&tag=b");
/// ```
#[must_use]
pub fn normalize_url(url: &str, params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, param) in params.entries() {
        match param {
            QueryParam::One(value) if !value.is_blank() => {
                serializer.append_pair(key, &value.to_query_text());
            }
            QueryParam::Many(values) => {
                for value in values.iter().filter(|value| !value.is_blank()) {
                    serializer.append_pair(key, &value.to_query_text());
                }
            }
            QueryParam::One(_) => {}
        }
    }
    join_query(url, &serializer.finish())
}

/// ## Summary
/// Encodes every non-`Null` parameter; empty strings are kept and lists are
/// sent once, comma-joined.
#[must_use]
pub fn build_query_string(params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, param) in params.entries() {
        match param {
            QueryParam::One(QueryValue::Null) => {}
            QueryParam::One(value) => {
                serializer.append_pair(key, &value.to_query_text());
            }
            QueryParam::Many(values) => {
                let joined = values
                    .iter()
                    .map(|value| match value {
                        QueryValue::Null => String::new(),
                        other => other.to_query_text(),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                serializer.append_pair(key, &joined);
            }
        }
    }
    serializer.finish()
}

/// [`build_query_string`] appended to `url` with `?` or `&`.
#[must_use]
pub fn append_query_string(url: &str, params: &QueryParams) -> String {
    join_query(url, &build_query_string(params))
}
