//! A small JSON-over-HTTP client.
//!
//! [`FetchClient`] wraps `reqwest` with the conventions of the `stz`
//! toolkit: JSON bodies for `POST`/`PUT`/`PATCH`, query parameters for the
//! other methods, and responses decoded into any `serde` type.

pub mod client;
pub mod error;
pub mod method;
pub mod query;

pub use client::{FetchClient, JSON_CONTENT_TYPE, RequestOptions, RequestResponse};
pub use error::{FetchError, FetchResult};
pub use method::HttpMethod;
pub use query::{
    QueryParam, QueryParams, QueryValue, append_query_string, build_query_string, normalize_url,
};
