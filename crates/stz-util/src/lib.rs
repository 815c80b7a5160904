//! Small, mostly pure helpers shared by `stz` applications.
//!
//! Each module covers one topic: JSON type predicates ([`types`]), loose
//! conversions ([`convert`]), string casing and masking ([`string`]), input
//! validation ([`validate`]), slices and trees ([`array`]), JSON object
//! trees ([`object`]), CSS colors ([`color`]), hashing ([`crypto`]) and
//! request header inspection ([`request`]).

pub mod array;
pub mod color;
pub mod convert;
pub mod crypto;
pub mod error;
pub mod object;
pub mod request;
pub mod string;
pub mod types;
pub mod validate;

mod pattern;

pub use error::{ColorError, ColorResult, UtilError, UtilResult};
