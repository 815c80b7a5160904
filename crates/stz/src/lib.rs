//! The `stz` toolkit: calendar values, small helpers and a JSON HTTP client.
//!
//! Each member crate is re-exported under a topic module. The [`prelude`]
//! brings the most used items into scope at once.
//!
//! ```
//! use stz::prelude::*;
//!
//! let due = utc("2024-01-31").add(1, Unit::Month);
//! assert_eq!(due.format(DEFAULT_FORMAT), "2024-03-02");
//! assert_eq!(string::to_kebab_case("dueDate"), "due-date");
//! ```

/// Configuration, logging and shared constants.
pub mod shared {
    pub use stz_core::*;
}

pub mod chronos {
    pub use stz_chronos::*;
}

pub mod fetch {
    pub use stz_fetch::*;
}

pub mod util {
    pub use stz_util::*;
}

pub mod prelude {
    pub use stz_chronos::{
        Chronos, DEFAULT_FORMAT, DateLike, Inclusivity, Unit, chronos, now, unix, utc, utc_now,
    };
    pub use stz_core::config::{Settings, load_config};
    pub use stz_core::logging::init_logging;
    pub use stz_fetch::{FetchClient, HttpMethod, QueryParams, RequestOptions, RequestResponse};
    pub use stz_util::{
        array, color, convert, crypto, object, request, string, types, validate,
    };
}
