//! Cache-control policy for per-account responses.
//!
//! The order board and usage figures change with every webhook call, so
//! shared caches must never hold them and browsers must revalidate.

use actix_web::http::header::{self, HeaderName, HeaderValue};

pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

pub fn private_no_cache_header() -> (HeaderName, HeaderValue) {
    (
        header::CACHE_CONTROL,
        HeaderValue::from_static(PRIVATE_NO_CACHE_MUST_REVALIDATE),
    )
}
