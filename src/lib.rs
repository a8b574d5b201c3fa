//! IMSS Ley 73 (Article 167) pension estimator with voluntary-continuation
//! buy-up analysis.
//!
//! The calculation engine lives in `core` as pure functions; `api` wraps it
//! in an HTTP surface that validates input ranges and serves JSON.

pub mod api;
pub mod core;
