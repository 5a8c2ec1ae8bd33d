//! Crate-internal test suites.
//!
//! Unit suites mock the backend trait; property suites drive the pure
//! selection and formatting logic. HTTP-level client tests live in
//! `tests/` against a wiremock server.

mod property;
mod unit;
