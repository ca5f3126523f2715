//! HTTP integration tests.
//!
//! Each test starts an axum server on a free port and drives it with reqwest.

#![cfg(feature = "http")]

mod support;

mod products;
mod reviews;
