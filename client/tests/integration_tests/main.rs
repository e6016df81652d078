//! Integration tests for the Logscope client.
//!
//! These tests run the real HTTP client and controllers against an in-process
//! mock of the search backend.

mod analysis_tests;
mod common;
mod lookup_tests;
mod search_tests;
