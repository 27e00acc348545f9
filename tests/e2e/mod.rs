//! End-to-end tests: the real process shell serving the real client

pub mod app_suite;
