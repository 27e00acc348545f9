//! Property-based tests

#[cfg(feature = "ssr")]
pub mod config_proptest;
pub mod token_proptest;
