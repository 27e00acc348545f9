//! Pool manager tests against a live PostgreSQL

pub mod transaction_test;
