//! Client auth context tests against a mocked backend

pub mod context_test;
