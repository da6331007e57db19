//! Shared fixtures for unit tests: throwaway chains and registration
//! transactions.

pub mod test_utils;

pub use test_utils::*;
