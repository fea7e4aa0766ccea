//! Unit tests for the public surface of each module.

mod audit_test;
mod builders_test;
mod config_test;
mod error_test;
mod util_test;
