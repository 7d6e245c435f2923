//! Unit tests for individual components

mod error_code_test;
mod error_test;
mod progress_test;
mod store_test;
mod util_test;
