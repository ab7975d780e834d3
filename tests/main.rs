// Single main.rs for all integration tests
// https://endler.dev/2020/rust-compile-times/#combine-all-integration-tests-in-a-single-binary

mod catalog;
#[cfg(feature = "executor-sqlite")]
mod sqlite;
