pub mod duckdb_storage;
pub mod repository;

#[cfg(test)]
pub mod test_utils;

pub use duckdb_storage::*;
pub use repository::*;
