//! Record store for the food diary.
//!
//! The service layer speaks plain parameterized SQL through [`SQLStore`] and
//! composes its own predicate queries (equality, `IN`, counts) on top. No
//! multi-statement transactions are exposed: every call is an independent
//! point read or write.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
