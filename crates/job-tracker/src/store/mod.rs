//! Record store implementations for [`ApplicationRepository`].
//!
//! [`SqliteApplicationRepository`] is the persistent default; [`InMemoryApplicationRepository`]
//! backs tests and throwaway sessions.
//!
//! [`ApplicationRepository`]: crate::applications::ApplicationRepository

mod memory;
pub mod migrations;
mod sqlite;

pub use memory::InMemoryApplicationRepository;
pub use sqlite::SqliteApplicationRepository;
