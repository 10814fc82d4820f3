//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store for tests and database-less debug runs
//! - **media**: Cloudinary image uploads
//! - **email**: transactional email over an HTTP API
//! - **password**: bcrypt password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod email;
pub mod media;
pub mod memory;
pub mod password;
pub mod persistence;
