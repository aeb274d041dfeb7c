//! Filevault-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across filevault:
//!
//! - **Typed IDs**: An opaque [`FileId`] wrapper for stored file records
//! - **Core Types**: Stored file records, image version specs and dimension constraints
//! - **Path Utilities**: Separator normalization, URL joining and image extension checks
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use filevault_common::{Error, FileId, Result, StoredFileRecord};
//! use filevault_common::paths::normalize_path;
//!
//! // Records reference a model name and a storage adapter tag
//! let record = StoredFileRecord::new(FileId::from("a1b2"), "Avatar", "Local");
//! assert_eq!(record.id.as_str(), "a1b2");
//!
//! // Paths always use forward slashes
//! assert_eq!(normalize_path("Avatar\\ab\\a1b2"), "Avatar/ab/a1b2");
//!
//! // Use common error types
//! fn example() -> Result<()> {
//!     Err(Error::not_found("version", "Avatar.huge"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
