//! Filevault - file and image storage lifecycle with versioned paths
//!
//! This library crate exposes the path resolution, storage adapters,
//! lifecycle coordination and size validation used by the CLI.

pub mod config;
pub mod images;
pub mod lifecycle;
pub mod storage;
pub mod validation;
