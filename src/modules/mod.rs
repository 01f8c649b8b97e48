//! Modules layer - Infrastructure components
//!
//! Contains adapters for external resources such as the upload directory.

pub mod storage;
