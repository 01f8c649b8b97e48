//! Storage module for file management
//!
//! Provides the upload-directory backed store used for file payloads.

mod local_storage;

pub use local_storage::{LocalStorage, StoredObject};
