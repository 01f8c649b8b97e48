//! Gmail-based file upload service.
//!
//! Two binaries share this library: the JSON API (`gmail-upload-api`) and the
//! HTML frontend that proxies to it (`gmail-upload-frontend`).

pub mod core;
pub mod features;
pub mod frontend;
pub mod modules;
pub mod shared;
