//! File upload, listing and deletion for validated Gmail users.
//!
//! Payloads live in the local upload directory under generated names;
//! metadata lives in the `files` table.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/v1/upload-file` | Upload a file (multipart `file` + `email`) |
//! | GET | `/api/v1/files/{gmail}` | List a user's files, newest first |
//! | DELETE | `/api/v1/files/{file_id}` | Delete an owned file (disabled by default) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{DeleteOutcome, FileService};
