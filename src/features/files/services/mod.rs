mod file_service;

pub use file_service::{DeleteOutcome, FileService};
