mod email_dto;

pub use email_dto::*;
