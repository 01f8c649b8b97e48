//! Gmail validation and user registration.
//!
//! Validating a Gmail address registers it: there is no separate sign-up step.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/v1/validate-email` | Check Gmail format, get-or-create the user |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::UserService;
