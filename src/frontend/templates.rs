//! HTML page templates rendered with Jinja2 syntax.
//!
//! Templates are compiled into the binary from `templates/frontend/` and
//! registered once at startup together with the display helpers
//! `format_file_size` and `format_date`.

use chrono::DateTime;
use minijinja::{Environment, Value};
use thiserror::Error;

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to load template: {0}")]
    LoadError(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

const TEMPLATES: &[(&str, &str)] = &[
    (
        "base.html",
        include_str!("../../templates/frontend/base.html"),
    ),
    (
        "index.html",
        include_str!("../../templates/frontend/index.html"),
    ),
    (
        "dashboard.html",
        include_str!("../../templates/frontend/dashboard.html"),
    ),
];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Compiled page templates
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| TemplateError::LoadError(format!("{}: {}", name, e)))?;
            tracing::debug!("Loaded template: {}", name);
        }

        env.add_function("format_file_size", format_file_size);
        env.add_function("format_date", format_date);

        Ok(Self { env })
    }

    /// Render `name` with `ctx` (use `minijinja::context!`)
    pub fn render(&self, name: &str, ctx: Value) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|_| TemplateError::NotFound(name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

/// Human-readable size, base 1024: `5 Bytes`, `1.46 KB`, `10.00 MB`
pub fn format_file_size(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, SIZE_UNITS[0])
    } else {
        format!("{:.2} {}", size, SIZE_UNITS[unit])
    }
}

/// RFC 3339 timestamp as `YYYY-MM-DD HH:MM`; anything else is returned as is
pub fn format_date(value: String) -> String {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => value,
    }
}
