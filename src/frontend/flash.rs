//! One-shot flash messages carried across a redirect in a cookie.

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

/// Seconds a pending flash survives if never displayed
const FLASH_MAX_AGE_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// `303 See Other` to `to`, leaving `message` for the next page
pub fn redirect_with_flash(to: &str, message: FlashMessage) -> Response {
    let mut response = Redirect::to(to).into_response();
    if let Some(cookie) = encode_cookie(&[message]) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Pending flash messages sent by the browser, oldest first
pub fn read_flashes(headers: &HeaderMap) -> Vec<FlashMessage> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == FLASH_COOKIE).then_some(value)
        })
        .filter_map(|value| {
            let decoded = urlencoding::decode(value).ok()?;
            serde_json::from_str::<Vec<FlashMessage>>(&decoded).ok()
        })
        .flatten()
        .collect()
}

/// Expire the flash cookie once its messages were shown
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn encode_cookie(messages: &[FlashMessage]) -> Option<HeaderValue> {
    let json = serde_json::to_string(messages).ok()?;
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        FLASH_COOKIE,
        urlencoding::encode(&json),
        FLASH_MAX_AGE_SECS
    );
    HeaderValue::from_str(&cookie).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_flash_survives_redirect() {
        let response = redirect_with_flash(
            "/dashboard/a%40gmail.com",
            FlashMessage::error("Upload failed: File size exceeds maximum limit of 10MB"),
        );
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/dashboard/a%40gmail.com"
        );

        // Browser echoes name=value back
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("session=abc; {}", pair)).unwrap(),
        );

        let flashes = read_flashes(&headers);
        assert_eq!(
            flashes,
            vec![FlashMessage::error(
                "Upload failed: File size exceeds maximum limit of 10MB"
            )]
        );
    }

    #[test]
    fn test_garbage_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=%7Bnot-json"));
        assert!(read_flashes(&headers).is_empty());
        assert!(read_flashes(&HeaderMap::new()).is_empty());
    }
}
