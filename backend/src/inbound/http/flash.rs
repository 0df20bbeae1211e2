//! One-shot notices carried across a single redirect.
//!
//! A notice travels in the `flash` cookie as hex-encoded JSON. The redirect
//! response sets it and the next rendered page removes it, so a notice is
//! shown exactly once.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cookie carrying the pending notice.
pub const FLASH_COOKIE: &str = "flash";

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// An action completed.
    Success,
    /// Neutral information.
    Info,
    /// An action was refused or failed.
    Danger,
}

/// Human-readable message shown on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// How the page should style the message.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// A [`NoticeLevel::Success`] notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// A [`NoticeLevel::Info`] notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// A [`NoticeLevel::Danger`] notice.
    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Cookie that carries this notice to the next request.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let encoded = serde_json::to_vec(self).map(hex::encode).unwrap_or_default();
        Cookie::build(FLASH_COOKIE, encoded)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }

    /// Decode the notice sent with `req`. Malformed cookies are ignored.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(FLASH_COOKIE)?;
        let decoded = hex::decode(cookie.value())
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        if decoded.is_none() && !cookie.value().is_empty() {
            debug!("discarding malformed flash cookie");
        }
        decoded
    }

    /// Cookie that clears a delivered notice.
    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}
