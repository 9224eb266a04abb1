//! Notices carried across a redirect in a signed cookie
//!
//! Cookie value: `hex(json(notices)) "." hex(hmac_sha256(secret, payload))`.
//! A cookie that fails verification or decoding is treated as empty.

use crate::types::Notice;
use axum::{
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const FLASH_COOKIE: &str = "kubecreds_flash";

// Browsers drop cookies above 4 KiB; the JSON payload doubles when hex encoded
const MAX_NOTICES: usize = 3;
const MAX_MESSAGE_BYTES: usize = 500;
const MAX_PAYLOAD_BYTES: usize = 1800;

/// HMAC key for the flash cookie, fixed for the life of the process
#[derive(Clone)]
pub struct FlashKey {
    mac: HmacSha256,
}

impl FlashKey {
    pub fn new(secret: &[u8]) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    fn sign(&self, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac
    }

    /// Encode and sign notices, keeping the most recent ones
    pub fn seal(&self, notices: &[Notice]) -> String {
        let mut kept: Vec<Notice> = notices
            .iter()
            .skip(notices.len().saturating_sub(MAX_NOTICES))
            .map(|notice| Notice {
                level: notice.level,
                message: truncate(&notice.message, MAX_MESSAGE_BYTES),
            })
            .collect();

        // JSON escapes can still grow a message several times over
        let mut json = to_json(&kept);
        while json.len() > MAX_PAYLOAD_BYTES {
            if kept.len() > 1 {
                kept.remove(0);
            } else if let Some(last) = kept.last_mut() {
                last.message = truncate(&last.message, last.message.len() / 2);
            }
            json = to_json(&kept);
        }

        let payload = hex::encode(json);
        let signature = hex::encode(self.sign(&payload).finalize().into_bytes());
        format!("{}.{}", payload, signature)
    }

    /// Verify and decode a sealed value
    pub fn open(&self, value: &str) -> Option<Vec<Notice>> {
        let (payload, signature) = value.split_once('.')?;
        let signature = hex::decode(signature).ok()?;
        self.sign(payload).verify_slice(&signature).ok()?;

        let json = hex::decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Notices carried by the request's flash cookie, if any
    pub fn take(&self, headers: &HeaderMap) -> Vec<Notice> {
        match cookie_value(headers, FLASH_COOKIE) {
            Some(value) => self.open(value).unwrap_or_else(|| {
                tracing::debug!("Ignoring flash cookie that failed verification");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    pub fn set_cookie(&self, notices: &[Notice]) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            self.seal(notices)
        )
    }
}

pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", FLASH_COOKIE)
}

/// Redirect to `to`, handing `notices` to the next rendered page
pub fn redirect(flash: &FlashKey, to: &str, notices: &[Notice]) -> Response {
    let cookie = if notices.is_empty() {
        clear_cookie()
    } else {
        flash.set_cookie(notices)
    };
    ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

/// A rendered page; whatever notices it shows are consumed
pub fn page(body: String) -> Response {
    ([(header::SET_COOKIE, clear_cookie())], Html(body)).into_response()
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

fn to_json(notices: &[Notice]) -> String {
    serde_json::to_string(notices).unwrap_or_else(|_| "[]".to_string())
}

/// At most `max_bytes` of `message`, cut on a char boundary and marked with `...`
fn truncate(message: &str, max_bytes: usize) -> String {
    if message.len() <= max_bytes {
        return message.to_string();
    }
    let mut end = max_bytes;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}
