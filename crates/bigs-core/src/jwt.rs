//! Reading claims from the access token.
//!
//! The API puts the user's display name in the access token's `name` claim.
//! The payload is read without verifying the signature: the client only
//! uses it for display, the server verifies the token on every request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value as JsonValue;

use crate::error::{Error, InvalidInputError};
use crate::tokens::AccessToken;

/// Decode the (unverified) payload of a JWT.
///
/// # Errors
///
/// Returns `InvalidInputError::Token` if the token is not three dot-separated
/// segments or the payload is not base64url-encoded JSON.
pub fn decode_payload(token: &AccessToken) -> Result<JsonValue, Error> {
    let mut segments = token.as_str().split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(InvalidInputError::Token {
                reason: "expected three dot-separated segments".to_string(),
            }
            .into());
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| InvalidInputError::Token {
            reason: format!("payload is not base64url: {e}"),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        InvalidInputError::Token {
            reason: format!("payload is not JSON: {e}"),
        }
        .into()
    })
}

/// The `name` claim of an access token, if present.
pub fn display_name(token: &AccessToken) -> Result<Option<String>, Error> {
    let payload = decode_payload(token)?;
    Ok(payload
        .get("name")
        .and_then(JsonValue::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}
