//! Identity token verification and user id mapping
//!
//! Tokens have the form `<subject>.<issued_at_ms>.<signature>`, where the
//! signature is the hex SHA-256 of `"{subject}.{issued_at_ms}{secret}"`.
//! The subject is an external identifier; [`numeric_user_id`] maps it onto
//! the integer id space of the `users` table.
//!
//! This module contains ONLY pure functions. HTTP handling lives in the API
//! crate's middleware.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// User id used when token verification is disabled
pub const DEVELOPMENT_USER_ID: i64 = 1;

/// Subject issued to development clients; maps to [`DEVELOPMENT_USER_ID`]
pub const MOCK_SUBJECT: &str = "mock-user-id";

/// Tokens may be issued at most this far in the future (clock drift)
pub const MAX_FUTURE_SKEW_MS: i64 = 60_000;

const USER_ID_MODULUS: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired ({age_ms}ms old, max {max_age_ms}ms)")]
    Expired { age_ms: i64, max_age_ms: i64 },

    #[error("Token issued {0}ms in the future")]
    IssuedInFuture(i64),
}

/// Map an external subject onto a numeric user id
///
/// 32-bit rolling hash (`h = h * 31 + unit`, wrapping) over UTF-16 code
/// units; the absolute value is taken in 64 bits, then reduced modulo one
/// million.
pub fn numeric_user_id(subject: &str) -> i64 {
    if subject == MOCK_SUBJECT {
        return DEVELOPMENT_USER_ID;
    }

    let hash = subject
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));

    (hash as i64).abs() % USER_ID_MODULUS
}

fn signature(subject: &str, issued_at_ms: i64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}.{}{}", subject, issued_at_ms, secret).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issue a token for `subject`
pub fn sign_token(subject: &str, issued_at_ms: i64, secret: &str) -> String {
    format!(
        "{}.{}.{}",
        subject,
        issued_at_ms,
        signature(subject, issued_at_ms, secret)
    )
}

/// Verify a token and return its subject
///
/// The subject may itself contain dots; the last two components are always
/// the timestamp and signature.
pub fn verify_token(
    token: &str,
    secret: &str,
    max_age_ms: i64,
    now_ms: i64,
) -> Result<String, TokenError> {
    let mut parts = token.rsplitn(3, '.');
    let provided = parts.next().ok_or(TokenError::Malformed)?;
    let issued_at = parts.next().ok_or(TokenError::Malformed)?;
    let subject = parts.next().ok_or(TokenError::Malformed)?;

    if subject.is_empty() || provided.len() != 64 {
        return Err(TokenError::Malformed);
    }

    let issued_at_ms: i64 = issued_at.parse().map_err(|_| TokenError::Malformed)?;

    if signature(subject, issued_at_ms, secret) != provided.to_ascii_lowercase() {
        return Err(TokenError::InvalidSignature);
    }

    let age_ms = now_ms - issued_at_ms;
    if age_ms < -MAX_FUTURE_SKEW_MS {
        return Err(TokenError::IssuedInFuture(-age_ms));
    }
    if age_ms > max_age_ms {
        return Err(TokenError::Expired { age_ms, max_age_ms });
    }

    Ok(subject.to_string())
}
