use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::SessionClaims;

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Session secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,
}

fn mac_for(secret: &str) -> Result<HmacSha256, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::MissingSecret)
}

/// Encodes `claims` as `payload.signature`, both base64url without padding.
pub fn issue_token(claims: &SessionClaims, secret: &str) -> Result<String, TokenError> {
    let mut mac = mac_for(secret)?;

    let payload = serde_json::to_vec(claims).map_err(|_| TokenError::Malformed)?;
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload);

    mac.update(payload_b64.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", payload_b64, signature_b64))
}

pub fn validate_token(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<SessionClaims, TokenError> {
    let mut mac = mac_for(secret)?;

    let (payload_b64, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
    if signature_b64.contains('.') {
        return Err(TokenError::Malformed);
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::Malformed
    })?;

    mac.update(payload_b64.as_bytes());
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let payload = URL_SAFE_NO_PAD.decode(payload_b64).map_err(|_| TokenError::Malformed)?;
    let claims: SessionClaims = serde_json::from_slice(&payload).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::Malformed
    })?;

    if claims.is_expired(now) {
        debug!("Token expired at {} (now: {})", claims.exp, now.timestamp());
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
