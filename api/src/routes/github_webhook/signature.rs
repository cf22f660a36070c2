//! `X-Hub-Signature-256` verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing X-Hub-Signature-256 header")]
    Missing,
    #[error("signature must start with sha256=")]
    MissingPrefix,
    #[error("signature is not valid hex")]
    InvalidHex,
    #[error("invalid HMAC key")]
    InvalidKey,
    #[error("signature does not match payload")]
    Mismatch,
}

/// Checks `header` (`sha256=<hex>`) against the HMAC of `body` under `secret`.
///
/// Comparison is constant-time.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let signature_hex = header
        .trim()
        .strip_prefix("sha256=")
        .ok_or(SignatureError::MissingPrefix)?;
    let expected = hex::decode(signature_hex).map_err(|_| SignatureError::InvalidHex)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// `sha256=<hex>` signature of `body`, as GitHub would send it.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_signature() {
        let body = br#"{"zen":"Keep it logically awesome."}"#;
        let sig = sign("s3cret", body).unwrap();
        assert_eq!(verify_signature("s3cret", body, Some(&sig)), Ok(()));
    }

    #[test]
    fn rejects_bad_signatures() {
        let body = b"payload";
        let sig = sign("s3cret", body).unwrap();

        assert_eq!(
            verify_signature("other", body, Some(&sig)),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_signature("s3cret", b"tampered", Some(&sig)),
            Err(SignatureError::Mismatch)
        );
        assert_eq!(
            verify_signature("s3cret", body, None),
            Err(SignatureError::Missing)
        );
        assert_eq!(
            verify_signature("s3cret", body, Some("sha1=abcd")),
            Err(SignatureError::MissingPrefix)
        );
        assert_eq!(
            verify_signature("s3cret", body, Some("sha256=zz")),
            Err(SignatureError::InvalidHex)
        );
    }
}
