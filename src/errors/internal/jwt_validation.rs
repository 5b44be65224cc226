use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtFailClass {
    /// No Authorization header and no Authorization cookie
    Missing,

    /// Credential present but not in `Bearer <token>` form
    BadScheme,

    /// Token is not structurally a JWT or its signature does not verify
    Malformed,

    /// Signature verified but the expiry is in the past
    Expired,

    /// Token verified but a claim is unusable (issuer, undecodable subject)
    ClaimsRejected,

    /// Internal error during validation (key material, crypto infra)
    Internal,
}

#[derive(Debug, Error)]
#[error("JWT validation failed: {class:?} ({note})")]
pub struct JwtValidationError {
    pub class: JwtFailClass,

    /// Small, stable hint like "expired", "iss", "sub", "signature"
    pub note: &'static str,

    #[source]
    pub source: Option<jsonwebtoken::errors::Error>,
}

impl JwtValidationError {
    pub fn missing() -> Self {
        Self { class: JwtFailClass::Missing, note: "missing", source: None }
    }

    pub fn bad_scheme() -> Self {
        Self { class: JwtFailClass::BadScheme, note: "scheme", source: None }
    }

    pub fn claims_rejected(note: &'static str) -> Self {
        Self { class: JwtFailClass::ClaimsRejected, note, source: None }
    }

    pub fn from_jwt(err: jsonwebtoken::errors::Error) -> Self {
        let (class, note) = classify_jwt_error(&err);
        Self { class, note, source: Some(err) }
    }
}

fn classify_jwt_error(err: &jsonwebtoken::errors::Error) -> (JwtFailClass, &'static str) {
    use jsonwebtoken::errors::ErrorKind::*;

    match err.kind() {
        InvalidToken | Base64(_) | Json(_) | Utf8(_) => (JwtFailClass::Malformed, "malformed"),

        InvalidSignature | InvalidAlgorithm | MissingAlgorithm | InvalidAlgorithmName => {
            (JwtFailClass::Malformed, "signature")
        }

        ExpiredSignature => (JwtFailClass::Expired, "expired"),

        ImmatureSignature | InvalidAudience | InvalidIssuer | InvalidSubject | MissingRequiredClaim(_) => {
            (JwtFailClass::ClaimsRejected, "claims")
        }

        _ => (JwtFailClass::Internal, "internal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::{Error, ErrorKind};

    #[test]
    fn test_expired_signature_is_classified_as_expired() {
        let err = JwtValidationError::from_jwt(Error::from(ErrorKind::ExpiredSignature));
        assert_eq!(err.class, JwtFailClass::Expired);
    }

    #[test]
    fn test_bad_signature_is_classified_as_malformed() {
        let err = JwtValidationError::from_jwt(Error::from(ErrorKind::InvalidSignature));
        assert_eq!(err.class, JwtFailClass::Malformed);
        assert_eq!(err.note, "signature");
    }

    #[test]
    fn test_wrong_issuer_is_classified_as_claims_rejected() {
        let err = JwtValidationError::from_jwt(Error::from(ErrorKind::InvalidIssuer));
        assert_eq!(err.class, JwtFailClass::ClaimsRejected);
    }
}
