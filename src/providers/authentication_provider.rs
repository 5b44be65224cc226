use std::sync::Arc;

use poem::Request;
use poem::http::header;
use poem::web::cookie::Cookie;
use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, JwtValidationError};
use crate::providers::crypto_provider::CryptoProvider;
use crate::providers::token_provider::TokenProvider;
use crate::stores::UserStore;
use crate::types::db::user;

/// Name shared by the credential header and its cookie fallback
pub const AUTHORIZATION_COOKIE: &str = "Authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves bearer credentials to users and verifies login passwords
pub struct AuthenticationProvider {
    users: Arc<UserStore>,
    crypto: Arc<CryptoProvider>,
    tokens: Arc<TokenProvider>,
}

impl AuthenticationProvider {
    pub fn new(users: Arc<UserStore>, crypto: Arc<CryptoProvider>, tokens: Arc<TokenProvider>) -> Self {
        Self { users, crypto, tokens }
    }

    /// The raw credential: the `Authorization` header, else the cookie of the same name
    pub fn credential_from_request(req: &Request) -> Option<String> {
        if let Some(value) = req.headers().get(header::AUTHORIZATION) {
            return Some(value.to_str().unwrap_or_default().to_string());
        }

        req.headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| Cookie::parse(pair.trim()).ok())
            .find(|cookie| cookie.name() == AUTHORIZATION_COOKIE)
            .map(|cookie| cookie.value_str().replace("%20", " "))
    }

    /// Verify a `Bearer <token>` credential and load the user it names
    pub async fn authenticate(
        &self,
        conn: &impl ConnectionTrait,
        credential: Option<&str>,
    ) -> Result<user::Model, InternalError> {
        let credential = credential.ok_or_else(JwtValidationError::missing)?;
        let token = credential
            .strip_prefix(BEARER_PREFIX)
            .ok_or_else(JwtValidationError::bad_scheme)?;

        let claims = self.tokens.validate_jwt(token.trim())?;
        let user_uuid = TokenProvider::subject_uuid(&claims)?;

        let user = self.users.find_by_uuid(conn, &user_uuid).await?;
        user.ok_or(InternalError::Credential(CredentialError::UnknownUser))
    }

    /// Check an email/password pair; unknown email and wrong password look the same
    pub async fn verify_credential(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let Some(user) = self.users.find_by_email(conn, email).await? else {
            tracing::debug!("login for unknown email");
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !self.crypto.verify_password(&user.password_hash, password).await? {
            tracing::debug!(user_uuid = %user.uuid, "login with wrong password");
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(user)
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, InternalError> {
        self.tokens.generate_jwt(&user.uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiSettings, MockEnvironment, Secrets};
    use crate::errors::internal::JwtFailClass;
    use crate::stores::test_support::memory_db;
    use crate::stores::user_store::NewUser;

    fn provider() -> AuthenticationProvider {
        let env = MockEnvironment::empty()
            .with_var("JWT_SECRET", "test-secret-key-minimum-32-characters-long")
            .with_var("PASSWORD_PEPPER", "test-pepper-for-unit-tests");
        let secrets = Arc::new(Secrets::load(&env).unwrap());
        let crypto = Arc::new(CryptoProvider::new(secrets.password_pepper()));
        let tokens = Arc::new(TokenProvider::new(secrets, ApiSettings::default()));
        AuthenticationProvider::new(Arc::new(UserStore::new()), crypto, tokens)
    }

    fn jwt_class(err: InternalError) -> JwtFailClass {
        match err {
            InternalError::JwtValidation(jwt) => jwt.class,
            other => panic!("expected jwt failure, got {:?}", other),
        }
    }

    #[test]
    fn test_credential_prefers_header_over_cookie() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer from-header")
            .header(header::COOKIE, "Authorization=Bearer%20from-cookie")
            .finish();
        assert_eq!(
            AuthenticationProvider::credential_from_request(&req).as_deref(),
            Some("Bearer from-header")
        );
    }

    #[test]
    fn test_credential_falls_back_to_cookie() {
        let req = Request::builder()
            .header(header::COOKIE, "theme=dark; Authorization=abc.def.ghi")
            .finish();
        assert_eq!(
            AuthenticationProvider::credential_from_request(&req).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_no_credential() {
        let req = Request::builder().header(header::COOKIE, "theme=dark").finish();
        assert!(AuthenticationProvider::credential_from_request(&req).is_none());
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let db = memory_db().await;
        let provider = provider();
        let user = UserStore::new()
            .create(&db, NewUser::new("Ada", "ada@example.com", "unused"))
            .await
            .unwrap();

        let credential = format!("Bearer {}", provider.issue_token(&user).unwrap());
        let resolved = provider.authenticate(&db, Some(&credential)).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_classified() {
        let db = memory_db().await;
        let provider = provider();

        assert_eq!(jwt_class(provider.authenticate(&db, None).await.unwrap_err()), JwtFailClass::Missing);
        assert_eq!(
            jwt_class(provider.authenticate(&db, Some("Token abc")).await.unwrap_err()),
            JwtFailClass::BadScheme
        );
        assert_eq!(
            jwt_class(provider.authenticate(&db, Some("Bearer abc")).await.unwrap_err()),
            JwtFailClass::Malformed
        );
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_unknown() {
        let db = memory_db().await;
        let provider = provider();
        let store = UserStore::new();
        let user = store
            .create(&db, NewUser::new("Ada", "ada@example.com", "unused"))
            .await
            .unwrap();
        let credential = format!("Bearer {}", provider.issue_token(&user).unwrap());
        store.delete(&db, user).await.unwrap();

        let err = provider.authenticate(&db, Some(&credential)).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_verify_credential() {
        let db = memory_db().await;
        let provider = provider();
        let hash = provider.crypto.hash_password("hunter2").await.unwrap();
        UserStore::new()
            .create(&db, NewUser::new("Ada", "ada@example.com", &hash))
            .await
            .unwrap();

        assert!(provider.verify_credential(&db, "ada@example.com", "hunter2").await.is_ok());

        for (email, password) in [("ada@example.com", "wrong"), ("nobody@example.com", "hunter2")] {
            let err = provider.verify_credential(&db, email, password).await.unwrap_err();
            assert!(matches!(err, InternalError::Credential(CredentialError::InvalidCredentials)));
        }
    }
}
