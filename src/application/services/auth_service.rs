//! User registration, credential verification, and access-token handling.
//!
//! Implements the identity collaborator consumed by the ownership layer:
//! `verify_credentials` turns an email/password pair into a user and
//! `identity_from_token` turns a bearer token into a user id or nothing.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Access token claims. `sub` carries the user id.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Service for account registration and bearer-token authentication.
///
/// Passwords are hashed with Argon2id before storage; access tokens are
/// HS256 JWTs with a bounded lifetime.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_minutes: i64,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - user repository for account storage
    /// - `jwt_secret` - HS256 signing key; must be stable across restarts
    ///   for issued tokens to stay valid
    /// - `token_ttl_minutes` - access token lifetime
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: &str, token_ttl_minutes: i64) -> Self {
        Self {
            users,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl_minutes,
        }
    }

    /// Registers a new user and hashes the password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email or username is taken
    /// (message names which), [`AppError::Internal`] on hashing failures.
    pub async fn register(
        &self,
        email: String,
        username: String,
        password: &str,
    ) -> Result<User, AppError> {
        let password_hash = hash_password(password).map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })?;

        self.users
            .create(NewUser {
                email,
                username,
                password_hash,
            })
            .await
    }

    /// Verifies an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with a single indistinct message
    /// for both unknown emails and wrong passwords.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            AppError::unauthorized("Incorrect email or password", json!({}))
        })?;

        let matches = verify_password(password, &user.password_hash).unwrap_or(false);

        if !matches {
            return Err(AppError::unauthorized(
                "Incorrect email or password",
                json!({}),
            ));
        }

        Ok(user)
    }

    /// Issues a signed access token for a user id.
    pub fn issue_token(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
        })
    }

    /// Extracts the user id from a bearer token, if it is valid and unexpired.
    pub fn identity_from_token(&self, token: &str) -> Option<i64> {
        let data =
            decode::<AccessClaims>(token, &self.decoding_key, &Validation::default()).ok()?;

        data.claims.sub.parse().ok()
    }

    /// Resolves a bearer token to the full user record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for invalid/expired tokens and for
    /// tokens whose subject no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.identity_from_token(token).ok_or_else(|| {
            AppError::unauthorized(
                "Could not validate credentials",
                json!({ "reason": "invalid or expired token" }),
            )
        })?;

        self.current_user_by_id(user_id).await
    }

    /// Loads the account behind an already-verified identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when the account no longer exists.
    pub async fn current_user_by_id(&self, user_id: i64) -> Result<User, AppError> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::unauthorized(
                "Could not validate credentials",
                json!({ "reason": "unknown subject" }),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;

    fn test_secret() -> &'static str {
        "test-jwt-secret"
    }

    fn test_user(id: i64, email: &str, password: &str) -> User {
        User {
            id,
            email: email.to_string(),
            username: "testuser".to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|new_user| {
                new_user.password_hash.starts_with("$argon2")
                    && new_user.password_hash != "testpass123"
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: 1,
                    email: new_user.email,
                    username: new_user.username,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                })
            });

        let service = AuthService::new(Arc::new(repo), test_secret(), 60);

        let user = service
            .register(
                "newuser@example.com".to_string(),
                "newuser".to_string(),
                "testpass123",
            )
            .await
            .unwrap();

        assert_eq!(user.email, "newuser@example.com");
    }

    #[tokio::test]
    async fn test_verify_credentials_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(|_| Ok(Some(test_user(1, "test@example.com", "testpass123"))));

        let service = AuthService::new(Arc::new(repo), test_secret(), 60);

        let user = service
            .verify_credentials("test@example.com", "testpass123")
            .await
            .unwrap();

        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_verify_credentials_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(test_user(1, "test@example.com", "testpass123"))));

        let service = AuthService::new(Arc::new(repo), test_secret(), 60);

        let err = service
            .verify_credentials("test@example.com", "wrongpass")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
        assert!(err.to_string().contains("Incorrect email or password"));
    }

    #[tokio::test]
    async fn test_verify_credentials_unknown_email_same_message() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repo), test_secret(), 60);

        let err = service
            .verify_credentials("nobody@example.com", "testpass123")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Incorrect email or password"));
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let service = AuthService::new(Arc::new(MockUserRepository::new()), test_secret(), 60);

        let token = service.issue_token(42).unwrap();

        assert_eq!(service.identity_from_token(&token), Some(42));
    }

    #[tokio::test]
    async fn test_token_rejected_with_wrong_secret() {
        let issuer = AuthService::new(Arc::new(MockUserRepository::new()), "secret-a", 60);
        let verifier = AuthService::new(Arc::new(MockUserRepository::new()), "secret-b", 60);

        let token = issuer.issue_token(42).unwrap();

        assert_eq!(verifier.identity_from_token(&token), None);
    }

    #[tokio::test]
    async fn test_garbage_token_is_no_identity() {
        let service = AuthService::new(Arc::new(MockUserRepository::new()), test_secret(), 60);

        assert_eq!(service.identity_from_token("invalid_token"), None);
    }

    #[tokio::test]
    async fn test_current_user_resolves_subject() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|id| Ok(Some(test_user(id, "test@example.com", "testpass123"))));

        let service = AuthService::new(Arc::new(repo), test_secret(), 60);
        let token = service.issue_token(42).unwrap();

        let user = service.current_user(&token).await.unwrap();
        assert_eq!(user.id, 42);
    }

    #[tokio::test]
    async fn test_current_user_unknown_subject() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repo), test_secret(), 60);
        let token = service.issue_token(42).unwrap();

        let err = service.current_user(&token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }
}
