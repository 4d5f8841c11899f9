// ============================================================================
// Lemon Core - Authentication Service
// File: crates/lemon-core/src/services/auth_service.rs
// ============================================================================
//! Registration, token login and per-request caller resolution

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use lemon_security::{JwtError, JwtService, PasswordService};

use crate::access::Caller;
use crate::domain::{Credentials, NewUser, Registration, User};
use crate::error::DomainError;
use crate::repositories::{RoleDirectory, UserRepository};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleDirectory>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleDirectory>, jwt: JwtService) -> Self {
        Self { users, roles, jwt }
    }

    /// Register a new customer account
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        registration.validate()?;
        PasswordService::check_policy(&registration.password)
            .map_err(|e| DomainError::field("password", e.to_string()))?;

        if self.users.find_by_username(&registration.username).await?.is_some() {
            warn!("Registration failed: username taken: {}", registration.username);
            return Err(DomainError::field(
                "username",
                "A user with that username already exists.",
            ));
        }

        let user = self
            .create_account(
                &registration.username,
                registration.email.unwrap_or_default(),
                &registration.password,
                false,
            )
            .await?;
        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, credentials: &Credentials) -> Result<String, DomainError> {
        let mut missing = crate::error::FieldErrors::new();
        if credentials.username.trim().is_empty() {
            missing.insert("username".to_string(), vec!["This field may not be blank.".to_string()]);
        }
        if credentials.password.is_empty() {
            missing.insert("password".to_string(), vec!["This field may not be blank.".to_string()]);
        }
        if !missing.is_empty() {
            return Err(DomainError::Validation(missing));
        }

        let user = self
            .users
            .find_by_username(credentials.username.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown username: {}", credentials.username);
                DomainError::InvalidCredentials
            })?;

        let valid = PasswordService::verify(&credentials.password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            warn!("Login failed: bad password for: {}", user.username);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .jwt
            .generate_access_token(user.id, &user.username)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        info!("Login successful for: {}", user.username);
        Ok(token)
    }

    /// Resolve a bearer token to the caller it represents. Roles and the
    /// superuser flag are read fresh on every call.
    pub async fn authenticate(&self, token: &str) -> Result<Caller, DomainError> {
        let claims = self.jwt.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => DomainError::Unauthenticated("Token has expired".to_string()),
            _ => DomainError::Unauthenticated("Invalid token".to_string()),
        })?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("User not found".to_string()))?;
        let roles = self.roles.roles_of(user.id).await?;

        Ok(Caller::new(user.id, user.username, user.is_superuser, roles))
    }

    /// Create the configured superuser unless the username already exists.
    pub async fn ensure_superuser(&self, username: &str, password: &str) -> Result<User, DomainError> {
        if let Some(existing) = self.users.find_by_username(username).await? {
            if !existing.is_superuser {
                warn!("Bootstrap user {} exists but is not a superuser", username);
            }
            return Ok(existing);
        }

        PasswordService::check_policy(password)
            .map_err(|e| DomainError::field("password", e.to_string()))?;
        let user = self.create_account(username, String::new(), password, true).await?;
        info!("Created superuser {}", user.username);
        Ok(user)
    }

    async fn create_account(
        &self,
        username: &str,
        email: String,
        password: &str,
        is_superuser: bool,
    ) -> Result<User, DomainError> {
        let password_hash =
            PasswordService::hash(password).map_err(|e| DomainError::InternalError(e.to_string()))?;
        self.users
            .create(&NewUser {
                username: username.to_string(),
                email,
                password_hash,
                is_superuser,
            })
            .await
    }
}
