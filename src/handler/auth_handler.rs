// src/handler/auth_handler.rs

use actix_web::{web, HttpResponse};
use bcrypt::{hash, verify};

use crate::config::{AdminSeed, Config};
use crate::constants::{
    DEFAULT_USER_NAME, MESSAGE_INVALID_CREDENTIALS, MESSAGE_MISSING_CREDENTIALS, MESSAGE_USER_EXISTS,
};
use crate::error::ApiError;
use crate::jwt::{Authenticated, JWT};
use crate::model::{LoginRequest, RegisterRequest, User};
use crate::repo::Store;
use crate::response::ApiResponse;
use crate::utils::non_empty;

async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    web::block(move || hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing was cancelled: {}", e)))?
        .map_err(ApiError::from)
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, ApiError> {
    web::block(move || verify(password, &password_hash))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password check was cancelled: {}", e)))?
        .map_err(ApiError::from)
}

fn issue_token(user: &User, config: &Config) -> Result<String, ApiError> {
    JWT::create_jwt(&user.id, &config.jwt_secret)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("unable to sign token: {}", e)))
}

pub struct AuthHandler;

impl AuthHandler {
    pub async fn register(
        body: web::Json<RegisterRequest>,
        store: web::Data<dyn Store>,
        config: web::Data<Config>,
    ) -> Result<HttpResponse, ApiError> {
        let body = body.into_inner();
        let (email, password) = match (non_empty(Some(body.email)), non_empty(Some(body.password))) {
            (Some(email), Some(password)) => (email, password),
            _ => return Err(ApiError::Validation(MESSAGE_MISSING_CREDENTIALS.to_string())),
        };

        if store.get_user_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict(MESSAGE_USER_EXISTS.to_string()));
        }

        let new_user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password: hash_password(password, config.bcrypt_cost).await?,
            name: non_empty(body.name).unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
        };

        if !store.create_user(&new_user).await? {
            return Err(ApiError::Conflict(MESSAGE_USER_EXISTS.to_string()));
        }
        log::info!("## Registered user {}", new_user.email);

        let token = issue_token(&new_user, &config)?;
        Ok(HttpResponse::Created().json(ApiResponse::ok(new_user.profile(Some(token)))))
    }

    pub async fn login(
        creds: web::Json<LoginRequest>,
        store: web::Data<dyn Store>,
        config: web::Data<Config>,
    ) -> Result<HttpResponse, ApiError> {
        let creds = creds.into_inner();
        let email = match non_empty(Some(creds.email)) {
            Some(email) if !creds.password.is_empty() => email,
            _ => return Err(ApiError::Validation(MESSAGE_MISSING_CREDENTIALS.to_string())),
        };

        // Unknown email and wrong password must be indistinguishable.
        let user = match store.get_user_by_email(&email).await? {
            Some(user) => user,
            None => return Err(ApiError::Unauthorized(MESSAGE_INVALID_CREDENTIALS.to_string())),
        };
        if !verify_password(creds.password, user.password.clone()).await? {
            return Err(ApiError::Unauthorized(MESSAGE_INVALID_CREDENTIALS.to_string()));
        }

        let token = issue_token(&user, &config)?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(user.profile(Some(token)))))
    }

    pub async fn verify(Authenticated(user): Authenticated) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse::ok(user.profile(None)))
    }

    /// Creates the configured admin account unless the email is taken.
    pub async fn seed_admin(store: &dyn Store, seed: &AdminSeed, cost: u32) -> anyhow::Result<()> {
        if store.get_user_by_email(&seed.email).await?.is_some() {
            return Ok(());
        }
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: seed.email.clone(),
            password: hash(&seed.password, cost)?,
            name: seed.name.clone(),
        };
        if store.create_user(&user).await? {
            log::info!("Seeded admin account {}", user.email);
        }
        Ok(())
    }
}
