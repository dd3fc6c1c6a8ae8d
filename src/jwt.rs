use actix_web::{dev::Payload, http::header::Header, web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::constants::{MESSAGE_INVALID_TOKEN, MESSAGE_NOT_AUTHORIZED, MESSAGE_USER_NOT_FOUND, TOKEN_TTL_SECS};
use crate::error::ApiError;
use crate::model::User;
use crate::repo::Store;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: i64,
    pub exp: i64, // expiry as timestamp
}

pub struct JWT;

impl JWT {
    pub fn create_jwt(user_id: &str, secret: &str) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    }

    pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, Error> {
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
            .map(|data| data.claims)
    }
}

/// The admin behind a valid bearer token. Taking this as a handler
/// argument makes the route protected.
pub struct Authenticated(pub User);

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = Authorization::<Bearer>::parse(req)
            .map(|auth| auth.into_scheme().token().to_string());
        let config = req.app_data::<web::Data<Config>>().cloned();
        let store = req.app_data::<web::Data<dyn Store>>().cloned();

        Box::pin(async move {
            let token = token.map_err(|_| ApiError::Unauthorized(MESSAGE_NOT_AUTHORIZED.to_string()))?;
            let (config, store) = match (config, store) {
                (Some(config), Some(store)) => (config, store),
                _ => return Err(ApiError::Internal(anyhow::anyhow!("auth state is not configured"))),
            };

            let claims = JWT::verify_jwt(&token, &config.jwt_secret).map_err(|e| {
                log::info!("## Rejected token: {}", e);
                ApiError::Unauthorized(MESSAGE_INVALID_TOKEN.to_string())
            })?;

            match store.get_user_by_id(&claims.sub).await? {
                Some(user) => Ok(Authenticated(user)),
                None => Err(ApiError::Unauthorized(MESSAGE_USER_NOT_FOUND.to_string())),
            }
        })
    }
}
