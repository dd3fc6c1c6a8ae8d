use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::constants::{BCRYPT_COST, DEFAULT_USER_NAME, DEV_JWT_SECRET, MAX_UPLOAD_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Json,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Json => "json",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Ok(StorageBackend::Sqlite),
            "json" | "file" => Ok(StorageBackend::Json),
            other => bail!("unknown STORAGE_BACKEND `{}` (expected `sqlite` or `json`)", other),
        }
    }
}

/// Admin account created at startup when none exists with that email.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub storage: StorageBackend,
    pub sqlite_db_url: String,
    pub data_file: PathBuf,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub admin_seed: Option<AdminSeed>,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid value for {}: `{}`", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                log::warn!("JWT_SECRET is not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let admin_seed = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminSeed {
                    email,
                    password,
                    name: var_or("ADMIN_NAME", DEFAULT_USER_NAME),
                })
            }
            _ => None,
        };

        let cors_origins = var_or(
            "CORS_ORIGINS",
            "http://localhost:5173,http://localhost:3000,http://127.0.0.1:5173",
        )
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

        Ok(Self {
            host: var_or("HOST", "127.0.0.1"),
            port: parse_var("PORT", 5000)?,
            jwt_secret,
            storage: parse_var("STORAGE_BACKEND", StorageBackend::Sqlite)?,
            sqlite_db_url: var_or("SQLITE_DB_URL", "sqlite://econtent.db?mode=rwc"),
            data_file: PathBuf::from(var_or("DATA_FILE", "./data.json")),
            uploads_dir: PathBuf::from(var_or("UPLOADS_DIR", "./uploads")),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", MAX_UPLOAD_BYTES)?,
            bcrypt_cost: parse_var("BCRYPT_COST", BCRYPT_COST)?,
            cors_origins,
            admin_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!("JSON".parse::<StorageBackend>().unwrap(), StorageBackend::Json);
        assert!("mongo".parse::<StorageBackend>().is_err());
    }
}
