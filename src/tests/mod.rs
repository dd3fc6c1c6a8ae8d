use std::path::PathBuf;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

use crate::config::{Config, StorageBackend};
use crate::jwt::JWT;
use crate::model::User;
use crate::repo::{JsonFileStore, SqliteStore, Store};

/// Builds the full app over a `TestContext` and initializes it as a service.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from($ctx.store.clone()))
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .configure(|cfg| crate::routes::configure(cfg, &$ctx.config.uploads_dir)),
        )
        .await
    };
}

mod material_test;

pub const TEST_SECRET: &str = "test_secret";
pub const ADMIN_EMAIL: &str = "admin@university.edu";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub config: Config,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new(backend: StorageBackend) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn Store> = match backend {
            StorageBackend::Sqlite => {
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect("sqlite::memory:")
                    .await
                    .unwrap();
                Arc::new(SqliteStore::from_pool(pool).await.unwrap())
            }
            StorageBackend::Json => {
                Arc::new(JsonFileStore::open(dir.path().join("data.json")).await.unwrap())
            }
        };
        let uploads_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads_dir).unwrap();

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: TEST_SECRET.to_string(),
            storage: backend,
            sqlite_db_url: "sqlite::memory:".to_string(),
            data_file: dir.path().join("data.json"),
            uploads_dir,
            max_upload_bytes: 1024 * 1024,
            bcrypt_cost: 4,
            cors_origins: Vec::new(),
            admin_seed: None,
        };

        Self {
            store,
            config,
            _dir: dir,
        }
    }

    pub async fn sqlite() -> Self {
        Self::new(StorageBackend::Sqlite).await
    }

    pub async fn json() -> Self {
        Self::new(StorageBackend::Json).await
    }

    /// Inserts the admin user directly and returns a bearer header value.
    pub async fn admin_bearer(&self) -> String {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: bcrypt::hash(ADMIN_PASSWORD, 4).unwrap(),
            name: "Admin".to_string(),
        };
        assert!(self.store.create_user(&user).await.unwrap());
        format!("Bearer {}", JWT::create_jwt(&user.id, TEST_SECRET).unwrap())
    }

    pub fn upload_path(&self, file_path: &str) -> PathBuf {
        self.config.uploads_dir.join(file_path)
    }

    pub fn stored_uploads(&self) -> usize {
        std::fs::read_dir(&self.config.uploads_dir).unwrap().count()
    }
}

pub const BOUNDARY: &str = "----econtent-test-boundary";

/// Encodes a `multipart/form-data` body; returns the content type and bytes.
pub fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
