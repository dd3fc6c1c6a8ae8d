mod config;
mod constants;
mod db;
mod error;
mod handler;
mod jwt;
mod model;
mod repo;
mod response;
mod routes;
mod upload;
mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;

use config::{Config, StorageBackend};
use handler::AuthHandler;
use repo::{JsonFileStore, SqliteStore, Store};

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Sqlite => Arc::new(SqliteStore::connect(&config.sqlite_db_url).await?),
        StorageBackend::Json => Arc::new(JsonFileStore::open(config.data_file.clone()).await?),
    };
    log::info!("Using {} storage", config.storage.as_str());
    Ok(store)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    tokio::fs::create_dir_all(&config.uploads_dir)
        .await
        .with_context(|| format!("unable to create {}", config.uploads_dir.display()))?;

    let store = open_store(&config).await?;
    if let Some(seed) = &config.admin_seed {
        AuthHandler::seed_admin(store.as_ref(), seed, config.bcrypt_cost).await?;
    }

    let bind_addr = (config.host.clone(), config.port);
    log::info!("Listening on http://{}:{}", bind_addr.0, bind_addr.1);

    let store = web::Data::from(store);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let cors = config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(store.clone())
            .app_data(config.clone())
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .configure(|cfg| routes::configure(cfg, &config.uploads_dir))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
