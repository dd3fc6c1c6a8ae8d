use std::path::Path;

use actix_files::Files;
use actix_web::web;

use crate::constants::UPLOADS_ROUTE;
use crate::error::ApiError;
use crate::handler::{
    AuthHandler, ContactHandler, MaterialHandler, StatsHandler, SystemHandler, VideoHandler,
};

/// Full route table; shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig, uploads_dir: &Path) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .route("/", web::get().to(SystemHandler::index))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(SystemHandler::health))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(AuthHandler::register))
                    .route("/login", web::post().to(AuthHandler::login))
                    .route("/verify", web::get().to(AuthHandler::verify)),
            )
            .service(
                web::scope("/videos")
                    .route("", web::get().to(VideoHandler::list))
                    .route("", web::post().to(VideoHandler::create))
                    .route("/{id}", web::get().to(VideoHandler::get))
                    .route("/{id}", web::put().to(VideoHandler::update))
                    .route("/{id}", web::delete().to(VideoHandler::delete)),
            )
            .service(
                web::scope("/materials")
                    .route("", web::get().to(MaterialHandler::list))
                    .route("", web::post().to(MaterialHandler::create))
                    .route("/download/{id}", web::get().to(MaterialHandler::download))
                    .route("/{id}", web::get().to(MaterialHandler::get))
                    .route("/{id}", web::put().to(MaterialHandler::update))
                    .route("/{id}", web::delete().to(MaterialHandler::delete)),
            )
            .service(
                web::scope("/contact")
                    .route("", web::post().to(ContactHandler::create))
                    .route("", web::get().to(ContactHandler::list))
                    .route("/{id}/read", web::put().to(ContactHandler::mark_read))
                    .route("/{id}", web::delete().to(ContactHandler::delete)),
            )
            .service(
                web::scope("/stats")
                    .route("", web::get().to(StatsHandler::dashboard))
                    .route("/public", web::get().to(StatsHandler::public)),
            ),
    )
    .service(Files::new(UPLOADS_ROUTE, uploads_dir));
}
