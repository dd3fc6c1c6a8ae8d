use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::constants::{API_NAME, MESSAGE_OK};
use crate::repo::Store;

pub struct SystemHandler;

impl SystemHandler {
    pub async fn health(store: web::Data<dyn Store>) -> HttpResponse {
        let backend = store.backend().as_str();
        HttpResponse::Ok().json(json!({
            "status": MESSAGE_OK,
            "message": format!("Server is running ({} storage)", backend),
            "storage": backend,
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }

    pub async fn index(store: web::Data<dyn Store>) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "message": API_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "storage": store.backend().as_str(),
        }))
    }
}
