use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::jwt::Authenticated;
use crate::model::{MaterialFilter, PublicStats, Stats, VideoFilter};
use crate::repo::Store;
use crate::response::ApiResponse;

pub struct StatsHandler;

impl StatsHandler {
    pub async fn dashboard(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
    ) -> Result<HttpResponse, ApiError> {
        let videos = store.list_videos(&VideoFilter::default()).await?;
        let materials = store.list_materials(&MaterialFilter::default()).await?;
        let messages = store.list_contacts().await?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(Stats::collect(videos, materials, messages))))
    }

    pub async fn public(store: web::Data<dyn Store>) -> Result<HttpResponse, ApiError> {
        let videos = store.list_videos(&VideoFilter::default()).await?;
        let materials = store.list_materials(&MaterialFilter::default()).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(PublicStats::collect(&videos, &materials))))
    }
}
