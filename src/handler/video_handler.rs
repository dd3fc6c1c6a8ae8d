// src/handler/video_handler.rs

use actix_web::{web, HttpResponse};

use crate::constants::{
    MESSAGE_VIDEO_CREATED, MESSAGE_VIDEO_DELETED, MESSAGE_VIDEO_NOT_FOUND, MESSAGE_VIDEO_UPDATED,
};
use crate::error::ApiError;
use crate::jwt::Authenticated;
use crate::model::{VideoFilter, VideoQuery, VideoRequest};
use crate::repo::Store;
use crate::response::ApiResponse;

fn not_found() -> ApiError {
    ApiError::NotFound(MESSAGE_VIDEO_NOT_FOUND.to_string())
}

pub struct VideoHandler;

impl VideoHandler {
    pub async fn list(
        store: web::Data<dyn Store>,
        query: web::Query<VideoQuery>,
    ) -> Result<HttpResponse, ApiError> {
        let filter = VideoFilter::from(query.into_inner());
        let videos = store.list_videos(&filter).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::list(videos)))
    }

    /// Every successful single read counts as a view.
    pub async fn get(
        store: web::Data<dyn Store>,
        video_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        let video = store.record_video_view(&video_id).await?.ok_or_else(not_found)?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(video)))
    }

    pub async fn create(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        body: web::Json<VideoRequest>,
    ) -> Result<HttpResponse, ApiError> {
        let video = body.into_inner().into_video()?;
        store.create_video(&video).await?;
        log::info!("## Created video {} ({})", video.id, video.title);
        Ok(HttpResponse::Created().json(ApiResponse::ok(video).with_message(MESSAGE_VIDEO_CREATED)))
    }

    pub async fn update(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        video_id: web::Path<String>,
        body: web::Json<VideoRequest>,
    ) -> Result<HttpResponse, ApiError> {
        let update = body.into_inner().into_update()?;
        let video = store
            .update_video(&video_id, update)
            .await?
            .ok_or_else(not_found)?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(video).with_message(MESSAGE_VIDEO_UPDATED)))
    }

    pub async fn delete(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        video_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        if !store.delete_video(&video_id).await? {
            return Err(not_found());
        }
        log::info!("## Deleted video {}", video_id);
        Ok(HttpResponse::Ok().json(ApiResponse::message(MESSAGE_VIDEO_DELETED)))
    }
}
