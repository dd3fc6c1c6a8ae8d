// src/handler/contact_handler.rs

use actix_web::{web, HttpResponse};

use crate::constants::{MESSAGE_CONTACT_DELETED, MESSAGE_CONTACT_NOT_FOUND, MESSAGE_CONTACT_SENT};
use crate::error::ApiError;
use crate::jwt::Authenticated;
use crate::model::ContactRequest;
use crate::repo::Store;
use crate::response::ApiResponse;

fn not_found() -> ApiError {
    ApiError::NotFound(MESSAGE_CONTACT_NOT_FOUND.to_string())
}

pub struct ContactHandler;

impl ContactHandler {
    /// Public contact form submission.
    pub async fn create(
        store: web::Data<dyn Store>,
        body: web::Json<ContactRequest>,
    ) -> Result<HttpResponse, ApiError> {
        let contact = body.into_inner().into_contact()?;
        store.create_contact(&contact).await?;
        log::info!("## New contact message {} from {}", contact.id, contact.email);
        Ok(HttpResponse::Created().json(ApiResponse::ok(contact).with_message(MESSAGE_CONTACT_SENT)))
    }

    pub async fn list(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
    ) -> Result<HttpResponse, ApiError> {
        let messages = store.list_contacts().await?;
        Ok(HttpResponse::Ok().json(ApiResponse::list(messages)))
    }

    pub async fn mark_read(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        contact_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        let contact = store
            .mark_contact_read(&contact_id)
            .await?
            .ok_or_else(not_found)?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(contact)))
    }

    pub async fn delete(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        contact_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        if !store.delete_contact(&contact_id).await? {
            return Err(not_found());
        }
        Ok(HttpResponse::Ok().json(ApiResponse::message(MESSAGE_CONTACT_DELETED)))
    }
}
