// src/handler/material_handler.rs

use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::constants::{
    MESSAGE_FILE_NOT_ON_DISK, MESSAGE_FILE_REQUIRED, MESSAGE_MATERIAL_CREATED,
    MESSAGE_MATERIAL_DELETED, MESSAGE_MATERIAL_NOT_FOUND, MESSAGE_MATERIAL_REQUIRED,
    MESSAGE_MATERIAL_UPDATED,
};
use crate::error::ApiError;
use crate::jwt::Authenticated;
use crate::model::{Material, MaterialFilter, MaterialQuery, MaterialUpdate};
use crate::repo::Store;
use crate::response::ApiResponse;
use crate::upload::{read_material_form, MaterialForm};
use crate::utils::{non_empty, parse_subject, remove_file_quietly};

fn not_found() -> ApiError {
    ApiError::NotFound(MESSAGE_MATERIAL_NOT_FOUND.to_string())
}

fn new_material(form: &MaterialForm) -> Result<Material, ApiError> {
    let file = form
        .file
        .clone()
        .ok_or_else(|| ApiError::Validation(MESSAGE_FILE_REQUIRED.to_string()))?;
    let (title, category) = match (non_empty(form.title.clone()), non_empty(form.category.clone())) {
        (Some(title), Some(category)) => (title, category),
        _ => return Err(ApiError::Validation(MESSAGE_MATERIAL_REQUIRED.to_string())),
    };
    Ok(Material::new(title, parse_subject(&category)?, file))
}

fn material_update(form: &MaterialForm) -> Result<MaterialUpdate, ApiError> {
    let category = match non_empty(form.category.clone()) {
        Some(category) => Some(parse_subject(&category)?),
        None => None,
    };
    Ok(MaterialUpdate {
        title: non_empty(form.title.clone()),
        category,
        file: form.file.clone(),
    })
}

pub struct MaterialHandler;

impl MaterialHandler {
    pub async fn list(
        store: web::Data<dyn Store>,
        query: web::Query<MaterialQuery>,
    ) -> Result<HttpResponse, ApiError> {
        let filter = MaterialFilter::from(query.into_inner());
        let materials = store.list_materials(&filter).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::list(materials)))
    }

    pub async fn get(
        store: web::Data<dyn Store>,
        material_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        let material = store.get_material(&material_id).await?.ok_or_else(not_found)?;
        Ok(HttpResponse::Ok().json(ApiResponse::ok(material)))
    }

    /// Streams the stored file under its original name and counts the download.
    pub async fn download(
        req: HttpRequest,
        store: web::Data<dyn Store>,
        config: web::Data<Config>,
        material_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        let material = store.get_material(&material_id).await?.ok_or_else(not_found)?;
        let filepath = config.uploads_dir.join(&material.file_path);

        if !tokio::fs::try_exists(&filepath).await.unwrap_or(false) {
            return Err(ApiError::NotFound(MESSAGE_FILE_NOT_ON_DISK.to_string()));
        }
        let named_file = NamedFile::open_async(&filepath)
            .await
            .map_err(|_| ApiError::NotFound(MESSAGE_FILE_NOT_ON_DISK.to_string()))?;

        let material = store
            .record_material_download(&material.id)
            .await?
            .ok_or_else(not_found)?;
        log::info!("## Reading file: {}", filepath.display());

        Ok(named_file
            .use_last_modified(true)
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(material.original_name)],
            })
            .into_response(&req))
    }

    pub async fn create(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        config: web::Data<Config>,
        payload: Multipart,
    ) -> Result<HttpResponse, ApiError> {
        let form = read_material_form(payload, &config.uploads_dir, config.max_upload_bytes).await?;

        let created = match new_material(&form) {
            Ok(material) => store.create_material(&material).await.map(|_| material).map_err(ApiError::from),
            Err(e) => Err(e),
        };

        match created {
            Ok(material) => {
                log::info!("## Stored material {} as {}", material.original_name, material.file_path);
                Ok(HttpResponse::Created()
                    .json(ApiResponse::ok(material).with_message(MESSAGE_MATERIAL_CREATED)))
            }
            Err(e) => {
                form.discard_file(&config.uploads_dir).await; // no orphaned uploads
                Err(e)
            }
        }
    }

    pub async fn update(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        config: web::Data<Config>,
        material_id: web::Path<String>,
        payload: Multipart,
    ) -> Result<HttpResponse, ApiError> {
        let form = read_material_form(payload, &config.uploads_dir, config.max_upload_bytes).await?;

        let updated = match material_update(&form) {
            Ok(update) => store.update_material(&material_id, update).await.map_err(ApiError::from),
            Err(e) => Err(e),
        };

        match updated {
            Ok(Some((previous, material))) => {
                if previous.file_path != material.file_path {
                    remove_file_quietly(&config.uploads_dir.join(&previous.file_path)).await;
                }
                Ok(HttpResponse::Ok()
                    .json(ApiResponse::ok(material).with_message(MESSAGE_MATERIAL_UPDATED)))
            }
            Ok(None) => {
                form.discard_file(&config.uploads_dir).await;
                Err(not_found())
            }
            Err(e) => {
                form.discard_file(&config.uploads_dir).await;
                Err(e)
            }
        }
    }

    /// Removes the record, then the stored file if it is still there.
    pub async fn delete(
        _admin: Authenticated,
        store: web::Data<dyn Store>,
        config: web::Data<Config>,
        material_id: web::Path<String>,
    ) -> Result<HttpResponse, ApiError> {
        let material = store.delete_material(&material_id).await?.ok_or_else(not_found)?;
        remove_file_quietly(&config.uploads_dir.join(&material.file_path)).await;
        log::info!("## Deleted material {}", material.id);
        Ok(HttpResponse::Ok().json(ApiResponse::message(MESSAGE_MATERIAL_DELETED)))
    }
}
