use std::path::Path;

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt as _;
use tokio::io::AsyncWriteExt;

use crate::constants::{
    FIELD_CATEGORY, FIELD_FILE, FIELD_TITLE, MESSAGE_FILE_TOO_LARGE, MESSAGE_INVALID_FILE_TYPE,
};
use crate::error::ApiError;
use crate::model::{MaterialFile, MaterialType};
use crate::utils::{
    file_extension, format_file_size, is_allowed_extension, remove_file_quietly, storage_file_name,
};

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Parsed `multipart/form-data` body of a material upload.
#[derive(Debug, Default)]
pub struct MaterialForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub file: Option<MaterialFile>,
}

impl MaterialForm {
    /// Removes the stored upload, if any.
    pub async fn discard_file(&self, uploads_dir: &Path) {
        if let Some(file) = &self.file {
            remove_file_quietly(&uploads_dir.join(&file.file_path)).await;
        }
    }
}

/// Reads the form, streaming the `file` part into `uploads_dir`.
///
/// Nothing is left on disk when this returns an error.
pub async fn read_material_form(
    mut payload: Multipart,
    uploads_dir: &Path,
    max_bytes: u64,
) -> Result<MaterialForm, ApiError> {
    let mut form = MaterialForm::default();
    if let Err(e) = read_fields(&mut payload, &mut form, uploads_dir, max_bytes).await {
        form.discard_file(uploads_dir).await;
        return Err(e);
    }
    Ok(form)
}

async fn read_fields(
    payload: &mut Multipart,
    form: &mut MaterialForm,
    uploads_dir: &Path,
    max_bytes: u64,
) -> Result<(), ApiError> {
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FIELD_FILE => {
                if form.file.is_some() {
                    return Err(ApiError::Validation("Only one file per request".to_string()));
                }
                let original_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string)
                    .filter(|name| !name.is_empty());
                match original_name {
                    Some(original_name) => {
                        form.file = Some(store_file(&mut field, &original_name, uploads_dir, max_bytes).await?);
                    }
                    // An empty file input still sends a part; treat it as absent.
                    None => drain(&mut field).await?,
                }
            }
            FIELD_TITLE => form.title = Some(read_text(&mut field).await?),
            FIELD_CATEGORY => form.category = Some(read_text(&mut field).await?),
            _ => drain(&mut field).await?,
        }
    }
    Ok(())
}

async fn read_text(field: &mut Field) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(ApiError::Validation("Form field too large".to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| ApiError::Validation("Form field is not valid UTF-8".to_string()))
}

async fn drain(field: &mut Field) -> Result<(), ApiError> {
    while field.try_next().await?.is_some() {}
    Ok(())
}

async fn store_file(
    field: &mut Field,
    original_name: &str,
    uploads_dir: &Path,
    max_bytes: u64,
) -> Result<MaterialFile, ApiError> {
    let ext = file_extension(original_name);
    if !is_allowed_extension(&ext) {
        return Err(ApiError::Validation(MESSAGE_INVALID_FILE_TYPE.to_string()));
    }

    tokio::fs::create_dir_all(uploads_dir).await?;
    let file_name = storage_file_name(original_name);
    let path = uploads_dir.join(&file_name);
    log::info!("## GOT a file: {} -> {}", original_name, file_name);

    match write_chunks(field, &path, max_bytes).await {
        Ok(size) => Ok(MaterialFile {
            kind: MaterialType::from_extension(&ext),
            size: format_file_size(size),
            file_path: file_name,
            original_name: original_name.to_string(),
        }),
        Err(e) => {
            remove_file_quietly(&path).await;
            Err(e)
        }
    }
}

async fn write_chunks(field: &mut Field, path: &Path, max_bytes: u64) -> Result<u64, ApiError> {
    let mut f = tokio::fs::File::create(path).await?;
    let mut file_size: u64 = 0;

    while let Some(chunk) = field.try_next().await? {
        file_size += chunk.len() as u64;
        if file_size > max_bytes {
            return Err(ApiError::Validation(MESSAGE_FILE_TOO_LARGE.to_string()));
        }
        f.write_all(&chunk).await?;
    }
    f.flush().await?;
    Ok(file_size)
}
