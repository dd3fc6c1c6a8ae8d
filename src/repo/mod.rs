mod json_repo;
mod sqlite_repo;

pub use json_repo::JsonFileStore;
pub use sqlite_repo::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::StorageBackend;
use crate::model::{
    Contact, Material, MaterialFilter, MaterialUpdate, User, Video, VideoFilter, VideoUpdate,
};

/// Persistence for every record type. Lists are returned newest first.
#[async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> StorageBackend;

    /// Returns `false` without writing when the email is already taken.
    async fn create_user(&self, user: &User) -> Result<bool>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>>;

    async fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<Video>>;
    /// Increments `views` and returns the updated record.
    async fn record_video_view(&self, video_id: &str) -> Result<Option<Video>>;
    async fn create_video(&self, video: &Video) -> Result<()>;
    async fn update_video(&self, video_id: &str, update: VideoUpdate) -> Result<Option<Video>>;
    async fn delete_video(&self, video_id: &str) -> Result<bool>;

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>>;
    async fn get_material(&self, material_id: &str) -> Result<Option<Material>>;
    /// Increments `downloads` and returns the updated record.
    async fn record_material_download(&self, material_id: &str) -> Result<Option<Material>>;
    async fn create_material(&self, material: &Material) -> Result<()>;
    /// Returns the record as it was before the update and as it is after.
    async fn update_material(
        &self,
        material_id: &str,
        update: MaterialUpdate,
    ) -> Result<Option<(Material, Material)>>;
    /// Returns the removed record.
    async fn delete_material(&self, material_id: &str) -> Result<Option<Material>>;

    async fn list_contacts(&self) -> Result<Vec<Contact>>;
    async fn create_contact(&self, contact: &Contact) -> Result<()>;
    async fn mark_contact_read(&self, contact_id: &str) -> Result<Option<Contact>>;
    async fn delete_contact(&self, contact_id: &str) -> Result<bool>;
}
