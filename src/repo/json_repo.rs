use std::cmp::Reverse;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::StorageBackend;
use crate::model::{
    Contact, Material, MaterialFilter, MaterialUpdate, User, Video, VideoFilter, VideoUpdate,
};
use crate::repo::Store;

/// On-disk document, rewritten wholesale on every mutation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// Flat JSON file backend. Every operation holds `lock` for its whole
/// read-modify-write so concurrent requests cannot lose updates.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

/// Newest first; records inserted later win ties.
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut items: Vec<T> = items.iter().rev().cloned().collect();
    items.sort_by_key(|item| Reverse(created_at(item)));
    items
}

impl JsonFileStore {
    /// Opens the data file, creating an empty one when missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        if !tokio::fs::try_exists(&store.path).await.unwrap_or(false) {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            store.write(&DataFile::default()).await?;
            log::info!("Data file created at {}", store.path.display());
        }
        // Fail fast on a corrupt file.
        store.read().await?;
        Ok(store)
    }

    async fn read(&self) -> Result<DataFile> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("unable to read {}", self.path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("unable to parse {}", self.path.display()))
    }

    async fn write(&self, data: &DataFile) -> Result<()> {
        let raw = serde_json::to_vec_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .with_context(|| format!("unable to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("unable to replace {}", self.path.display()))?;
        Ok(())
    }

    async fn query<R>(&self, f: impl FnOnce(&DataFile) -> R) -> Result<R> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(f(&data))
    }

    /// Applies `f` and persists the document only when it returns `Some`.
    async fn mutate<R>(&self, f: impl FnOnce(&mut DataFile) -> Option<R>) -> Result<Option<R>> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let result = f(&mut data);
        if result.is_some() {
            self.write(&data).await?;
        }
        Ok(result)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Json
    }

    async fn create_user(&self, user: &User) -> Result<bool> {
        let created = self
            .mutate(|data| {
                if data.users.iter().any(|u| u.email == user.email) {
                    return None;
                }
                data.users.push(user.clone());
                Some(())
            })
            .await?;
        Ok(created.is_some())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query(|data| data.users.iter().find(|u| u.email == email).cloned())
            .await
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.query(|data| data.users.iter().find(|u| u.id == user_id).cloned())
            .await
    }

    async fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<Video>> {
        self.query(|data| {
            let videos: Vec<Video> = data
                .videos
                .iter()
                .filter(|v| filter.matches(v))
                .cloned()
                .collect();
            newest_first(&videos, |v| v.created_at)
        })
        .await
    }

    async fn record_video_view(&self, video_id: &str) -> Result<Option<Video>> {
        self.mutate(|data| {
            let video = data.videos.iter_mut().find(|v| v.id == video_id)?;
            video.views += 1;
            Some(video.clone())
        })
        .await
    }

    async fn create_video(&self, video: &Video) -> Result<()> {
        self.mutate(|data| {
            data.videos.push(video.clone());
            Some(())
        })
        .await?;
        Ok(())
    }

    async fn update_video(&self, video_id: &str, update: VideoUpdate) -> Result<Option<Video>> {
        self.mutate(|data| {
            let video = data.videos.iter_mut().find(|v| v.id == video_id)?;
            update.apply(video, Utc::now());
            Some(video.clone())
        })
        .await
    }

    async fn delete_video(&self, video_id: &str) -> Result<bool> {
        let removed = self
            .mutate(|data| {
                let index = data.videos.iter().position(|v| v.id == video_id)?;
                Some(data.videos.remove(index))
            })
            .await?;
        Ok(removed.is_some())
    }

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>> {
        self.query(|data| {
            let materials: Vec<Material> = data
                .materials
                .iter()
                .filter(|m| filter.matches(m))
                .cloned()
                .collect();
            newest_first(&materials, |m| m.created_at)
        })
        .await
    }

    async fn get_material(&self, material_id: &str) -> Result<Option<Material>> {
        self.query(|data| data.materials.iter().find(|m| m.id == material_id).cloned())
            .await
    }

    async fn record_material_download(&self, material_id: &str) -> Result<Option<Material>> {
        self.mutate(|data| {
            let material = data.materials.iter_mut().find(|m| m.id == material_id)?;
            material.downloads += 1;
            Some(material.clone())
        })
        .await
    }

    async fn create_material(&self, material: &Material) -> Result<()> {
        self.mutate(|data| {
            data.materials.push(material.clone());
            Some(())
        })
        .await?;
        Ok(())
    }

    async fn update_material(
        &self,
        material_id: &str,
        update: MaterialUpdate,
    ) -> Result<Option<(Material, Material)>> {
        self.mutate(|data| {
            let material = data.materials.iter_mut().find(|m| m.id == material_id)?;
            let previous = material.clone();
            update.apply(material, Utc::now());
            Some((previous, material.clone()))
        })
        .await
    }

    async fn delete_material(&self, material_id: &str) -> Result<Option<Material>> {
        self.mutate(|data| {
            let index = data.materials.iter().position(|m| m.id == material_id)?;
            Some(data.materials.remove(index))
        })
        .await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.query(|data| newest_first(&data.contacts, |c| c.created_at))
            .await
    }

    async fn create_contact(&self, contact: &Contact) -> Result<()> {
        self.mutate(|data| {
            data.contacts.push(contact.clone());
            Some(())
        })
        .await?;
        Ok(())
    }

    async fn mark_contact_read(&self, contact_id: &str) -> Result<Option<Contact>> {
        self.mutate(|data| {
            let contact = data.contacts.iter_mut().find(|c| c.id == contact_id)?;
            contact.is_read = true;
            Some(contact.clone())
        })
        .await
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<bool> {
        let removed = self
            .mutate(|data| {
                let index = data.contacts.iter().position(|c| c.id == contact_id)?;
                Some(data.contacts.remove(index))
            })
            .await?;
        Ok(removed.is_some())
    }
}
