use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::config::StorageBackend;
use crate::db::initialize_db;
use crate::model::{
    Contact, Material, MaterialFilter, MaterialType, MaterialUpdate, Subject, User, Video,
    VideoFilter, VideoUpdate,
};
use crate::repo::Store;

const VIDEO_COLUMNS: &str =
    "id, title, subject, description, thumbnail, duration, youtube_id, views, created_at, updated_at";
const MATERIAL_COLUMNS: &str =
    "id, title, type, category, size, file_path, original_name, downloads, created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, name, email, subject, message, is_read, created_at";

/// Database backend over a SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn ts(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn time_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .with_context(|| format!("bad timestamp in column {}: `{}`", column, raw))?;
    Ok(parsed.with_timezone(&Utc))
}

fn subject_column(row: &SqliteRow, column: &str) -> Result<Subject> {
    let raw: String = row.try_get(column)?;
    raw.parse::<Subject>().map_err(anyhow::Error::msg)
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        name: row.try_get("name")?,
    })
}

fn video_from_row(row: &SqliteRow) -> Result<Video> {
    Ok(Video {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        subject: subject_column(row, "subject")?,
        description: row.try_get("description")?,
        thumbnail: row.try_get("thumbnail")?,
        duration: row.try_get("duration")?,
        youtube_id: row.try_get("youtube_id")?,
        views: row.try_get::<i64, _>("views")? as u64,
        created_at: time_column(row, "created_at")?,
        updated_at: time_column(row, "updated_at")?,
    })
}

fn material_from_row(row: &SqliteRow) -> Result<Material> {
    let kind: String = row.try_get("type")?;
    Ok(Material {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        kind: kind.parse::<MaterialType>().map_err(anyhow::Error::msg)?,
        category: subject_column(row, "category")?,
        size: row.try_get("size")?,
        file_path: row.try_get("file_path")?,
        original_name: row.try_get("original_name")?,
        downloads: row.try_get::<i64, _>("downloads")? as u64,
        created_at: time_column(row, "created_at")?,
        updated_at: time_column(row, "updated_at")?,
    })
}

fn contact_from_row(row: &SqliteRow) -> Result<Contact> {
    Ok(Contact {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        created_at: time_column(row, "created_at")?,
    })
}

impl SqliteStore {
    /// Connects and creates the schema if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("unable to open database {}", url))?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        initialize_db(&pool).await.context("unable to initialize the db")?;
        Ok(Self { pool })
    }

    async fn fetch_video(&self, video_id: &str) -> Result<Option<Video>> {
        let sql = format!("SELECT {} FROM videos WHERE id = ?", VIDEO_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(video_from_row).transpose()
    }

    async fn fetch_material(&self, material_id: &str) -> Result<Option<Material>> {
        let sql = format!("SELECT {} FROM materials WHERE id = ?", MATERIAL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(material_from_row).transpose()
    }

    async fn fetch_contact(&self, contact_id: &str) -> Result<Option<Contact>> {
        let sql = format!("SELECT {} FROM contacts WHERE id = ?", CONTACT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(contact_from_row).transpose()
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }

    async fn create_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password, name) VALUES (?, ?, ?, ?)
             ON CONFLICT(email) DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, password, name FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, password, name FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<Video>> {
        let sql = format!(
            "SELECT {} FROM videos WHERE (?1 IS NULL OR subject = ?1)
             ORDER BY created_at DESC, rowid DESC",
            VIDEO_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(filter.subject.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(video_from_row).collect()
    }

    async fn record_video_view(&self, video_id: &str) -> Result<Option<Video>> {
        let result = sqlx::query("UPDATE videos SET views = views + 1 WHERE id = ?")
            .bind(video_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_video(video_id).await
    }

    async fn create_video(&self, video: &Video) -> Result<()> {
        let sql = format!(
            "INSERT INTO videos ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            VIDEO_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&video.id)
            .bind(&video.title)
            .bind(video.subject.as_str())
            .bind(&video.description)
            .bind(&video.thumbnail)
            .bind(&video.duration)
            .bind(&video.youtube_id)
            .bind(video.views as i64)
            .bind(ts(&video.created_at))
            .bind(ts(&video.updated_at))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_video(&self, video_id: &str, update: VideoUpdate) -> Result<Option<Video>> {
        let result = sqlx::query(
            "UPDATE videos SET
                title = COALESCE(?, title),
                subject = COALESCE(?, subject),
                description = COALESCE(?, description),
                thumbnail = COALESCE(?, thumbnail),
                duration = COALESCE(?, duration),
                youtube_id = COALESCE(?, youtube_id),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(update.title)
        .bind(update.subject.map(|subject| subject.as_str()))
        .bind(update.description)
        .bind(update.thumbnail)
        .bind(update.duration)
        .bind(update.youtube_id)
        .bind(ts(&Utc::now()))
        .bind(video_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_video(video_id).await
    }

    async fn delete_video(&self, video_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(video_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>> {
        let sql = format!(
            "SELECT {} FROM materials
             WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR type = ?2)
             ORDER BY created_at DESC, rowid DESC",
            MATERIAL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.kind.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(material_from_row).collect()
    }

    async fn get_material(&self, material_id: &str) -> Result<Option<Material>> {
        self.fetch_material(material_id).await
    }

    async fn record_material_download(&self, material_id: &str) -> Result<Option<Material>> {
        let result = sqlx::query("UPDATE materials SET downloads = downloads + 1 WHERE id = ?")
            .bind(material_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_material(material_id).await
    }

    async fn create_material(&self, material: &Material) -> Result<()> {
        let sql = format!(
            "INSERT INTO materials ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            MATERIAL_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&material.id)
            .bind(&material.title)
            .bind(material.kind.as_str())
            .bind(material.category.as_str())
            .bind(&material.size)
            .bind(&material.file_path)
            .bind(&material.original_name)
            .bind(material.downloads as i64)
            .bind(ts(&material.created_at))
            .bind(ts(&material.updated_at))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_material(
        &self,
        material_id: &str,
        update: MaterialUpdate,
    ) -> Result<Option<(Material, Material)>> {
        // IMMEDIATE takes the write lock up front; a deferred transaction
        // fails with SQLITE_BUSY if another writer commits between the read
        // and the write.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let sql = format!("SELECT {} FROM materials WHERE id = ?", MATERIAL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(material_id)
            .fetch_optional(&mut *tx)
            .await?;
        let previous = match row.as_ref().map(material_from_row).transpose()? {
            Some(material) => material,
            None => return Ok(None),
        };

        let mut updated = previous.clone();
        update.apply(&mut updated, Utc::now());

        sqlx::query(
            "UPDATE materials SET title = ?, type = ?, category = ?, size = ?,
                file_path = ?, original_name = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&updated.title)
        .bind(updated.kind.as_str())
        .bind(updated.category.as_str())
        .bind(&updated.size)
        .bind(&updated.file_path)
        .bind(&updated.original_name)
        .bind(ts(&updated.updated_at))
        .bind(material_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some((previous, updated)))
    }

    async fn delete_material(&self, material_id: &str) -> Result<Option<Material>> {
        let sql = format!(
            "DELETE FROM materials WHERE id = ? RETURNING {}",
            MATERIAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(material_from_row).transpose()
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let sql = format!(
            "SELECT {} FROM contacts ORDER BY created_at DESC, rowid DESC",
            CONTACT_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(contact_from_row).collect()
    }

    async fn create_contact(&self, contact: &Contact) -> Result<()> {
        let sql = format!(
            "INSERT INTO contacts ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            CONTACT_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&contact.id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.subject)
            .bind(&contact.message)
            .bind(contact.is_read)
            .bind(ts(&contact.created_at))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_contact_read(&self, contact_id: &str) -> Result<Option<Contact>> {
        let result = sqlx::query("UPDATE contacts SET is_read = 1 WHERE id = ?")
            .bind(contact_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_contact(contact_id).await
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(contact_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
