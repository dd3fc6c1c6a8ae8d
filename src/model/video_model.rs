use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{youtube_thumbnail, DEFAULT_VIDEO_DURATION, MESSAGE_VIDEO_REQUIRED};
use crate::error::ApiError;
use crate::model::Subject;
use crate::utils::{list_filter, non_empty, parse_subject};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub subject: Subject,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default = "default_duration")]
    pub duration: String,
    pub youtube_id: String,
    #[serde(default)]
    pub views: u64,
    // Records written without timestamps load as the Unix epoch.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

fn default_duration() -> String {
    DEFAULT_VIDEO_DURATION.to_string()
}

/// Body of `POST /api/videos` and `PUT /api/videos/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub youtube_id: Option<String>,
}

/// Mutable video fields; `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub subject: Option<Subject>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub youtube_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct VideoFilter {
    pub subject: Option<String>,
}

impl VideoRequest {
    pub fn into_video(self) -> Result<Video, ApiError> {
        let (title, subject, youtube_id) = match (
            non_empty(self.title),
            non_empty(self.subject),
            non_empty(self.youtube_id),
        ) {
            (Some(title), Some(subject), Some(youtube_id)) => (title, subject, youtube_id),
            _ => return Err(ApiError::Validation(MESSAGE_VIDEO_REQUIRED.to_string())),
        };
        let subject = parse_subject(&subject)?;
        let now = Utc::now();

        Ok(Video {
            id: Uuid::new_v4().to_string(),
            thumbnail: non_empty(self.thumbnail).unwrap_or_else(|| youtube_thumbnail(&youtube_id)),
            duration: non_empty(self.duration).unwrap_or_else(|| DEFAULT_VIDEO_DURATION.to_string()),
            description: self.description.unwrap_or_default(),
            title,
            subject,
            youtube_id,
            views: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn into_update(self) -> Result<VideoUpdate, ApiError> {
        let subject = match non_empty(self.subject) {
            Some(subject) => Some(parse_subject(&subject)?),
            None => None,
        };

        Ok(VideoUpdate {
            title: non_empty(self.title),
            subject,
            description: self.description,
            thumbnail: non_empty(self.thumbnail),
            duration: non_empty(self.duration),
            youtube_id: non_empty(self.youtube_id),
        })
    }
}

impl VideoUpdate {
    pub fn apply(self, video: &mut Video, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            video.title = title;
        }
        if let Some(subject) = self.subject {
            video.subject = subject;
        }
        if let Some(description) = self.description {
            video.description = description;
        }
        if let Some(thumbnail) = self.thumbnail {
            video.thumbnail = thumbnail;
        }
        if let Some(duration) = self.duration {
            video.duration = duration;
        }
        if let Some(youtube_id) = self.youtube_id {
            video.youtube_id = youtube_id;
        }
        video.updated_at = now;
    }
}

impl From<VideoQuery> for VideoFilter {
    fn from(query: VideoQuery) -> Self {
        Self {
            subject: list_filter(query.subject),
        }
    }
}

impl VideoFilter {
    pub fn matches(&self, video: &Video) -> bool {
        self.subject
            .as_deref()
            .map_or(true, |subject| video.subject.as_str() == subject)
    }
}
