use serde::{Deserialize, Serialize};

use crate::constants::RECENT_LIMIT;
use crate::model::{Contact, Material, Video};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounts {
    pub videos: usize,
    pub materials: usize,
    pub messages: usize,
    pub unread_messages: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatsTotals {
    pub views: u64,
    pub downloads: u64,
}

#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub videos: Vec<Video>,
    pub materials: Vec<Material>,
    pub messages: Vec<Contact>,
}

/// Admin dashboard statistics.
#[derive(Debug, Serialize)]
pub struct Stats {
    pub counts: StatsCounts,
    pub totals: StatsTotals,
    pub recent: RecentActivity,
}

/// Homepage statistics, aggregate numbers only.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PublicStats {
    pub videos: usize,
    pub materials: usize,
    pub views: u64,
    pub downloads: u64,
}

fn totals(videos: &[Video], materials: &[Material]) -> StatsTotals {
    StatsTotals {
        views: videos.iter().map(|video| video.views).sum(),
        downloads: materials.iter().map(|material| material.downloads).sum(),
    }
}

impl Stats {
    /// Expects each slice newest first, as the store lists them.
    pub fn collect(videos: Vec<Video>, materials: Vec<Material>, messages: Vec<Contact>) -> Self {
        let counts = StatsCounts {
            videos: videos.len(),
            materials: materials.len(),
            messages: messages.len(),
            unread_messages: messages.iter().filter(|message| !message.is_read).count(),
        };
        let totals = totals(&videos, &materials);

        Self {
            counts,
            totals,
            recent: RecentActivity {
                videos: videos.into_iter().take(RECENT_LIMIT).collect(),
                materials: materials.into_iter().take(RECENT_LIMIT).collect(),
                messages: messages.into_iter().take(RECENT_LIMIT).collect(),
            },
        }
    }
}

impl PublicStats {
    pub fn collect(videos: &[Video], materials: &[Material]) -> Self {
        let StatsTotals { views, downloads } = totals(videos, materials);
        Self {
            videos: videos.len(),
            materials: materials.len(),
            views,
            downloads,
        }
    }
}
