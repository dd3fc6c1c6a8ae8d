use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::Subject;
use crate::utils::list_filter;

/// Document kind derived from the uploaded file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "PPT")]
    Ppt,
    #[serde(rename = "DOC")]
    Doc,
    Other,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Pdf => "PDF",
            MaterialType::Ppt => "PPT",
            MaterialType::Doc => "DOC",
            MaterialType::Other => "Other",
        }
    }

    /// Classifies by extension (with leading dot, any case).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            ".pdf" => MaterialType::Pdf,
            ".ppt" | ".pptx" => MaterialType::Ppt,
            ".doc" | ".docx" => MaterialType::Doc,
            _ => MaterialType::Other,
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDF" => Ok(MaterialType::Pdf),
            "PPT" => Ok(MaterialType::Ppt),
            "DOC" => Ok(MaterialType::Doc),
            "Other" => Ok(MaterialType::Other),
            _ => Err(format!("`{}` is not a valid material type", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub category: Subject,
    pub size: String,
    pub file_path: String,
    pub original_name: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Metadata of a file accepted by the upload intake.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialFile {
    pub kind: MaterialType,
    pub size: String,
    pub file_path: String,
    pub original_name: String,
}

#[derive(Debug, Default, Clone)]
pub struct MaterialUpdate {
    pub title: Option<String>,
    pub category: Option<Subject>,
    pub file: Option<MaterialFile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MaterialQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct MaterialFilter {
    pub category: Option<String>,
    pub kind: Option<String>,
}

impl Material {
    pub fn new(title: String, category: Subject, file: MaterialFile) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            kind: file.kind,
            category,
            size: file.size,
            file_path: file.file_path,
            original_name: file.original_name,
            downloads: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl MaterialUpdate {
    pub fn apply(self, material: &mut Material, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            material.title = title;
        }
        if let Some(category) = self.category {
            material.category = category;
        }
        if let Some(file) = self.file {
            material.kind = file.kind;
            material.size = file.size;
            material.file_path = file.file_path;
            material.original_name = file.original_name;
        }
        material.updated_at = now;
    }
}

impl From<MaterialQuery> for MaterialFilter {
    fn from(query: MaterialQuery) -> Self {
        Self {
            category: list_filter(query.category),
            kind: list_filter(query.kind),
        }
    }
}

impl MaterialFilter {
    pub fn matches(&self, material: &Material) -> bool {
        let category = self
            .category
            .as_deref()
            .map_or(true, |category| material.category.as_str() == category);
        let kind = self
            .kind
            .as_deref()
            .map_or(true, |kind| material.kind.as_str() == kind);
        category && kind
    }
}
