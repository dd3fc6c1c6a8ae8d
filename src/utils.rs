use std::path::Path;

use chrono::Utc;
use rand::Rng;

use crate::constants::{ALLOWED_EXTENSIONS, FILTER_ALL};
use crate::error::ApiError;
use crate::model::Subject;

/// Treats blank strings like missing fields.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query filter value; `All` and blank mean no filter.
pub fn list_filter(value: Option<String>) -> Option<String> {
    non_empty(value).filter(|v| v != FILTER_ALL)
}

pub fn parse_subject(value: &str) -> Result<Subject, ApiError> {
    value.parse::<Subject>().map_err(ApiError::Validation)
}

pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Extension including the leading dot, as written in the original name.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

pub fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// `<unix-millis>-<random>` followed by the original extension.
pub fn storage_file_name(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        suffix,
        file_extension(original_name)
    )
}

/// Best-effort removal; a file that is already gone is not an error.
pub async fn remove_file_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(_) => log::info!("## Removed file: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("## Could not remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_575), "1024.0 KB");
        assert_eq!(format_file_size(1_048_576), "1.0 MB");
        assert_eq!(format_file_size(5 * 1_048_576 + 524_288), "5.5 MB");
    }

    #[test]
    fn extension_keeps_dot_and_case() {
        assert_eq!(file_extension("notes.PDF"), ".PDF");
        assert_eq!(file_extension("archive.tar.docx"), ".docx");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn allows_office_extensions_only() {
        for ext in [".pdf", ".PPT", ".pptx", ".doc", ".Docx"] {
            assert!(is_allowed_extension(ext), "{}", ext);
        }
        for ext in [".exe", ".txt", "", ".pdfx"] {
            assert!(!is_allowed_extension(ext), "{}", ext);
        }
    }

    #[test]
    fn storage_name_shape() {
        let name = storage_file_name("Lecture 1.pptx");
        let (stamp, rest) = name.split_once('-').unwrap();
        assert!(stamp.parse::<i64>().is_ok());
        let random = rest.strip_suffix(".pptx").unwrap();
        assert!(random.parse::<u32>().unwrap() < 1_000_000_000);
    }

    #[test]
    fn blank_and_all_are_not_filters() {
        assert_eq!(list_filter(Some("All".to_string())), None);
        assert_eq!(list_filter(Some("  ".to_string())), None);
        assert_eq!(list_filter(None), None);
        assert_eq!(list_filter(Some("DBMS".to_string())), Some("DBMS".to_string()));
    }

    #[tokio::test]
    async fn removing_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        remove_file_quietly(&dir.path().join("nope.pdf")).await;
    }
}
