// Messages
pub const MESSAGE_OK: &str = "OK";
pub const MESSAGE_INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
pub const MESSAGE_MISSING_CREDENTIALS: &str = "Please provide email and password";
pub const MESSAGE_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MESSAGE_USER_EXISTS: &str = "User already exists";
pub const MESSAGE_NOT_AUTHORIZED: &str = "Not authorized";
pub const MESSAGE_INVALID_TOKEN: &str = "Invalid token";
pub const MESSAGE_USER_NOT_FOUND: &str = "User not found";

pub const MESSAGE_VIDEO_NOT_FOUND: &str = "Video not found";
pub const MESSAGE_VIDEO_CREATED: &str = "Video added successfully";
pub const MESSAGE_VIDEO_UPDATED: &str = "Video updated successfully";
pub const MESSAGE_VIDEO_DELETED: &str = "Video deleted successfully";
pub const MESSAGE_VIDEO_REQUIRED: &str = "Please provide title, subject, and YouTube ID";

pub const MESSAGE_MATERIAL_NOT_FOUND: &str = "Material not found";
pub const MESSAGE_MATERIAL_CREATED: &str = "Material uploaded successfully";
pub const MESSAGE_MATERIAL_UPDATED: &str = "Material updated successfully";
pub const MESSAGE_MATERIAL_DELETED: &str = "Material deleted successfully";
pub const MESSAGE_MATERIAL_REQUIRED: &str = "Please provide title and category";
pub const MESSAGE_FILE_REQUIRED: &str = "Please upload a file";
pub const MESSAGE_FILE_NOT_ON_DISK: &str = "File not found on server";
pub const MESSAGE_INVALID_FILE_TYPE: &str = "Invalid file type. Only PDF, PPT, and DOC files are allowed.";
pub const MESSAGE_FILE_TOO_LARGE: &str = "File too large";

pub const MESSAGE_CONTACT_NOT_FOUND: &str = "Message not found";
pub const MESSAGE_CONTACT_SENT: &str = "Message sent successfully! We will get back to you soon.";
pub const MESSAGE_CONTACT_DELETED: &str = "Message deleted successfully";
pub const MESSAGE_CONTACT_REQUIRED: &str = "Please provide name, email, and message";

pub const API_NAME: &str = "Faculty E-Content API";

// Defaults
pub const DEFAULT_USER_NAME: &str = "Admin";
pub const DEFAULT_CONTACT_SUBJECT: &str = "No Subject";
pub const DEFAULT_VIDEO_DURATION: &str = "00:00";
pub const FILTER_ALL: &str = "All";
pub const RECENT_LIMIT: usize = 5;

// Auth
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;
pub const BCRYPT_COST: u32 = 12;
pub const DEV_JWT_SECRET: &str = "the quick brown fox jumped over a lazy black dog.";

// Uploads
pub const UPLOADS_ROUTE: &str = "/uploads";
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 5] = [".pdf", ".ppt", ".pptx", ".doc", ".docx"];
pub const FIELD_FILE: &str = "file";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_CATEGORY: &str = "category";

pub fn youtube_thumbnail(youtube_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", youtube_id)
}
