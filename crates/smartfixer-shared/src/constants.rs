/// Application name
pub const APP_NAME: &str = "SmartFixer";

/// Default diagnosis API base URL (must end with `/` so relative joins keep the path)
pub const DEFAULT_API_BASE_URL: &str = "https://smartfixer-api.onrender.com/";

/// Diagnosis endpoint, relative to the base URL
pub const DIAGNOSE_PATH: &str = "diagnose";

/// Health probe endpoint, relative to the base URL
pub const HEALTH_PATH: &str = "health";

/// HTTP connect timeout in seconds
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Whole-request timeout in seconds (covers read and write)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Longest image side in pixels after preparation
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// JPEG quality used when re-encoding attachments
pub const JPEG_QUALITY: u8 = 85;

/// Media type of every prepared attachment
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Category assigned when the server does not report one
pub const DEFAULT_CATEGORY: &str = "general";

/// Status stored with every new past fix
pub const DEFAULT_FIX_STATUS: &str = "Completed";
