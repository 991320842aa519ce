//! Provider constants

// ============================================================================
// HTTP
// ============================================================================

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Error message prefix for request timeouts
pub const ERROR_MSG_REQUEST_TIMEOUT: &str = "Request timed out after";

// ============================================================================
// GEMINI
// ============================================================================

/// Default Gemini API base URL
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// API key header
pub const GEMINI_API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// X (TWITTER)
// ============================================================================

/// Default X API base URL
pub const X_DEFAULT_API_BASE: &str = "https://api.x.com";

// ============================================================================
// DOCUMENTS
// ============================================================================

/// Description attached to generated PDF links
pub const GENERATED_PDF_DESCRIPTION: &str = "Generated PDF file";

/// Font size used when stamping text on a page
pub const STAMP_FONT_SIZE: i64 = 18;

/// Stamp position, in points from the bottom-left corner
pub const STAMP_POSITION: (i64, i64) = (50, 700);

/// Stamp colour as RGB fractions
pub const STAMP_COLOR: (f32, f32, f32) = (0.2, 0.8, 0.2);

/// Font size of generated documents
pub const BODY_FONT_SIZE: i64 = 12;

/// Line height of generated documents
pub const BODY_LINE_HEIGHT: i64 = 16;

/// Maximum characters per line in generated documents
pub const BODY_WRAP_COLUMNS: usize = 90;

/// Page size (US Letter) in points
pub const PAGE_SIZE: (i64, i64) = (612, 792);

/// Page margin in points
pub const PAGE_MARGIN: i64 = 50;
