//! MIME type detection module
//!
//! Returns the Content-Type for a file extension. Extensions carry their
//! leading dot and are matched case-sensitively.

/// Content-Type used when the extension is unknown or empty
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use servefs::http::mime::get_content_type;
/// assert_eq!(get_content_type(".html"), "text/html");
/// assert_eq!(get_content_type(".jpeg"), "image/jpeg");
/// assert_eq!(get_content_type(""), "text/plain");
/// ```
pub fn get_content_type(extension: &str) -> &'static str {
    match extension {
        // Text
        ".htm" | ".html" => "text/html",
        ".css" => "text/css",
        ".csv" => "text/csv",
        ".ics" => "text/calendar",
        ".js" | ".mjs" => "text/javascript",
        ".xhtml" => "application/xhtml+xml",
        ".xml" => "application/xml",
        ".json" => "application/json",
        ".jsonld" => "application/ld+json",
        ".php" => "application/x-httpd-php",
        ".sh" => "application/x-sh",
        ".csh" => "application/x-csh",

        // Images
        ".apng" => "image/apng",
        ".avif" => "image/avif",
        ".bmp" => "image/bmp",
        ".gif" => "image/gif",
        ".ico" => "image/vnd.microsoft.icon",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".svg" => "image/svg+xml",
        ".tif" | ".tiff" => "image/tiff",
        ".webp" => "image/webp",

        // Audio
        ".aac" => "audio/aac",
        ".mid" | ".midi" => "audio/x-midi",
        ".mp3" => "audio/mpeg",
        ".oga" => "audio/ogg",
        ".opus" => "audio/opus",
        ".wav" => "audio/wav",
        ".weba" => "audio/webm",

        // Video
        ".3gp" => "video/3gpp",
        ".3gp2" => "video/3gpp2",
        ".avi" => "video/x-msvideo",
        ".mp4" => "video/mp4",
        ".mpeg" => "video/mpeg",
        ".ogv" => "video/ogg",
        ".ts" => "video/mp2t",
        ".webm" => "video/webm",

        // Fonts
        ".eot" => "application/vnd.ms-fontobject",
        ".otf" => "font/otf",
        ".ttf" => "font/ttf",
        ".woff" => "font/woff",
        ".woff2" => "font/woff2",

        // Documents
        ".abw" => "application/x-abiword",
        ".azw" => "application/vnd.amazon.ebook",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".epub" => "application/epub+zip",
        ".odp" => "application/vnd.oasis.opendocument.presentation",
        ".ods" => "application/vnd.oasis.opendocument.spreadsheet",
        ".odt" => "application/vnd.oasis.opendocument.text",
        ".pdf" => "application/pdf",
        ".ppt" => "application/vnd.ms-powerpoint",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ".rtf" => "application/rtf",
        ".vsd" => "application/vnd.visio",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".xul" => "application/vnd.mozilla.xul+xml",

        // Archives
        ".7zip" => "application/x-7z-compressed",
        ".arc" => "application/x-freearc",
        ".bz" => "application/x-bzip",
        ".bz2" => "application/x-bzip2",
        ".gz" => "application/gzip",
        ".jar" => "application/java-archive",
        ".mpkg" => "application/vnd.apple.installer+xml",
        ".ogx" => "application/ogg",
        ".rar" => "application/vnd.rar",
        ".tar" => "application/x-tar",
        ".zip" => "application/zip",

        // Binary
        ".bin" => "application/octet-stream",

        // Default
        _ => DEFAULT_CONTENT_TYPE,
    }
}
