use chrono::NaiveDate;

/// Wire format for every date the backend accepts or returns.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Extensions the preview path can render as images
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Fallback name when neither the server nor the URL provides one
const DEFAULT_DOWNLOAD_NAME: &str = "document";

/// Format a date as DD-MM-YYYY
pub fn format_ddmmyyyy(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a DD-MM-YYYY date
pub fn parse_ddmmyyyy(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Lowercased extension of the URL path, ignoring any query string
fn url_extension(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    last.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Check if a file URL points at an image
pub fn is_image(url: &str) -> bool {
    url_extension(url)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a file URL points at a PDF
pub fn is_pdf(url: &str) -> bool {
    url_extension(url).as_deref() == Some("pdf")
}

/// Split a comma separated tag list, dropping blanks
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add a tag if it is non-empty and not already present.
/// Returns true when the list changed.
pub fn add_tag(tags: &mut Vec<String>, candidate: &str) -> bool {
    let tag = candidate.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

/// A mobile number is exactly 10 digits
pub fn is_valid_mobile_number(number: &str) -> bool {
    number.len() == 10 && number.chars().all(|c| c.is_ascii_digit())
}

/// An OTP is exactly 6 digits
pub fn is_valid_otp(otp: &str) -> bool {
    otp.len() == 6 && otp.chars().all(|c| c.is_ascii_digit())
}

/// Pick the local file name for a download: the server-provided name,
/// else the last URL path segment, else "document".
pub fn download_file_name(file_url: &str, file_name: Option<&str>) -> String {
    if let Some(name) = file_name.map(str::trim).filter(|n| !n.is_empty()) {
        return sanitize_file_name(name);
    }
    let path = file_url.split('?').next().unwrap_or(file_url);
    match path.rsplit('/').next().map(str::trim) {
        Some(segment) if !segment.is_empty() => sanitize_file_name(segment),
        _ => DEFAULT_DOWNLOAD_NAME.to_string(),
    }
}

/// Keep downloads inside the target directory
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    if cleaned == "." || cleaned == ".." {
        DEFAULT_DOWNLOAD_NAME.to_string()
    } else {
        cleaned
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
