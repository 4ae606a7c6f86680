//! Utility functions for date formatting, URL inspection and input checks.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    add_tag, download_file_name, format_ddmmyyyy, is_image, is_pdf, is_valid_mobile_number,
    is_valid_otp, parse_ddmmyyyy, parse_tag_list, truncate_string,
};
