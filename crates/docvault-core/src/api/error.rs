use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status. The body was not parsed.
    #[error("Request failed with status {status}: {body}")]
    Transport {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The server answered 2xx but the body is not valid JSON.
    #[error("Invalid response: {source}")]
    Format {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token cannot be sent as a header: {0}")]
    InvalidHeader(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Which user action an error came from, for picking an alert text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateOtp,
    ValidateOtp,
    Upload,
    Tags,
    Search,
    Download,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Transport {
            status,
            body: Self::truncate_body(body),
        }
    }

    pub fn format(source: serde_json::Error, body: &str) -> Self {
        ApiError::Format {
            source,
            body: Self::truncate_body(body),
        }
    }

    /// Map a local file error, keeping permission problems distinct
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            ApiError::PermissionDenied(path.display().to_string())
        } else {
            ApiError::Io(err)
        }
    }

    /// Generic text to show the user. Transport, format and network errors
    /// read the same; local problems keep their own message.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotAuthenticated => "Please log in first.".to_string(),
            ApiError::PermissionDenied(what) => format!("Permission required to access {}", what),
            _ => match op {
                Operation::GenerateOtp => "Failed to send OTP. Please try again.",
                Operation::ValidateOtp => "Failed to verify OTP. Please try again.",
                Operation::Upload => "Failed to upload document",
                Operation::Tags => "Failed to load tags",
                Operation::Search => "Failed to search documents",
                Operation::Download => "Could not download file.",
            }
            .to_string(),
        }
    }
}
